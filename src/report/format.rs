//! Terminal formatting of fit results.
//!
//! We keep formatting code in one place so:
//! - the fitting code stays clean and testable
//! - output changes are localized

use crate::domain::{ColumnDiagnostic, ColumnGroup};
use crate::ipu::IpuFit;
use crate::table::FrequencyTable;

/// Format the run summary: inputs, termination and weight totals.
pub fn format_fit_summary(table: &FrequencyTable, fit: &IpuFit, convergence: f64) -> String {
    let mut out = String::new();

    out.push_str("=== ipu - household weights (IPU) ===\n");
    out.push_str(&format!(
        "Table: households={} | columns={} (household={}, person={})\n",
        table.len(),
        table.columns().len(),
        table.group(ColumnGroup::Household).count(),
        table.group(ColumnGroup::Person).count(),
    ));
    out.push_str(&format!(
        "Status: {} after {} sweeps (threshold {convergence:e})\n",
        fit.status.display_name(),
        fit.iterations,
    ));
    out.push_str(&format!(
        "Fit quality: {:.6e} | last change: {:.3e}\n",
        fit.fit_quality, fit.fit_change
    ));

    let w = fit.weights.as_slice();
    let min = w.iter().copied().fold(f64::INFINITY, f64::min);
    let max = w.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !w.is_empty() {
        out.push_str(&format!(
            "Weights: total={:.2} | min={:.4} | max={:.4}\n",
            fit.weights.total(),
            min,
            max
        ));
    }

    out
}

/// Format the per-column target vs weighted-sum table.
pub fn format_columns(columns: &[ColumnDiagnostic]) -> String {
    let mut out = String::new();
    out.push_str(format!("{:<16} {:>14} {:>14} {:>12}\n", "column", "target", "weighted", "fit").trim_end());
    out.push('\n');
    out.push_str(format!("{:-<16} {:-<14} {:-<14} {:-<12}\n", "", "", "", "").trim_end());
    out.push('\n');

    for c in columns {
        out.push_str(
            format!(
                "{:<16} {:>14.4} {:>14.4} {:>12.3e}\n",
                c.key.to_string(),
                c.target,
                c.weighted_sum,
                c.fit_quality
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Format the weights as `household  weight` lines.
pub fn format_weights(fit: &IpuFit) -> String {
    let mut out = String::new();
    out.push_str("household        weight\n");
    for (household, weight) in fit.weights.iter() {
        out.push_str(&format!("{household:<12} {weight:>10.4}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ColumnKey;

    #[test]
    fn column_table_has_header_and_rows() {
        let rows = vec![
            ColumnDiagnostic {
                key: ColumnKey::household(1),
                target: 35.0,
                weighted_sum: 34.9,
                fit_quality: 0.00285,
            },
            ColumnDiagnostic {
                key: ColumnKey::person(12),
                target: 104.0,
                weighted_sum: 104.0,
                fit_quality: 0.0,
            },
        ];
        let text = format_columns(&rows);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("column"));
        assert!(lines[2].starts_with("household/1"));
        assert!(lines[3].starts_with("person/12"));
        assert!(lines[3].contains("104.0000"));
    }
}
