//! Read/write fit report JSON files.
//!
//! A fit report is the portable record of one run: terminal status, sweep
//! count, fit quality, the weights and per-column diagnostics. The schema is
//! `domain::FitReport`.

use std::fs::File;
use std::path::Path;

use crate::domain::{ColumnDiagnostic, FitReport};
use crate::error::AppError;
use crate::ipu::IpuFit;

/// Assemble the serializable report for a finished fit.
pub fn fit_report(fit: &IpuFit, columns: &[ColumnDiagnostic]) -> FitReport {
    FitReport {
        tool: "ipu".to_string(),
        status: fit.status,
        iterations: fit.iterations,
        fit_quality: fit.fit_quality,
        fit_change: fit.fit_change,
        weights: fit.weights.to_records(),
        columns: columns.to_vec(),
    }
}

/// Write a fit report JSON file.
pub fn write_fit_json(path: &Path, fit: &IpuFit, columns: &[ColumnDiagnostic]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create report JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, &fit_report(fit, columns))
        .map_err(|e| AppError::new(2, format!("Failed to write report JSON: {e}")))?;

    Ok(())
}

/// Read a fit report JSON file.
pub fn read_fit_json(path: &Path) -> Result<FitReport, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open report JSON '{}': {e}", path.display())))?;
    let report: FitReport =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid report JSON: {e}")))?;
    Ok(report)
}
