//! Fit-quality metrics.
//!
//! For one column with target `k` and weighted sum `s`, fit quality is
//! `|1 - s/k|`. Zero is an exact match; there is no upper bound.

use crate::domain::{ColumnDiagnostic, ColumnKey};
use crate::ipu::{IpuError, IpuResult};
use crate::table::{Column, Constraints, FrequencyTable, Weights};

/// Σ value × weight over the households present in `column`.
///
/// Weights are matched by household id, so they may cover the whole table,
/// only the column's households, or any index that includes them.
pub fn weighted_sum(column: &Column, weights: &Weights) -> IpuResult<f64> {
    let mut sum = 0.0;
    for ((&row, &household), &value) in column.rows().iter().zip(column.households()).zip(column.values()) {
        let Some(pos) = weights.locate(row, household) else {
            return Err(IpuError::WeightsMismatch {
                key: column.key(),
                household,
            });
        };
        sum += value * weights.at(pos);
    }
    Ok(sum)
}

/// Weighted sum for weights built from the column's own table.
pub(crate) fn aligned_weighted_sum(column: &Column, weights: &Weights) -> f64 {
    column
        .rows()
        .iter()
        .zip(column.values())
        .map(|(&row, &value)| value * weights.at(row))
        .sum()
}

pub(crate) fn check_constraint(key: ColumnKey, constraint: f64) -> IpuResult<f64> {
    if constraint.is_finite() && constraint > 0.0 {
        Ok(constraint)
    } else {
        Err(IpuError::ZeroConstraint {
            key,
            value: constraint,
        })
    }
}

/// Relative deviation of the column's weighted sum from `constraint`.
pub fn fit_quality(column: &Column, weights: &Weights, constraint: f64) -> IpuResult<f64> {
    let constraint = check_constraint(column.key(), constraint)?;
    Ok((1.0 - weighted_sum(column, weights)? / constraint).abs())
}

/// Unweighted mean of [`fit_quality`] over every column of the table.
pub fn average_fit_quality(
    table: &FrequencyTable,
    weights: &Weights,
    constraints: &Constraints,
) -> IpuResult<f64> {
    let columns = table.columns();
    if columns.is_empty() {
        return Err(IpuError::EmptyTable);
    }

    let mut total = 0.0;
    for column in columns {
        total += fit_quality(column, weights, constraints.target(column.key())?)?;
    }
    Ok(total / columns.len() as f64)
}

/// Target, weighted sum and fit quality for every column, in sweep order.
pub fn column_diagnostics(
    table: &FrequencyTable,
    weights: &Weights,
    constraints: &Constraints,
) -> IpuResult<Vec<ColumnDiagnostic>> {
    table
        .columns()
        .iter()
        .map(|column| {
            let key = column.key();
            let target = check_constraint(key, constraints.target(key)?)?;
            let weighted_sum = weighted_sum(column, weights)?;
            Ok(ColumnDiagnostic {
                key,
                target,
                weighted_sum,
                fit_quality: (1.0 - weighted_sum / target).abs(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample::{reference_constraints, reference_table};

    const FITTED: [f64; 8] = [12.37, 14.61, 8.05, 16.28, 16.91, 8.97, 13.78, 8.97];

    #[test]
    fn fit_quality_matches_reference_columns() {
        let table = reference_table();
        let constraints = reference_constraints();

        let ones = Weights::uniform(&table, 1.0);
        let column = table.column(ColumnKey::household(1)).unwrap();
        let q = fit_quality(column, &ones, constraints.target(column.key()).unwrap()).unwrap();
        assert!((q - 0.9143).abs() < 1e-4, "got {q}");

        let weights = Weights::from_values(&table, FITTED.to_vec()).unwrap();
        let column = table.column(ColumnKey::person(2)).unwrap();
        let q = fit_quality(column, &weights, constraints.target(column.key()).unwrap()).unwrap();
        assert!((q - 0.3222).abs() < 3e-4, "got {q}");
    }

    #[test]
    fn unit_weights_give_one_minus_count_ratio() {
        let table = reference_table();
        let ones = Weights::uniform(&table, 1.0);
        for column in table.columns() {
            let s: f64 = column.values().iter().sum();
            let q = fit_quality(column, &ones, 50.0).unwrap();
            assert!((q - (1.0 - s / 50.0).abs()).abs() < 1e-12);
        }
    }

    #[test]
    fn absent_households_do_not_contribute() {
        let table = reference_table();
        let column = table.column(ColumnKey::household(1)).unwrap();
        let mut values = vec![1.0; 8];
        values[7] = 1000.0; // household 8 is not in household/1
        let weights = Weights::from_values(&table, values).unwrap();
        assert!((weighted_sum(column, &weights).unwrap() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn weights_are_matched_by_household_not_position() {
        let table = reference_table();
        let column = table.column(ColumnKey::household(1)).unwrap();

        // Reversed index: households 1-3 sit at the end.
        let reversed = Weights::from_pairs((1..=8).rev().map(|h| (h, if h <= 3 { 1.0 } else { 50.0 }))).unwrap();
        let q = fit_quality(column, &reversed, 35.0).unwrap();
        assert!((q - 0.9143).abs() < 1e-4, "got {q}");

        // Only the column's own households.
        let own = Weights::from_pairs(column.households().iter().map(|&h| (h, 1.0))).unwrap();
        let q = fit_quality(column, &own, 35.0).unwrap();
        assert!((q - 0.9143).abs() < 1e-4, "got {q}");
    }

    #[test]
    fn weights_missing_a_column_household_are_rejected() {
        let table = reference_table();
        let column = table.column(ColumnKey::person(3)).unwrap();
        let partial = Weights::from_pairs([(1, 1.0), (2, 1.0)]).unwrap();
        assert_eq!(
            fit_quality(column, &partial, 104.0),
            Err(IpuError::WeightsMismatch {
                key: ColumnKey::person(3),
                household: 4
            })
        );
    }

    #[test]
    fn zero_or_negative_constraint_is_an_error() {
        let table = reference_table();
        let ones = Weights::uniform(&table, 1.0);
        let column = &table.columns()[0];
        for bad in [0.0, -4.0, f64::NAN] {
            let err = fit_quality(column, &ones, bad).unwrap_err();
            assert!(matches!(err, IpuError::ZeroConstraint { .. }));
        }
    }

    #[test]
    fn average_fit_quality_matches_reference() {
        let table = reference_table();
        let constraints = reference_constraints();

        let ones = Weights::uniform(&table, 1.0);
        let avg = average_fit_quality(&table, &ones, &constraints).unwrap();
        assert!((avg - 0.9127).abs() < 1e-4, "got {avg}");

        let weights = Weights::from_values(&table, FITTED.to_vec()).unwrap();
        let avg = average_fit_quality(&table, &weights, &constraints).unwrap();
        assert!((avg - 0.0954).abs() < 1e-4, "got {avg}");
    }

    #[test]
    fn average_is_mean_of_columns() {
        let table = reference_table();
        let constraints = reference_constraints();
        let weights = Weights::from_values(&table, FITTED.to_vec()).unwrap();

        let diags = column_diagnostics(&table, &weights, &constraints).unwrap();
        assert_eq!(diags.len(), 5);
        let mean = diags.iter().map(|d| d.fit_quality).sum::<f64>() / diags.len() as f64;
        let avg = average_fit_quality(&table, &weights, &constraints).unwrap();
        assert!((mean - avg).abs() < 1e-12);
    }

    #[test]
    fn missing_constraint_and_empty_table() {
        let table = reference_table();
        let ones = Weights::uniform(&table, 1.0);
        let partial = Constraints::new().with(ColumnKey::household(1), 35.0);
        assert!(matches!(
            average_fit_quality(&table, &ones, &partial),
            Err(IpuError::MissingConstraint { .. })
        ));

        let empty = FrequencyTable::builder([1]).build().unwrap();
        let ones = Weights::uniform(&empty, 1.0);
        assert_eq!(
            average_fit_quality(&empty, &ones, &Constraints::new()),
            Err(IpuError::EmptyTable)
        );
    }
}
