//! Per-column multiplicative weight update.
//!
//! Every household in a column is rescaled by the same ratio
//! `constraint / weighted_sum`. A household's count enters the weighted sum
//! but not its own multiplier.

use crate::domain::{ColumnKey, HouseholdId};
use crate::ipu::quality::{aligned_weighted_sum, check_constraint, weighted_sum};
use crate::ipu::{IpuError, IpuResult};
use crate::table::{Column, Weights};

/// New weights for exactly the households of one column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnUpdate {
    pub ratio: f64,
    key: ColumnKey,
    rows: Vec<usize>,
    households: Vec<HouseholdId>,
    weights: Vec<f64>,
}

impl ColumnUpdate {
    pub fn households(&self) -> &[HouseholdId] {
        &self.households
    }

    /// Updated weights, parallel to [`ColumnUpdate::households`].
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn iter(&self) -> impl Iterator<Item = (HouseholdId, f64)> + '_ {
        self.households.iter().copied().zip(self.weights.iter().copied())
    }

    /// Write the updated sub-mapping back into `weights`, matching by
    /// household id. Nothing is written if a household is missing.
    pub fn apply(&self, weights: &mut Weights) -> IpuResult<()> {
        let positions = self
            .rows
            .iter()
            .zip(&self.households)
            .map(|(&row, &household)| {
                weights.locate(row, household).ok_or(IpuError::WeightsMismatch {
                    key: self.key,
                    household,
                })
            })
            .collect::<IpuResult<Vec<usize>>>()?;

        for (pos, &w) in positions.into_iter().zip(&self.weights) {
            weights.set(pos, w);
        }
        Ok(())
    }
}

/// Scalar that brings `column`'s weighted sum onto `constraint`.
pub fn update_ratio(column: &Column, weights: &Weights, constraint: f64) -> IpuResult<f64> {
    let constraint = check_constraint(column.key(), constraint)?;
    ratio_from_sum(column, constraint, weighted_sum(column, weights)?)
}

fn ratio_from_sum(column: &Column, constraint: f64, sum: f64) -> IpuResult<f64> {
    if !(sum.is_finite() && sum > 0.0) {
        return Err(IpuError::ZeroWeightedSum { key: column.key() });
    }
    Ok(constraint / sum)
}

/// Compute updated weights for the households of `column`.
///
/// `weights` may cover the whole table or only the column's households.
/// Households outside the column are not part of the result.
pub fn update_weights(column: &Column, weights: &Weights, constraint: f64) -> IpuResult<ColumnUpdate> {
    let ratio = update_ratio(column, weights, constraint)?;
    let mut updated = Vec::with_capacity(column.len());
    for (&row, &household) in column.rows().iter().zip(column.households()) {
        // update_ratio already matched every household
        let pos = weights.locate(row, household).ok_or(IpuError::WeightsMismatch {
            key: column.key(),
            household,
        })?;
        updated.push(weights.at(pos) * ratio);
    }
    Ok(ColumnUpdate {
        ratio,
        key: column.key(),
        rows: column.rows().to_vec(),
        households: column.households().to_vec(),
        weights: updated,
    })
}

/// Rescale `column`'s households in place and return the ratio used.
///
/// `weights` must be built from the column's own table.
pub(crate) fn rescale_column(column: &Column, weights: &mut Weights, constraint: f64) -> IpuResult<f64> {
    let constraint = check_constraint(column.key(), constraint)?;
    let ratio = ratio_from_sum(column, constraint, aligned_weighted_sum(column, weights))?;
    for &row in column.rows() {
        weights.set(row, weights.at(row) * ratio);
    }
    Ok(ratio)
}
