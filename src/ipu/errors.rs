//! Errors raised by table construction and the IPU fitting engine.

use crate::domain::{ColumnKey, HouseholdId};

/// Result alias for fitting operations.
pub type IpuResult<T> = Result<T, IpuError>;

/// Errors that can occur while building inputs or fitting weights.
///
/// Hitting the iteration cap is *not* an error: it is reported through
/// `FitStatus::Exhausted` on the returned fit.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IpuError {
    /// A column's target total is zero, negative or non-finite.
    #[error("constraint for {key} must be positive and finite, got {value}")]
    ZeroConstraint { key: ColumnKey, value: f64 },

    /// The column's weighted sum is zero, so no rescaling ratio exists.
    ///
    /// Fatal for the current fit: the constraint cannot be reached by
    /// multiplicative updates.
    #[error("weighted sum of {key} is zero; column cannot be rescaled")]
    ZeroWeightedSum { key: ColumnKey },

    /// The supplied weights have no entry for a household of the column.
    #[error("weights have no entry for household {household} of column {key}")]
    WeightsMismatch { key: ColumnKey, household: HouseholdId },

    /// A table column has no target total.
    #[error("no constraint supplied for column {key}")]
    MissingConstraint { key: ColumnKey },

    /// The table has no columns to fit.
    #[error("frequency table has no columns")]
    EmptyTable,

    /// A frequency table invariant was violated while building it.
    #[error("invalid frequency table: {0}")]
    InvalidTable(String),

    /// Convergence threshold or iteration cap is unusable.
    #[error("invalid fit options: {0}")]
    InvalidOptions(String),
}

impl IpuError {
    /// True for failures caused by the data rather than by the caller's setup.
    pub fn is_numerical(&self) -> bool {
        matches!(self, Self::ZeroConstraint { .. } | Self::ZeroWeightedSum { .. })
    }
}
