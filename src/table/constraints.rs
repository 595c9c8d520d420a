//! Target totals keyed by frequency column.

use std::collections::BTreeMap;

use crate::domain::ColumnKey;
use crate::ipu::{IpuError, IpuResult};

/// Desired weighted sum for each `(group, category)` column.
///
/// Targets are stored as given; positivity is checked where a target is used
/// so that the error names the column being fitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constraints {
    targets: BTreeMap<ColumnKey, f64>,
}

impl Constraints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target for `key`, returning the previous one if any.
    pub fn insert(&mut self, key: ColumnKey, target: f64) -> Option<f64> {
        self.targets.insert(key, target)
    }

    pub fn with(mut self, key: ColumnKey, target: f64) -> Self {
        self.insert(key, target);
        self
    }

    pub fn get(&self, key: ColumnKey) -> Option<f64> {
        self.targets.get(&key).copied()
    }

    /// Target for `key`, or `MissingConstraint`.
    pub fn target(&self, key: ColumnKey) -> IpuResult<f64> {
        self.get(key).ok_or(IpuError::MissingConstraint { key })
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ColumnKey, f64)> + '_ {
        self.targets.iter().map(|(k, v)| (*k, *v))
    }
}

impl FromIterator<(ColumnKey, f64)> for Constraints {
    fn from_iter<T: IntoIterator<Item = (ColumnKey, f64)>>(iter: T) -> Self {
        Self {
            targets: iter.into_iter().collect(),
        }
    }
}
