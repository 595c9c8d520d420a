//! Household weight vector aligned to a frequency table's index.

use std::collections::HashMap;

use nalgebra::DVector;

use crate::domain::{HouseholdId, HouseholdWeight};
use crate::ipu::{IpuError, IpuResult};
use crate::table::FrequencyTable;

/// One weight per household, stored densely in table-index order.
#[derive(Debug, Clone, PartialEq)]
pub struct Weights {
    households: Vec<HouseholdId>,
    positions: HashMap<HouseholdId, usize>,
    values: DVector<f64>,
}

impl Weights {
    /// Every household weighted by `value`.
    pub fn uniform(table: &FrequencyTable, value: f64) -> Self {
        Self::from_vector(table, DVector::from_element(table.len(), value))
    }

    /// Explicit weights, given in the table's index order.
    pub fn from_values(table: &FrequencyTable, values: Vec<f64>) -> IpuResult<Self> {
        if values.len() != table.len() {
            return Err(IpuError::InvalidTable(format!(
                "expected {} weights, got {}",
                table.len(),
                values.len()
            )));
        }
        Ok(Self::from_vector(table, DVector::from_vec(values)))
    }

    /// Weights over an arbitrary set of households, e.g. only the households
    /// of one column. Order of `pairs` becomes the index order.
    pub fn from_pairs<I>(pairs: I) -> IpuResult<Self>
    where
        I: IntoIterator<Item = (HouseholdId, f64)>,
    {
        let mut households = Vec::new();
        let mut positions = HashMap::new();
        let mut values = Vec::new();
        for (household, weight) in pairs {
            if positions.insert(household, households.len()).is_some() {
                return Err(IpuError::InvalidTable(format!(
                    "household {household} has more than one weight"
                )));
            }
            households.push(household);
            values.push(weight);
        }
        Ok(Self {
            households,
            positions,
            values: DVector::from_vec(values),
        })
    }

    pub(crate) fn from_vector(table: &FrequencyTable, values: DVector<f64>) -> Self {
        let households = table.index().to_vec();
        let positions = households
            .iter()
            .enumerate()
            .map(|(row, &h)| (h, row))
            .collect();
        Self {
            households,
            positions,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.households.len()
    }

    pub fn is_empty(&self) -> bool {
        self.households.is_empty()
    }

    pub fn get(&self, household: HouseholdId) -> Option<f64> {
        self.positions.get(&household).map(|&row| self.values[row])
    }

    pub fn as_slice(&self) -> &[f64] {
        self.values.as_slice()
    }

    pub fn as_vector(&self) -> &DVector<f64> {
        &self.values
    }

    /// Position of `household`, trying `row` first.
    ///
    /// `row` is the household's position in the column's own table; it is
    /// only a hint and falls back to a lookup when these weights are indexed
    /// differently.
    pub(crate) fn locate(&self, row: usize, household: HouseholdId) -> Option<usize> {
        if self.households.get(row) == Some(&household) {
            Some(row)
        } else {
            self.positions.get(&household).copied()
        }
    }

    pub(crate) fn at(&self, row: usize) -> f64 {
        self.values[row]
    }

    pub(crate) fn set(&mut self, row: usize, value: f64) {
        self.values[row] = value;
    }

    /// Sum of all weights (the implied number of households).
    pub fn total(&self) -> f64 {
        self.values.sum()
    }

    /// Iterate `(household, weight)` in index order.
    pub fn iter(&self) -> impl Iterator<Item = (HouseholdId, f64)> + '_ {
        self.households.iter().copied().zip(self.values.iter().copied())
    }

    pub fn to_records(&self) -> Vec<HouseholdWeight> {
        self.iter()
            .map(|(household_id, weight)| HouseholdWeight { household_id, weight })
            .collect()
    }
}
