//! Sparse, two-level frequency table.
//!
//! Each household owns a row position in the table index. Columns only store
//! the households that belong to them, so a household missing from a column
//! neither contributes to its weighted sum nor gets rescaled by its update.

use std::collections::{HashMap, HashSet};

use crate::domain::{CategoryId, ColumnGroup, ColumnKey, HouseholdId};
use crate::ipu::{IpuError, IpuResult};

/// One indicator column: `(household, value)` pairs over a subset of the index.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    key: ColumnKey,
    households: Vec<HouseholdId>,
    /// Row positions in the table index, parallel to `households`.
    rows: Vec<usize>,
    values: Vec<f64>,
}

impl Column {
    pub fn key(&self) -> ColumnKey {
        self.key
    }

    pub fn len(&self) -> usize {
        self.households.len()
    }

    pub fn is_empty(&self) -> bool {
        self.households.is_empty()
    }

    pub fn households(&self) -> &[HouseholdId] {
        &self.households
    }

    pub(crate) fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value for `household`, or `None` if it is not in this column.
    pub fn get(&self, household: HouseholdId) -> Option<f64> {
        self.households
            .iter()
            .position(|&h| h == household)
            .map(|i| self.values[i])
    }

    /// Iterate `(household, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (HouseholdId, f64)> + '_ {
        self.households.iter().copied().zip(self.values.iter().copied())
    }
}

/// Immutable table of households and their grouped indicator columns.
///
/// Columns are stored in sweep order: every household-level column in the
/// order it was declared, then every person-level column likewise.
#[derive(Debug, Clone)]
pub struct FrequencyTable {
    index: Vec<HouseholdId>,
    positions: HashMap<HouseholdId, usize>,
    columns: Vec<Column>,
}

impl FrequencyTable {
    pub fn builder<I>(index: I) -> FrequencyTableBuilder
    where
        I: IntoIterator<Item = HouseholdId>,
    {
        FrequencyTableBuilder {
            index: index.into_iter().collect(),
            household_cols: Vec::new(),
            person_cols: Vec::new(),
        }
    }

    /// Number of households.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn index(&self) -> &[HouseholdId] {
        &self.index
    }

    pub fn position(&self, household: HouseholdId) -> Option<usize> {
        self.positions.get(&household).copied()
    }

    /// All columns in sweep order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, key: ColumnKey) -> Option<&Column> {
        self.columns.iter().find(|c| c.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = ColumnKey> + '_ {
        self.columns.iter().map(|c| c.key)
    }

    /// Columns belonging to one group, in declared order.
    pub fn group(&self, group: ColumnGroup) -> impl Iterator<Item = &Column> + '_ {
        self.columns.iter().filter(move |c| c.key.group == group)
    }
}

type RawColumn = (CategoryId, Vec<(HouseholdId, f64)>);

/// Collects columns and validates them against the index on `build`.
#[derive(Debug, Clone)]
pub struct FrequencyTableBuilder {
    index: Vec<HouseholdId>,
    household_cols: Vec<RawColumn>,
    person_cols: Vec<RawColumn>,
}

impl FrequencyTableBuilder {
    pub fn household_column<I>(mut self, category: CategoryId, entries: I) -> Self
    where
        I: IntoIterator<Item = (HouseholdId, f64)>,
    {
        self.household_cols.push((category, entries.into_iter().collect()));
        self
    }

    pub fn person_column<I>(mut self, category: CategoryId, entries: I) -> Self
    where
        I: IntoIterator<Item = (HouseholdId, f64)>,
    {
        self.person_cols.push((category, entries.into_iter().collect()));
        self
    }

    /// Add a column to whichever group `key` names.
    pub fn column<I>(self, key: ColumnKey, entries: I) -> Self
    where
        I: IntoIterator<Item = (HouseholdId, f64)>,
    {
        match key.group {
            ColumnGroup::Household => self.household_column(key.category, entries),
            ColumnGroup::Person => self.person_column(key.category, entries),
        }
    }

    pub fn build(self) -> IpuResult<FrequencyTable> {
        let mut positions = HashMap::with_capacity(self.index.len());
        for (row, &household) in self.index.iter().enumerate() {
            if positions.insert(household, row).is_some() {
                return Err(IpuError::InvalidTable(format!(
                    "household {household} appears more than once in the index"
                )));
            }
        }

        let raw = self
            .household_cols
            .into_iter()
            .map(|(category, entries)| (ColumnKey::household(category), entries))
            .chain(
                self.person_cols
                    .into_iter()
                    .map(|(category, entries)| (ColumnKey::person(category), entries)),
            );

        let mut seen_keys = HashSet::new();
        let mut columns = Vec::new();
        for (key, entries) in raw {
            if !seen_keys.insert(key) {
                return Err(IpuError::InvalidTable(format!("column {key} declared twice")));
            }
            columns.push(build_column(key, entries, &positions)?);
        }

        Ok(FrequencyTable {
            index: self.index,
            positions,
            columns,
        })
    }
}

fn build_column(
    key: ColumnKey,
    entries: Vec<(HouseholdId, f64)>,
    positions: &HashMap<HouseholdId, usize>,
) -> IpuResult<Column> {
    let mut households = Vec::with_capacity(entries.len());
    let mut rows = Vec::with_capacity(entries.len());
    let mut values = Vec::with_capacity(entries.len());
    let mut seen = HashSet::with_capacity(entries.len());

    for (household, value) in entries {
        let Some(&row) = positions.get(&household) else {
            return Err(IpuError::InvalidTable(format!(
                "column {key} references household {household}, which is not in the index"
            )));
        };
        if !seen.insert(household) {
            return Err(IpuError::InvalidTable(format!(
                "column {key} lists household {household} twice"
            )));
        }
        if !(value.is_finite() && value >= 0.0) {
            return Err(IpuError::InvalidTable(format!(
                "column {key} has invalid value {value} for household {household}"
            )));
        }
        households.push(household);
        rows.push(row);
        values.push(value);
    }

    Ok(Column {
        key,
        households,
        rows,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ones(ids: &[HouseholdId]) -> Vec<(HouseholdId, f64)> {
        ids.iter().map(|&h| (h, 1.0)).collect()
    }

    #[test]
    fn household_columns_come_before_person_columns() {
        let table = FrequencyTable::builder([1, 2, 3])
            .person_column(7, ones(&[1]))
            .household_column(2, ones(&[2]))
            .person_column(3, ones(&[3]))
            .household_column(1, ones(&[1, 3]))
            .build()
            .unwrap();

        let keys: Vec<ColumnKey> = table.keys().collect();
        assert_eq!(
            keys,
            vec![
                ColumnKey::household(2),
                ColumnKey::household(1),
                ColumnKey::person(7),
                ColumnKey::person(3),
            ]
        );
        assert_eq!(table.group(ColumnGroup::Person).count(), 2);
    }

    #[test]
    fn column_rows_follow_the_index() {
        let table = FrequencyTable::builder([10, 20, 30])
            .household_column(1, vec![(30, 2.0), (10, 1.0)])
            .build()
            .unwrap();
        let column = table.column(ColumnKey::household(1)).unwrap();
        assert_eq!(column.households(), &[30, 10]);
        assert_eq!(column.rows(), &[2, 0]);
        assert_eq!(column.get(30), Some(2.0));
        assert_eq!(column.get(20), None);
    }

    #[test]
    fn rejects_unknown_household() {
        let err = FrequencyTable::builder([1, 2])
            .household_column(1, ones(&[1, 9]))
            .build()
            .unwrap_err();
        assert!(matches!(err, IpuError::InvalidTable(_)));
    }

    #[test]
    fn rejects_duplicate_keys_and_rows() {
        let dup_key = FrequencyTable::builder([1])
            .person_column(1, ones(&[1]))
            .person_column(1, ones(&[1]))
            .build();
        assert!(dup_key.is_err());

        let dup_row = FrequencyTable::builder([1, 2])
            .person_column(1, ones(&[2, 2]))
            .build();
        assert!(dup_row.is_err());

        let dup_index = FrequencyTable::builder([1, 1]).build();
        assert!(dup_index.is_err());
    }

    #[test]
    fn rejects_negative_and_nan_values() {
        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            let res = FrequencyTable::builder([1])
                .household_column(1, vec![(1, bad)])
                .build();
            assert!(res.is_err(), "value {bad} should be rejected");
        }
    }
}
