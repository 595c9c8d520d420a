//! Eight-household reference problem.
//!
//! Two household-level categories (households 1–3 and 4–8) and three
//! person-level categories with per-household person counts. The targets are
//! `[35, 65, 91, 65, 104]` in column order.

use crate::domain::{ColumnKey, HouseholdId};
use crate::table::{Constraints, FrequencyTable};

const HOUSEHOLDS: [HouseholdId; 8] = [1, 2, 3, 4, 5, 6, 7, 8];

/// Frequency table of the reference problem.
pub fn reference_table() -> FrequencyTable {
    let build = FrequencyTable::builder(HOUSEHOLDS)
        .household_column(1, counts(&[1, 2, 3], &[1, 1, 1]))
        .household_column(2, counts(&[4, 5, 6, 7, 8], &[1, 1, 1, 1, 1]))
        .person_column(1, counts(&[1, 2, 3, 4, 6, 7, 8], &[1, 1, 2, 1, 1, 2, 1]))
        .person_column(2, counts(&[1, 3, 5, 6, 7, 8], &[1, 1, 2, 1, 1, 1]))
        .person_column(3, counts(&[1, 2, 4, 5, 7], &[1, 1, 2, 1, 2]))
        .build();

    match build {
        Ok(table) => table,
        Err(e) => unreachable!("reference table is well formed: {e}"),
    }
}

/// Target totals of the reference problem.
pub fn reference_constraints() -> Constraints {
    [
        (ColumnKey::household(1), 35.0),
        (ColumnKey::household(2), 65.0),
        (ColumnKey::person(1), 91.0),
        (ColumnKey::person(2), 65.0),
        (ColumnKey::person(3), 104.0),
    ]
    .into_iter()
    .collect()
}

fn counts(households: &[HouseholdId], values: &[u32]) -> Vec<(HouseholdId, f64)> {
    households
        .iter()
        .copied()
        .zip(values.iter().map(|&v| f64::from(v)))
        .collect()
}
