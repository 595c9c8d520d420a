//! Export fitted household weights to CSV.
//!
//! The export is meant to be easy to join back onto the household sample in
//! spreadsheets or downstream synthesis scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::AppError;
use crate::table::Weights;

/// Write `household_id,weight` rows in table-index order.
pub fn write_weights_csv(path: &Path, weights: &Weights) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create weights CSV '{}': {e}", path.display())))?;
    write_weights(file, weights)
}

pub fn write_weights<W: Write>(mut out: W, weights: &Weights) -> Result<(), AppError> {
    writeln!(out, "household_id,weight")
        .map_err(|e| AppError::new(2, format!("Failed to write weights CSV header: {e}")))?;

    for (household, weight) in weights.iter() {
        writeln!(out, "{household},{weight:.10}")
            .map_err(|e| AppError::new(2, format!("Failed to write weights CSV row: {e}")))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::FrequencyTable;

    #[test]
    fn writes_one_row_per_household() {
        let table = FrequencyTable::builder([4, 2]).build().unwrap();
        let weights = Weights::from_values(&table, vec![1.5, 0.25]).unwrap();

        let mut buf = Vec::new();
        write_weights(&mut buf, &weights).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "household_id,weight\n4,1.5000000000\n2,0.2500000000\n"
        );
    }
}
