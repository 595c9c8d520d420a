//! CSV ingest of frequency tables and constraints.
//!
//! Frequency CSV (long format, one row per household × column):
//!
//! ```text
//! household_id,group,category,value
//! 1,household,1,1
//! 1,person,1,2
//! 9,,,
//! ```
//!
//! Households form the table index in first-appearance order. A row with an
//! empty `group` only declares the household. An empty `value` counts as 1.
//! Columns keep their first-appearance order within each group.
//!
//! Constraints CSV:
//!
//! ```text
//! group,category,target
//! household,1,35
//! ```
//!
//! Ingest is strict: the first malformed row aborts with its line number.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::debug;

use crate::domain::{CategoryId, ColumnGroup, ColumnKey, HouseholdId};
use crate::error::AppError;
use crate::table::{Constraints, FrequencyTable};

const FREQUENCY_COLUMNS: [&str; 4] = ["household_id", "group", "category", "value"];
const CONSTRAINT_COLUMNS: [&str; 3] = ["group", "category", "target"];

/// Load a frequency table from a CSV file.
pub fn load_frequency_table(path: &Path) -> Result<FrequencyTable, AppError> {
    let file = open(path, "frequency")?;
    let table = read_frequency_table(file)?;
    debug!(
        path = %path.display(),
        households = table.len(),
        columns = table.columns().len(),
        "loaded frequency table"
    );
    Ok(table)
}

/// Load constraints from a CSV file.
pub fn load_constraints(path: &Path) -> Result<Constraints, AppError> {
    let file = open(path, "constraints")?;
    let constraints = read_constraints(file)?;
    debug!(path = %path.display(), targets = constraints.len(), "loaded constraints");
    Ok(constraints)
}

pub fn read_frequency_table<R: Read>(reader: R) -> Result<FrequencyTable, AppError> {
    let mut reader = csv_reader(reader);
    let header_map = read_header_map(&mut reader)?;
    ensure_columns_exist(&header_map, &FREQUENCY_COLUMNS, "frequency")?;

    let mut index: Vec<HouseholdId> = Vec::new();
    let mut seen_households = HashSet::new();
    let mut columns: Vec<(ColumnKey, Vec<(HouseholdId, f64)>)> = Vec::new();
    let mut column_pos: HashMap<ColumnKey, usize> = HashMap::new();

    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header, lines are 1-based
        let line = idx + 2;
        let record = result.map_err(|e| AppError::new(2, format!("Line {line}: CSV parse error: {e}")))?;

        let household: HouseholdId = parse_field(&record, &header_map, "household_id", line)?;
        if seen_households.insert(household) {
            index.push(household);
        }

        let group_raw = field(&record, &header_map, "group");
        if group_raw.is_empty() {
            continue;
        }
        let group: ColumnGroup = group_raw
            .parse()
            .map_err(|e: String| AppError::new(2, format!("Line {line}: {e}")))?;
        let category: CategoryId = parse_field(&record, &header_map, "category", line)?;
        let value = if field(&record, &header_map, "value").is_empty() {
            1.0
        } else {
            parse_field::<f64>(&record, &header_map, "value", line)?
        };

        let key = ColumnKey { group, category };
        let pos = *column_pos.entry(key).or_insert_with(|| {
            columns.push((key, Vec::new()));
            columns.len() - 1
        });
        columns[pos].1.push((household, value));
    }

    let builder = columns
        .into_iter()
        .fold(FrequencyTable::builder(index), |b, (key, entries)| b.column(key, entries));
    Ok(builder.build()?)
}

pub fn read_constraints<R: Read>(reader: R) -> Result<Constraints, AppError> {
    let mut reader = csv_reader(reader);
    let header_map = read_header_map(&mut reader)?;
    ensure_columns_exist(&header_map, &CONSTRAINT_COLUMNS, "constraints")?;

    let mut constraints = Constraints::new();
    for (idx, result) in reader.records().enumerate() {
        let line = idx + 2;
        let record = result.map_err(|e| AppError::new(2, format!("Line {line}: CSV parse error: {e}")))?;

        let group: ColumnGroup = field(&record, &header_map, "group")
            .parse()
            .map_err(|e: String| AppError::new(2, format!("Line {line}: {e}")))?;
        let category: CategoryId = parse_field(&record, &header_map, "category", line)?;
        let target: f64 = parse_field(&record, &header_map, "target", line)?;

        let key = ColumnKey { group, category };
        if constraints.insert(key, target).is_some() {
            return Err(AppError::new(2, format!("Line {line}: duplicate constraint for {key}")));
        }
    }
    Ok(constraints)
}

fn open(path: &Path, what: &str) -> Result<File, AppError> {
    File::open(path).map_err(|e| AppError::new(2, format!("Failed to open {what} CSV '{}': {e}", path.display())))
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn read_header_map<R: Read>(reader: &mut csv::Reader<R>) -> Result<HashMap<String, usize>, AppError> {
    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?;
    Ok(build_header_map(headers))
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports may prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn ensure_columns_exist(header_map: &HashMap<String, usize>, required: &[&str], what: &str) -> Result<(), AppError> {
    for name in required {
        if !header_map.contains_key(*name) {
            return Err(AppError::new(2, format!("Missing required column in {what} CSV: `{name}`")));
        }
    }
    Ok(())
}

fn field<'r>(record: &'r StringRecord, header_map: &HashMap<String, usize>, name: &str) -> &'r str {
    header_map
        .get(name)
        .and_then(|&idx| record.get(idx))
        .unwrap_or("")
}

fn parse_field<T>(record: &StringRecord, header_map: &HashMap<String, usize>, name: &str, line: usize) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = field(record, header_map, name);
    if raw.is_empty() {
        return Err(AppError::new(2, format!("Line {line}: missing `{name}`")));
    }
    raw.parse::<T>()
        .map_err(|e| AppError::new(2, format!("Line {line}: invalid `{name}` '{raw}': {e}")))
}
