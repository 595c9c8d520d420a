//! End-to-end tests: CSV inputs -> IPU fit -> exports.
//!
//! Coverage
//! --------
//! - `io::ingest` for both input files, including a household that belongs
//!   to no column.
//! - `app::pipeline::run_fit` driven by a `FitConfig`.
//! - `io::export` and `io::report` round trip through the filesystem.
//!
//! The numerical building blocks are covered by the unit tests in `ipu`.

use std::fs;
use std::path::Path;

use popgen_ipu::app::pipeline::run_fit;
use popgen_ipu::domain::{FitConfig, FitStatus};
use popgen_ipu::io::{read_fit_json, write_fit_json, write_weights_csv};
use popgen_ipu::{ColumnKey, household_weights, IpuOptions};

const FREQUENCIES: &str = "\
household_id,group,category,value
1,household,1,1
2,household,1,1
3,household,1,1
4,household,2,1
5,household,2,1
6,household,2,1
7,household,2,1
8,household,2,1
1,person,1,1
2,person,1,1
3,person,1,2
4,person,1,1
6,person,1,1
7,person,1,2
8,person,1,1
1,person,2,1
3,person,2,1
5,person,2,2
6,person,2,1
7,person,2,1
8,person,2,1
1,person,3,1
2,person,3,1
4,person,3,2
5,person,3,1
7,person,3,2
";

const CONSTRAINTS: &str = "\
group,category,target
household,1,35
household,2,65
person,1,91
person,2,65
person,3,104
";

fn config(dir: &Path, convergence: f64) -> FitConfig {
    let frequencies = dir.join("freq.csv");
    let constraints = dir.join("constraints.csv");
    fs::write(&frequencies, FREQUENCIES).unwrap();
    fs::write(&constraints, CONSTRAINTS).unwrap();
    FitConfig {
        frequencies,
        constraints,
        convergence,
        max_iterations: 20_000,
        export_weights: None,
        export_json: None,
        show_columns: false,
    }
}

#[test]
fn csv_inputs_reproduce_reference_fit() {
    let dir = tempfile::tempdir().unwrap();
    let run = run_fit(&config(dir.path(), 1e-7)).unwrap();

    assert_eq!(run.table.index(), &[1, 2, 3, 4, 5, 6, 7, 8]);
    assert_eq!(run.fit.status, FitStatus::Converged);
    assert!(run.fit.iterations.abs_diff(638) <= 5);
    assert!((run.fit.fit_quality - 8.51e-6).abs() < 1e-8);

    let expected = [1.36, 25.66, 7.98, 27.79, 18.45, 8.64, 1.47, 8.64];
    for (got, want) in run.fit.weights.as_slice().iter().zip(expected) {
        assert!((got - want).abs() < 0.02);
    }
    assert_eq!(run.columns.len(), 5);
    assert_eq!(run.columns[0].key, ColumnKey::household(1));
}

#[test]
fn exports_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let run = run_fit(&config(dir.path(), 1e-4)).unwrap();

    let weights_path = dir.path().join("weights.csv");
    write_weights_csv(&weights_path, &run.fit.weights).unwrap();
    let text = fs::read_to_string(&weights_path).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("household_id,weight"));
    assert_eq!(lines.count(), 8);

    let json_path = dir.path().join("fit.json");
    write_fit_json(&json_path, &run.fit, &run.columns).unwrap();
    let report = read_fit_json(&json_path).unwrap();
    assert_eq!(report.iterations, run.fit.iterations);
    assert_eq!(report.status, run.fit.status);
    assert_eq!(report.weights.len(), 8);
    let keys: Vec<ColumnKey> = report.columns.iter().map(|c| c.key).collect();
    let want: Vec<ColumnKey> = run.columns.iter().map(|c| c.key).collect();
    assert_eq!(keys, want);
    assert_eq!(report.weights[4].household_id, 5);
}

#[test]
fn unconstrained_household_keeps_unit_weight() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path(), 1e-6);
    let mut freq = FREQUENCIES.to_string();
    freq.push_str("9,,,\n");
    fs::write(&cfg.frequencies, freq).unwrap();

    let run = run_fit(&cfg).unwrap();
    assert_eq!(run.table.len(), 9);
    assert_eq!(run.fit.weights.get(9), Some(1.0));

    // Same answer for the other households as without household 9.
    let table = popgen_ipu::data::reference_table();
    let constraints = popgen_ipu::data::reference_constraints();
    let plain = household_weights(&table, &constraints, &IpuOptions::with_convergence(1e-6)).unwrap();
    for (household, weight) in plain.weights.iter() {
        let got = run.fit.weights.get(household).unwrap();
        assert!((got - weight).abs() < 1e-9);
    }
}

#[test]
fn missing_constraint_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config(dir.path(), 1e-4);
    cfg.constraints = dir.path().join("nope.csv");
    let err = run_fit(&cfg).unwrap_err();
    assert_eq!(err.exit_code(), 2);
}
