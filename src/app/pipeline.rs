//! Shared "fit pipeline" logic used by the `fit` and `demo` commands.
//!
//! load inputs -> IPU -> per-column diagnostics
//!
//! The commands can then focus on presentation and exports.

use crate::domain::{ColumnDiagnostic, FitConfig};
use crate::error::AppError;
use crate::ipu::{IpuFit, IpuOptions, column_diagnostics, household_weights};
use crate::table::{Constraints, FrequencyTable};

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub table: FrequencyTable,
    pub fit: IpuFit,
    pub columns: Vec<ColumnDiagnostic>,
}

/// Load the CSV inputs named by `config` and fit them.
pub fn run_fit(config: &FitConfig) -> Result<RunOutput, AppError> {
    let table = crate::io::ingest::load_frequency_table(&config.frequencies)?;
    let constraints = crate::io::ingest::load_constraints(&config.constraints)?;

    run_fit_with_inputs(table, &constraints, &config.ipu_options())
}

/// Fit already-loaded inputs.
pub fn run_fit_with_inputs(
    table: FrequencyTable,
    constraints: &Constraints,
    options: &IpuOptions,
) -> Result<RunOutput, AppError> {
    let fit = household_weights(&table, constraints, options)?;
    let columns = column_diagnostics(&table, &fit.weights, constraints)?;

    Ok(RunOutput { table, fit, columns })
}
