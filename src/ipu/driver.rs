//! Full-sweep IPU driver.
//!
//! One sweep visits every column in table order (household group first) and
//! rescales that column's households in place before moving on, so later
//! columns see the effect of earlier ones within the same sweep. After each
//! sweep the average fit quality is re-measured.
//!
//! The run stops when the average fit quality changes by no more than
//! `convergence` between two consecutive sweeps, or when `max_iterations`
//! sweeps have been made. The weights returned are the best seen (lowest
//! average fit quality), not necessarily the last ones.

use nalgebra::DVector;
use tracing::{debug, info, warn};

use crate::domain::FitStatus;
use crate::ipu::quality::average_fit_quality;
use crate::ipu::update::rescale_column;
use crate::ipu::{IpuError, IpuResult};
use crate::table::{Constraints, FrequencyTable, Weights};

/// Default convergence threshold on the sweep-to-sweep fit change.
pub const DEFAULT_CONVERGENCE: f64 = 1e-4;

/// Default sweep cap.
pub const DEFAULT_MAX_ITERATIONS: usize = 20_000;

/// Sweeps between progress log lines.
const LOG_EVERY: usize = 100;

/// Termination settings for [`household_weights`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IpuOptions {
    pub convergence: f64,
    pub max_iterations: usize,
}

impl Default for IpuOptions {
    fn default() -> Self {
        Self {
            convergence: DEFAULT_CONVERGENCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl IpuOptions {
    pub fn with_convergence(convergence: f64) -> Self {
        Self {
            convergence,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> IpuResult<()> {
        if !(self.convergence.is_finite() && self.convergence > 0.0) {
            return Err(IpuError::InvalidOptions(format!(
                "convergence must be positive and finite, got {}",
                self.convergence
            )));
        }
        if self.max_iterations == 0 {
            return Err(IpuError::InvalidOptions("max_iterations must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Result of a fitting run.
#[derive(Debug, Clone)]
pub struct IpuFit {
    /// Best weights seen during the run. These differ from the last sweep's
    /// weights only when the fit quality rose at some sweep.
    pub weights: Weights,
    /// Average fit quality of `weights`.
    pub fit_quality: f64,
    /// Number of completed sweeps.
    pub iterations: usize,
    /// Change in average fit quality over the last sweep.
    pub fit_change: f64,
    pub status: FitStatus,
}

impl IpuFit {
    pub fn converged(&self) -> bool {
        self.status == FitStatus::Converged
    }
}

/// Fit household weights to `constraints` by iterative proportional updating.
///
/// Weights start at 1.0 for every household. Numerical failures (a zero
/// weighted sum, a non-positive target) abort the run with an error;
/// reaching the sweep cap does not.
pub fn household_weights(
    table: &FrequencyTable,
    constraints: &Constraints,
    options: &IpuOptions,
) -> IpuResult<IpuFit> {
    options.validate()?;

    let columns = table.columns();
    let targets = columns
        .iter()
        .map(|c| constraints.target(c.key()))
        .collect::<IpuResult<Vec<f64>>>()?;

    let mut weights = Weights::uniform(table, 1.0);
    let mut fit_qual = average_fit_quality(table, &weights, constraints)?;
    let mut best_fit_qual = fit_qual;
    let mut best_values: DVector<f64> = weights.as_vector().clone();

    debug!(
        households = table.len(),
        columns = columns.len(),
        initial_fit = fit_qual,
        "starting IPU"
    );

    let mut iterations = 0usize;
    let (status, fit_change) = loop {
        for (column, &target) in columns.iter().zip(&targets) {
            rescale_column(column, &mut weights, target)?;
        }

        let new_fit_qual = average_fit_quality(table, &weights, constraints)?;
        let fit_change = (new_fit_qual - fit_qual).abs();
        if new_fit_qual < best_fit_qual {
            best_fit_qual = new_fit_qual;
            best_values.copy_from(weights.as_vector());
        }
        fit_qual = new_fit_qual;
        iterations += 1;

        if iterations % LOG_EVERY == 0 {
            debug!(iterations, fit_quality = fit_qual, fit_change, "IPU sweep");
        }

        if fit_change <= options.convergence {
            break (FitStatus::Converged, fit_change);
        }
        if iterations >= options.max_iterations {
            break (FitStatus::Exhausted, fit_change);
        }
    };

    match status {
        FitStatus::Converged => info!(iterations, fit_quality = best_fit_qual, "IPU converged"),
        FitStatus::Exhausted => warn!(
            iterations,
            fit_quality = best_fit_qual,
            fit_change,
            "IPU stopped at iteration cap before converging"
        ),
    }

    Ok(IpuFit {
        weights: Weights::from_vector(table, best_values),
        fit_quality: best_fit_qual,
        iterations,
        fit_change,
        status,
    })
}
