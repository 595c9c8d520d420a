//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON/CSV
//! - reloaded later for comparisons between runs or zones

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ipu::IpuOptions;

/// Household identifier (the row key of a frequency table).
pub type HouseholdId = u64;

/// Category identifier within a column group.
pub type CategoryId = u32;

/// Which nesting level a frequency column describes.
///
/// The derived ordering puts `Household` before `Person`, which is also the
/// order in which column groups are swept by the fitting driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnGroup {
    /// One indicator value per household (e.g. household size bucket).
    Household,
    /// Count of persons in the household matching a category (e.g. age group).
    Person,
}

impl ColumnGroup {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Household => "household",
            Self::Person => "person",
        }
    }
}

impl fmt::Display for ColumnGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "household" | "hh" => Ok(Self::Household),
            "person" | "per" => Ok(Self::Person),
            other => Err(format!("unknown column group '{other}' (expected household|person)")),
        }
    }
}

/// Identifies a frequency column and its constraint: `(group, category)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ColumnKey {
    pub group: ColumnGroup,
    pub category: CategoryId,
}

impl ColumnKey {
    pub fn household(category: CategoryId) -> Self {
        Self {
            group: ColumnGroup::Household,
            category,
        }
    }

    pub fn person(category: CategoryId) -> Self {
        Self {
            group: ColumnGroup::Person,
            category,
        }
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.group, self.category)
    }
}

/// Terminal state of a fitting run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitStatus {
    /// Average fit quality stopped changing by more than the threshold.
    Converged,
    /// The sweep cap was reached first. Weights are still the best seen.
    Exhausted,
}

impl FitStatus {
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Converged => "converged",
            Self::Exhausted => "iteration cap reached",
        }
    }
}

/// Fit quality of one column under a given weight vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnDiagnostic {
    pub key: ColumnKey,
    pub target: f64,
    pub weighted_sum: f64,
    pub fit_quality: f64,
}

/// A full run’s configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct FitConfig {
    pub frequencies: PathBuf,
    pub constraints: PathBuf,

    /// Stop once average fit quality changes by at most this much per sweep.
    pub convergence: f64,
    pub max_iterations: usize,

    pub export_weights: Option<PathBuf>,
    pub export_json: Option<PathBuf>,

    /// Print the per-column diagnostics table.
    pub show_columns: bool,
}

impl FitConfig {
    pub fn ipu_options(&self) -> IpuOptions {
        IpuOptions {
            convergence: self.convergence,
            max_iterations: self.max_iterations,
        }
    }
}

/// A saved fit report (JSON).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitReport {
    pub tool: String,
    pub status: FitStatus,
    pub iterations: usize,
    pub fit_quality: f64,
    pub fit_change: f64,
    pub weights: Vec<HouseholdWeight>,
    pub columns: Vec<ColumnDiagnostic>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HouseholdWeight {
    pub household_id: HouseholdId,
    pub weight: f64,
}
