//! `popgen-ipu` library crate.
//!
//! Household survey weighting by Iterative Proportional Updating: given a
//! household × category frequency table and a target total per category,
//! find per-household weights whose weighted column sums match the targets.
//!
//! The binary (`ipu`) is a thin wrapper around this library so that:
//!
//! - the fitting core is testable without spawning processes
//! - each zone can be fit by calling `household_weights` directly

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod ipu;
pub mod report;
pub mod table;

pub use domain::{ColumnGroup, ColumnKey, FitStatus, HouseholdId};
pub use ipu::{
    IpuError, IpuFit, IpuOptions, average_fit_quality, column_diagnostics, fit_quality, household_weights,
    update_weights,
};
pub use table::{Column, Constraints, FrequencyTable, Weights};
