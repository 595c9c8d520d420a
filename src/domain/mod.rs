//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - column identity (`ColumnGroup`, `ColumnKey`) and household ids
//! - run configuration (`FitConfig`)
//! - fit outputs (`FitStatus`, `ColumnDiagnostic`, `FitReport`)

pub mod types;

pub use types::*;
