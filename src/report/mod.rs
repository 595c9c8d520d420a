//! Reporting utilities: formatted terminal output for a finished fit.

pub mod format;

pub use format::*;
