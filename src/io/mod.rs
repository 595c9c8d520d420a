//! Input/output helpers.
//!
//! - CSV ingest of frequency tables and constraints (`ingest`)
//! - weight CSV export (`export`)
//! - fit report JSON read/write (`report`)

pub mod export;
pub mod ingest;
pub mod report;

pub use export::*;
pub use ingest::*;
pub use report::*;
