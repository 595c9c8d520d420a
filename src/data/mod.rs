//! Built-in data sets.
//!
//! Real frequency tables come from CSV (`io::ingest`); the sample here backs the
//! `ipu demo` command and the unit tests.

pub mod sample;

pub use sample::*;
