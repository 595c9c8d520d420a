//! Fitting inputs and state.
//!
//! - `frequency`: the sparse household × category table
//! - `constraints`: target totals per column
//! - `weights`: the per-household weight vector mutated by a fit

pub mod constraints;
pub mod frequency;
pub mod weights;

pub use constraints::*;
pub use frequency::*;
pub use weights::*;
