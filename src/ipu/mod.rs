//! Iterative Proportional Updating.
//!
//! Responsibilities:
//!
//! - measure how far a column's weighted sum is from its target (`quality`)
//! - rescale one column's households onto its target (`update`)
//! - sweep all columns until the average fit stops improving (`driver`)

pub mod driver;
pub mod errors;
pub mod quality;
pub mod update;

pub use driver::*;
pub use errors::*;
pub use quality::*;
pub use update::*;
