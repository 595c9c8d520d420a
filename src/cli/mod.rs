//! Command-line parsing for the IPU household weighting tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the fitting code.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::ipu::{DEFAULT_CONVERGENCE, DEFAULT_MAX_ITERATIONS};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "ipu", version, about = "Household weights by Iterative Proportional Updating")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit weights for a frequency table and constraints read from CSV.
    Fit(FitArgs),
    /// Fit the built-in eight-household reference problem.
    Demo(DemoArgs),
}

/// Options controlling when the sweep loop stops.
#[derive(Debug, Args, Clone)]
pub struct StopArgs {
    /// Stop once the average fit quality changes by at most this much per sweep.
    #[arg(long, default_value_t = DEFAULT_CONVERGENCE)]
    pub convergence: f64,

    /// Maximum number of sweeps.
    #[arg(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    pub max_iterations: usize,
}

/// Options for fitting CSV inputs.
#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// Frequency table CSV (`household_id,group,category,value`).
    #[arg(short = 'f', long, value_name = "CSV")]
    pub frequencies: PathBuf,

    /// Constraints CSV (`group,category,target`).
    #[arg(short = 'c', long, value_name = "CSV")]
    pub constraints: PathBuf,

    #[command(flatten)]
    pub stop: StopArgs,

    /// Export fitted weights to CSV.
    #[arg(long = "export-weights", value_name = "CSV")]
    pub export_weights: Option<PathBuf>,

    /// Export the full fit report to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,

    /// Print the per-column diagnostics table.
    #[arg(long)]
    pub columns: bool,
}

/// Options for the reference demo.
#[derive(Debug, Parser, Clone)]
pub struct DemoArgs {
    #[command(flatten)]
    pub stop: StopArgs,

    /// Print the per-column diagnostics table.
    #[arg(long)]
    pub columns: bool,
}
