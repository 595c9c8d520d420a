//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - installs the log subscriber
//! - runs the fit pipeline
//! - prints reports
//! - writes optional exports

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, DemoArgs, FitArgs};
use crate::domain::{FitConfig, FitStatus};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `ipu` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Demo(args) => handle_demo(args),
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // A second init (e.g. from tests) is harmless, so the error is ignored.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(&args);
    let run = pipeline::run_fit(&config)?;

    print_run(&run, config.convergence, config.show_columns);

    if let Some(path) = &config.export_weights {
        crate::io::export::write_weights_csv(path, &run.fit.weights)?;
    }
    if let Some(path) = &config.export_json {
        crate::io::report::write_fit_json(path, &run.fit, &run.columns)?;
    }

    Ok(())
}

fn handle_demo(args: DemoArgs) -> Result<(), AppError> {
    let table = crate::data::reference_table();
    let constraints = crate::data::reference_constraints();
    let options = crate::ipu::IpuOptions {
        convergence: args.stop.convergence,
        max_iterations: args.stop.max_iterations,
    };

    let run = pipeline::run_fit_with_inputs(table, &constraints, &options)?;
    print_run(&run, options.convergence, args.columns);
    println!("{}", crate::report::format_weights(&run.fit));

    Ok(())
}

fn print_run(run: &pipeline::RunOutput, convergence: f64, show_columns: bool) {
    println!("{}", crate::report::format_fit_summary(&run.table, &run.fit, convergence));
    if show_columns {
        println!("{}", crate::report::format_columns(&run.columns));
    }
    if run.fit.status == FitStatus::Exhausted {
        eprintln!(
            "warning: stopped after {} sweeps without converging (fit quality {:.3e})",
            run.fit.iterations, run.fit.fit_quality
        );
    }
}

pub fn fit_config_from_args(args: &FitArgs) -> FitConfig {
    FitConfig {
        frequencies: args.frequencies.clone(),
        constraints: args.constraints.clone(),
        convergence: args.stop.convergence,
        max_iterations: args.stop.max_iterations,
        export_weights: args.export_weights.clone(),
        export_json: args.export_json.clone(),
        show_columns: args.columns,
    }
}
