//! `ipu` binary: runs the app and turns its error into a process exit code.

use std::process::ExitCode;

fn main() -> ExitCode {
    match popgen_ipu::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
