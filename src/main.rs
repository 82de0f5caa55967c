//! Binary entry point for **tcprobe**.
//!
//! * Parses CLI arguments (usage errors exit with status 2).
//! * Sets up stderr diagnostics.
//! * Runs the session; connect and read failures exit with status 1.

use clap::Parser;
use std::process::ExitCode;
use tcprobe::{cli::Args, engine, logging};

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = logging::init(args.verbose) {
        eprintln!("tcprobe: logging disabled: {e}");
    }

    match engine::run(args) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("tcprobe: {e}");
            ExitCode::FAILURE
        }
    }
}
