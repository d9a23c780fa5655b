//! publicar CLI
//!
//! Single-command training and publishing entry point.
//!
//! # Usage
//!
//! ```bash
//! # Local-only mode: trains and writes model.json
//! publicar
//!
//! # Publish to a bucket backed by a store directory
//! publicar --bucket models-prod --store-dir /var/lib/publicar
//!
//! # Same, via the environment
//! PUBLICAR_BUCKET=models-prod publicar
//! ```

use clap::Parser;
use publicar::cli::{run_command, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
