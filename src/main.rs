//! Deriva CLI
//!
//! Drift check entry point for the deriva library.
//!
//! # Usage
//!
//! ```bash
//! # Check current data against the reference
//! deriva check --reference data/processed/train.csv --current data/processed/current.csv
//!
//! # Use a held-out sample when current data is missing
//! deriva check --config deriva.yaml --fallback-test --sample-size 1000
//!
//! # Single-column PSI
//! deriva psi --reference train.csv --current current.csv --column LIMIT_BAL
//!
//! # Write a default config
//! deriva init --output deriva.yaml
//! ```

use clap::Parser;
use deriva::cli::{run_command, Cli, LogLevel};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = LogLevel::from_flags(cli.quiet, cli.verbose);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.filter_directive()));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
