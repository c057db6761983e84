//! CLI argument parsing
//!
//! # Usage
//!
//! ```bash
//! deriva check --config deriva.yaml
//! deriva check --reference train.csv --current current.csv --output drift_status.json
//! deriva check --reference train.csv --fallback-test --fallback-pool test.csv --sample-size 1000
//! deriva psi --reference train.csv --current current.csv --column LIMIT_BAL
//! deriva init --output deriva.yaml
//! ```

mod core;
mod types;


pub use self::core::{apply_overrides, parse_args, CheckArgs, Cli, Command, InitArgs, PsiArgs};
pub use types::OutputFormat;
