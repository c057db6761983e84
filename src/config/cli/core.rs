//! Core CLI types - Cli, Command, and argument structs

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::types::OutputFormat;
use crate::config::MonitorSpec;

/// Deriva: drift detection and retraining triggers
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "deriva")]
#[command(author = "PAIML")]
#[command(version)]
#[command(about = "Population stability drift checks that decide whether a model needs retraining")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Compare current data against the reference and write a drift report
    Check(CheckArgs),

    /// Compute PSI for a single column
    Psi(PsiArgs),

    /// Write a default monitoring configuration
    Init(InitArgs),
}

/// Arguments for the check command
#[derive(Parser, Debug, Clone, PartialEq, Default)]
pub struct CheckArgs {
    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Reference (training) snapshot CSV
    #[arg(long)]
    pub reference: Option<PathBuf>,

    /// Current (production) snapshot CSV
    #[arg(long)]
    pub current: Option<PathBuf>,

    /// Report output path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Additional HTML report path
    #[arg(long)]
    pub html: Option<PathBuf>,

    /// Sample the fallback pool when current data is unavailable
    #[arg(long)]
    pub fallback_test: bool,

    /// Fallback pool CSV
    #[arg(long)]
    pub fallback_pool: Option<PathBuf>,

    /// Fallback sample size
    #[arg(long)]
    pub sample_size: Option<usize>,

    /// Fallback sampling seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// JSON logistic model used as scorer
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// Use precomputed prediction columns as scorer
    #[arg(long)]
    pub use_prediction_columns: bool,

    /// Number of PSI bins
    #[arg(long)]
    pub bins: Option<usize>,

    /// Evaluate features in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Console output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the psi command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct PsiArgs {
    /// Reference snapshot CSV
    #[arg(long)]
    pub reference: PathBuf,

    /// Current snapshot CSV
    #[arg(long)]
    pub current: PathBuf,

    /// Column to compare
    #[arg(long)]
    pub column: String,

    /// Number of PSI bins
    #[arg(long, default_value = "10")]
    pub bins: usize,
}

/// Arguments for the init command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct InitArgs {
    /// Output path (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Parse CLI arguments from an iterator (for testing)
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}

/// Apply command-line overrides to a MonitorSpec
pub fn apply_overrides(spec: &mut MonitorSpec, args: &CheckArgs) {
    if let Some(reference) = &args.reference {
        spec.data.reference = reference.clone();
    }
    if let Some(current) = &args.current {
        spec.data.current = current.clone();
    }
    if let Some(output) = &args.output {
        spec.output.report = output.clone();
    }
    if let Some(html) = &args.html {
        spec.output.html = Some(html.clone());
    }
    if args.fallback_test {
        spec.data.fallback.enabled = true;
    }
    if let Some(pool) = &args.fallback_pool {
        spec.data.fallback.pool = pool.clone();
    }
    if let Some(sample_size) = args.sample_size {
        spec.data.fallback.sample_size = sample_size;
    }
    if let Some(seed) = args.seed {
        spec.data.fallback.seed = seed;
    }
    if let Some(model) = &args.model {
        spec.scorer.model = Some(model.clone());
    }
    if args.use_prediction_columns {
        spec.scorer.use_prediction_columns = true;
    }
    if let Some(bins) = args.bins {
        spec.psi.bins = bins;
    }
    if args.parallel {
        spec.psi.parallel = true;
    }
}
