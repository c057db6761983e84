//! Monitoring configuration: YAML schema and CLI definitions

pub mod cli;
mod schema;

pub use cli::{
    apply_overrides, parse_args, CheckArgs, Cli, Command, InitArgs, OutputFormat, PsiArgs,
};
pub use schema::{
    ColumnSpec, DataSpec, FallbackSpec, MonitorSpec, OutputSpec, PsiSpec, ScorerSpec,
};
