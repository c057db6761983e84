//! CLI command implementations

mod check;
mod init;
mod psi;


use crate::cli::LogLevel;
use crate::config::{Cli, Command};

/// Execute a CLI command based on the parsed arguments
pub fn run_command(cli: Cli) -> Result<(), String> {
    let log_level = LogLevel::from_flags(cli.quiet, cli.verbose);

    match cli.command {
        Command::Check(args) => check::run_check(args, log_level),
        Command::Psi(args) => psi::run_psi(args, log_level),
        Command::Init(args) => init::run_init(args, log_level),
    }
}
