//! Init command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{InitArgs, MonitorSpec};
use crate::report::write_atomic;

const HEADER: &str = "# deriva drift monitoring configuration\n\
# PSI tiers: stable < policy.moderate <= moderate < policy.severe <= severe\n";

/// Default configuration document with a short header
pub(crate) fn default_config_yaml() -> crate::error::Result<String> {
    Ok(format!("{HEADER}{}", MonitorSpec::default().to_yaml()?))
}

pub fn run_init(args: InitArgs, level: LogLevel) -> Result<(), String> {
    let yaml = default_config_yaml().map_err(|e| e.to_string())?;

    match args.output {
        Some(path) => {
            if path.exists() && !args.force {
                return Err(format!(
                    "{} already exists\n  → Pass --force to overwrite",
                    path.display()
                ));
            }
            write_atomic(&path, yaml.as_bytes()).map_err(|e| e.to_string())?;
            log(level, LogLevel::Normal, &format!("Wrote {}", path.display()));
        }
        None => print!("{yaml}"),
    }
    Ok(())
}
