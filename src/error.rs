//! Error types with actionable diagnostics.
//!
//! Errors are split by blast radius: load-time failures abort a run, while
//! per-feature and per-metric failures are isolated and recorded as warnings
//! on the report.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for deriva operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading snapshots, computing drift or writing reports.
#[derive(Error, Debug)]
pub enum Error {
    /// Distribution data is empty or malformed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Ground-truth column is absent where it is required.
    #[error("Target column '{column}' not found in reference snapshot\n  → Reference data must carry ground truth labels")]
    MissingTarget { column: String },

    /// Neither current data nor an approved fallback source exists.
    #[error("Data unavailable: {0}\n  → Provide current data or enable the fallback sample (--fallback-test)")]
    DataUnavailable(String),

    /// The scorer raised or returned malformed predictions.
    #[error("Scorer failure: {0}")]
    ScorerFailure(String),

    /// Configuration file or CLI value is invalid.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A tabular file could not be parsed.
    #[error("Failed to load {path}: {message}")]
    Load { path: PathBuf, message: String },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error only voids a single feature or metric rather than the run.
    pub fn is_isolated(&self) -> bool {
        matches!(
            self,
            Error::InvalidInput(_) | Error::MissingTarget { .. } | Error::ScorerFailure(_)
        )
    }

    /// Short machine-readable kind, used as the prefix of report warnings.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) => "InvalidInput",
            Error::MissingTarget { .. } => "MissingTarget",
            Error::DataUnavailable(_) => "DataUnavailable",
            Error::ScorerFailure(_) => "ScorerFailure",
            Error::ConfigError(_) => "ConfigError",
            Error::Load { .. } => "Load",
            Error::Serialization(_) => "Serialization",
            Error::Io(_) => "Io",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isolated_errors() {
        assert!(Error::InvalidInput("empty".into()).is_isolated());
        assert!(Error::MissingTarget { column: "y".into() }.is_isolated());
        assert!(Error::ScorerFailure("boom".into()).is_isolated());
        assert!(!Error::DataUnavailable("gone".into()).is_isolated());
        assert!(!Error::ConfigError("bad".into()).is_isolated());
    }

    #[test]
    fn test_missing_target_message_names_column() {
        let err = Error::MissingTarget { column: "default.payment.next.month".into() };
        let msg = err.to_string();
        assert!(msg.contains("default.payment.next.month"));
        assert!(msg.contains("ground truth"));
    }

    #[test]
    fn test_io_from() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert_eq!(err.kind(), "Io");
    }
}
