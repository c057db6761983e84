//! # Deriva: Drift Detection and Retraining Triggers
//!
//! Compares a current tabular snapshot against a reference snapshot and
//! decides whether the model trained on the reference should be retrained.
//!
//! ## Architecture
//!
//! - `data`: in-memory snapshots, CSV loading, seeded fallback sampling
//! - `eval`: PSI drift, quality degradation, verdict policy and trigger
//! - `report`: report assembly, rendering and atomic persistence
//! - `config`: YAML configuration and CLI definitions
//! - `cli`: command handlers
//!
//! ## Example
//!
//! ```no_run
//! use deriva::report::{DriftMonitor, SnapshotSource};
//! use std::path::PathBuf;
//!
//! let monitor = DriftMonitor::new("default.payment.next.month")
//!     .with_features(vec!["LIMIT_BAL".into(), "AGE".into()]);
//! let reference = SnapshotSource::Path(PathBuf::from("data/processed/train.csv"));
//! let current = SnapshotSource::Path(PathBuf::from("data/processed/current.csv"));
//! let report = monitor.run(&reference, Some(&current))?;
//! println!("drift_detected={}", report.drift_detected);
//! # Ok::<(), deriva::Error>(())
//! ```

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod eval;
pub mod report;

pub use error::{Error, Result};
