//! Drift report assembly, rendering and persistence
//!
//! The [`DriftMonitor`] turns two snapshots into a [`Report`]; renderers turn
//! a report into JSON, text or HTML; persistence writes with
//! write-then-rename.

mod assembler;
mod persist;
mod render;
mod types;


pub use assembler::{DriftMonitor, FallbackPolicy, ReportOutput, SnapshotSource, Stage};
pub use persist::{write_atomic, write_atomic_all};
pub use render::{render, render_html, render_json, render_text, ReportFormat};
pub use types::{DatasetSummary, Report};
