//! Dataset snapshots
//!
//! Reference and current tables are loaded once per run and only borrowed
//! afterwards; nothing in the evaluators mutates them.

mod load;
mod sample;
mod snapshot;

pub use load::load_csv;
pub use sample::sample_rows;
pub use snapshot::{Column, ColumnKind, SchemaDiff, Snapshot};
