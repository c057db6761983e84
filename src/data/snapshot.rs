//! Column-oriented in-memory tables.

use std::collections::HashMap;

use crate::error::{Error, Result};

/// A single named column of a snapshot.
#[derive(Clone, Debug, PartialEq)]
pub enum Column {
    /// Numeric values; missing cells are stored as NaN
    Numeric(Vec<f64>),
    /// Categorical values; missing cells are stored as empty strings
    Categorical(Vec<String>),
}

impl Column {
    /// Number of cells in the column
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Categorical(v) => v.len(),
        }
    }

    /// Whether the column has no cells
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Human-readable kind name
    pub fn kind(&self) -> ColumnKind {
        match self {
            Column::Numeric(_) => ColumnKind::Numeric,
            Column::Categorical(_) => ColumnKind::Categorical,
        }
    }

    /// Numeric values, if this is a numeric column
    pub fn as_numeric(&self) -> Option<&[f64]> {
        match self {
            Column::Numeric(v) => Some(v),
            Column::Categorical(_) => None,
        }
    }

    fn take(&self, indices: &[usize]) -> Column {
        match self {
            Column::Numeric(v) => Column::Numeric(indices.iter().map(|&i| v[i]).collect()),
            Column::Categorical(v) => {
                Column::Categorical(indices.iter().map(|&i| v[i].clone()).collect())
            }
        }
    }
}

/// Column kind, reported alongside drift scores
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

/// An ordered table of named columns, one row per observation.
///
/// Snapshots are immutable once built; evaluators only ever borrow them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    names: Vec<String>,
    columns: Vec<Column>,
    index: HashMap<String, usize>,
    n_rows: usize,
}

impl Snapshot {
    /// Build a snapshot from named columns.
    ///
    /// All columns must have the same length and names must be unique.
    pub fn from_columns<S: Into<String>>(columns: Vec<(S, Column)>) -> Result<Self> {
        let mut snapshot = Snapshot::default();
        for (i, (name, column)) in columns.into_iter().enumerate() {
            let name = name.into();
            if i == 0 {
                snapshot.n_rows = column.len();
            } else if column.len() != snapshot.n_rows {
                return Err(Error::InvalidInput(format!(
                    "column '{name}' has {} rows, expected {}",
                    column.len(),
                    snapshot.n_rows
                )));
            }
            if snapshot.index.contains_key(&name) {
                return Err(Error::InvalidInput(format!("duplicate column '{name}'")));
            }
            snapshot.index.insert(name.clone(), snapshot.names.len());
            snapshot.names.push(name);
            snapshot.columns.push(column);
        }
        Ok(snapshot)
    }

    /// Number of rows
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Column names in table order
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// Whether the snapshot carries a column with this name
    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.index.get(name).map(|&i| &self.columns[i])
    }

    /// Look up a numeric column by name
    pub fn numeric(&self, name: &str) -> Option<&[f64]> {
        self.column(name).and_then(Column::as_numeric)
    }

    /// New snapshot holding the given rows, in the given order
    pub fn take_rows(&self, indices: &[usize]) -> Result<Snapshot> {
        if let Some(&bad) = indices.iter().find(|&&i| i >= self.n_rows) {
            return Err(Error::InvalidInput(format!(
                "row index {bad} out of bounds for snapshot with {} rows",
                self.n_rows
            )));
        }
        Snapshot::from_columns(
            self.names
                .iter()
                .cloned()
                .zip(self.columns.iter().map(|c| c.take(indices)))
                .collect(),
        )
    }
}

/// Column-level comparison of two snapshots
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SchemaDiff {
    /// Columns present in both snapshots, in reference order
    pub shared: Vec<String>,
    /// Columns only the reference carries
    pub missing_in_current: Vec<String>,
    /// Columns only the current snapshot carries
    pub missing_in_reference: Vec<String>,
}

impl SchemaDiff {
    /// Compare the column sets of two snapshots
    pub fn between(reference: &Snapshot, current: &Snapshot) -> Self {
        let mut diff = SchemaDiff::default();
        for name in reference.column_names() {
            if current.has_column(name) {
                diff.shared.push(name.clone());
            } else {
                diff.missing_in_current.push(name.clone());
            }
        }
        diff.missing_in_reference = current
            .column_names()
            .iter()
            .filter(|name| !reference.has_column(name))
            .cloned()
            .collect();
        diff
    }

    /// Whether both snapshots have identical column sets
    pub fn is_aligned(&self) -> bool {
        self.missing_in_current.is_empty() && self.missing_in_reference.is_empty()
    }

    /// Warning messages describing the mismatch, empty when aligned
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if !self.missing_in_current.is_empty() {
            warnings.push(format!(
                "Schema mismatch: columns missing in current data: {}",
                self.missing_in_current.join(", ")
            ));
        }
        if !self.missing_in_reference.is_empty() {
            warnings.push(format!(
                "Schema mismatch: columns missing in reference data: {}",
                self.missing_in_reference.join(", ")
            ));
        }
        warnings
    }
}
