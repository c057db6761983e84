//! CSV loading via arrow.

use std::fs::File;
use std::io::Seek;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Float64Array, StringArray};
use arrow::compute::cast;
use arrow::csv::reader::Format;
use arrow::csv::ReaderBuilder;
use arrow::datatypes::DataType;

use super::snapshot::{Column, Snapshot};
use crate::error::{Error, Result};

/// Load a headered CSV file into a snapshot.
///
/// Integer, float and boolean columns become numeric (nulls as NaN);
/// everything else becomes categorical.
pub fn load_csv(path: impl AsRef<Path>) -> Result<Snapshot> {
    let path = path.as_ref();
    let load_err = |message: String| Error::Load { path: path.to_path_buf(), message };

    let mut file = File::open(path)
        .map_err(|e| Error::DataUnavailable(format!("{}: {e}", path.display())))?;

    let (schema, _) = Format::default()
        .with_header(true)
        .infer_schema(&mut file, None)
        .map_err(|e| load_err(format!("schema inference failed: {e}")))?;
    file.rewind()?;

    let schema = Arc::new(schema);
    let reader = ReaderBuilder::new(schema.clone())
        .with_header(true)
        .build(file)
        .map_err(|e| load_err(e.to_string()))?;

    let mut columns: Vec<Column> = schema
        .fields()
        .iter()
        .map(|field| {
            if is_numeric(field.data_type()) {
                Column::Numeric(Vec::new())
            } else {
                Column::Categorical(Vec::new())
            }
        })
        .collect();

    for batch in reader {
        let batch = batch.map_err(|e| load_err(e.to_string()))?;
        for (column, array) in columns.iter_mut().zip(batch.columns()) {
            append_array(column, array).map_err(load_err)?;
        }
    }

    let named = schema
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .zip(columns)
        .collect();
    let snapshot = Snapshot::from_columns(named)?;
    tracing::debug!(
        path = %path.display(),
        rows = snapshot.n_rows(),
        columns = snapshot.n_columns(),
        "loaded snapshot"
    );
    Ok(snapshot)
}

fn is_numeric(data_type: &DataType) -> bool {
    data_type.is_numeric() || matches!(data_type, DataType::Boolean)
}

fn append_array(column: &mut Column, array: &ArrayRef) -> std::result::Result<(), String> {
    match column {
        Column::Numeric(values) => {
            let floats = cast(array, &DataType::Float64).map_err(|e| e.to_string())?;
            let floats = floats
                .as_any()
                .downcast_ref::<Float64Array>()
                .ok_or_else(|| "failed to downcast Float64Array".to_string())?;
            values.extend(floats.iter().map(|v| v.unwrap_or(f64::NAN)));
        }
        Column::Categorical(values) => {
            let strings = cast(array, &DataType::Utf8).map_err(|e| e.to_string())?;
            let strings = strings
                .as_any()
                .downcast_ref::<StringArray>()
                .ok_or_else(|| "failed to downcast StringArray".to_string())?;
            values.extend(strings.iter().map(|v| v.unwrap_or_default().to_string()));
        }
    }
    Ok(())
}
