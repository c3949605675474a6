use std::io::Cursor;
use std::path::Path;

use polars::prelude::*;
use tracing::info;

use crate::error::{EdaError, Result};
use crate::trip_table::TripTable;

#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// The export carries an unnamed leading row-index column.
    pub has_index_column: bool,
    /// Rows scanned when inferring column types.
    pub infer_schema_rows: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            has_index_column: true,
            infer_schema_rows: 10_000,
        }
    }
}

/// Reads a comma-delimited trip export and returns it sorted by pickup time.
pub fn load_trip_table(path: impl AsRef<Path>, options: &LoadOptions) -> Result<TripTable> {
    let path = path.as_ref();
    let load_error = |reason: String| EdaError::DatasetLoad {
        path: path.to_path_buf(),
        reason,
    };

    let content = std::fs::read(path).map_err(|e| load_error(e.to_string()))?;
    let table = parse_trip_table(&content, options).map_err(|e| match e {
        EdaError::DatasetLoad { reason, .. } => load_error(reason),
        other => load_error(other.to_string()),
    })?;

    info!(
        path = %path.display(),
        rows = table.height(),
        columns = table.frame().width(),
        "trip table loaded"
    );
    Ok(table)
}

/// Parses an in-memory CSV export. Errors carry an empty path.
pub fn parse_trip_table(content: &[u8], options: &LoadOptions) -> Result<TripTable> {
    let malformed = |reason: String| EdaError::DatasetLoad {
        path: Default::default(),
        reason,
    };

    let cursor = Cursor::new(content);
    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(options.infer_schema_rows))
        .into_reader_with_file_handle(cursor)
        .finish()
        .map_err(|e| malformed(e.to_string()))?;

    if options.has_index_column {
        let index_name = df
            .get_column_names()
            .first()
            .map(|name| name.to_string())
            .ok_or_else(|| malformed("file has no columns".to_string()))?;
        df = df.drop(&index_name)?;
    }

    TripTable::new(df).map_err(|e| malformed(e.to_string()))
}
