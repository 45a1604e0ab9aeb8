//! JSON table reader with full input validation.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde_json::Value;
use sextant_table::{CellValue, DEFAULT_TIMESTAMP_COLUMN, Record, Table};
use tracing::{debug, info, instrument};

use crate::IoError;

/// Reads a [`Table`] from a JSON file.
///
/// Expected format: a top-level array of flat objects, one per record.
///
/// ```json
/// [
///   {"Date": "2024-01-01", "sales": 120.5, "visits": 40},
///   {"Date": "2024-02-01", "sales": null, "visits": 52}
/// ]
/// ```
///
/// Cells map to [`CellValue`]s: `null` is `Null`, numbers are `Number`,
/// strings are `Label`, and booleans become the labels `"true"`/`"false"`.
/// Columns are ordered by first appearance across the file. An empty array
/// is a valid, empty table.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::JsonParse`] | Content is not well-formed JSON |
/// | [`IoError::NotAnArray`] | Top-level value is not an array |
/// | [`IoError::RecordNotObject`] | An array element is not an object |
/// | [`IoError::NestedValue`] | A cell holds an array or object |
pub struct TableReader {
    path: PathBuf,
    timestamp_column: String,
}

impl TableReader {
    /// Create a new reader for the given JSON file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            timestamp_column: DEFAULT_TIMESTAMP_COLUMN.to_string(),
        }
    }

    /// Tag `column` as the timestamp column of the resulting table.
    #[must_use]
    pub fn with_timestamp_column(mut self, column: impl Into<String>) -> Self {
        self.timestamp_column = column.into();
        self
    }

    /// Read and convert the JSON file into a [`Table`].
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<Table, IoError> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;
        let table = self.parse(&content)?;
        info!(
            n_records = table.len(),
            n_columns = table.columns().len(),
            "table loaded"
        );
        Ok(table)
    }

    /// Convert already-loaded JSON text into a [`Table`].
    ///
    /// Errors name the reader's path, as [`TableReader::read`] does.
    pub fn parse(&self, content: &str) -> Result<Table, IoError> {
        let root: Value = serde_json::from_str(content).map_err(|e| IoError::JsonParse {
            path: self.path.clone(),
            line: e.line(),
            column: e.column(),
            source: e,
        })?;
        let Value::Array(items) = root else {
            return Err(IoError::NotAnArray {
                path: self.path.clone(),
            });
        };

        let mut columns = Vec::new();
        let mut seen = HashSet::new();
        let mut records = Vec::with_capacity(items.len());
        for (row_index, item) in items.into_iter().enumerate() {
            let Value::Object(fields) = item else {
                return Err(IoError::RecordNotObject {
                    path: self.path.clone(),
                    row_index,
                });
            };
            let mut record = Record::new();
            for (column, value) in fields {
                let cell = self.cell(row_index, &column, value)?;
                if seen.insert(column.clone()) {
                    columns.push(column.clone());
                }
                record.insert(column, cell);
            }
            records.push(record);
        }
        debug!(n_columns = columns.len(), "columns discovered");

        let table = Table::new(columns, records).map_err(|e| IoError::InvalidTable {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(table.with_timestamp_column(self.timestamp_column.clone()))
    }

    fn cell(&self, row_index: usize, column: &str, value: Value) -> Result<CellValue, IoError> {
        match value {
            Value::Null => Ok(CellValue::Null),
            // Integers above 2^53 lose precision here, as they would in any f64 column.
            Value::Number(n) => Ok(n.as_f64().map_or(CellValue::Null, CellValue::Number)),
            Value::String(s) => Ok(CellValue::Label(s)),
            Value::Bool(b) => Ok(CellValue::Label(b.to_string())),
            Value::Array(_) | Value::Object(_) => Err(IoError::NestedValue {
                path: self.path.clone(),
                row_index,
                column: column.to_string(),
            }),
        }
    }
}
