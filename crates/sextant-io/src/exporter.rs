//! CSV export of tables.

use std::io::Write;
use std::path::{Path, PathBuf};

use sextant_table::Table;
use tracing::{info, instrument};

use crate::IoError;

/// Writes a [`Table`] as CSV: a header row of column names, then one row per
/// record in table order.
///
/// Null and absent cells are written as empty fields. Fields containing the
/// delimiter, quotes, or newlines are quoted.
pub struct CsvExporter {
    path: PathBuf,
}

impl CsvExporter {
    /// Create an exporter targeting `path`.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Export `table` to the exporter's path, replacing any existing file.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::WriteFile`] | The file cannot be created |
    /// | [`IoError::CsvWrite`] | A row cannot be written |
    #[instrument(skip_all, fields(path = %self.path.display(), n_records = table.len()))]
    pub fn export(&self, table: &Table) -> Result<(), IoError> {
        let file = std::fs::File::create(&self.path).map_err(|e| IoError::WriteFile {
            path: self.path.clone(),
            source: e,
        })?;
        self.write_to(file, table)?;
        info!("table exported");
        Ok(())
    }

    /// Write `table` as CSV to an arbitrary writer.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::CsvWrite`] if a row cannot be written or flushed.
    pub fn write_to<W: Write>(&self, writer: W, table: &Table) -> Result<(), IoError> {
        let csv_err = |e: csv::Error| IoError::CsvWrite {
            path: self.path.clone(),
            source: e,
        };
        let mut wtr = csv::Writer::from_writer(writer);
        if table.columns().is_empty() {
            return Ok(());
        }
        wtr.write_record(table.columns()).map_err(csv_err)?;
        for record in table.records() {
            let row = table
                .columns()
                .iter()
                .map(|c| record.get(c).map(ToString::to_string).unwrap_or_default());
            wtr.write_record(row).map_err(csv_err)?;
        }
        wtr.flush()
            .map_err(|e| csv_err(csv::Error::from(e)))?;
        Ok(())
    }
}
