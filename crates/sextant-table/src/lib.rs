//! Table model, structural validation, and numeric series extraction.
//!
//! Pure data layer with no I/O. A [`Table`] is an immutable sequence of
//! [`Record`]s keyed by column name; [`validate`] checks its shape and
//! [`extract`] pulls a clean [`NumericSeries`] out of one column.

mod domain;
mod error;
mod series;
mod validate;

pub use domain::{CellValue, DEFAULT_TIMESTAMP_COLUMN, Preview, Record, Table};
pub use error::TableError;
pub use series::{NumericSeries, extract, extract_paired, numeric_columns};
pub use validate::{ValidationIssue, ValidationResult, validate};
