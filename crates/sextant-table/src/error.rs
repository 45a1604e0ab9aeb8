//! Error types for table construction and series validation.

/// Errors from building tables and numeric series.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// Returned when a column name is listed more than once.
    #[error("duplicate column name \"{column}\"")]
    DuplicateColumn {
        /// The repeated column name.
        column: String,
    },

    /// Returned when a record mentions a column the table does not declare.
    #[error("record {row_index} has undeclared column \"{column}\"")]
    UnknownColumn {
        /// Zero-based index of the offending record.
        row_index: usize,
        /// The undeclared column name.
        column: String,
    },

    /// Returned when a numeric series contains NaN or an infinity.
    #[error("numeric series contains non-finite value at index {index}")]
    NonFiniteValue {
        /// Position of the first non-finite value found.
        index: usize,
    },
}
