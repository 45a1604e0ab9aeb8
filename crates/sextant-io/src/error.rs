//! I/O error types for sextant-io.

use std::path::PathBuf;

use sextant_table::TableError;

/// Errors from reading tables, exporting CSV, and writing result artifacts.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when the input file does not exist or is unreadable.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when the input is not well-formed JSON.
    #[error("JSON parse error in {path} at line {line}, column {column}")]
    JsonParse {
        /// Path to the JSON file.
        path: PathBuf,
        /// One-based line of the error.
        line: usize,
        /// One-based column of the error.
        column: usize,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// Returned when the top-level JSON value is not an array of records.
    #[error("expected a JSON array of records in {path}")]
    NotAnArray {
        /// Path to the JSON file.
        path: PathBuf,
    },

    /// Returned when an array element is not a JSON object.
    #[error("record {row_index} in {path} is not a JSON object")]
    RecordNotObject {
        /// Path to the JSON file.
        path: PathBuf,
        /// Zero-based index of the offending element.
        row_index: usize,
    },

    /// Returned when a cell holds an array or object instead of a scalar.
    #[error("nested value in {path}: record {row_index}, column \"{column}\"")]
    NestedValue {
        /// Path to the JSON file.
        path: PathBuf,
        /// Zero-based record index.
        row_index: usize,
        /// Column holding the nested value.
        column: String,
    },

    /// Returned when the records do not form a valid table.
    #[error("invalid table in {path}")]
    InvalidTable {
        /// Path to the JSON file.
        path: PathBuf,
        /// Underlying table error.
        source: TableError,
    },

    /// Returned when a CSV row cannot be written.
    #[error("CSV write error for {path}")]
    CsvWrite {
        /// Path to the CSV file.
        path: PathBuf,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// Returned when the experiment name contains characters outside `[a-zA-Z0-9_-]`.
    #[error("invalid experiment name \"{name}\": must match [a-zA-Z0-9_-]+")]
    InvalidExperimentName {
        /// The invalid name.
        name: String,
    },

    /// Returned when the output directory cannot be created.
    #[error("cannot create output directory {path}")]
    OutputDirCreate {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when a result artifact cannot be serialized.
    #[error("cannot serialize artifact for {path}")]
    Serialize {
        /// Path the artifact was destined for.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// Returned when a result file cannot be written.
    #[error("cannot write file {path}")]
    WriteFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
