//! File I/O and serialization for the sextant pipeline.
//!
//! Reads uploaded tables from JSON, exports them as CSV, and writes analysis
//! results as `{experiment}_*.json` artifacts.

mod domain;
mod error;
mod exporter;
mod reader;
mod writer;

pub use domain::ExperimentName;
pub use error::IoError;
pub use exporter::CsvExporter;
pub use reader::TableReader;
pub use writer::ResultWriter;
