//! Domain types for sextant-table.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::TableError;

/// Name of the timestamp column when none is configured.
pub const DEFAULT_TIMESTAMP_COLUMN: &str = "Date";

/// A single cell of an uploaded table.
///
/// Uploaded schemas are data-driven, so a cell is one of a small set of
/// tagged values rather than a fixed Rust type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Missing or explicitly null.
    Null,
    /// A numeric reading.
    Number(f64),
    /// A text label, typically a timestamp.
    Label(String),
}

impl CellValue {
    /// Return the value as a number if it is a finite numeric reading.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) if v.is_finite() => Some(*v),
            _ => None,
        }
    }

    /// Return the value as a label if it is a non-empty string.
    #[must_use]
    pub fn as_label(&self) -> Option<&str> {
        match self {
            Self::Label(s) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    /// Return the value as a timestamp key, if it can serve as one.
    ///
    /// Non-empty labels are used as-is. Finite non-zero numbers (spreadsheet
    /// serials, epoch values) are keyed by their rendered form, so `45292.0`
    /// becomes `"45292"`. Null, empty labels, zero, and non-finite numbers are
    /// not timestamps.
    #[must_use]
    pub fn as_timestamp(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Label(s) if !s.is_empty() => Some(Cow::Borrowed(s)),
            Self::Number(v) if v.is_finite() && *v != 0.0 => Some(Cow::Owned(v.to_string())),
            _ => None,
        }
    }

    /// Return true if the cell holds a number (finite or not).
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(_))
    }

    /// Return true if the cell is null.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Label(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Label(s)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Number(v) => write!(f, "{v}"),
            Self::Label(s) => f.write_str(s),
        }
    }
}

/// One row of a [`Table`]: a mapping from column name to cell.
///
/// A column the record does not mention is treated as absent, the same as
/// [`CellValue::Null`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record(BTreeMap<String, CellValue>);

impl Record {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cell, returning the record for chaining.
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.0.insert(column.into(), value.into());
        self
    }

    /// Insert or replace a cell.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<CellValue>) {
        self.0.insert(column.into(), value.into());
    }

    /// Look up a cell by column name.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.0.get(column)
    }

    /// Return the finite number stored under `column`, if any.
    #[must_use]
    pub fn number(&self, column: &str) -> Option<f64> {
        self.get(column).and_then(CellValue::as_number)
    }

    /// Return the non-empty label stored under `column`, if any.
    #[must_use]
    pub fn label(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(CellValue::as_label)
    }

    /// Iterate over the column names this record mentions (sorted).
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Return the number of cells in the record.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true if the record has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// An immutable, ordered collection of [`Record`]s with a known column order.
///
/// `columns` lists every column name once, in the order the source first
/// mentioned it. One column is the timestamp column
/// ([`DEFAULT_TIMESTAMP_COLUMN`] unless overridden).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<String>,
    records: Vec<Record>,
    timestamp_column: String,
}

impl Table {
    /// Create a table from an explicit column order and its records.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`TableError::DuplicateColumn`] | A column name appears twice in `columns` |
    /// | [`TableError::UnknownColumn`] | A record mentions a column not in `columns` |
    pub fn new(columns: Vec<String>, records: Vec<Record>) -> Result<Self, TableError> {
        let mut known = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !known.insert(column.as_str()) {
                return Err(TableError::DuplicateColumn {
                    column: column.clone(),
                });
            }
        }
        for (row_index, record) in records.iter().enumerate() {
            if let Some(column) = record.columns().find(|c| !known.contains(c)) {
                return Err(TableError::UnknownColumn {
                    row_index,
                    column: column.to_string(),
                });
            }
        }
        Ok(Self {
            columns,
            records,
            timestamp_column: DEFAULT_TIMESTAMP_COLUMN.to_string(),
        })
    }

    /// Create a table whose column order is derived from the records
    /// themselves (first appearance, each record's columns in sorted order).
    #[must_use]
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut seen = HashSet::new();
        let mut columns = Vec::new();
        for record in &records {
            for column in record.columns() {
                if seen.insert(column.to_string()) {
                    columns.push(column.to_string());
                }
            }
        }
        Self {
            columns,
            records,
            timestamp_column: DEFAULT_TIMESTAMP_COLUMN.to_string(),
        }
    }

    /// Use `column` as the timestamp column.
    #[must_use]
    pub fn with_timestamp_column(mut self, column: impl Into<String>) -> Self {
        self.timestamp_column = column.into();
        self
    }

    /// Return the column names in source order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Return the records in order.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Return the name of the timestamp column.
    #[must_use]
    pub fn timestamp_column(&self) -> &str {
        &self.timestamp_column
    }

    /// Return the first record, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Record> {
        self.records.first()
    }

    /// Return at most the first `n` records.
    #[must_use]
    pub fn head(&self, n: usize) -> &[Record] {
        &self.records[..n.min(self.records.len())]
    }

    /// Return the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Return true if the table has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Return true if `column` is one of the table's columns.
    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Iterate over the timestamp keys, skipping records without one.
    ///
    /// See [`CellValue::as_timestamp`] for which cells count.
    pub fn timestamp_labels(&self) -> impl Iterator<Item = Cow<'_, str>> {
        self.records
            .iter()
            .filter_map(|r| r.get(&self.timestamp_column)?.as_timestamp())
    }

    /// Return at most the first `n` records for display, each serialized with
    /// its keys in table column order.
    #[must_use]
    pub fn preview(&self, n: usize) -> Preview<'_> {
        Preview {
            columns: &self.columns,
            records: self.head(n),
        }
    }
}

/// Leading records of a [`Table`], serialized as an array of objects whose
/// keys follow the table's column order. A column a record does not mention
/// is written as `null`.
#[derive(Debug, Clone, Copy)]
pub struct Preview<'a> {
    columns: &'a [String],
    records: &'a [Record],
}

impl Preview<'_> {
    /// Return the number of records in the preview.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Return true if the preview has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Serialize for Preview<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.records.len()))?;
        for record in self.records {
            seq.serialize_element(&OrderedRecord {
                columns: self.columns,
                record,
            })?;
        }
        seq.end()
    }
}

struct OrderedRecord<'a> {
    columns: &'a [String],
    record: &'a Record,
}

impl Serialize for OrderedRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for column in self.columns {
            map.serialize_entry(column, self.record.get(column).unwrap_or(&CellValue::Null))?;
        }
        map.end()
    }
}
