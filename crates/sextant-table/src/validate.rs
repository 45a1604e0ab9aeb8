//! Structural validation of uploaded tables.

use std::collections::HashSet;
use std::fmt;

use serde::{Serialize, Serializer};
use tracing::debug;

use crate::domain::Table;
use crate::series::numeric_columns;

/// A single structural problem found in a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// The table has no records.
    NoData,
    /// No record carries a timestamp (see [`CellValue::as_timestamp`](crate::CellValue::as_timestamp)).
    MissingTimestampColumn,
    /// The first record has no numeric column besides the timestamp.
    NoNumericColumn,
    /// Two records share a timestamp key.
    DuplicateTimestamps {
        /// The first label seen twice.
        label: String,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoData => f.write_str("no data provided"),
            Self::MissingTimestampColumn => f.write_str("missing timestamp column"),
            Self::NoNumericColumn => f.write_str("no numeric column found"),
            Self::DuplicateTimestamps { .. } => f.write_str("duplicate timestamps detected"),
        }
    }
}

impl Serialize for ValidationIssue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Outcome of [`validate`]: every issue found, in check order.
///
/// Serializes as `{"is_valid": bool, "errors": [string, ...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    is_valid: bool,
    errors: Vec<ValidationIssue>,
}

impl ValidationResult {
    fn from_issues(errors: Vec<ValidationIssue>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// Return true if no issue was found.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Return the issues in the order the checks ran.
    #[must_use]
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.errors
    }

    /// Render the issues as human-readable messages.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

/// Check that `table` has the minimal shape the analytics need.
///
/// Runs every check and collects all failures rather than stopping at the
/// first:
///
/// 1. the table has at least one record;
/// 2. some record has a timestamp: a non-empty label or a finite non-zero
///    number;
/// 3. the first record has a numeric non-timestamp column;
/// 4. no timestamp key appears twice.
#[must_use]
pub fn validate(table: &Table) -> ValidationResult {
    let mut issues = Vec::new();

    if table.is_empty() {
        issues.push(ValidationIssue::NoData);
    }

    if table.timestamp_labels().next().is_none() {
        issues.push(ValidationIssue::MissingTimestampColumn);
    }

    if numeric_columns(table).is_empty() {
        issues.push(ValidationIssue::NoNumericColumn);
    }

    let mut seen = HashSet::new();
    if let Some(label) = table.timestamp_labels().find(|l| !seen.insert(l.clone())) {
        issues.push(ValidationIssue::DuplicateTimestamps {
            label: label.into_owned(),
        });
    }

    debug!(
        n_records = table.len(),
        n_issues = issues.len(),
        "table validated"
    );
    ValidationResult::from_issues(issues)
}
