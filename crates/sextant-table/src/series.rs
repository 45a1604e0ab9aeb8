//! Numeric series extraction from table columns.

use std::ops::Index;

use serde::Serialize;

use crate::domain::Table;
use crate::TableError;

/// Ordered, finite numbers drawn from one table column.
///
/// Positions whose cell is null, absent, a label, or a non-finite number are
/// dropped, so two series taken from different columns of the same table
/// need not line up row for row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NumericSeries(Vec<f64>);

impl NumericSeries {
    /// Create a series, validating that every value is finite.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::NonFiniteValue`] for the first NaN or infinity.
    pub fn new(values: Vec<f64>) -> Result<Self, TableError> {
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(TableError::NonFiniteValue { index });
        }
        Ok(Self(values))
    }

    /// Return the values as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Return the number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true if the series has no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume and return the inner vector.
    #[must_use]
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl AsRef<[f64]> for NumericSeries {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

impl Index<usize> for NumericSeries {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl TryFrom<Vec<f64>> for NumericSeries {
    type Error = TableError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

/// Extract the numeric series for `column`, keeping record order.
///
/// A column the table does not have yields an empty series.
#[must_use]
pub fn extract(table: &Table, column: &str) -> NumericSeries {
    NumericSeries(
        table
            .records()
            .iter()
            .filter_map(|r| r.number(column))
            .collect(),
    )
}

/// Extract two columns keeping only the rows where both are numeric.
///
/// Unlike calling [`extract`] twice, the returned series always have equal
/// length and `a[k]`, `b[k]` come from the same record.
#[must_use]
pub fn extract_paired(table: &Table, a: &str, b: &str) -> (NumericSeries, NumericSeries) {
    let (left, right): (Vec<f64>, Vec<f64>) = table
        .records()
        .iter()
        .filter_map(|r| Some((r.number(a)?, r.number(b)?)))
        .unzip();
    (NumericSeries(left), NumericSeries(right))
}

/// Return the non-timestamp columns holding a number in the first record.
///
/// Columns are returned in table order. An empty table has no numeric
/// columns.
#[must_use]
pub fn numeric_columns(table: &Table) -> Vec<String> {
    let Some(first) = table.first() else {
        return Vec::new();
    };
    table
        .columns()
        .iter()
        .filter(|c| c.as_str() != table.timestamp_column())
        .filter(|c| first.get(c).is_some_and(|v| v.is_number()))
        .cloned()
        .collect()
}
