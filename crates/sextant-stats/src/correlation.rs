//! Pairwise Pearson correlation over table columns.

use serde::Serialize;
use sextant_table::{NumericSeries, Table, extract, extract_paired, numeric_columns};
use tracing::{debug, instrument, warn};

use crate::quality::CorrelationStrength;

/// How two columns are paired up before correlating them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    /// Filter each column for its own non-numeric cells, then truncate both
    /// series to the shorter length. When the columns have different null
    /// patterns, `a[k]` and `b[k]` may come from different records.
    #[default]
    Positional,
    /// Keep only the records where both columns are numeric.
    SharedRows,
}

/// Configuration for [`CorrelationMatrix`] computation.
///
/// Construct via [`CorrelationConfig::new`], then chain `with_*` methods to
/// override defaults.
///
/// # Defaults
///
/// | Parameter   | Default                                     |
/// |-------------|---------------------------------------------|
/// | `columns`   | every numeric column (see [`numeric_columns`]) |
/// | `alignment` | [`Alignment::Positional`]                   |
#[derive(Debug, Clone, Default)]
pub struct CorrelationConfig {
    columns: Option<Vec<String>>,
    alignment: Alignment,
}

impl CorrelationConfig {
    /// Create a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the matrix to these columns, in this order.
    #[must_use]
    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = Some(columns);
        self
    }

    /// Set how column pairs are aligned.
    #[must_use]
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Return the configured alignment.
    #[must_use]
    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    /// Compute the correlation matrix for `table`.
    ///
    /// Every ordered pair `(i, j)`, including the diagonal, is computed on its
    /// own. A column absent from the table contributes an empty series and
    /// therefore a row and column of zeros.
    #[instrument(skip_all, fields(n_records = table.len(), alignment = ?self.alignment))]
    pub fn compute(&self, table: &Table) -> CorrelationMatrix {
        let columns = match &self.columns {
            Some(columns) => columns.clone(),
            None => numeric_columns(table),
        };
        for missing in columns.iter().filter(|c| !table.has_column(c)) {
            warn!(column = %missing, "requested column not in table");
        }

        let values: Vec<Vec<f64>> = match self.alignment {
            Alignment::Positional => {
                let series: Vec<NumericSeries> =
                    columns.iter().map(|c| extract(table, c)).collect();
                series
                    .iter()
                    .map(|a| series.iter().map(|b| pearson(a.as_ref(), b.as_ref())).collect())
                    .collect()
            }
            Alignment::SharedRows => columns
                .iter()
                .map(|a| {
                    columns
                        .iter()
                        .map(|b| {
                            let (x, y) = extract_paired(table, a, b);
                            pearson(x.as_ref(), y.as_ref())
                        })
                        .collect()
                })
                .collect(),
        };

        debug!(n_columns = columns.len(), "correlation matrix computed");
        CorrelationMatrix { columns, values }
    }
}

/// Correlate every numeric column of `table` against every other, using
/// [`Alignment::Positional`].
#[must_use]
pub fn correlate(table: &Table) -> CorrelationMatrix {
    CorrelationConfig::new().compute(table)
}

/// Pearson correlation coefficient over the common prefix of `a` and `b`.
///
/// Both inputs are truncated to `min(a.len(), b.len())` and centred on the
/// means of their truncated prefixes. Returns 0 when either prefix is empty
/// or constant, or when the coefficient is not finite.
#[must_use]
pub fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    if n == 0 {
        return 0.0;
    }
    let (a, b) = (&a[..n], &b[..n]);
    if is_constant(a) || is_constant(b) {
        return 0.0;
    }

    let mean_a = a.iter().sum::<f64>() / n as f64;
    let mean_b = b.iter().sum::<f64>() / n as f64;

    let mut cross = 0.0;
    let mut ss_a = 0.0;
    let mut ss_b = 0.0;
    for (&x, &y) in a.iter().zip(b) {
        let dx = x - mean_a;
        let dy = y - mean_b;
        cross += dx * dy;
        ss_a += dx * dx;
        ss_b += dy * dy;
    }

    let r = cross / (ss_a * ss_b).sqrt();
    if r.is_finite() { r } else { 0.0 }
}

fn is_constant(xs: &[f64]) -> bool {
    xs.iter().all(|&x| x == xs[0])
}

/// Square matrix of pairwise correlations, indexed by column name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    columns: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Return the column names labelling both axes.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Return the number of columns (the matrix is `len() x len()`).
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Return true if the matrix has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Return entry `(i, j)`, or `None` if out of bounds.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.values.get(i)?.get(j).copied()
    }

    /// Return the entry for a pair of column names.
    #[must_use]
    pub fn between(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.get(i, j)
    }

    /// Return the matrix as rows.
    #[must_use]
    pub fn as_rows(&self) -> &[Vec<f64>] {
        &self.values
    }

    /// Return the off-diagonal pairs `(a, b, r)` with `a` before `b`, sorted
    /// by descending `|r|`.
    #[must_use]
    pub fn ranked_pairs(&self) -> Vec<(&str, &str, f64)> {
        let mut pairs: Vec<(&str, &str, f64)> = (0..self.len())
            .flat_map(|i| ((i + 1)..self.len()).map(move |j| (i, j)))
            .map(|(i, j)| (self.columns[i].as_str(), self.columns[j].as_str(), self.values[i][j]))
            .collect();
        pairs.sort_by(|x, y| y.2.abs().total_cmp(&x.2.abs()));
        pairs
    }

    /// Classify entry `(i, j)` into a strength band.
    #[must_use]
    pub fn strength(&self, i: usize, j: usize) -> Option<CorrelationStrength> {
        self.get(i, j).map(CorrelationStrength::from_coefficient)
    }
}
