//! JSON result writer for validation, correlation, decomposition, and metrics.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use sextant_stats::{
    AccuracyMetrics, CorrelationMatrix, CorrelationStrength, Decomposition, ForecastQuality,
    StatsError, format_number, format_percent,
};
use sextant_table::ValidationResult;
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::ExperimentName;

/// Writes analysis results to JSON files.
///
/// Creates the output directory on construction if it does not exist.
/// Output files are named `{experiment}_validation.json`,
/// `{experiment}_correlation.json`, `{experiment}_decomposition.json`, and
/// `{experiment}_metrics.json`.
pub struct ResultWriter {
    output_dir: PathBuf,
    experiment: ExperimentName,
}

impl ResultWriter {
    /// Create a new writer targeting the given directory and experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), experiment = %experiment))]
    pub fn new(output_dir: &Path, experiment: ExperimentName) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            experiment,
        })
    }

    /// Write a validation outcome to `{experiment}_validation.json`.
    ///
    /// Returns the path written.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::WriteFile`] if the file cannot be written.
    #[instrument(skip_all)]
    pub fn write_validation(
        &self,
        n_records: usize,
        result: &ValidationResult,
    ) -> Result<PathBuf, IoError> {
        let artifact = ValidationArtifact {
            experiment: self.experiment.as_str(),
            n_records,
            result,
        };
        let path = self.write_artifact("validation", &artifact)?;
        info!(path = %path.display(), valid = result.is_valid(), "validation result written");
        Ok(path)
    }

    /// Write a correlation matrix to `{experiment}_correlation.json`.
    ///
    /// Besides the raw matrix, the artifact lists the off-diagonal pairs by
    /// descending magnitude with their strength band.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::WriteFile`] if the file cannot be written.
    #[instrument(skip_all, fields(n_columns = matrix.len()))]
    pub fn write_correlation(&self, matrix: &CorrelationMatrix) -> Result<PathBuf, IoError> {
        let pairs: Vec<PairEntry> = matrix
            .ranked_pairs()
            .into_iter()
            .map(|(a, b, r)| PairEntry {
                a,
                b,
                r,
                strength: CorrelationStrength::from_coefficient(r),
            })
            .collect();

        let artifact = CorrelationArtifact {
            experiment: self.experiment.as_str(),
            columns: matrix.columns(),
            matrix: matrix.as_rows(),
            pairs,
        };
        let path = self.write_artifact("correlation", &artifact)?;
        info!(path = %path.display(), "correlation result written");
        Ok(path)
    }

    /// Write per-column decompositions to `{experiment}_decomposition.json`.
    ///
    /// Columns whose decomposition failed are recorded with the error
    /// message instead of components.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::WriteFile`] if the file cannot be written.
    #[instrument(skip_all, fields(n_columns = results.len()))]
    pub fn write_decomposition(
        &self,
        results: &[(String, Result<Decomposition, StatsError>)],
    ) -> Result<PathBuf, IoError> {
        let columns: Vec<DecompositionEntry> = results
            .iter()
            .map(|(column, outcome)| match outcome {
                Ok(d) => DecompositionEntry::Components {
                    column,
                    trend: &d.trend,
                    seasonal: &d.seasonal,
                    residual: &d.residual,
                },
                Err(e) => DecompositionEntry::Skipped {
                    column,
                    error: e.to_string(),
                },
            })
            .collect();

        let artifact = DecompositionArtifact {
            experiment: self.experiment.as_str(),
            columns,
        };
        let path = self.write_artifact("decomposition", &artifact)?;
        info!(path = %path.display(), "decomposition result written");
        Ok(path)
    }

    /// Write accuracy metrics to `{experiment}_metrics.json`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::WriteFile`] if the file cannot be written.
    #[instrument(skip_all)]
    pub fn write_metrics(
        &self,
        n_points: usize,
        metrics: &AccuracyMetrics,
    ) -> Result<PathBuf, IoError> {
        let artifact = MetricsArtifact {
            experiment: self.experiment.as_str(),
            n_points,
            metrics,
            quality: metrics.quality(),
            display: MetricsDisplay {
                mape: format_percent(metrics.mape),
                rmse: format_number(Some(metrics.rmse)),
                mae: format_number(Some(metrics.mae)),
            },
        };
        let path = self.write_artifact("metrics", &artifact)?;
        info!(path = %path.display(), "metrics result written");
        Ok(path)
    }

    fn write_artifact<T: Serialize>(&self, kind: &str, artifact: &T) -> Result<PathBuf, IoError> {
        let path = self.output_dir.join(self.experiment.artifact(kind));
        let json = serde_json::to_string_pretty(artifact).map_err(|e| IoError::Serialize {
            path: path.clone(),
            source: e,
        })?;
        fs::write(&path, &json).map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e,
        })?;
        Ok(path)
    }
}

// Shadow structs for serialization

#[derive(Serialize)]
struct ValidationArtifact<'a> {
    experiment: &'a str,
    n_records: usize,
    #[serde(flatten)]
    result: &'a ValidationResult,
}

#[derive(Serialize)]
struct CorrelationArtifact<'a> {
    experiment: &'a str,
    columns: &'a [String],
    matrix: &'a [Vec<f64>],
    pairs: Vec<PairEntry<'a>>,
}

#[derive(Serialize)]
struct PairEntry<'a> {
    a: &'a str,
    b: &'a str,
    r: f64,
    strength: CorrelationStrength,
}

#[derive(Serialize)]
struct DecompositionArtifact<'a> {
    experiment: &'a str,
    columns: Vec<DecompositionEntry<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum DecompositionEntry<'a> {
    Components {
        column: &'a str,
        trend: &'a [f64],
        seasonal: &'a [f64],
        residual: &'a [f64],
    },
    Skipped {
        column: &'a str,
        error: String,
    },
}

#[derive(Serialize)]
struct MetricsArtifact<'a> {
    experiment: &'a str,
    n_points: usize,
    #[serde(flatten)]
    metrics: &'a AccuracyMetrics,
    quality: ForecastQuality,
    display: MetricsDisplay,
}

#[derive(Serialize)]
struct MetricsDisplay {
    mape: String,
    rmse: String,
    mae: String,
}

#[cfg(test)]
mod tests {
    use sextant_stats::{compute_metrics, correlate, decompose};
    use sextant_table::{NumericSeries, Record, Table, validate};
    use tempfile::TempDir;

    use super::*;

    fn writer(dir: &TempDir) -> ResultWriter {
        ResultWriter::new(dir.path(), ExperimentName::new("test").unwrap()).unwrap()
    }

    fn read_json(path: &Path) -> serde_json::Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    fn sample_table() -> Table {
        Table::from_records(
            (0..4)
                .map(|i| {
                    Record::new()
                        .with("Date", format!("2024-0{}-01", i + 1))
                        .with("sales", 10.0 * f64::from(i))
                        .with("visits", 3.0 + f64::from(i))
                        .with("returns", f64::from(i % 2))
                })
                .collect(),
        )
    }

    #[test]
    fn creates_nested_output_dir() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        ResultWriter::new(&nested, ExperimentName::new("x").unwrap()).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn validation_artifact() {
        let dir = TempDir::new().unwrap();
        let table = Table::from_records(Vec::new());
        let path = writer(&dir)
            .write_validation(table.len(), &validate(&table))
            .unwrap();
        assert!(path.ends_with("test_validation.json"));

        let json = read_json(&path);
        assert_eq!(json["experiment"], "test");
        assert_eq!(json["n_records"], 0);
        assert_eq!(json["is_valid"], false);
        assert_eq!(json["errors"][0], "no data provided");
    }

    #[test]
    fn correlation_artifact_ranks_pairs() {
        let dir = TempDir::new().unwrap();
        let matrix = correlate(&sample_table());
        let path = writer(&dir).write_correlation(&matrix).unwrap();

        let json = read_json(&path);
        assert_eq!(json["columns"].as_array().unwrap().len(), 3);
        let diagonal = json["matrix"][0][0].as_f64().unwrap();
        assert!((diagonal - 1.0).abs() < 1e-12);
        let pairs = json["pairs"].as_array().unwrap();
        assert_eq!(pairs.len(), 3);
        // sales and visits are both linear in i.
        assert_eq!(pairs[0]["strength"], "strong");
        let first = pairs[0]["r"].as_f64().unwrap();
        assert!((first - 1.0).abs() < 1e-12);
    }

    #[test]
    fn decomposition_artifact_records_failures() {
        let dir = TempDir::new().unwrap();
        let long = NumericSeries::new((0..12).map(f64::from).collect()).unwrap();
        let short = NumericSeries::new(vec![1.0, 2.0]).unwrap();
        let results = vec![
            ("long".to_string(), decompose(&long)),
            ("short".to_string(), decompose(&short)),
        ];
        let path = writer(&dir).write_decomposition(&results).unwrap();

        let json = read_json(&path);
        let columns = json["columns"].as_array().unwrap();
        assert_eq!(columns[0]["column"], "long");
        assert_eq!(columns[0]["trend"].as_array().unwrap().len(), 12);
        assert_eq!(columns[1]["column"], "short");
        assert!(columns[1]["error"].as_str().unwrap().contains("12"));
        assert!(columns[1].get("trend").is_none());
    }

    #[test]
    fn metrics_artifact() {
        let dir = TempDir::new().unwrap();
        let metrics = compute_metrics(&[100.0, 200.0, 300.0], &[110.0, 190.0, 305.0]).unwrap();
        let path = writer(&dir).write_metrics(3, &metrics).unwrap();

        let json = read_json(&path);
        assert_eq!(json["n_points"], 3);
        assert!((json["mape"].as_f64().unwrap() - 0.0556).abs() < 1e-4);
        assert_eq!(json["quality"], "excellent");
        assert_eq!(json["display"]["mape"], "5.56%");
        assert_eq!(json["display"]["rmse"], "8.66");
    }
}
