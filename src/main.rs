use std::borrow::Cow;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use sextant_io::{CsvExporter, ExperimentName, ResultWriter, TableReader};
use sextant_stats::{
    AccuracyMetrics, Alignment, CorrelationConfig, CorrelationStrength, DecompositionConfig,
    ForecastQuality, compute_metrics, forecast_dates, format_number, format_percent,
};
use sextant_table::{
    DEFAULT_TIMESTAMP_COLUMN, Preview, Table, extract, extract_paired, numeric_columns, validate,
};

#[derive(Parser)]
#[command(name = "sextant")]
#[command(about = "Validation, correlation, decomposition, and accuracy metrics for tabular time series")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Name of the column holding timestamp labels
    #[arg(long, default_value = DEFAULT_TIMESTAMP_COLUMN, global = true)]
    timestamp_column: String,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for parallel computation (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

#[derive(Subcommand)]
enum Command {
    /// Summarize a table: columns, numeric columns, and the first rows
    Inspect {
        /// Path to the input JSON file
        #[arg(long)]
        data: PathBuf,

        /// Number of leading rows to show
        #[arg(long, default_value_t = 10)]
        rows: usize,
    },

    /// Check that a table has data, timestamps, and a numeric column
    Validate {
        /// Path to the input JSON file
        #[arg(long)]
        data: PathBuf,

        /// Experiment name for output files (must match [a-zA-Z0-9_-]+)
        #[arg(long)]
        experiment: Option<String>,

        /// Output directory for result files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Compute the pairwise Pearson correlation matrix of numeric columns
    Correlate {
        /// Path to the input JSON file
        #[arg(long)]
        data: PathBuf,

        /// Columns to correlate (defaults to every numeric column)
        #[arg(long, value_delimiter = ',')]
        columns: Option<Vec<String>>,

        /// Row pairing: "positional" or "shared-rows"
        #[arg(long, default_value = "positional")]
        alignment: String,

        /// Experiment name for output files (must match [a-zA-Z0-9_-]+)
        #[arg(long)]
        experiment: Option<String>,

        /// Output directory for result files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Split numeric columns into trend, seasonal, and residual components
    Decompose {
        /// Path to the input JSON file
        #[arg(long)]
        data: PathBuf,

        /// Column to decompose (defaults to every numeric column)
        #[arg(long)]
        column: Option<String>,

        /// Period of the seasonal component, in samples
        #[arg(long, default_value_t = 12)]
        period: usize,

        /// Seasonal amplitude as a fraction of the local value
        #[arg(long, default_value_t = 0.1)]
        amplitude: f64,

        /// Experiment name for output files (must match [a-zA-Z0-9_-]+)
        #[arg(long)]
        experiment: Option<String>,

        /// Output directory for result files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Compute MAPE, RMSE, and MAE of a forecast against actual values
    Metrics {
        /// Actual values, comma-separated
        #[arg(long, value_delimiter = ',', requires = "predicted", conflicts_with = "data")]
        actual: Option<Vec<f64>>,

        /// Predicted values, comma-separated
        #[arg(long, value_delimiter = ',', requires = "actual")]
        predicted: Option<Vec<f64>>,

        /// Path to a JSON table holding both series
        #[arg(long, requires_all = ["actual_column", "predicted_column"])]
        data: Option<PathBuf>,

        /// Column of actual values in --data
        #[arg(long)]
        actual_column: Option<String>,

        /// Column of predicted values in --data
        #[arg(long)]
        predicted_column: Option<String>,

        /// Experiment name for output files (must match [a-zA-Z0-9_-]+)
        #[arg(long)]
        experiment: Option<String>,

        /// Output directory for result files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Render numbers with magnitude suffixes (k, M, Md)
    Format {
        /// Values to format
        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<f64>,
    },

    /// Export a JSON table as CSV
    Export {
        /// Path to the input JSON file
        #[arg(long)]
        data: PathBuf,

        /// Path of the CSV file to write
        #[arg(long)]
        output: PathBuf,
    },

    /// List labels for the periods following the last observation
    ForecastDates {
        /// Path to a JSON table whose last timestamp is the starting point
        #[arg(long, conflicts_with = "last_date")]
        data: Option<PathBuf>,

        /// Last observed date (YYYY-MM-DD and common variants)
        #[arg(long)]
        last_date: Option<String>,

        /// Number of labels to produce
        #[arg(long, default_value_t = 12)]
        periods: usize,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct InspectOutput<'a> {
    n_records: usize,
    columns: &'a [String],
    timestamp_column: &'a str,
    numeric_columns: Vec<String>,
    last_timestamp: Option<Cow<'a, str>>,
    head: Preview<'a>,
}

#[derive(Serialize)]
struct CorrelationOutput<'a> {
    columns: &'a [String],
    alignment: Alignment,
    matrix: &'a [Vec<f64>],
    strongest: Option<PairOutput<'a>>,
}

#[derive(Serialize)]
struct PairOutput<'a> {
    a: &'a str,
    b: &'a str,
    r: f64,
    strength: CorrelationStrength,
}

#[derive(Serialize)]
struct DecomposeOutput {
    n_records: usize,
    decomposed: Vec<String>,
    skipped: Vec<SkippedOutput>,
}

#[derive(Serialize)]
struct SkippedOutput {
    column: String,
    reason: String,
}

#[derive(Serialize)]
struct MetricsOutput {
    n_points: usize,
    #[serde(flatten)]
    metrics: AccuracyMetrics,
    quality: ForecastQuality,
    mape_display: String,
    rmse_display: String,
    mae_display: String,
}

#[derive(Serialize)]
struct FormatOutput {
    value: f64,
    formatted: String,
}

fn parse_alignment(s: &str) -> Result<Alignment> {
    match s {
        "positional" => Ok(Alignment::Positional),
        "shared-rows" => Ok(Alignment::SharedRows),
        other => anyhow::bail!("unknown alignment: {other} (expected positional or shared-rows)"),
    }
}

fn load_table(path: &Path, timestamp_column: &str) -> Result<Table> {
    TableReader::new(path)
        .with_timestamp_column(timestamp_column)
        .read()
        .with_context(|| format!("failed to read table {}", path.display()))
}

/// Validate `table`, failing with every issue found.
fn require_valid(table: &Table) -> Result<()> {
    let result = validate(table);
    if !result.is_valid() {
        anyhow::bail!("table failed validation: {}", result.messages().join("; "));
    }
    Ok(())
}

fn result_writer(experiment: Option<String>, output_dir: &Path) -> Result<Option<ResultWriter>> {
    experiment
        .map(|name| {
            let name = ExperimentName::new(name)?;
            ResultWriter::new(output_dir, name).context("failed to prepare output directory")
        })
        .transpose()
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Inspect { data, rows } => {
            let table = load_table(&data, &cli.timestamp_column)?;
            let output = InspectOutput {
                n_records: table.len(),
                columns: table.columns(),
                timestamp_column: table.timestamp_column(),
                numeric_columns: numeric_columns(&table),
                last_timestamp: table.timestamp_labels().last(),
                head: table.preview(rows),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Validate {
            data,
            experiment,
            output_dir,
        } => {
            let table = load_table(&data, &cli.timestamp_column)?;
            let result = validate(&table);
            for issue in result.issues() {
                warn!(%issue, "validation issue");
            }

            if let Some(writer) = result_writer(experiment, &output_dir)? {
                writer.write_validation(table.len(), &result)?;
            }
            println!("{}", serde_json::to_string_pretty(&result)?);

            if !result.is_valid() {
                anyhow::bail!("table failed validation");
            }
        }

        Command::Correlate {
            data,
            columns,
            alignment,
            experiment,
            output_dir,
        } => {
            let table = load_table(&data, &cli.timestamp_column)?;
            require_valid(&table)?;

            let mut config = CorrelationConfig::new().with_alignment(parse_alignment(&alignment)?);
            if let Some(columns) = columns {
                config = config.with_columns(columns);
            }
            let matrix = config.compute(&table);
            info!(n_columns = matrix.len(), "correlation matrix ready");

            if let Some(writer) = result_writer(experiment, &output_dir)? {
                writer.write_correlation(&matrix)?;
            }

            let strongest = matrix.ranked_pairs().first().map(|&(a, b, r)| PairOutput {
                a,
                b,
                r,
                strength: CorrelationStrength::from_coefficient(r),
            });
            let output = CorrelationOutput {
                columns: matrix.columns(),
                alignment: config.alignment(),
                matrix: matrix.as_rows(),
                strongest,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Decompose {
            data,
            column,
            period,
            amplitude,
            experiment,
            output_dir,
        } => {
            let table = load_table(&data, &cli.timestamp_column)?;
            require_valid(&table)?;

            let columns = match column {
                Some(column) => {
                    if !table.has_column(&column) {
                        anyhow::bail!("column not found: {column}");
                    }
                    vec![column]
                }
                None => numeric_columns(&table),
            };

            let config = DecompositionConfig::new()
                .with_period(period)
                .with_amplitude(amplitude);
            info!(n_columns = columns.len(), min_len = config.min_len(), "decomposing columns");
            let results: Vec<_> = columns
                .into_par_iter()
                .map(|column| {
                    let outcome = config.decompose(&extract(&table, &column));
                    (column, outcome)
                })
                .collect();

            let mut decomposed = Vec::new();
            let mut skipped = Vec::new();
            for (column, outcome) in &results {
                match outcome {
                    Ok(_) => decomposed.push(column.clone()),
                    Err(e) => {
                        warn!(column = %column, error = %e, "column not decomposed");
                        skipped.push(SkippedOutput {
                            column: column.clone(),
                            reason: e.to_string(),
                        });
                    }
                }
            }
            info!(n_decomposed = decomposed.len(), n_skipped = skipped.len(), "decomposition complete");

            if let Some(writer) = result_writer(experiment, &output_dir)? {
                writer.write_decomposition(&results)?;
            }

            let output = DecomposeOutput {
                n_records: table.len(),
                decomposed,
                skipped,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Metrics {
            actual,
            predicted,
            data,
            actual_column,
            predicted_column,
            experiment,
            output_dir,
        } => {
            let (actual, predicted) = match (actual, predicted, data) {
                (Some(actual), Some(predicted), _) => (actual, predicted),
                (_, _, Some(data)) => {
                    let table = load_table(&data, &cli.timestamp_column)?;
                    let actual_column = actual_column.context("--actual-column is required")?;
                    let predicted_column =
                        predicted_column.context("--predicted-column is required")?;
                    let (a, p) = extract_paired(&table, &actual_column, &predicted_column);
                    (a.into_inner(), p.into_inner())
                }
                _ => anyhow::bail!("provide either --actual and --predicted, or --data"),
            };

            let metrics = compute_metrics(&actual, &predicted).with_context(|| {
                format!(
                    "cannot score {} actual against {} predicted values",
                    actual.len(),
                    predicted.len()
                )
            })?;

            if let Some(writer) = result_writer(experiment, &output_dir)? {
                writer.write_metrics(actual.len(), &metrics)?;
            }

            let output = MetricsOutput {
                n_points: actual.len(),
                metrics,
                quality: metrics.quality(),
                mape_display: format_percent(metrics.mape),
                rmse_display: format_number(Some(metrics.rmse)),
                mae_display: format_number(Some(metrics.mae)),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Format { values } => {
            let output: Vec<FormatOutput> = values
                .into_iter()
                .map(|value| FormatOutput {
                    value,
                    formatted: format_number(Some(value)),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Export { data, output } => {
            let table = load_table(&data, &cli.timestamp_column)?;
            CsvExporter::new(&output)
                .export(&table)
                .with_context(|| format!("failed to export {}", output.display()))?;
            info!(n_records = table.len(), path = %output.display(), "table exported");
        }

        Command::ForecastDates {
            data,
            last_date,
            periods,
        } => {
            let last_date = match data {
                Some(data) => {
                    let table = load_table(&data, &cli.timestamp_column)?;
                    table.timestamp_labels().last().map(Cow::into_owned)
                }
                None => last_date,
            };
            if last_date.is_none() {
                warn!("no last date available, using period labels");
            }
            let labels = forecast_dates(last_date.as_deref(), periods);
            println!("{}", serde_json::to_string_pretty(&labels)?);
        }
    }

    Ok(())
}
