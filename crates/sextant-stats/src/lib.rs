//! Numeric analyses over sextant tables.
//!
//! Pure math library with no I/O. Provides pairwise Pearson correlation,
//! an illustrative trend/seasonal/residual decomposition, forecast accuracy
//! metrics, and the formatting helpers used wherever those numbers are shown.

mod calendar;
mod correlation;
mod decomposition;
mod error;
mod format;
mod metrics;
mod quality;

pub use calendar::forecast_dates;
pub use correlation::{Alignment, CorrelationConfig, CorrelationMatrix, correlate, pearson};
pub use decomposition::{Decomposition, DecompositionConfig, decompose};
pub use error::StatsError;
pub use format::{format_number, format_percent};
pub use metrics::{AccuracyMetrics, compute_metrics};
pub use quality::{CorrelationStrength, ForecastQuality};
