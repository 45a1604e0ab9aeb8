//! Forecast accuracy metrics: MAPE, RMSE, MAE.

use serde::{Deserialize, Serialize};

use crate::quality::ForecastQuality;

/// Error statistics comparing a forecast with what actually happened.
///
/// `mape` is a fraction (0.05 == 5%) and may exceed 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccuracyMetrics {
    /// Mean absolute percentage error.
    pub mape: f64,
    /// Root mean squared error.
    pub rmse: f64,
    /// Mean absolute error.
    pub mae: f64,
}

impl AccuracyMetrics {
    /// Return MAPE as a percentage.
    #[must_use]
    pub fn mape_percent(&self) -> f64 {
        self.mape * 100.0
    }

    /// Grade the forecast by its MAPE.
    #[must_use]
    pub fn quality(&self) -> ForecastQuality {
        ForecastQuality::from_mape(self.mape)
    }

    /// Return true if every metric is within `tolerance` of `other`.
    ///
    /// Used to cross-check metrics reported by a forecasting service against
    /// a local recomputation.
    #[must_use]
    pub fn agrees_with(&self, other: &Self, tolerance: f64) -> bool {
        (self.mape - other.mape).abs() <= tolerance
            && (self.rmse - other.rmse).abs() <= tolerance
            && (self.mae - other.mae).abs() <= tolerance
    }
}

/// Compute accuracy metrics for paired `actual` and `predicted` values.
///
/// Returns `None` when the slices differ in length or are empty.
///
/// Points where `actual` is zero add nothing to the MAPE sum but still count
/// towards its denominator, so a forecast of a series with zeros reports a
/// lower MAPE than one that excluded them.
#[must_use]
pub fn compute_metrics(actual: &[f64], predicted: &[f64]) -> Option<AccuracyMetrics> {
    if actual.len() != predicted.len() || actual.is_empty() {
        return None;
    }
    let n = actual.len() as f64;

    let mut pct_sum = 0.0;
    let mut sq_sum = 0.0;
    let mut abs_sum = 0.0;
    for (&a, &p) in actual.iter().zip(predicted) {
        let err = (a - p).abs();
        if a != 0.0 {
            pct_sum += err / a.abs();
        }
        sq_sum += err * err;
        abs_sum += err;
    }

    Some(AccuracyMetrics {
        mape: pct_sum / n,
        rmse: (sq_sum / n).sqrt(),
        mae: abs_sum / n,
    })
}
