//! Approximate trend / seasonal / residual decomposition for display.
//!
//! This is a visual aid, not a fitted model: the trend is a centred moving
//! average and the seasonal term is a fixed sine wave scaled by the local
//! value. It is not equivalent to STL or classical decomposition.

use std::f64::consts::TAU;

use serde::Serialize;
use sextant_table::NumericSeries;
use tracing::{debug, instrument};

use crate::error::StatsError;

/// Configuration for [`Decomposition`].
///
/// Construct via [`DecompositionConfig::new`], then chain `with_*` methods to
/// override defaults.
///
/// # Defaults
///
/// | Parameter        | Default |
/// |------------------|---------|
/// | `min_len`        | 12      |
/// | `max_half_width` | 5       |
/// | `period`         | 12      |
/// | `amplitude`      | 0.1     |
#[derive(Debug, Clone)]
pub struct DecompositionConfig {
    min_len: usize,
    max_half_width: usize,
    period: usize,
    amplitude: f64,
}

impl Default for DecompositionConfig {
    fn default() -> Self {
        Self {
            min_len: 12,
            max_half_width: 5,
            period: 12,
            amplitude: 0.1,
        }
    }
}

impl DecompositionConfig {
    /// Create a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum series length accepted.
    #[must_use]
    pub fn with_min_len(mut self, min_len: usize) -> Self {
        self.min_len = min_len;
        self
    }

    /// Set the cap on the moving-average half-width. The effective
    /// half-width is `min(max_half_width, len / 4)`.
    #[must_use]
    pub fn with_max_half_width(mut self, max_half_width: usize) -> Self {
        self.max_half_width = max_half_width;
        self
    }

    /// Set the period, in samples, of the seasonal sine wave.
    #[must_use]
    pub fn with_period(mut self, period: usize) -> Self {
        self.period = period;
        self
    }

    /// Set the seasonal amplitude as a fraction of the local value.
    #[must_use]
    pub fn with_amplitude(mut self, amplitude: f64) -> Self {
        self.amplitude = amplitude;
        self
    }

    /// Return the minimum series length accepted.
    #[must_use]
    pub fn min_len(&self) -> usize {
        self.min_len
    }

    /// Split `series` into trend, seasonal, and residual components.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`StatsError::InvalidPeriod`] | `period` is zero |
    /// | [`StatsError::InsufficientData`] | `series` is shorter than `min_len` |
    #[instrument(skip_all, fields(len = series.len()))]
    pub fn decompose(&self, series: &NumericSeries) -> Result<Decomposition, StatsError> {
        if self.period == 0 {
            return Err(StatsError::InvalidPeriod { period: self.period });
        }
        let n = series.len();
        if n < self.min_len {
            return Err(StatsError::InsufficientData {
                len: n,
                required: self.min_len,
            });
        }

        let values = series.as_slice();
        let half_width = self.max_half_width.min(n / 4);
        let trend = centered_moving_average(values, half_width);

        let period = self.period as f64;
        let seasonal: Vec<f64> = values
            .iter()
            .enumerate()
            .map(|(i, &v)| (TAU * i as f64 / period).sin() * v * self.amplitude)
            .collect();

        let residual: Vec<f64> = values
            .iter()
            .zip(&trend)
            .zip(&seasonal)
            .map(|((&v, &t), &s)| v - t - s)
            .collect();

        debug!(half_width, period = self.period, "series decomposed");
        Ok(Decomposition {
            trend,
            seasonal,
            residual,
        })
    }
}

/// Decompose `series` with the default configuration.
///
/// # Errors
///
/// Returns [`StatsError::InsufficientData`] for series shorter than 12 points.
pub fn decompose(series: &NumericSeries) -> Result<Decomposition, StatsError> {
    DecompositionConfig::default().decompose(series)
}

/// Mean of `values[max(0, i-w) .. min(n, i+w+1))` for every `i`. The window
/// shrinks at the edges; nothing is padded or wrapped.
fn centered_moving_average(values: &[f64], half_width: usize) -> Vec<f64> {
    let n = values.len();
    (0..n)
        .map(|i| {
            let window = &values[i.saturating_sub(half_width)..(i + half_width + 1).min(n)];
            window.iter().sum::<f64>() / window.len() as f64
        })
        .collect()
}

/// Additive components of a series, positionally aligned with it.
///
/// For every index, `trend[i] + seasonal[i] + residual[i]` reproduces the
/// input value up to floating-point rounding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decomposition {
    /// Centred moving average.
    pub trend: Vec<f64>,
    /// Periodic component.
    pub seasonal: Vec<f64>,
    /// What remains after removing trend and seasonal.
    pub residual: Vec<f64>,
}

impl Decomposition {
    /// Return the number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.trend.len()
    }

    /// Return true if there are no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trend.is_empty()
    }

    /// Rebuild the series by summing the components.
    #[must_use]
    pub fn reconstruct(&self) -> Vec<f64> {
        self.trend
            .iter()
            .zip(&self.seasonal)
            .zip(&self.residual)
            .map(|((&t, &s), &r)| t + s + r)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: Vec<f64>) -> NumericSeries {
        NumericSeries::new(values).unwrap()
    }

    fn ramp(n: usize) -> NumericSeries {
        series((0..n).map(|i| 100.0 + 3.0 * i as f64 + (i % 4) as f64).collect())
    }

    #[test]
    fn eleven_points_is_insufficient() {
        let result = decompose(&ramp(11));
        assert!(
            matches!(result, Err(StatsError::InsufficientData { len: 11, required: 12 })),
            "expected InsufficientData, got {result:?}"
        );
    }

    #[test]
    fn twelve_points_is_enough() {
        let d = decompose(&ramp(12)).unwrap();
        assert_eq!(d.len(), 12);
        assert_eq!(d.seasonal.len(), 12);
        assert_eq!(d.residual.len(), 12);
    }

    #[test]
    fn components_reconstruct_input() {
        let s = ramp(40);
        let d = decompose(&s).unwrap();
        for (i, (&orig, rebuilt)) in s.as_slice().iter().zip(d.reconstruct()).enumerate() {
            assert!(
                (orig - rebuilt).abs() <= 1e-12 * orig.abs().max(1.0),
                "index {i}: {orig} vs {rebuilt}"
            );
        }
    }

    #[test]
    fn trend_window_shrinks_at_edges() {
        // n = 12 -> half-width min(5, 3) = 3.
        let values: Vec<f64> = (0..12).map(f64::from).collect();
        let d = decompose(&series(values)).unwrap();
        // index 0 averages [0, 1, 2, 3]
        assert!((d.trend[0] - 1.5).abs() < 1e-12);
        // index 5 averages [2..=8]
        assert!((d.trend[5] - 5.0).abs() < 1e-12);
        // index 11 averages [8, 9, 10, 11]
        assert!((d.trend[11] - 9.5).abs() < 1e-12);
    }

    #[test]
    fn half_width_caps_at_five() {
        // n = 40 -> half-width 5; index 20 averages 11 values centred on 20.
        let values: Vec<f64> = (0..40).map(|i| f64::from(i * i)).collect();
        let d = decompose(&series(values)).unwrap();
        let expected = (15..=25).map(|i| f64::from(i * i)).sum::<f64>() / 11.0;
        assert!((d.trend[20] - expected).abs() < 1e-9);
    }

    #[test]
    fn seasonal_is_scaled_sine() {
        let values = vec![50.0; 24];
        let d = decompose(&series(values)).unwrap();
        assert!(d.seasonal[0].abs() < 1e-12);
        // quarter period: sin(pi/2) * 50 * 0.1
        assert!((d.seasonal[3] - 5.0).abs() < 1e-12);
        assert!((d.seasonal[9] + 5.0).abs() < 1e-12);
    }

    #[test]
    fn constant_series_trend_is_flat() {
        let d = decompose(&series(vec![7.0; 15])).unwrap();
        assert!(d.trend.iter().all(|&t| (t - 7.0).abs() < 1e-12));
    }

    #[test]
    fn custom_config() {
        let config = DecompositionConfig::new()
            .with_min_len(4)
            .with_period(4)
            .with_amplitude(0.5)
            .with_max_half_width(1);
        let d = config.decompose(&series(vec![10.0, 10.0, 10.0, 10.0])).unwrap();
        assert!((d.seasonal[1] - 5.0).abs() < 1e-12);
    }

    #[test]
    fn min_len_defaults_to_twelve() {
        assert_eq!(DecompositionConfig::new().min_len(), 12);
        assert_eq!(DecompositionConfig::new().with_min_len(4).min_len(), 4);
    }

    #[test]
    fn serializes_as_three_arrays() {
        let d = decompose(&ramp(12)).unwrap();
        let json = serde_json::to_value(&d).unwrap();
        for key in ["trend", "seasonal", "residual"] {
            assert_eq!(json[key].as_array().unwrap().len(), 12, "{key}");
        }
        assert_eq!(json["seasonal"][0], 0.0);
    }

    #[test]
    fn zero_period_rejected() {
        let result = DecompositionConfig::new().with_period(0).decompose(&ramp(20));
        assert!(matches!(result, Err(StatsError::InvalidPeriod { period: 0 })));
    }
}
