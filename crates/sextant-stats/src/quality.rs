//! Qualitative grades for forecast accuracy and correlation strength.

use std::fmt;

use serde::Serialize;

/// Grade of a forecast, derived from its MAPE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastQuality {
    /// MAPE below 10%.
    Excellent,
    /// MAPE below 20%.
    Good,
    /// MAPE of 20% or more (or not a number).
    Poor,
}

impl ForecastQuality {
    /// Grade a MAPE expressed as a fraction (0.1 == 10%).
    #[must_use]
    pub fn from_mape(mape: f64) -> Self {
        if mape < 0.1 {
            Self::Excellent
        } else if mape < 0.2 {
            Self::Good
        } else {
            Self::Poor
        }
    }
}

impl fmt::Display for ForecastQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Poor => "poor",
        })
    }
}

/// Band of a correlation coefficient's magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationStrength {
    /// `|r| > 0.7`
    Strong,
    /// `0.4 < |r| <= 0.7`
    Moderate,
    /// `0.2 < |r| <= 0.4`
    Weak,
    /// `|r| <= 0.2`
    Negligible,
}

impl CorrelationStrength {
    /// Classify a correlation coefficient by its absolute value.
    #[must_use]
    pub fn from_coefficient(r: f64) -> Self {
        let magnitude = r.abs();
        if magnitude > 0.7 {
            Self::Strong
        } else if magnitude > 0.4 {
            Self::Moderate
        } else if magnitude > 0.2 {
            Self::Weak
        } else {
            Self::Negligible
        }
    }
}

impl fmt::Display for CorrelationStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Strong => "strong",
            Self::Moderate => "moderate",
            Self::Weak => "weak",
            Self::Negligible => "negligible",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mape_bands() {
        assert_eq!(ForecastQuality::from_mape(0.0), ForecastQuality::Excellent);
        assert_eq!(ForecastQuality::from_mape(0.0999), ForecastQuality::Excellent);
        assert_eq!(ForecastQuality::from_mape(0.1), ForecastQuality::Good);
        assert_eq!(ForecastQuality::from_mape(0.1999), ForecastQuality::Good);
        assert_eq!(ForecastQuality::from_mape(0.2), ForecastQuality::Poor);
        assert_eq!(ForecastQuality::from_mape(3.5), ForecastQuality::Poor);
    }

    #[test]
    fn nan_mape_is_poor() {
        assert_eq!(ForecastQuality::from_mape(f64::NAN), ForecastQuality::Poor);
    }

    #[test]
    fn correlation_bands_use_magnitude() {
        assert_eq!(CorrelationStrength::from_coefficient(0.71), CorrelationStrength::Strong);
        assert_eq!(CorrelationStrength::from_coefficient(-0.9), CorrelationStrength::Strong);
        assert_eq!(CorrelationStrength::from_coefficient(0.7), CorrelationStrength::Moderate);
        assert_eq!(CorrelationStrength::from_coefficient(-0.5), CorrelationStrength::Moderate);
        assert_eq!(CorrelationStrength::from_coefficient(0.3), CorrelationStrength::Weak);
        assert_eq!(CorrelationStrength::from_coefficient(0.2), CorrelationStrength::Negligible);
        assert_eq!(CorrelationStrength::from_coefficient(0.0), CorrelationStrength::Negligible);
    }

    #[test]
    fn display_is_lowercase() {
        assert_eq!(ForecastQuality::Good.to_string(), "good");
        assert_eq!(CorrelationStrength::Weak.to_string(), "weak");
    }
}
