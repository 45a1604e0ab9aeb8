//! Human-readable rendering of magnitudes and percentages.

const BILLION: f64 = 1_000_000_000.0;
const MILLION: f64 = 1_000_000.0;
const THOUSAND: f64 = 1_000.0;

/// Render `value` with a magnitude suffix and two decimals.
///
/// | `|value|`   | Output           |
/// |-------------|------------------|
/// | `>= 1e9`    | `"{v/1e9} Md"`   |
/// | `>= 1e6`    | `"{v/1e6} M"`    |
/// | `>= 1e3`    | `"{v/1e3} k"`    |
/// | otherwise   | `"{v}"`          |
///
/// `None` and NaN render as `"N/A"`. The sign is kept. A value exactly
/// halfway between two hundredths rounds away from zero (`1125.0` ->
/// `"1.13 k"`, `0.125` -> `"0.13"`).
#[must_use]
pub fn format_number(value: Option<f64>) -> String {
    let Some(value) = value.filter(|v| !v.is_nan()) else {
        return "N/A".to_string();
    };
    let magnitude = value.abs();
    if magnitude >= BILLION {
        format!("{} Md", fixed2(value / BILLION))
    } else if magnitude >= MILLION {
        format!("{} M", fixed2(value / MILLION))
    } else if magnitude >= THOUSAND {
        format!("{} k", fixed2(value / THOUSAND))
    } else {
        fixed2(value)
    }
}

/// Two-decimal rendering with exact ties rounded away from zero.
///
/// `{:.2}` rounds the exact binary value half-to-even. A double lies exactly
/// on a hundredths tie only when its fraction is an odd number of eighths
/// (x.125, x.375, x.625, x.875), so those are rounded up in magnitude first.
fn fixed2(value: f64) -> String {
    let eighths = value * 8.0;
    if eighths.is_finite() && eighths.fract() == 0.0 && (eighths % 2.0).abs() == 1.0 {
        format!("{:.2}", (value * 100.0).round() / 100.0)
    } else {
        format!("{value:.2}")
    }
}

/// Render a fraction as a percentage with two decimals (`0.0556` -> `"5.56%"`).
#[must_use]
pub fn format_percent(fraction: f64) -> String {
    if fraction.is_nan() {
        return "N/A".to_string();
    }
    format!("{:.2}%", fraction * 100.0)
}
