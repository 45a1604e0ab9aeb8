//! Labels for future forecast periods.

use chrono::{DateTime, Months, NaiveDate, NaiveDateTime};

/// Date formats accepted for the last observed timestamp.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];

/// Produce `periods` labels for the points following `last_date`.
///
/// When `last_date` parses as a date, the labels are `YYYY-MM-DD` dates one
/// calendar month apart, starting one month after it. A day past the end of
/// the target month is clamped to that month's last day (Jan 31 -> Feb 28/29)
/// rather than rolled over into the following month (Jan 31 -> Mar 2/3), so
/// every label falls in its own calendar month. Otherwise the labels
/// are `"Period 1"` through `"Period {periods}"`.
#[must_use]
pub fn forecast_dates(last_date: Option<&str>, periods: usize) -> Vec<String> {
    last_date
        .and_then(parse_date)
        .and_then(|start| monthly_dates(start, periods))
        .unwrap_or_else(|| (1..=periods).map(|i| format!("Period {i}")).collect())
}

fn monthly_dates(start: NaiveDate, periods: usize) -> Option<Vec<String>> {
    (1..=periods)
        .map(|i| {
            let step = Months::new(u32::try_from(i).ok()?);
            start
                .checked_add_months(step)
                .map(|d| d.format("%Y-%m-%d").to_string())
        })
        .collect()
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(d);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|dt| dt.date())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monthly_steps_from_iso_date() {
        assert_eq!(
            forecast_dates(Some("2024-01-15"), 3),
            vec!["2024-02-15", "2024-03-15", "2024-04-15"]
        );
    }

    #[test]
    fn month_end_is_clamped() {
        assert_eq!(
            forecast_dates(Some("2024-01-31"), 2),
            vec!["2024-02-29", "2024-03-31"]
        );
        assert_eq!(forecast_dates(Some("2023-01-31"), 1), vec!["2023-02-28"]);
    }

    #[test]
    fn crosses_year_boundary() {
        assert_eq!(forecast_dates(Some("2023-11-01"), 3)[2], "2024-02-01");
    }

    #[test]
    fn accepts_timestamps() {
        assert_eq!(forecast_dates(Some("2024-05-10T08:30:00Z"), 1), vec!["2024-06-10"]);
        assert_eq!(forecast_dates(Some("2024-05-10T08:30:00"), 1), vec!["2024-06-10"]);
    }

    #[test]
    fn missing_date_falls_back_to_period_labels() {
        assert_eq!(forecast_dates(None, 2), vec!["Period 1", "Period 2"]);
    }

    #[test]
    fn unparseable_date_falls_back_to_period_labels() {
        assert_eq!(forecast_dates(Some("Q3 FY24"), 1), vec!["Period 1"]);
    }

    #[test]
    fn zero_periods_is_empty() {
        assert!(forecast_dates(Some("2024-01-01"), 0).is_empty());
    }
}
