//! Error types for sextant-stats.

/// Errors from decomposition and other series analyses.
#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    /// Returned when a series is shorter than an analysis requires.
    #[error("insufficient data: need at least {required} points, got {len}")]
    InsufficientData {
        /// Length of the series provided.
        len: usize,
        /// Minimum length required.
        required: usize,
    },

    /// Returned when a seasonal period of zero is configured.
    #[error("seasonal period must be at least 1, got {period}")]
    InvalidPeriod {
        /// The invalid period value provided.
        period: usize,
    },
}
