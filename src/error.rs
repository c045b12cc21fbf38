//! Error types for the detection core.

/// Result type alias
pub type Result<T> = std::result::Result<T, DetectionError>;

/// Failures surfaced by the detector, the aggregator and event parsing.
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    /// Timestamp did not match `%Y-%m-%dT%H:%M:%S`
    #[error("invalid timestamp '{value}': {source}")]
    Parse {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// Category outside the pedestrian/bicycle/car/truck/van taxonomy
    #[error("unknown detection category '{0}'")]
    UnknownCategory(String),

    /// Reading the event history for aggregation failed
    #[error("aggregation failed: {0}")]
    AggregationFailure(String),
}
