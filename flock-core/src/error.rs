//! Error types for the flock core.

use thiserror::Error;

/// Errors produced while loading or validating a [`crate::SimConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON document could not be parsed into a config.
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),

    /// A numeric field was NaN, infinite, or below its lower bound.
    #[error("config field '{field}' must be a finite value >= {min}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        value: f64,
    },

    /// A `{ min, max }` pair had `min > max`.
    #[error("config range '{field}' is inverted: min {min} > max {max}")]
    InvertedRange {
        field: &'static str,
        min: f64,
        max: f64,
    },

    /// A probability or viewport fraction fell outside `[0, 1]`.
    #[error("config field '{field}' must lie in [0, 1], got {value}")]
    NotAFraction { field: &'static str, value: f64 },
}
