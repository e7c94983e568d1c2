//! Tracker and heatmap error types

use chess_core::square::ParseSquareError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("cannot merge tracker '{found}' into '{expected}'")]
    KindMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("invalid state for tracker '{tracker}': {reason}")]
    InvalidState {
        tracker: &'static str,
        reason: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum HeatmapError {
    #[error("invalid square: {0}")]
    InvalidSquare(#[from] ParseSquareError),
}
