//! Batch run error types

use chess_core::error::SourceError;
use chess_trackers::error::TrackerError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Tracker error: {0}")]
    Tracker(#[from] TrackerError),

    #[error("Worker {worker} failed: {message}")]
    Worker { worker: usize, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
