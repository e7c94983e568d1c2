//! Construct trackers by name.

use crate::error::TrackerError;
use crate::tracker_trait::Tracker;
use crate::trackers::{GameTracker, PieceTracker, TileTracker};

/// Name and description of each built-in tracker.
pub const TRACKER_NAMES: &[(&str, &str)] = &[
    (PieceTracker::NAME, "Captures between starting pieces"),
    (TileTracker::NAME, "Moves and captures per square"),
    (GameTracker::NAME, "Game results and lengths"),
];

/// Create an empty tracker from its name.
pub fn build(name: &str) -> Result<Box<dyn Tracker>, TrackerError> {
    match name {
        PieceTracker::NAME => Ok(Box::new(PieceTracker::new())),
        TileTracker::NAME => Ok(Box::new(TileTracker::new())),
        GameTracker::NAME => Ok(Box::new(GameTracker::new())),
        _ => Err(unknown(name)),
    }
}

/// Restore a tracker from its persisted state.
pub fn load(name: &str, state: serde_json::Value) -> Result<Box<dyn Tracker>, TrackerError> {
    match name {
        PieceTracker::NAME => Ok(Box::new(PieceTracker::from_json(state)?)),
        TileTracker::NAME => Ok(Box::new(TileTracker::from_json(state)?)),
        GameTracker::NAME => Ok(Box::new(GameTracker::from_json(state)?)),
        _ => Err(unknown(name)),
    }
}

fn unknown(name: &str) -> TrackerError {
    let known: Vec<&str> = TRACKER_NAMES.iter().map(|(n, _)| *n).collect();
    TrackerError::Config(format!(
        "unknown tracker '{name}' (expected one of: {})",
        known.join(", ")
    ))
}
