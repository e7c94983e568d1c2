//! Pluggable statistics over chess games.
//!
//! A tracker accumulates one kind of statistic from moves or whole games and
//! can absorb another tracker of the same kind. Trackers run together in a
//! [`TrackerSet`]; the merged results feed the [`heatmap`] generator.

pub mod error;
pub mod heatmap;
pub mod registry;
pub mod tracker_set;
pub mod tracker_trait;
pub mod trackers;

pub use error::{HeatmapError, TrackerError};
pub use tracker_set::{TrackerProfile, TrackerSet};
pub use tracker_trait::{analyze, Profiling, TrackData, Tracker, TrackerKind};
