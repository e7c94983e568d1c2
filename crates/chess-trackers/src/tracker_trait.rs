//! Base trait and types for trackers.

use std::any::Any;
use std::time::{Duration, Instant};

use chess_core::game_data::{Game, Move};

use crate::error::TrackerError;

/// What a tracker is fed: every move, or every game once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerKind {
    Move,
    Game,
}

/// Data handed to [`Tracker::track`]. The variant matches the tracker's kind.
#[derive(Debug, Clone, Copy)]
pub enum TrackData<'a> {
    Move(&'a Move),
    Game(&'a Game),
}

/// Whether [`analyze`] measures the time spent in `track`. Fixed when a
/// tracker set is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Profiling {
    #[default]
    Disabled,
    Enabled,
}

/// Trait that all trackers implement.
///
/// `merge` must be commutative and associative over instances of the same
/// concrete type: partial results from any number of workers are folded with
/// it in whatever order they arrive.
pub trait Tracker: Send + 'static {
    /// Name used as registry key and in persisted data.
    fn name(&self) -> &'static str;

    fn kind(&self) -> TrackerKind;

    /// Update statistics from one move or one game.
    fn track(&mut self, data: TrackData<'_>);

    /// Add the statistics of `other` into `self`.
    fn merge(&mut self, other: &dyn Tracker) -> Result<(), TrackerError>;

    /// A zeroed tracker of the same type.
    fn fresh(&self) -> Box<dyn Tracker>;

    /// Plain nested-map form of the state, for persistence.
    fn to_json(&self) -> Result<serde_json::Value, TrackerError>;

    fn as_any(&self) -> &dyn Any;
}

/// Downcast `other` to the concrete type of the tracker merging it.
pub fn same_kind<'a, T: Tracker>(
    this: &T,
    other: &'a dyn Tracker,
) -> Result<&'a T, TrackerError> {
    other
        .as_any()
        .downcast_ref::<T>()
        .ok_or(TrackerError::KindMismatch {
            expected: this.name(),
            found: other.name(),
        })
}

/// Run `track` and report how long it took.
///
/// With profiling disabled the clock is never read and the result is zero.
pub fn analyze(tracker: &mut dyn Tracker, data: TrackData<'_>, profiling: Profiling) -> Duration {
    match profiling {
        Profiling::Disabled => {
            tracker.track(data);
            Duration::ZERO
        }
        Profiling::Enabled => {
            let start = Instant::now();
            tracker.track(data);
            start.elapsed()
        }
    }
}
