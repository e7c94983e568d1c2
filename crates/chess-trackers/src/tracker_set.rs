//! A group of trackers run together over the same games.

use std::collections::HashSet;
use std::time::Duration;

use chess_core::game_data::Game;

use crate::error::TrackerError;
use crate::registry;
use crate::tracker_trait::{analyze, Profiling, TrackData, Tracker, TrackerKind};

struct TrackerEntry {
    tracker: Box<dyn Tracker>,
    elapsed: Duration,
}

/// Time spent inside one tracker's updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerProfile {
    pub name: &'static str,
    pub elapsed: Duration,
}

/// Trackers of distinct types, fed move by move (or game by game).
///
/// Each worker owns its own set; partial sets are combined with
/// [`TrackerSet::merge`] once all work is done.
pub struct TrackerSet {
    entries: Vec<TrackerEntry>,
    profiling: Profiling,
}

impl TrackerSet {
    /// Validate and wrap `trackers`. Fails if the list is empty, a tracker has
    /// no name, or two trackers share a name.
    pub fn new(trackers: Vec<Box<dyn Tracker>>, profiling: Profiling) -> Result<Self, TrackerError> {
        if trackers.is_empty() {
            return Err(TrackerError::Config("no trackers given".to_string()));
        }
        let mut seen = HashSet::new();
        for tracker in &trackers {
            let name = tracker.name();
            if name.is_empty() {
                return Err(TrackerError::Config("tracker without a name".to_string()));
            }
            if !seen.insert(name) {
                return Err(TrackerError::Config(format!("tracker '{name}' given twice")));
            }
        }
        let entries = trackers
            .into_iter()
            .map(|tracker| TrackerEntry {
                tracker,
                elapsed: Duration::ZERO,
            })
            .collect();
        Ok(Self { entries, profiling })
    }

    /// Build a set from registry names, e.g. `["piece", "game"]`.
    pub fn from_names<S: AsRef<str>>(names: &[S], profiling: Profiling) -> Result<Self, TrackerError> {
        let trackers = names
            .iter()
            .map(|name| registry::build(name.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(trackers, profiling)
    }

    pub fn profiling(&self) -> Profiling {
        self.profiling
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Empty trackers of the same types, in the same order.
    pub fn fresh(&self) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .map(|entry| TrackerEntry {
                    tracker: entry.tracker.fresh(),
                    elapsed: Duration::ZERO,
                })
                .collect(),
            profiling: self.profiling,
        }
    }

    /// Feed every move of `game` to the move trackers, then the game itself to
    /// the game trackers.
    pub fn process_game(&mut self, game: &Game) {
        let profiling = self.profiling;
        for mv in &game.moves {
            for entry in &mut self.entries {
                if entry.tracker.kind() == TrackerKind::Move {
                    entry.elapsed += analyze(entry.tracker.as_mut(), TrackData::Move(mv), profiling);
                }
            }
        }
        for entry in &mut self.entries {
            if entry.tracker.kind() == TrackerKind::Game {
                entry.elapsed += analyze(entry.tracker.as_mut(), TrackData::Game(game), profiling);
            }
        }
    }

    /// Fold `other` into `self`. Both sets must hold the same tracker types in
    /// the same order, which holds for sets made with [`TrackerSet::fresh`].
    pub fn merge(&mut self, other: TrackerSet) -> Result<(), TrackerError> {
        if self.entries.len() != other.entries.len() {
            return Err(TrackerError::Config(format!(
                "cannot merge a set of {} trackers into a set of {}",
                other.entries.len(),
                self.entries.len()
            )));
        }
        for (entry, theirs) in self.entries.iter_mut().zip(other.entries) {
            entry.tracker.merge(theirs.tracker.as_ref())?;
            entry.elapsed += theirs.elapsed;
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Tracker> {
        self.entries.iter().map(|entry| entry.tracker.as_ref())
    }

    pub fn by_name(&self, name: &str) -> Option<&dyn Tracker> {
        self.iter().find(|tracker| tracker.name() == name)
    }

    /// The tracker of concrete type `T`, if the set holds one.
    pub fn get<T: Tracker>(&self) -> Option<&T> {
        self.iter().find_map(|tracker| tracker.as_any().downcast_ref::<T>())
    }

    pub fn profile(&self) -> Vec<TrackerProfile> {
        self.entries
            .iter()
            .map(|entry| TrackerProfile {
                name: entry.tracker.name(),
                elapsed: entry.elapsed,
            })
            .collect()
    }
}
