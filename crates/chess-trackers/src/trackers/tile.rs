use std::any::Any;
use std::collections::BTreeMap;

use chess_core::game_data::Move;
use chess_core::square::Square;
use serde::{Deserialize, Serialize};
use shakmaty::Color;

use crate::error::TrackerError;
use crate::tracker_trait::{same_kind, TrackData, Tracker, TrackerKind};

#[derive(Debug, Clone, PartialEq, Eq)]
struct TileCounts {
    moves_to: [u64; 64],
    captures_on: [u64; 64],
}

impl TileCounts {
    fn new() -> Self {
        Self {
            moves_to: [0; 64],
            captures_on: [0; 64],
        }
    }

    fn add(&mut self, other: &TileCounts) {
        for (cell, n) in self.moves_to.iter_mut().zip(other.moves_to.iter()) {
            *cell += n;
        }
        for (cell, n) in self.captures_on.iter_mut().zip(other.captures_on.iter()) {
            *cell += n;
        }
    }
}

#[derive(Serialize, Deserialize)]
struct TileCountsState {
    moves: BTreeMap<String, u64>,
    captures: BTreeMap<String, u64>,
}

#[derive(Serialize, Deserialize)]
struct TileTrackerState {
    w: TileCountsState,
    b: TileCountsState,
}

impl From<&TileCounts> for TileCountsState {
    fn from(counts: &TileCounts) -> Self {
        let dump = |cells: &[u64; 64]| -> BTreeMap<String, u64> {
            Square::all()
                .map(|sq| (sq.to_string(), cells[sq.index()]))
                .collect()
        };
        Self {
            moves: dump(&counts.moves_to),
            captures: dump(&counts.captures_on),
        }
    }
}

impl TryFrom<TileCountsState> for TileCounts {
    type Error = TrackerError;

    fn try_from(state: TileCountsState) -> Result<Self, Self::Error> {
        let mut counts = TileCounts::new();
        for (cells, entries) in [
            (&mut counts.moves_to, state.moves),
            (&mut counts.captures_on, state.captures),
        ] {
            for (square, n) in entries {
                let sq: Square = square.parse().map_err(|e| TrackerError::InvalidState {
                    tracker: TileTracker::NAME,
                    reason: format!("{e}"),
                })?;
                cells[sq.index()] = n;
            }
        }
        Ok(counts)
    }
}

/// Per-square activity: where each color's pieces landed and where they
/// captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileTracker {
    white: TileCounts,
    black: TileCounts,
}

impl Default for TileTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl TileTracker {
    pub const NAME: &'static str = "tile";

    pub fn new() -> Self {
        Self {
            white: TileCounts::new(),
            black: TileCounts::new(),
        }
    }

    fn counts(&self, color: Color) -> &TileCounts {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    /// Moves by `color` that ended on `square`.
    pub fn moves_to(&self, color: Color, square: Square) -> u64 {
        self.counts(color).moves_to[square.index()]
    }

    /// Captures by `color` made on `square`.
    pub fn captures_on(&self, color: Color, square: Square) -> u64 {
        self.counts(color).captures_on[square.index()]
    }

    fn track_move(&mut self, mv: &Move) {
        let counts = match mv.mover {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        };
        counts.moves_to[mv.to.index()] += 1;
        if mv.is_capture() {
            counts.captures_on[mv.to.index()] += 1;
        }
    }

    pub fn from_json(value: serde_json::Value) -> Result<Self, TrackerError> {
        let state: TileTrackerState = serde_json::from_value(value)?;
        Ok(Self {
            white: state.w.try_into()?,
            black: state.b.try_into()?,
        })
    }
}

impl Tracker for TileTracker {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn kind(&self) -> TrackerKind {
        TrackerKind::Move
    }

    fn track(&mut self, data: TrackData<'_>) {
        if let TrackData::Move(mv) = data {
            self.track_move(mv);
        }
    }

    fn merge(&mut self, other: &dyn Tracker) -> Result<(), TrackerError> {
        let other = same_kind(self, other)?;
        self.white.add(&other.white);
        self.black.add(&other.black);
        Ok(())
    }

    fn fresh(&self) -> Box<dyn Tracker> {
        Box::new(Self::new())
    }

    fn to_json(&self) -> Result<serde_json::Value, TrackerError> {
        let state = TileTrackerState {
            w: (&self.white).into(),
            b: (&self.black).into(),
        };
        Ok(serde_json::to_value(state)?)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(mover: Color, to: &str, captured: Option<&str>) -> Move {
        Move {
            mover,
            piece: "Ng".parse().unwrap(),
            captured: captured.map(|c| c.parse().unwrap()),
            from: "g1".parse().unwrap(),
            to: to.parse().unwrap(),
            san: String::new(),
        }
    }

    #[test]
    fn test_counts_moves_and_captures() {
        let mut tracker = TileTracker::new();
        let f3: Square = "f3".parse().unwrap();
        tracker.track(TrackData::Move(&mv(Color::White, "f3", None)));
        tracker.track(TrackData::Move(&mv(Color::White, "f3", Some("Pe"))));
        tracker.track(TrackData::Move(&mv(Color::Black, "f3", None)));

        assert_eq!(tracker.moves_to(Color::White, f3), 2);
        assert_eq!(tracker.captures_on(Color::White, f3), 1);
        assert_eq!(tracker.moves_to(Color::Black, f3), 1);
        assert_eq!(tracker.captures_on(Color::Black, f3), 0);
    }

    #[test]
    fn test_json_round_trip() {
        let mut tracker = TileTracker::new();
        tracker.track(TrackData::Move(&mv(Color::Black, "e5", Some("Pd"))));
        let json = tracker.to_json().unwrap();
        assert_eq!(json["b"]["captures"]["e5"], 1);
        assert_eq!(TileTracker::from_json(json).unwrap(), tracker);
    }
}
