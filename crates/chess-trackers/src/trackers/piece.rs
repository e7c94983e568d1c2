use std::any::Any;
use std::collections::BTreeMap;

use chess_core::game_data::Move;
use chess_core::piece::PieceSlot;
use serde::{Deserialize, Serialize};
use shakmaty::Color;

use crate::error::TrackerError;
use crate::tracker_trait::{same_kind, TrackData, Tracker, TrackerKind};

/// `matrix[taker][taken]`, indexed by [`PieceSlot::index`].
pub type CaptureMatrix = [[u64; PieceSlot::COUNT]; PieceSlot::COUNT];

/// Counts which starting piece captured which, per color.
///
/// Only captures between two named pieces count. A promoted piece, on either
/// side of the capture, is skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceTracker {
    white: CaptureMatrix,
    black: CaptureMatrix,
}

/// Persisted form: color -> taker -> taken -> count.
#[derive(Serialize, Deserialize)]
struct PieceTrackerState {
    w: BTreeMap<String, BTreeMap<String, u64>>,
    b: BTreeMap<String, BTreeMap<String, u64>>,
}

impl Default for PieceTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceTracker {
    pub const NAME: &'static str = "piece";

    pub fn new() -> Self {
        Self {
            white: [[0; PieceSlot::COUNT]; PieceSlot::COUNT],
            black: [[0; PieceSlot::COUNT]; PieceSlot::COUNT],
        }
    }

    pub fn matrix(&self, color: Color) -> &CaptureMatrix {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    fn matrix_mut(&mut self, color: Color) -> &mut CaptureMatrix {
        match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }

    /// How often `taker` of `color` captured the opposing `taken`.
    pub fn captures(&self, color: Color, taker: PieceSlot, taken: PieceSlot) -> u64 {
        self.matrix(color)[taker.index()][taken.index()]
    }

    /// Total number of counted captures for both colors.
    pub fn total(&self) -> u64 {
        [&self.white, &self.black]
            .into_iter()
            .flatten()
            .flatten()
            .sum()
    }

    fn track_move(&mut self, mv: &Move) {
        let Some(captured) = mv.captured else {
            return;
        };
        let (Some(taker), Some(taken)) = (mv.piece.slot(), captured.slot()) else {
            return;
        };
        self.matrix_mut(mv.mover)[taker.index()][taken.index()] += 1;
    }

    pub fn from_json(value: serde_json::Value) -> Result<Self, TrackerError> {
        let state: PieceTrackerState = serde_json::from_value(value)?;
        let mut tracker = Self::new();
        load_matrix(&state.w, &mut tracker.white)?;
        load_matrix(&state.b, &mut tracker.black)?;
        Ok(tracker)
    }
}

fn dump_matrix(matrix: &CaptureMatrix) -> BTreeMap<String, BTreeMap<String, u64>> {
    PieceSlot::ALL
        .iter()
        .map(|taker| {
            let row = PieceSlot::ALL
                .iter()
                .map(|taken| (taken.to_string(), matrix[taker.index()][taken.index()]))
                .collect();
            (taker.to_string(), row)
        })
        .collect()
}

fn load_matrix(
    rows: &BTreeMap<String, BTreeMap<String, u64>>,
    matrix: &mut CaptureMatrix,
) -> Result<(), TrackerError> {
    let invalid = |reason: String| TrackerError::InvalidState {
        tracker: PieceTracker::NAME,
        reason,
    };
    for (taker, row) in rows {
        let taker: PieceSlot = taker.parse().map_err(|e| invalid(format!("{e}")))?;
        for (taken, count) in row {
            let taken: PieceSlot = taken.parse().map_err(|e| invalid(format!("{e}")))?;
            matrix[taker.index()][taken.index()] = *count;
        }
    }
    Ok(())
}

impl Tracker for PieceTracker {
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
        for (mine, theirs) in [(&mut self.white, &other.white), (&mut self.black, &other.black)] {
            for (row, other_row) in mine.iter_mut().zip(theirs.iter()) {
                for (cell, other_cell) in row.iter_mut().zip(other_row.iter()) {
                    *cell += other_cell;
                }
            }
        }
        Ok(())
    }

    fn fresh(&self) -> Box<dyn Tracker> {
        Box::new(Self::new())
    }

    fn to_json(&self) -> Result<serde_json::Value, TrackerError> {
        let state = PieceTrackerState {
            w: dump_matrix(&self.white),
            b: dump_matrix(&self.black),
        };
        Ok(serde_json::to_value(state)?)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
