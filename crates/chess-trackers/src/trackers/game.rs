use std::any::Any;

use chess_core::game_data::{Game, GameResult};
use serde::{Deserialize, Serialize};

use crate::error::TrackerError;
use crate::tracker_trait::{same_kind, TrackData, Tracker, TrackerKind};

/// Results and lengths over all games seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameTracker {
    pub games: u64,
    pub white_wins: u64,
    pub black_wins: u64,
    pub draws: u64,
    pub unknown: u64,
    pub plies: u64,
}

impl GameTracker {
    pub const NAME: &'static str = "game";

    pub fn new() -> Self {
        Self::default()
    }

    /// Average number of half-moves per game.
    pub fn avg_plies(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.plies as f64 / self.games as f64
    }

    fn track_game(&mut self, game: &Game) {
        self.games += 1;
        self.plies += game.moves.len() as u64;
        match game.metadata.outcome() {
            GameResult::WhiteWin => self.white_wins += 1,
            GameResult::BlackWin => self.black_wins += 1,
            GameResult::Draw => self.draws += 1,
            GameResult::Unknown => self.unknown += 1,
        }
    }

    pub fn from_json(value: serde_json::Value) -> Result<Self, TrackerError> {
        Ok(serde_json::from_value(value)?)
    }
}

impl Tracker for GameTracker {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn kind(&self) -> TrackerKind {
        TrackerKind::Game
    }

    fn track(&mut self, data: TrackData<'_>) {
        if let TrackData::Game(game) = data {
            self.track_game(game);
        }
    }

    fn merge(&mut self, other: &dyn Tracker) -> Result<(), TrackerError> {
        let other = same_kind(self, other)?;
        self.games += other.games;
        self.white_wins += other.white_wins;
        self.black_wins += other.black_wins;
        self.draws += other.draws;
        self.unknown += other.unknown;
        self.plies += other.plies;
        Ok(())
    }

    fn fresh(&self) -> Box<dyn Tracker> {
        Box::new(Self::new())
    }

    fn to_json(&self) -> Result<serde_json::Value, TrackerError> {
        Ok(serde_json::to_value(self)?)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
