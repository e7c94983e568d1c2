use shakmaty::Color;

use crate::piece::PieceId;
use crate::square::Square;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameMetadata {
    pub white: String,
    pub black: String,
    pub result: String, // "1-0", "0-1", "1/2-1/2", "*"
    pub date: Option<String>,
    pub time_control: Option<String>,
    pub eco: Option<String>,
    pub event: Option<String>,
    pub link: Option<String>,
}

/// Outcome recorded in the `Result` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    WhiteWin,
    BlackWin,
    Draw,
    Unknown,
}

impl GameMetadata {
    pub fn outcome(&self) -> GameResult {
        match self.result.as_str() {
            "1-0" => GameResult::WhiteWin,
            "0-1" => GameResult::BlackWin,
            "1/2-1/2" => GameResult::Draw,
            _ => GameResult::Unknown,
        }
    }
}

/// One ply, with the identities of the pieces involved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    pub mover: Color,
    pub piece: PieceId,
    pub captured: Option<PieceId>,
    pub from: Square,
    pub to: Square,
    pub san: String,
}

impl Move {
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Game {
    pub metadata: GameMetadata,
    pub moves: Vec<Move>,
}
