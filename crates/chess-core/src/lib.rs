//! Game records consumed by the trackers, and the PGN reader that produces them.

pub mod board;
pub mod error;
pub mod game_data;
pub mod pgn;
pub mod piece;
pub mod square;

pub use board::{get_starting_piece, StartingPiece};
pub use error::SourceError;
pub use game_data::{Game, GameMetadata, GameResult, Move};
pub use piece::{PieceId, PieceSlot};
pub use square::{Square, SquareSelector};
