//! Built-in tracker variants.

pub mod game;
pub mod piece;
pub mod tile;

pub use game::GameTracker;
pub use piece::PieceTracker;
pub use tile::TileTracker;
