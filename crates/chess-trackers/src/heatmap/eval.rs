//! Evaluation functions for the built-in trackers.

use chess_core::board::get_starting_piece;
use chess_core::square::Square;
use shakmaty::Color;

use crate::trackers::{PieceTracker, TileTracker};

/// How often the piece starting on `reference` captured the piece starting
/// on `tile`. Tiles without an opposing starting piece are zero.
pub fn piece_captures(data: &PieceTracker, tile: Square, reference: Square, _: &()) -> f64 {
    match (get_starting_piece(reference), get_starting_piece(tile)) {
        (Some(taker), Some(taken)) if taker.color != taken.color => {
            data.captures(taker.color, taker.slot, taken.slot) as f64
        }
        _ => 0.0,
    }
}

/// How often the piece starting on `tile` captured the piece starting on
/// `reference`.
pub fn piece_captured_by(data: &PieceTracker, tile: Square, reference: Square, _: &()) -> f64 {
    piece_captures(data, reference, tile, &())
}

/// Moves by `color` that ended on `tile`.
pub fn tile_moves(data: &TileTracker, tile: Square, _reference: Square, color: &Color) -> f64 {
    data.moves_to(*color, tile) as f64
}

/// Captures by `color` made on `tile`.
pub fn tile_captures(data: &TileTracker, tile: Square, _reference: Square, color: &Color) -> f64 {
    data.captures_on(*color, tile) as f64
}
