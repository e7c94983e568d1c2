//! Starting position lookup and slot bookkeeping during replay.

use shakmaty::{Color, Role};

use crate::piece::{PieceId, PieceSlot};
use crate::square::Square;

/// The piece standing on a square in the initial position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartingPiece {
    pub color: Color,
    pub slot: PieceSlot,
}

impl StartingPiece {
    pub fn role(&self) -> Role {
        self.slot.role()
    }
}

/// Which piece starts on `square`. Ranks 3 to 6 are empty.
pub fn get_starting_piece(square: Square) -> Option<StartingPiece> {
    let file = square.file();
    let (color, slot) = match square.rank() {
        0 => (Color::White, PieceSlot::back_rank(file)?),
        1 => (Color::White, PieceSlot::pawn(file)?),
        6 => (Color::Black, PieceSlot::pawn(file)?),
        7 => (Color::Black, PieceSlot::back_rank(file)?),
        _ => return None,
    };
    Some(StartingPiece { color, slot })
}

/// Where the pieces of a move came from and went to, by identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Transition {
    pub piece: PieceId,
    pub captured: Option<PieceId>,
    pub from: Square,
    pub to: Square,
}

/// Identity of every occupied square, kept in step with a shakmaty position.
pub(crate) struct SlotBoard {
    squares: [Option<PieceId>; 64],
}

impl SlotBoard {
    pub fn new() -> Self {
        let mut squares = [None; 64];
        for sq in Square::all() {
            if let Some(start) = get_starting_piece(sq) {
                squares[sq.index()] = Some(PieceId::Slot(start.slot));
            }
        }
        Self { squares }
    }

    fn take(&mut self, sq: Square) -> Option<PieceId> {
        self.squares[sq.index()].take()
    }

    fn put(&mut self, sq: Square, piece: PieceId) {
        self.squares[sq.index()] = Some(piece);
    }

    /// Apply a legal move. Returns `None` if the board has no piece on the
    /// origin square, which means it fell out of step with the position.
    pub fn apply(&mut self, mv: &shakmaty::Move) -> Option<Transition> {
        match mv {
            shakmaty::Move::Normal {
                from, to, promotion, ..
            } => {
                let from = Square::from(*from);
                let to = Square::from(*to);
                let piece = self.take(from)?;
                let captured = self.take(to);
                let placed = match promotion {
                    Some(role) => PieceId::Promoted {
                        role: *role,
                        square: to,
                    },
                    None => piece,
                };
                self.put(to, placed);
                Some(Transition {
                    piece,
                    captured,
                    from,
                    to,
                })
            }
            shakmaty::Move::EnPassant { from, to } => {
                let from = Square::from(*from);
                let to = Square::from(*to);
                let piece = self.take(from)?;
                let victim = Square::new(to.file(), from.rank())?;
                let captured = self.take(victim);
                self.put(to, piece);
                Some(Transition {
                    piece,
                    captured,
                    from,
                    to,
                })
            }
            shakmaty::Move::Castle { king, rook } => {
                let king = Square::from(*king);
                let rook = Square::from(*rook);
                let (king_file, rook_file) = if rook.file() > king.file() {
                    (6, 5)
                } else {
                    (2, 3)
                };
                let king_to = Square::new(king_file, king.rank())?;
                let rook_to = Square::new(rook_file, rook.rank())?;
                let king_id = self.take(king)?;
                let rook_id = self.take(rook)?;
                self.put(king_to, king_id);
                self.put(rook_to, rook_id);
                Some(Transition {
                    piece: king_id,
                    captured: None,
                    from: king,
                    to: king_to,
                })
            }
            shakmaty::Move::Put { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_starting_kings() {
        let white = get_starting_piece(sq("e1")).unwrap();
        assert_eq!(white.color, Color::White);
        assert_eq!(white.role(), Role::King);

        let black = get_starting_piece(sq("e8")).unwrap();
        assert_eq!(black.color, Color::Black);
        assert_eq!(black.role(), Role::King);
    }

    #[test]
    fn test_starting_pawns_and_empty_ranks() {
        let pawn = get_starting_piece(sq("c7")).unwrap();
        assert_eq!(pawn.color, Color::Black);
        assert_eq!(pawn.slot, PieceSlot::Pc);
        assert_eq!(get_starting_piece(sq("g1")).unwrap().slot, PieceSlot::Ng);
        assert_eq!(get_starting_piece(sq("d4")), None);
        assert_eq!(get_starting_piece(sq("a6")), None);
    }

    #[test]
    fn test_slot_board_counts() {
        let board = SlotBoard::new();
        assert_eq!(board.squares.iter().flatten().count(), 32);
    }
}
