//! Piece identity.
//!
//! Every piece on the starting board is tracked through the game by the slot
//! it started in: `Pa`..`Ph` for pawns, `Ra Nb Bc Qd Ke Bf Ng Rh` for the
//! back rank. Pieces created by promotion have no slot and are named by role
//! and promotion square instead (`Qe8`), so their identifier carries a digit.

use std::fmt;
use std::str::FromStr;

use shakmaty::Role;
use thiserror::Error;

use crate::square::Square;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid piece identifier '{0}'")]
pub struct ParsePieceIdError(pub String);

/// One of the 16 starting slots of a side. Pawns come first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceSlot {
    Pa,
    Pb,
    Pc,
    Pd,
    Pe,
    Pf,
    Pg,
    Ph,
    Ra,
    Nb,
    Bc,
    Qd,
    Ke,
    Bf,
    Ng,
    Rh,
}

impl PieceSlot {
    pub const COUNT: usize = 16;

    pub const ALL: [PieceSlot; 16] = [
        PieceSlot::Pa,
        PieceSlot::Pb,
        PieceSlot::Pc,
        PieceSlot::Pd,
        PieceSlot::Pe,
        PieceSlot::Pf,
        PieceSlot::Pg,
        PieceSlot::Ph,
        PieceSlot::Ra,
        PieceSlot::Nb,
        PieceSlot::Bc,
        PieceSlot::Qd,
        PieceSlot::Ke,
        PieceSlot::Bf,
        PieceSlot::Ng,
        PieceSlot::Rh,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn is_pawn(self) -> bool {
        self.index() < 8
    }

    /// File (0 = a) the slot starts on.
    pub fn file(self) -> u8 {
        (self.index() % 8) as u8
    }

    pub fn role(self) -> Role {
        match self {
            PieceSlot::Ra | PieceSlot::Rh => Role::Rook,
            PieceSlot::Nb | PieceSlot::Ng => Role::Knight,
            PieceSlot::Bc | PieceSlot::Bf => Role::Bishop,
            PieceSlot::Qd => Role::Queen,
            PieceSlot::Ke => Role::King,
            _ => Role::Pawn,
        }
    }

    /// Slot of the back-rank piece starting on `file`.
    pub fn back_rank(file: u8) -> Option<Self> {
        Self::from_index(8 + file as usize).filter(|_| file < 8)
    }

    /// Slot of the pawn starting on `file`.
    pub fn pawn(file: u8) -> Option<Self> {
        Self::from_index(file as usize).filter(|_| file < 8)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PieceSlot::Pa => "Pa",
            PieceSlot::Pb => "Pb",
            PieceSlot::Pc => "Pc",
            PieceSlot::Pd => "Pd",
            PieceSlot::Pe => "Pe",
            PieceSlot::Pf => "Pf",
            PieceSlot::Pg => "Pg",
            PieceSlot::Ph => "Ph",
            PieceSlot::Ra => "Ra",
            PieceSlot::Nb => "Nb",
            PieceSlot::Bc => "Bc",
            PieceSlot::Qd => "Qd",
            PieceSlot::Ke => "Ke",
            PieceSlot::Bf => "Bf",
            PieceSlot::Ng => "Ng",
            PieceSlot::Rh => "Rh",
        }
    }
}

impl fmt::Display for PieceSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PieceSlot {
    type Err = ParsePieceIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|slot| slot.as_str() == s)
            .ok_or_else(|| ParsePieceIdError(s.to_string()))
    }
}

/// Identifier of the piece that made or suffered a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceId {
    /// A piece still known by its starting slot.
    Slot(PieceSlot),
    /// A piece created by promotion on `square`.
    Promoted { role: Role, square: Square },
}

impl PieceId {
    /// The starting slot, if this is a named piece.
    ///
    /// Equivalent to the textual rule "the identifier contains no digit":
    /// slot names never carry one and promoted names always do.
    pub fn slot(self) -> Option<PieceSlot> {
        match self {
            PieceId::Slot(slot) => Some(slot),
            PieceId::Promoted { .. } => None,
        }
    }

    pub fn role(self) -> Role {
        match self {
            PieceId::Slot(slot) => slot.role(),
            PieceId::Promoted { role, .. } => role,
        }
    }
}

impl From<PieceSlot> for PieceId {
    fn from(slot: PieceSlot) -> Self {
        PieceId::Slot(slot)
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PieceId::Slot(slot) => f.write_str(slot.as_str()),
            PieceId::Promoted { role, square } => {
                write!(f, "{}{}", role.upper_char(), square)
            }
        }
    }
}

impl FromStr for PieceId {
    type Err = ParsePieceIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParsePieceIdError(s.to_string());
        if !s.chars().any(|c| c.is_ascii_digit()) {
            return s.parse::<PieceSlot>().map(PieceId::Slot);
        }
        let mut chars = s.chars();
        let role = chars
            .next()
            .and_then(|c| Role::from_char(c.to_ascii_lowercase()))
            .ok_or_else(err)?;
        let square = chars.as_str().parse::<Square>().map_err(|_| err())?;
        Ok(PieceId::Promoted { role, square })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_order_and_roles() {
        assert_eq!(PieceSlot::ALL.len(), PieceSlot::COUNT);
        for (i, slot) in PieceSlot::ALL.iter().enumerate() {
            assert_eq!(slot.index(), i);
            assert_eq!(slot.as_str().parse::<PieceSlot>(), Ok(*slot));
        }
        assert_eq!(PieceSlot::Ke.role(), Role::King);
        assert_eq!(PieceSlot::Pc.role(), Role::Pawn);
        assert_eq!(PieceSlot::back_rank(6), Some(PieceSlot::Ng));
        assert_eq!(PieceSlot::pawn(7), Some(PieceSlot::Ph));
        assert_eq!(PieceSlot::back_rank(8), None);
    }

    #[test]
    fn test_piece_id_digit_rule() {
        let named: PieceId = "Bc".parse().unwrap();
        assert_eq!(named.slot(), Some(PieceSlot::Bc));

        let promoted: PieceId = "Qe8".parse().unwrap();
        assert_eq!(promoted.slot(), None);
        assert_eq!(promoted.role(), Role::Queen);
        assert_eq!(promoted.to_string(), "Qe8");

        assert!("Xx".parse::<PieceId>().is_err());
        assert!("Q9".parse::<PieceId>().is_err());
    }
}
