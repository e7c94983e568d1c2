//! Board coordinates.
//!
//! A [`Square`] is the canonical `(file, rank)` pair, both in `0..8`, where
//! file 0 is the a-file and rank 0 is the first rank. The algebraic form
//! (`"e4"`) maps onto it one-to-one.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseSquareError {
    #[error("square '{0}' is not in algebraic notation")]
    Notation(String),

    #[error("coordinates ({file}, {rank}) are off the board")]
    OutOfRange { file: i64, rank: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    /// Build a square from 0-based coordinates. Returns `None` off the board.
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        (file < 8 && rank < 8).then_some(Self { file, rank })
    }

    /// Square from a 0..64 index (a1 = 0, b1 = 1, ..., h8 = 63).
    pub fn from_index(index: usize) -> Option<Self> {
        (index < 64).then(|| Self {
            file: (index % 8) as u8,
            rank: (index / 8) as u8,
        })
    }

    pub fn file(self) -> u8 {
        self.file
    }

    pub fn rank(self) -> u8 {
        self.rank
    }

    pub fn index(self) -> usize {
        self.file as usize + self.rank as usize * 8
    }

    /// All 64 squares, a1 first, rank by rank.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64).filter_map(Square::from_index)
    }

    pub fn file_char(self) -> char {
        (b'a' + self.file) as char
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank + 1)
    }
}

impl FromStr for Square {
    type Err = ParseSquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(ParseSquareError::Notation(s.to_string()));
        }
        let file = bytes[0].to_ascii_lowercase();
        let rank = bytes[1];
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return Err(ParseSquareError::Notation(s.to_string()));
        }
        Ok(Self {
            file: file - b'a',
            rank: rank - b'1',
        })
    }
}

impl From<shakmaty::Square> for Square {
    fn from(sq: shakmaty::Square) -> Self {
        Self {
            file: sq.file() as u8,
            rank: sq.rank() as u8,
        }
    }
}

/// Ways a caller may name a square: `"a2"` or `[file, rank]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SquareSelector {
    Algebraic(String),
    Coords(i64, i64),
}

impl SquareSelector {
    pub fn resolve(&self) -> Result<Square, ParseSquareError> {
        match self {
            SquareSelector::Algebraic(s) => s.parse(),
            SquareSelector::Coords(file, rank) => {
                let out_of_range = ParseSquareError::OutOfRange {
                    file: *file,
                    rank: *rank,
                };
                let file = u8::try_from(*file).map_err(|_| out_of_range.clone())?;
                let rank = u8::try_from(*rank).map_err(|_| out_of_range.clone())?;
                Square::new(file, rank).ok_or(out_of_range)
            }
        }
    }
}

impl From<&str> for SquareSelector {
    fn from(s: &str) -> Self {
        SquareSelector::Algebraic(s.to_string())
    }
}

impl From<String> for SquareSelector {
    fn from(s: String) -> Self {
        SquareSelector::Algebraic(s)
    }
}

impl From<[i64; 2]> for SquareSelector {
    fn from([file, rank]: [i64; 2]) -> Self {
        SquareSelector::Coords(file, rank)
    }
}

impl From<Square> for SquareSelector {
    fn from(sq: Square) -> Self {
        SquareSelector::Coords(sq.file as i64, sq.rank as i64)
    }
}
