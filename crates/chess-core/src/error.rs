//! Source reader error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("game {game}: invalid SAN '{san}'")]
    InvalidSan { game: u64, san: String },

    #[error("game {game}: illegal move '{san}'")]
    IllegalMove { game: u64, san: String },

    #[error("game {game}: non-standard starting position")]
    UnsupportedSetup { game: u64 },
}
