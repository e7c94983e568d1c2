#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use chess_core::error::SourceError;
use chess_core::game_data::Game;
use chess_core::pgn::parse_game;
use chess_trackers::{Profiling, TrackerSet};

/// Short legal games covering castling, en passant and promotion.
pub const FIXTURES: [&str; 6] = [
    r#"[Event "Scholar"]
[White "alice"]
[Black "bob"]
[Result "1-0"]

1. e4 e5 2. Bc4 Nc6 3. Qh5 Nf6 4. Qxf7# 1-0
"#,
    r#"[Event "Exchange"]
[White "carol"]
[Black "dave"]
[Result "1/2-1/2"]

1. e4 e5 2. Nf3 Nc6 3. Bb5 a6 4. Bxc6 dxc6 5. O-O f6 6. d4 exd4
7. Nxd4 c5 8. Nb3 Qxd1 9. Rxd1 1/2-1/2
"#,
    r#"[Event "Fool"]
[White "erin"]
[Black "frank"]
[Result "0-1"]

1. f3 e5 2. g4 Qh4# 0-1
"#,
    r#"[Event "Passant"]
[White "gina"]
[Black "hal"]
[Result "1/2-1/2"]

1. e4 Nf6 2. e5 d5 3. exd6 cxd6 4. Nf3 g6 1/2-1/2
"#,
    r#"[Event "Promotion"]
[White "ivan"]
[Black "judy"]
[Result "1-0"]

1. h4 g5 2. hxg5 h6 3. gxh6 Bg7 4. hxg7 Nf6 5. gxh8=Q+ Ng8 6. Qxg8+ 1-0
"#,
    r#"[Event "Unfinished"]
[White "kim"]
[Black "lee"]
[Result "*"]

1. d4 d5 2. c4 dxc4 3. e3 b5 4. a4 c6 5. axb5 cxb5 *
"#,
];

/// `n` games cycling through the fixtures, as a reader would yield them.
pub fn games(n: usize) -> Vec<Result<Game, SourceError>> {
    (0..n)
        .map(|i| parse_game(FIXTURES[i % FIXTURES.len()], i as u64 + 1))
        .collect()
}

/// PGN text of `n` games cycling through the fixtures.
pub fn pgn_text(n: usize) -> String {
    (0..n)
        .map(|i| FIXTURES[i % FIXTURES.len()])
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write `n` games to a fresh file in the temp directory.
pub fn write_pgn(n: usize) -> PathBuf {
    static NEXT: AtomicU64 = AtomicU64::new(0);
    let path = std::env::temp_dir().join(format!(
        "chessalyzer-{}-{}.pgn",
        std::process::id(),
        NEXT.fetch_add(1, Ordering::Relaxed)
    ));
    std::fs::write(&path, pgn_text(n)).unwrap();
    path
}

pub fn all_trackers() -> TrackerSet {
    TrackerSet::from_names(&["piece", "tile", "game"], Profiling::Disabled).unwrap()
}
