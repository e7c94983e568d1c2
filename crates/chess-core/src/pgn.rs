//! PGN reading with a lightweight regex-based parser.
//!
//! Games are split out of the input stream one at a time, parsed into headers
//! and SAN tokens, and replayed with shakmaty so every move can be tagged with
//! the identity of the pieces involved.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use shakmaty::{san::San, Chess, Position};

use crate::board::SlotBoard;
use crate::error::SourceError;
use crate::game_data::{Game, GameMetadata, Move};

const STANDARD_START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\[(\w+)\s+"([^"]*)"\]"#).expect("valid regex"));
static HEADER_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]").expect("valid regex"));
static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^}]*\}|;[^\n]*").expect("valid regex"));
static MOVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[KQRBN]?[a-h]?[1-8]?x?[a-h][1-8](?:=[QRBN])?[+#]?|O-O-O|O-O").expect("valid regex")
});

/// Parse the text of a single game. `index` is the 1-based position of the
/// game in its source and only used for error reporting.
pub fn parse_game(pgn: &str, index: u64) -> Result<Game, SourceError> {
    let mut metadata = GameMetadata {
        white: "Unknown".to_string(),
        black: "Unknown".to_string(),
        result: "*".to_string(),
        ..GameMetadata::default()
    };
    let mut setup = None;
    let mut fen = None;

    for cap in HEADER_RE.captures_iter(pgn) {
        let value = cap[2].to_string();
        match &cap[1] {
            "White" => metadata.white = value,
            "Black" => metadata.black = value,
            "Result" => metadata.result = value,
            "Date" => metadata.date = Some(value),
            "TimeControl" => metadata.time_control = Some(value),
            "ECO" => metadata.eco = Some(value),
            "Event" => metadata.event = Some(value),
            "Link" | "Site" => metadata.link = Some(value),
            "SetUp" => setup = Some(value),
            "FEN" => fen = Some(value),
            _ => {}
        }
    }

    if setup.as_deref() == Some("1") && fen.as_deref().is_some_and(|f| f != STANDARD_START_FEN) {
        return Err(SourceError::UnsupportedSetup { game: index });
    }

    let moves = replay(&extract_moves(pgn), index)?;
    Ok(Game { metadata, moves })
}

/// Extract SAN tokens from PGN text (after removing headers, comments, variations).
fn extract_moves(pgn: &str) -> Vec<String> {
    let no_headers = HEADER_LINE_RE.replace_all(pgn, "");
    let no_comments = COMMENT_RE.replace_all(&no_headers, "");
    let no_variations = strip_variations(&no_comments);

    MOVE_RE
        .find_iter(&no_variations)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Drop every parenthesized variation, nested ones included.
fn strip_variations(movetext: &str) -> String {
    let mut depth = 0usize;
    let mut out = String::with_capacity(movetext.len());
    for c in movetext.chars() {
        match c {
            '(' => {
                depth += 1;
                out.push(' ');
            }
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

fn replay(sans: &[String], index: u64) -> Result<Vec<Move>, SourceError> {
    let mut pos = Chess::default();
    let mut board = SlotBoard::new();
    let mut moves = Vec::with_capacity(sans.len());

    for san_str in sans {
        let illegal = || SourceError::IllegalMove {
            game: index,
            san: san_str.clone(),
        };
        let san: San = san_str
            .trim_end_matches(['+', '#'])
            .parse()
            .map_err(|_| SourceError::InvalidSan {
                game: index,
                san: san_str.clone(),
            })?;
        let mv = san.to_move(&pos).map_err(|_| illegal())?;
        let mover = pos.turn();
        let transition = board.apply(&mv).ok_or_else(illegal)?;
        pos.play_unchecked(mv);

        moves.push(Move {
            mover,
            piece: transition.piece,
            captured: transition.captured,
            from: transition.from,
            to: transition.to,
            san: san_str.clone(),
        });
    }

    Ok(moves)
}

/// Streams games out of a PGN source in file order.
pub struct PgnReader<R> {
    reader: R,
    buffer: String,
    in_movetext: bool,
    games_read: u64,
    done: bool,
}

impl PgnReader<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> PgnReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: String::new(),
            in_movetext: false,
            games_read: 0,
            done: false,
        }
    }

    /// Number of game records handed out so far.
    pub fn games_read(&self) -> u64 {
        self.games_read
    }

    fn finish_game(&mut self, text: String) -> Result<Game, SourceError> {
        self.games_read += 1;
        self.in_movetext = false;
        parse_game(&text, self.games_read)
    }
}

impl<R: BufRead> Iterator for PgnReader<R> {
    type Item = Result<Game, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let mut line = String::new();
            match self.reader.read_line(&mut line) {
                Ok(0) => {
                    self.done = true;
                    if self.buffer.trim().is_empty() {
                        return None;
                    }
                    let text = std::mem::take(&mut self.buffer);
                    return Some(self.finish_game(text));
                }
                Ok(_) => {
                    let trimmed = line.trim_start();
                    if trimmed.starts_with('[') && self.in_movetext {
                        let text = std::mem::replace(&mut self.buffer, line);
                        return Some(self.finish_game(text));
                    }
                    if !trimmed.is_empty() && !trimmed.starts_with('[') {
                        self.in_movetext = true;
                    }
                    self.buffer.push_str(&line);
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::{PieceId, PieceSlot};
    use shakmaty::Color;

    const TWO_GAMES: &str = r#"[Event "Casual"]
[White "Player1"]
[Black "Player2"]
[Result "1-0"]

1. e4 e5 2. Nf3 Nc6 3. Bb5 a6 4. Bxc6 dxc6 1-0

[Event "Casual"]
[White "Player3"]
[Black "Player4"]
[Result "1/2-1/2"]

1. d4 {a comment} d5 (1... Nf6) 2. c4 1/2-1/2
"#;

    #[test]
    fn test_parse_game_basic() {
        let pgn = r#"[White "Player1"]
[Black "Player2"]
[Result "1-0"]
[Date "2025.01.15"]
[TimeControl "600"]

1. e4 e5 2. Nf3 Nc6 1-0"#;

        let game = parse_game(pgn, 1).unwrap();
        assert_eq!(game.metadata.white, "Player1");
        assert_eq!(game.metadata.black, "Player2");
        assert_eq!(game.metadata.result, "1-0");
        assert_eq!(game.moves.len(), 4);
        assert_eq!(game.moves[0].san, "e4");
        assert_eq!(game.moves[0].piece, PieceId::Slot(PieceSlot::Pe));
        assert_eq!(game.moves[2].piece, PieceId::Slot(PieceSlot::Ng));
        assert_eq!(game.moves[3].mover, Color::Black);
        assert_eq!(game.moves[3].piece, PieceId::Slot(PieceSlot::Nb));
    }

    #[test]
    fn test_capture_identities() {
        let mut reader = PgnReader::new(TWO_GAMES.as_bytes());
        let game = reader.next().unwrap().unwrap();

        let bxc6 = &game.moves[6];
        assert_eq!(bxc6.mover, Color::White);
        assert_eq!(bxc6.piece, PieceId::Slot(PieceSlot::Bf));
        assert_eq!(bxc6.captured, Some(PieceId::Slot(PieceSlot::Nb)));

        let dxc6 = &game.moves[7];
        assert_eq!(dxc6.mover, Color::Black);
        assert_eq!(dxc6.piece, PieceId::Slot(PieceSlot::Pd));
        assert_eq!(dxc6.captured, Some(PieceId::Slot(PieceSlot::Bf)));
    }

    #[test]
    fn test_reader_splits_games() {
        let games: Vec<_> = PgnReader::new(TWO_GAMES.as_bytes()).collect();
        assert_eq!(games.len(), 2);
        let second = games[1].as_ref().unwrap();
        assert_eq!(second.metadata.white, "Player3");
        // comment and variation are dropped
        assert_eq!(second.moves.len(), 3);
    }

    #[test]
    fn test_castling_moves_king_and_rook() {
        let pgn = "1. e4 e5 2. Nf3 Nc6 3. Bc4 Bc5 4. O-O Nf6 5. Re1 *";
        let game = parse_game(pgn, 1).unwrap();
        let castle = &game.moves[6];
        assert_eq!(castle.piece, PieceId::Slot(PieceSlot::Ke));
        assert_eq!(castle.to.to_string(), "g1");
        // the h-rook now stands on f1 and moves on from there
        assert_eq!(game.moves[8].piece, PieceId::Slot(PieceSlot::Rh));
        assert_eq!(game.moves[8].from.to_string(), "f1");
    }

    #[test]
    fn test_promotion_gets_square_name() {
        let pgn = "1. e4 d5 2. exd5 c6 3. dxc6 Nf6 4. cxb7 Nbd7 5. bxa8=Q *";
        let game = parse_game(pgn, 1).unwrap();
        let promo = game.moves.last().unwrap();
        assert_eq!(promo.piece, PieceId::Slot(PieceSlot::Pe));
        assert_eq!(promo.captured, Some(PieceId::Slot(PieceSlot::Ra)));
        assert!(matches!(
            game.moves.last().map(|m| m.to.to_string()).as_deref(),
            Some("a8")
        ));
    }

    #[test]
    fn test_nested_variations_are_skipped() {
        let pgn = "1. e4 e5 (1... c5 2. Nf3 (2. Nc3 Nc6) 2... d6) 2. Nf3 Nc6 1-0";
        let game = parse_game(pgn, 1).unwrap();
        let sans: Vec<&str> = game.moves.iter().map(|m| m.san.as_str()).collect();
        assert_eq!(sans, vec!["e4", "e5", "Nf3", "Nc6"]);

        let games: Vec<_> = PgnReader::new(format!("[Result \"1-0\"]\n\n{pgn}\n").as_bytes()).collect();
        assert_eq!(games.len(), 1);
        assert!(games[0].is_ok());
    }

    #[test]
    fn test_en_passant_capture_identities() {
        let game = parse_game("1. e4 Nf6 2. e5 d5 3. exd6 cxd6 *", 1).unwrap();
        let ep = &game.moves[4];
        assert_eq!(ep.piece, PieceId::Slot(PieceSlot::Pe));
        assert_eq!(ep.captured, Some(PieceId::Slot(PieceSlot::Pd)));
        assert_eq!(ep.to.to_string(), "d6");

        // the capturing pawn keeps its identity on d6
        let recapture = &game.moves[5];
        assert_eq!(recapture.piece, PieceId::Slot(PieceSlot::Pc));
        assert_eq!(recapture.captured, Some(PieceId::Slot(PieceSlot::Pe)));
    }

    #[test]
    fn test_illegal_move_is_error() {
        let err = parse_game("1. e4 e5 2. Ke3 *", 7).unwrap_err();
        assert!(matches!(err, SourceError::IllegalMove { game: 7, .. }));
    }

    #[test]
    fn test_non_standard_setup_is_error() {
        let pgn = r#"[SetUp "1"]
[FEN "8/8/8/8/8/8/8/K6k w - - 0 1"]

1. Kb2 *"#;
        assert!(matches!(
            parse_game(pgn, 3),
            Err(SourceError::UnsupportedSetup { game: 3 })
        ));
    }
}
