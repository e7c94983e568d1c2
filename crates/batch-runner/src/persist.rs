//! Saving tracker results to disk and loading them back.
//!
//! The file is a JSON object keyed by tracker name, each value holding that
//! tracker's own state.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use chess_trackers::{registry, Profiling, TrackerSet};
use serde_json::{Map, Value};
use tracing::info;

use crate::error::RunError;

/// Serialize every tracker in `trackers` into one JSON document.
pub fn to_document(trackers: &TrackerSet) -> Result<Value, RunError> {
    let mut doc = Map::new();
    for tracker in trackers.iter() {
        doc.insert(tracker.name().to_string(), tracker.to_json()?);
    }
    Ok(Value::Object(doc))
}

/// Rebuild a tracker set from a document written by [`to_document`].
pub fn from_document(doc: Value, profiling: Profiling) -> Result<TrackerSet, RunError> {
    let Value::Object(doc) = doc else {
        return Err(RunError::Config("saved data must be a JSON object".into()));
    };
    let trackers = doc
        .into_iter()
        .map(|(name, state)| registry::load(&name, state))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(TrackerSet::new(trackers, profiling)?)
}

pub fn save_data<P: AsRef<Path>>(path: P, trackers: &TrackerSet) -> Result<(), RunError> {
    let path = path.as_ref();
    let doc = to_document(trackers)?;
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, &doc)?;
    writer.flush()?;
    info!(path = %path.display(), trackers = trackers.len(), "Saved tracker data");
    Ok(())
}

pub fn load_data<P: AsRef<Path>>(path: P, profiling: Profiling) -> Result<TrackerSet, RunError> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let doc: Value = serde_json::from_reader(reader)?;
    let trackers = from_document(doc, profiling)?;
    info!(path = %path.display(), trackers = trackers.len(), "Loaded tracker data");
    Ok(trackers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::pgn::parse_game;
    use chess_core::piece::PieceSlot;
    use chess_trackers::trackers::{GameTracker, PieceTracker, TileTracker};
    use chess_trackers::TrackerError;
    use serde_json::json;
    use shakmaty::Color;

    const GAME: &str = "[Result \"0-1\"]\n\n1. e4 e5 2. Nf3 Nc6 3. Bb5 a6 4. Bxc6 dxc6 5. Nxe5 Qd4 0-1";

    fn played() -> TrackerSet {
        let mut set = TrackerSet::from_names(&["piece", "tile", "game"], Profiling::Disabled).unwrap();
        set.process_game(&parse_game(GAME, 1).unwrap());
        set
    }

    #[test]
    fn test_document_round_trip() {
        let set = played();
        let restored = from_document(to_document(&set).unwrap(), Profiling::Disabled).unwrap();
        assert_eq!(restored.len(), 3);
        assert_eq!(restored.get::<PieceTracker>(), set.get::<PieceTracker>());
        assert_eq!(restored.get::<TileTracker>(), set.get::<TileTracker>());
        assert_eq!(restored.get::<GameTracker>(), set.get::<GameTracker>());
    }

    #[test]
    fn test_piece_state_shape() {
        let doc = to_document(&played()).unwrap();
        assert_eq!(doc["piece"]["w"]["Bf"]["Nb"], json!(1));
        assert_eq!(doc["piece"]["b"]["Pd"]["Bf"], json!(1));
        assert_eq!(doc["piece"]["w"]["Ng"]["Pe"], json!(1));
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!("chessalyzer-persist-{}.json", std::process::id()));
        let set = played();
        save_data(&path, &set).unwrap();
        let restored = load_data(&path, Profiling::Disabled).unwrap();
        std::fs::remove_file(&path).unwrap();

        let pieces = restored.get::<PieceTracker>().unwrap();
        assert_eq!(pieces.captures(Color::White, PieceSlot::Bf, PieceSlot::Nb), 1);
        assert_eq!(restored.get::<GameTracker>().unwrap().black_wins, 1);
    }

    #[test]
    fn test_unknown_tracker_in_document() {
        let doc = json!({ "openings": {} });
        assert!(matches!(
            from_document(doc, Profiling::Disabled),
            Err(RunError::Tracker(TrackerError::Config(_)))
        ));
    }

    #[test]
    fn test_non_object_document() {
        assert!(matches!(
            from_document(json!([1, 2]), Profiling::Disabled),
            Err(RunError::Config(_))
        ));
    }
}
