//! Batch runs of trackers over PGN game collections.
//!
//! [`run`] drives any game source, sequentially or across a pool of workers.
//! [`start_batch`] and [`start_batch_multi_core`] read straight from a PGN file.

mod batcher;
pub mod config;
pub mod error;
pub mod persist;
pub mod progress;
pub mod runner;

use std::path::Path;

use chess_core::pgn::PgnReader;
use chess_trackers::TrackerSet;

pub use config::{GameFilter, RunConfig, Settings};
pub use error::RunError;
pub use persist::{load_data, save_data};
pub use progress::Progress;
pub use runner::{run, BatchOutcome, RunSummary};

/// Run `trackers` over the games in the PGN file at `path` on one worker.
///
/// Batch size and worker count in `config` are ignored.
pub async fn start_batch<P: AsRef<Path>>(
    path: P,
    trackers: TrackerSet,
    config: RunConfig,
    progress: Option<Progress>,
) -> Result<BatchOutcome, RunError> {
    let source = PgnReader::open(path)?;
    let config = config.with_workers(1);
    run(source, trackers, &config, progress).await
}

/// Run `trackers` over the games in the PGN file at `path`, split into
/// batches of `batch_size` games spread over `workers` workers.
pub async fn start_batch_multi_core<P: AsRef<Path>>(
    path: P,
    trackers: TrackerSet,
    config: RunConfig,
    batch_size: usize,
    workers: usize,
    progress: Option<Progress>,
) -> Result<BatchOutcome, RunError> {
    let source = PgnReader::open(path)?;
    let config = config.with_batch_size(batch_size).with_workers(workers);
    run(source, trackers, &config, progress).await
}
