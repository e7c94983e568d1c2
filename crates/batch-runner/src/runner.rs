//! Batch orchestration.
//!
//! A run pulls games from a source, cuts them into batches and feeds every
//! batch through a [`TrackerSet`]. With one worker everything happens in order
//! on a single blocking thread. With more, a dispatcher thread fills a bounded
//! queue that a fixed pool of workers drains; each worker owns a fresh copy of
//! the trackers. When every worker is done the partial sets are merged, one
//! after another, into the set the caller passed in.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::{Duration, Instant};

use chess_core::error::SourceError;
use chess_core::game_data::Game;
use chess_trackers::{TrackerProfile, TrackerSet};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, info, warn};

use crate::batcher::Batches;
use crate::config::RunConfig;
use crate::error::RunError;
use crate::progress::{self, GameCounter, Progress};

type Batch = Vec<Game>;

/// Batches waiting for a free worker.
const QUEUE_CAPACITY: usize = 1;

/// Merged trackers plus what the run cost.
pub struct BatchOutcome {
    pub trackers: TrackerSet,
    pub summary: RunSummary,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Games fed to the trackers
    pub games: u64,
    pub batches: u64,
    pub elapsed: Duration,
    /// Time spent inside each tracker; zero unless profiling is enabled
    pub profile: Vec<TrackerProfile>,
}

/// Stops dispatch and remembers the first error of a run.
#[derive(Default)]
struct Abort {
    halted: AtomicBool,
    first: StdMutex<Option<RunError>>,
}

impl Abort {
    fn is_set(&self) -> bool {
        self.halted.load(Ordering::Acquire)
    }

    fn fail(&self, err: RunError) {
        if let Ok(mut first) = self.first.lock() {
            if first.is_none() {
                *first = Some(err);
            }
        }
        self.halted.store(true, Ordering::Release);
    }

    fn take_error(&self) -> Option<RunError> {
        self.first.lock().ok().and_then(|mut first| first.take())
    }
}

/// Run `trackers` over every accepted game of `source`.
///
/// Results are added to `trackers`, so a set restored from an earlier run
/// keeps accumulating. The first source or worker error aborts the run and is
/// returned; nothing partial is returned with it.
pub async fn run<S>(
    source: S,
    trackers: TrackerSet,
    config: &RunConfig,
    progress: Option<Progress>,
) -> Result<BatchOutcome, RunError>
where
    S: IntoIterator<Item = Result<Game, SourceError>>,
    S::IntoIter: Send + 'static,
{
    config.validate()?;
    if let Some(progress) = &progress {
        progress.validate()?;
    }

    let started = Instant::now();
    info!(
        workers = config.workers,
        batch_size = config.batch_size,
        max_games = ?config.max_games,
        trackers = trackers.len(),
        "Starting batch run"
    );

    let (counter, listener) = progress::start(progress);
    let batches = Batches::new(source.into_iter(), config);
    let result = if config.workers == 1 {
        run_sequential(batches, trackers, counter.clone()).await
    } else {
        run_parallel(batches, trackers, config.workers, counter.clone()).await
    };

    let games = counter.total();
    drop(counter);
    if let Some(listener) = listener {
        if let Err(e) = listener.await {
            warn!(error = %e, "Progress callback failed");
        }
    }

    let (trackers, batches) = match result {
        Ok(done) => done,
        Err(e) => {
            error!(error = %e, games, "Batch run aborted");
            return Err(e);
        }
    };

    let summary = RunSummary {
        games,
        batches,
        elapsed: started.elapsed(),
        profile: trackers.profile(),
    };
    info!(
        games,
        batches,
        elapsed_ms = summary.elapsed.as_millis() as u64,
        "Batch run complete"
    );
    Ok(BatchOutcome { trackers, summary })
}

fn process_batch(trackers: &mut TrackerSet, batch: &[Game], counter: &GameCounter) {
    for game in batch {
        trackers.process_game(game);
        counter.record();
    }
}

async fn run_sequential<I>(
    batches: Batches<I>,
    mut trackers: TrackerSet,
    counter: Arc<GameCounter>,
) -> Result<(TrackerSet, u64), RunError>
where
    I: Iterator<Item = Result<Game, SourceError>> + Send + 'static,
{
    let handle = tokio::task::spawn_blocking(move || -> Result<(TrackerSet, u64), RunError> {
        let mut dispatched = 0u64;
        for batch in batches {
            let batch = batch?;
            dispatched += 1;
            debug!(batch = dispatched, games = batch.len(), "Processing batch");
            process_batch(&mut trackers, &batch, &counter);
        }
        Ok((trackers, dispatched))
    });

    handle.await.map_err(|e| RunError::Worker {
        worker: 0,
        message: e.to_string(),
    })?
}

async fn run_parallel<I>(
    batches: Batches<I>,
    mut trackers: TrackerSet,
    workers: usize,
    counter: Arc<GameCounter>,
) -> Result<(TrackerSet, u64), RunError>
where
    I: Iterator<Item = Result<Game, SourceError>> + Send + 'static,
{
    let abort = Arc::new(Abort::default());
    // one queued batch, one per busy worker and one being filled: at most
    // workers + 2 batches are held at any time
    let (batch_tx, batch_rx) = mpsc::channel::<Batch>(QUEUE_CAPACITY);
    let batch_rx = Arc::new(Mutex::new(batch_rx));

    let handles: Vec<_> = (0..workers)
        .map(|id| {
            tokio::spawn(worker_loop(
                id,
                batch_rx.clone(),
                trackers.fresh(),
                counter.clone(),
                abort.clone(),
            ))
        })
        .collect();
    drop(batch_rx);

    let dispatch_abort = abort.clone();
    let dispatcher =
        tokio::task::spawn_blocking(move || dispatch(batches, batch_tx, &dispatch_abort));
    let dispatched = match dispatcher.await {
        Ok(dispatched) => dispatched,
        Err(e) => {
            abort.fail(RunError::Worker {
                worker: workers,
                message: format!("dispatcher: {e}"),
            });
            0
        }
    };

    // every worker must be done before anything is merged
    let mut partials = Vec::with_capacity(workers);
    for (id, joined) in futures::future::join_all(handles).await.into_iter().enumerate() {
        match joined {
            Ok(Some(partial)) => partials.push(partial),
            Ok(None) => {}
            Err(e) => abort.fail(RunError::Worker {
                worker: id,
                message: e.to_string(),
            }),
        }
    }
    if let Some(err) = abort.take_error() {
        return Err(err);
    }

    for partial in partials {
        trackers.merge(partial)?;
    }
    Ok((trackers, dispatched))
}

/// Read batches and queue them until the source runs dry, the run is
/// aborted, or no worker is left to receive.
fn dispatch<I>(mut batches: Batches<I>, tx: mpsc::Sender<Batch>, abort: &Abort) -> u64
where
    I: Iterator<Item = Result<Game, SourceError>>,
{
    let mut dispatched = 0u64;
    while !abort.is_set() {
        let Some(batch) = batches.next() else {
            break;
        };
        match batch {
            Ok(batch) => {
                dispatched += 1;
                debug!(batch = dispatched, games = batch.len(), "Dispatching batch");
                if tx.blocking_send(batch).is_err() {
                    break;
                }
            }
            Err(e) => {
                abort.fail(e.into());
                break;
            }
        }
    }
    dispatched
}

/// Take batches off the shared queue until it closes. Returns the worker's
/// partial trackers, or `None` if it failed.
async fn worker_loop(
    id: usize,
    batches: Arc<Mutex<mpsc::Receiver<Batch>>>,
    mut trackers: TrackerSet,
    counter: Arc<GameCounter>,
    abort: Arc<Abort>,
) -> Option<TrackerSet> {
    debug!(worker = id, "Worker started");
    let mut processed = 0u64;
    loop {
        let next = batches.lock().await.recv().await;
        let Some(batch) = next else {
            break;
        };
        if abort.is_set() {
            break;
        }

        let counter = counter.clone();
        let joined = tokio::task::spawn_blocking(move || {
            process_batch(&mut trackers, &batch, &counter);
            trackers
        })
        .await;

        match joined {
            Ok(done) => {
                trackers = done;
                processed += 1;
            }
            Err(e) => {
                error!(worker = id, error = %e, "Worker failed");
                abort.fail(RunError::Worker {
                    worker: id,
                    message: e.to_string(),
                });
                return None;
            }
        }
    }
    debug!(worker = id, batches = processed, "Worker finished");
    Some(trackers)
}
