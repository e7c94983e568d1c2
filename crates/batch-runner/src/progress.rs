//! Game counting and periodic progress callbacks.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::RunError;

/// Callback fired every `rate` processed games with the running total.
pub struct Progress {
    callback: Box<dyn FnMut(u64) + Send>,
    rate: u64,
}

impl Progress {
    pub fn new<F>(rate: u64, callback: F) -> Self
    where
        F: FnMut(u64) + Send + 'static,
    {
        Self {
            callback: Box::new(callback),
            rate,
        }
    }

    pub fn rate(&self) -> u64 {
        self.rate
    }

    pub(crate) fn validate(&self) -> Result<(), RunError> {
        if self.rate == 0 {
            return Err(RunError::Config("progress rate must be at least 1".into()));
        }
        Ok(())
    }
}

impl fmt::Debug for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Progress")
            .field("rate", &self.rate)
            .finish_non_exhaustive()
    }
}

/// Exact count of processed games, shared by all workers.
///
/// Ticks are published through a watch channel, so a slow callback only ever
/// sees the latest total and never holds up the workers.
pub(crate) struct GameCounter {
    games: AtomicU64,
    rate: u64,
    ticks: Option<watch::Sender<u64>>,
}

impl GameCounter {
    pub fn record(&self) {
        let total = self.games.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(ticks) = &self.ticks {
            if total % self.rate == 0 {
                // workers may finish out of order; keep the highest total
                ticks.send_if_modified(|last| {
                    if total > *last {
                        *last = total;
                        true
                    } else {
                        false
                    }
                });
            }
        }
    }

    pub fn total(&self) -> u64 {
        self.games.load(Ordering::Relaxed)
    }
}

/// Create the shared counter and, with a callback, the task that delivers
/// ticks to it. The task ends once every handle to the counter is dropped.
pub(crate) fn start(progress: Option<Progress>) -> (Arc<GameCounter>, Option<JoinHandle<()>>) {
    let Some(Progress { mut callback, rate }) = progress else {
        let counter = GameCounter {
            games: AtomicU64::new(0),
            rate: 0,
            ticks: None,
        };
        return (Arc::new(counter), None);
    };

    let (tx, mut rx) = watch::channel(0u64);
    let counter = GameCounter {
        games: AtomicU64::new(0),
        rate,
        ticks: Some(tx),
    };
    let listener = tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let games = *rx.borrow_and_update();
            callback(games);
        }
    });
    (Arc::new(counter), Some(listener))
}
