//! Splitting a game stream into batches.

use chess_core::error::SourceError;
use chess_core::game_data::Game;

use crate::config::{GameFilter, RunConfig};

/// Ordered batches of accepted games.
///
/// Games are pulled from the source only while filling a batch, and never
/// once `max_games` games have been accepted. A source error ends the stream.
pub(crate) struct Batches<I> {
    source: I,
    filter: GameFilter,
    max_games: Option<u64>,
    batch_size: usize,
    accepted: u64,
    finished: bool,
}

impl<I> Batches<I>
where
    I: Iterator<Item = Result<Game, SourceError>>,
{
    pub fn new(source: I, config: &RunConfig) -> Self {
        Self {
            source,
            filter: config.filter.clone(),
            max_games: config.max_games,
            batch_size: config.batch_size,
            accepted: 0,
            finished: false,
        }
    }

    fn cutoff_reached(&self) -> bool {
        self.max_games.is_some_and(|max| self.accepted >= max)
    }
}

impl<I> Iterator for Batches<I>
where
    I: Iterator<Item = Result<Game, SourceError>>,
{
    type Item = Result<Vec<Game>, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let mut batch = Vec::new();
        while batch.len() < self.batch_size {
            if self.cutoff_reached() {
                self.finished = true;
                break;
            }
            match self.source.next() {
                Some(Ok(game)) => {
                    if (self.filter)(&game) {
                        self.accepted += 1;
                        batch.push(game);
                    }
                }
                Some(Err(e)) => {
                    self.finished = true;
                    return Some(Err(e));
                }
                None => {
                    self.finished = true;
                    break;
                }
            }
        }
        (!batch.is_empty()).then_some(Ok(batch))
    }
}
