//! Run configuration, built in code or loaded from environment variables

use std::env;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chess_core::game_data::Game;
use chess_trackers::Profiling;

use crate::error::RunError;

pub const DEFAULT_BATCH_SIZE: usize = 8000;
pub const DEFAULT_PROGRESS_RATE: u64 = 1000;

/// Predicate deciding which games are analyzed.
pub type GameFilter = Arc<dyn Fn(&Game) -> bool + Send + Sync>;

#[derive(Clone)]
pub struct RunConfig {
    /// Games failing the filter are skipped and do not count toward `max_games`
    pub filter: GameFilter,

    /// Stop after this many accepted games
    pub max_games: Option<u64>,

    /// Games per batch handed to a worker
    pub batch_size: usize,

    /// Parallel workers; 1 runs everything on one blocking thread
    pub workers: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            filter: Arc::new(|_: &Game| true),
            max_games: None,
            batch_size: DEFAULT_BATCH_SIZE,
            workers: 1,
        }
    }
}

impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("max_games", &self.max_games)
            .field("batch_size", &self.batch_size)
            .field("workers", &self.workers)
            .finish_non_exhaustive()
    }
}

impl RunConfig {
    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&Game) -> bool + Send + Sync + 'static,
    {
        self.filter = Arc::new(filter);
        self
    }

    pub fn with_max_games(mut self, max_games: u64) -> Self {
        self.max_games = Some(max_games);
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn validate(&self) -> Result<(), RunError> {
        if self.workers == 0 {
            return Err(RunError::Config("workers must be at least 1".into()));
        }
        if self.batch_size == 0 {
            return Err(RunError::Config("batch size must be at least 1".into()));
        }
        Ok(())
    }
}

/// Everything the CLI reads from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub run: RunConfig,
    pub profiling: Profiling,
    pub progress_rate: u64,
}

impl Settings {
    /// Load settings from `CHESSALYZER_*` environment variables.
    pub fn from_env() -> Result<Self, RunError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<L>(lookup: L) -> Result<Self, RunError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let workers = parse_var(&lookup, "CHESSALYZER_WORKERS")?.unwrap_or_else(num_cpus::get);
        let batch_size = parse_var(&lookup, "CHESSALYZER_BATCH_SIZE")?.unwrap_or(DEFAULT_BATCH_SIZE);
        let max_games = parse_var(&lookup, "CHESSALYZER_MAX_GAMES")?;
        let progress_rate =
            parse_var(&lookup, "CHESSALYZER_PROGRESS_RATE")?.unwrap_or(DEFAULT_PROGRESS_RATE);
        let profiling = match lookup("CHESSALYZER_PROFILE").as_deref() {
            None | Some("") | Some("0") | Some("false") => Profiling::Disabled,
            Some("1") | Some("true") => Profiling::Enabled,
            Some(other) => {
                return Err(RunError::Config(format!(
                    "CHESSALYZER_PROFILE must be true or false, got '{other}'"
                )))
            }
        };

        if progress_rate == 0 {
            return Err(RunError::Config("CHESSALYZER_PROGRESS_RATE must be at least 1".into()));
        }

        let run = RunConfig {
            max_games,
            batch_size,
            workers,
            ..RunConfig::default()
        };
        run.validate()?;

        Ok(Self {
            run,
            profiling,
            progress_rate,
        })
    }
}

fn parse_var<T, L>(lookup: &L, key: &str) -> Result<Option<T>, RunError>
where
    T: FromStr,
    L: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| RunError::Config(format!("{key} has invalid value '{raw}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, RunError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.run.batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(s.run.max_games, None);
        assert!(s.run.workers >= 1);
        assert_eq!(s.progress_rate, DEFAULT_PROGRESS_RATE);
        assert_eq!(s.profiling, Profiling::Disabled);
    }

    #[test]
    fn test_overrides() {
        let s = settings(&[
            ("CHESSALYZER_WORKERS", "3"),
            ("CHESSALYZER_BATCH_SIZE", "50"),
            ("CHESSALYZER_MAX_GAMES", "1000"),
            ("CHESSALYZER_PROFILE", "true"),
        ])
        .unwrap();
        assert_eq!(s.run.workers, 3);
        assert_eq!(s.run.batch_size, 50);
        assert_eq!(s.run.max_games, Some(1000));
        assert_eq!(s.profiling, Profiling::Enabled);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            settings(&[("CHESSALYZER_WORKERS", "many")]),
            Err(RunError::Config(_))
        ));
        assert!(matches!(
            settings(&[("CHESSALYZER_BATCH_SIZE", "0")]),
            Err(RunError::Config(_))
        ));
        assert!(matches!(
            settings(&[("CHESSALYZER_PROFILE", "sometimes")]),
            Err(RunError::Config(_))
        ));
    }

    #[test]
    fn test_builder() {
        let config = RunConfig::default()
            .with_workers(4)
            .with_batch_size(10)
            .with_max_games(7)
            .with_filter(|game| game.metadata.result == "1-0");
        assert!(config.validate().is_ok());
        assert_eq!(config.max_games, Some(7));
        assert!(!(config.filter)(&Game::default()));
        assert!(RunConfig::default().with_workers(0).validate().is_err());
    }
}
