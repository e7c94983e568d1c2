//! chessalyzer
//!
//! Runs trackers over a PGN file and optionally saves the results as JSON.
//! Usage: chessalyzer <pgn> [--out FILE] [--trackers piece,tile,game]
//! Run settings come from CHESSALYZER_* environment variables.

use std::path::PathBuf;

use anyhow::{bail, Context};
use batch_runner::{run, save_data, Progress, Settings};
use chess_core::pgn::PgnReader;
use chess_trackers::TrackerSet;
use tracing::info;

const DEFAULT_TRACKERS: &str = "piece,tile,game";

struct Args {
    pgn: PathBuf,
    out: Option<PathBuf>,
    trackers: Vec<String>,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut pgn = None;
    let mut out = None;
    let mut trackers = DEFAULT_TRACKERS.to_string();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--out" => out = Some(PathBuf::from(args.next().context("--out needs a file")?)),
            "--trackers" => trackers = args.next().context("--trackers needs a list")?,
            flag if flag.starts_with("--") => bail!("unknown option {flag}"),
            _ if pgn.is_none() => pgn = Some(PathBuf::from(&arg)),
            _ => bail!("unexpected argument {arg}"),
        }
    }

    let pgn = pgn.context("usage: chessalyzer <pgn> [--out FILE] [--trackers piece,tile,game]")?;
    let trackers = trackers
        .split(',')
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect();
    Ok(Args { pgn, out, trackers })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Load .env file for local dev
    let _ = dotenvy::dotenv();

    let args = parse_args()?;
    let settings = Settings::from_env()?;
    let trackers = TrackerSet::from_names(&args.trackers, settings.profiling)?;
    info!(
        pgn = %args.pgn.display(),
        trackers = ?args.trackers,
        config = ?settings.run,
        "Configuration loaded"
    );

    let source = PgnReader::open(&args.pgn)
        .with_context(|| format!("cannot open {}", args.pgn.display()))?;
    let progress = Progress::new(settings.progress_rate, |games| {
        info!(games, "Progress");
    });

    let outcome = run(source, trackers, &settings.run, Some(progress)).await?;
    let summary = &outcome.summary;
    info!(
        games = summary.games,
        batches = summary.batches,
        elapsed_secs = summary.elapsed.as_secs_f64(),
        "Analysis finished"
    );
    for entry in &summary.profile {
        if !entry.elapsed.is_zero() {
            info!(tracker = entry.name, elapsed_ms = entry.elapsed.as_millis() as u64, "Tracker time");
        }
    }

    if let Some(out) = &args.out {
        save_data(out, &outcome.trackers)?;
    }

    Ok(())
}
