//! Candlebot CLI: live paper trading and offline replay.
//!
//! Commands:
//! - `run`: poll the provider every interval and trade on star patterns
//! - `replay`: run recorded bar files through a fresh engine

use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use candlebot::{
    config::{read_api_key, Settings},
    detectors::{scan_parallel, EVENING_STAR, MORNING_STAR},
    engine::{PositionEngine, PositionState},
    extract::BarExtractor,
    feed::AlphaVantageFeed,
    ledger::FileLedger,
    poller::Poller,
    replay::{read_bars, replay},
    schedule::{CancelToken, FixedInterval, Limited},
    session::Session,
};

#[derive(Parser)]
#[command(
    name = "candlebot",
    about = "Candlebot: morning/evening star paper trader"
)]
struct Cli {
    /// Settings file (TOML). Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll the provider and trade until killed.
    Run {
        /// Stop after this many poll cycles.
        #[arg(long)]
        cycles: Option<usize>,
    },
    /// Replay recorded bar files (CSV with open,close columns).
    Replay {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("candlebot=info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { cycles } => run(cli.config.as_deref(), cycles),
        Commands::Replay { files } => replay_files(cli.config.as_deref(), &files),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

fn engine_for(settings: &Settings) -> PositionEngine {
    PositionEngine::new(PositionState::with_cash(settings.starting_cash), settings.rules())
}

fn run(config: Option<&Path>, cycles: Option<usize>) -> Result<()> {
    let settings = Settings::load(config)?;
    let api_key = read_api_key(&settings.api_key_file)?;
    let ledger = FileLedger::open(&settings.ledger_path)?;
    let feed = AlphaVantageFeed::from_settings(&settings, api_key).context("building HTTP client")?;

    let session = Session::new(engine_for(&settings), ledger);
    let mut poller = Poller::new(feed, BarExtractor::new(&settings.interval), session)
        .skip_zero_bars(settings.skip_zero_bars);

    info!(
        symbol = %settings.symbol,
        interval_secs = settings.poll_interval_secs,
        ledger = %settings.ledger_path.display(),
        "monitoring live"
    );

    let mut ticker = FixedInterval::new(settings.poll_interval(), CancelToken::new());
    let ran = match cycles {
        // The ticker is asked to wait after every cycle, so n cycles need n - 1 waits.
        Some(n) if n > 0 => poller.run(&mut Limited::new(ticker, n - 1)),
        Some(_) => 0,
        None => poller.run(&mut ticker),
    };

    let state = poller.session().engine().state();
    info!(
        cycles = ran,
        cash = state.cash,
        long = state.long_units,
        short = state.short_units,
        "stopped"
    );
    Ok(())
}

fn replay_files(config: Option<&Path>, files: &[PathBuf]) -> Result<()> {
    let settings = Settings::load(config)?;

    let mut recorded = Vec::with_capacity(files.len());
    for path in files {
        let bars = read_bars(path).with_context(|| format!("reading {}", path.display()))?;
        recorded.push((path.display().to_string(), bars));
    }

    let histories: Vec<(&str, &[_])> =
        recorded.iter().map(|(name, bars)| (name.as_str(), bars.as_slice())).collect();
    let scans = scan_parallel(histories);

    for ((name, bars), scan) in recorded.iter().zip(&scans) {
        let session = replay(bars.iter().copied(), engine_for(&settings));
        for line in session.ledger().lines() {
            println!("{name}: {line}");
        }

        let state = session.engine().state();
        println!(
            "{name}: {} bars, {} morning stars, {} evening stars, cash ${}, long {}, short {}",
            bars.len(),
            scan.count(MORNING_STAR),
            scan.count(EVENING_STAR),
            state.cash,
            state.long_units,
            state.short_units,
        );
    }
    Ok(())
}
