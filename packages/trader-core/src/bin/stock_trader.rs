//! Stock Trader CLI - Console stock trading simulator.
//!
//! `play` runs the interactive game; `prices` prints one day's board as JSON.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use trader_core::{simulation::quote_board, ApiResponse, Console, PriceProvider, SimulationConfig};

#[derive(Parser)]
#[command(name = "stock-trader")]
#[command(about = "Console stock trading simulator over historical daily prices")]
#[command(version)]
struct Cli {
    /// Log debug events to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play the interactive simulation (default)
    Play(PlayArgs),
    /// Print one day's prices as JSON
    Prices {
        /// Trading day (starting at 1)
        #[arg(short, long)]
        day: u32,
        /// Directory of <TICKER>.csv price files
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

#[derive(Args, Default)]
struct PlayArgs {
    /// Config file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Directory of <TICKER>.csv price files
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Number of trading days to play
    #[arg(short, long)]
    days: Option<u32>,
    /// Pause between price lines, in milliseconds
    #[arg(long)]
    pause_ms: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli
        .command
        .unwrap_or_else(|| Commands::Play(PlayArgs::default()))
    {
        Commands::Play(args) => handle_play(args),
        Commands::Prices { day, data_dir } => {
            println!("{}", handle_prices(day, data_dir)?);
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let directive = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directive))
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn handle_play(args: PlayArgs) -> anyhow::Result<()> {
    let path = args.config.unwrap_or_else(SimulationConfig::default_path);
    let mut config = SimulationConfig::load_from_path(&path)
        .with_context(|| format!("failed to load config from {}", path.display()))?;

    if let Some(dir) = args.data_dir {
        config.data_dir = Some(dir);
    }
    if let Some(days) = args.days {
        config.days = Some(days);
    }
    if let Some(pause_ms) = args.pause_ms {
        config.pause_ms = pause_ms;
    }
    config.validate().context("invalid settings")?;

    let provider = config
        .price_provider()
        .context("failed to load price data")?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut console = Console::new(stdin.lock(), stdout.lock())
        .with_pause(Duration::from_millis(config.pause_ms));
    console.run(&config, provider)?;

    Ok(())
}

fn handle_prices(day: u32, data_dir: Option<PathBuf>) -> anyhow::Result<String> {
    let provider = match data_dir {
        Some(dir) => PriceProvider::from_dir(&dir)
            .with_context(|| format!("failed to load price data from {}", dir.display()))?,
        None => PriceProvider::embedded()?,
    };

    let output = match quote_board(&provider, day) {
        Ok(quotes) => serde_json::to_string_pretty(&ApiResponse::ok(json!({
            "day": day,
            "quotes": quotes,
        })))?,
        Err(e) => serde_json::to_string_pretty(&ApiResponse::<()>::err(e.to_string()))?,
    };

    Ok(output)
}
