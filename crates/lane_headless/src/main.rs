//! Headless lane match runner.
//!
//! Runs AI-versus-AI matches without graphics and prints JSON reports.
//!
//! # Usage
//!
//! ```bash
//! # Run a single match
//! cargo run -p lane_headless -- run --seed 42 --max-minutes 20
//!
//! # Run a batch of matches in parallel
//! cargo run -p lane_headless -- batch --count 500 --parallel 8
//! ```
//!
//! Output (stdout): one JSON document
//! Logs (stderr): Debug information (`RUST_LOG` or `--verbose`)

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lane_headless::{
    batch::{run_batch, BatchConfig, BatchSummary},
    runner::{run_match, MatchReport, RunConfig},
    HeadlessError,
};

#[derive(Parser)]
#[command(name = "lane_headless")]
#[command(about = "Headless lane match runner for AI playtesting and CI")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one AI-versus-AI match
    Run {
        /// RON match config to load
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// AI seed
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Game-time cap in minutes; matches still running are draws
        #[arg(long, default_value = "15")]
        max_minutes: u32,

        /// Seconds per tick
        #[arg(long, default_value = "0.1")]
        dt: f64,
    },

    /// Play many matches with consecutive seeds
    Batch {
        /// Number of matches
        #[arg(short = 'n', long, default_value = "100")]
        count: u32,

        /// Seed of the first match
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Worker threads (0 = auto)
        #[arg(short, long, default_value = "0")]
        parallel: usize,

        /// RON match config to load
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Game-time cap in minutes; matches still running are draws
        #[arg(long, default_value = "15")]
        max_minutes: u32,

        /// Seconds per tick
        #[arg(long, default_value = "0.1")]
        dt: f64,

        /// Include every match report, not just the summary
        #[arg(long)]
        full: bool,
    },
}

#[derive(Serialize)]
struct BatchOutput {
    summary: BatchSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    matches: Option<Vec<MatchReport>>,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging to stderr (stdout is for reports)
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true),
        )
        .with(filter)
        .init();

    let result = match cli.command {
        Commands::Run {
            config,
            seed,
            max_minutes,
            dt,
        } => cmd_run(config, seed, max_minutes, dt),
        Commands::Batch {
            count,
            seed,
            parallel,
            config,
            max_minutes,
            dt,
            full,
        } => cmd_batch(count, seed, parallel, config, max_minutes, dt, full),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "Run failed");
        eprintln!("FATAL: {e}");
        std::process::exit(1);
    }
}

/// Run a single match
fn cmd_run(config: Option<PathBuf>, seed: u64, max_minutes: u32, dt: f64) -> Result<(), HeadlessError> {
    let run = RunConfig::from_args(config.as_deref(), seed, max_minutes, dt)?;
    let report = run_match(&run);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Run a batch of matches
fn cmd_batch(
    count: u32,
    seed: u64,
    parallel: usize,
    config: Option<PathBuf>,
    max_minutes: u32,
    dt: f64,
    full: bool,
) -> Result<(), HeadlessError> {
    let run = RunConfig::from_args(config.as_deref(), seed, max_minutes, dt)?;
    let batch = BatchConfig {
        count,
        seed_start: seed,
        parallel,
        run,
    };

    let (reports, summary) = run_batch(&batch)?;
    let output = BatchOutput {
        summary,
        matches: full.then_some(reports),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
