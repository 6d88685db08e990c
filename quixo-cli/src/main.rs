//! Quixo CLI - Command-line interface
//!
//! Commands:
//! - decide: Pick the bot's move for a board read from a file
//! - play: Play games between bots or against a random mover
//! - bench: Compare pruned and full-width search

mod benchmark;
mod decide;
mod play_cmd;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use benchmark::BenchmarkArgs;
use decide::DecideArgs;
use play_cmd::PlayArgs;

#[derive(Parser)]
#[command(name = "quixo")]
#[command(about = "Quixo minimax engine")]
struct Cli {
    /// Random seed for reproducible runs
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Choose a move for the given board
    Decide(DecideArgs),
    /// Play full games
    Play(PlayArgs),
    /// Benchmark alpha-beta against full-width minimax
    Bench(BenchmarkArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Decide(args) => decide::run(args),
        Commands::Play(args) => play_cmd::run(args, cli.seed),
        Commands::Bench(args) => benchmark::run(args, cli.seed),
    }
}
