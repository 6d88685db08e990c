//! Decide command - choose one move for a board read from disk
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_board(), build_bot(), report_decision()
//! - Level 4: parsing and formatting utilities

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use quixo_core::{Board, BotConfig, QuixoBot, SearchOutcome, Side};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct DecideArgs {
    /// Board file: five lines of X/O/. or a JSON 5x5 array of -1/0/1
    #[arg(long, value_name = "FILE")]
    pub board: PathBuf,

    /// Side the bot plays (overrides the config file)
    #[arg(long)]
    pub side: Option<Side>,

    /// Bot configuration JSON file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Search depth below the root move (overrides the config file)
    #[arg(long)]
    pub depth: Option<u32>,

    /// Disable alpha-beta cutoffs
    #[arg(long)]
    pub no_pruning: bool,

    /// Output result as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run decide command
pub fn run(args: DecideArgs) -> Result<()> {
    let board = load_board(&args.board)?;
    let bot = build_bot(&args)?;

    tracing::info!(
        "{} deciding for {} (depth={}, pruning={})",
        bot.name,
        bot.side(),
        bot.search.depth,
        bot.search.pruning
    );

    let outcome = bot.search(&board);
    if outcome.mv.is_none() {
        tracing::warn!("No legal move for {}; board unchanged", bot.side());
    }

    report_decision(&bot, &outcome, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Read a board in text or JSON form
fn load_board(path: &Path) -> Result<Board> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read board: {}", path.display()))?;
    parse_board(&content).with_context(|| format!("Failed to parse board: {}", path.display()))
}

/// Build the bot from config file and command-line overrides
fn build_bot(args: &DecideArgs) -> Result<QuixoBot> {
    let mut config = match &args.config {
        Some(path) => BotConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => BotConfig::default(),
    };

    if let Some(side) = args.side {
        config.side = side;
    }
    if let Some(depth) = args.depth {
        config.search.depth = depth;
    }
    if args.no_pruning {
        config.search.pruning = false;
    }

    Ok(QuixoBot::from_config(&config))
}

fn report_decision(bot: &QuixoBot, outcome: &SearchOutcome, json: bool) -> Result<()> {
    if json {
        print_json_decision(bot, outcome)
    } else {
        print_text_decision(bot, outcome);
        Ok(())
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn parse_board(content: &str) -> Result<Board> {
    if content.trim_start().starts_with('[') {
        Ok(serde_json::from_str(content)?)
    } else {
        Ok(content.parse()?)
    }
}

fn print_json_decision(bot: &QuixoBot, outcome: &SearchOutcome) -> Result<()> {
    #[derive(serde::Serialize)]
    struct JsonDecision<'a> {
        bot: &'a str,
        side: Side,
        #[serde(rename = "move")]
        mv: Option<quixo_core::Move>,
        score: Option<i32>,
        nodes: u64,
        cutoffs: u64,
        board: Board,
    }

    let output = JsonDecision {
        bot: &bot.name,
        side: bot.side(),
        mv: outcome.mv,
        score: outcome.score,
        nodes: outcome.stats.nodes,
        cutoffs: outcome.stats.cutoffs,
        board: outcome.board,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_text_decision(bot: &QuixoBot, outcome: &SearchOutcome) {
    match (outcome.mv, outcome.score) {
        (Some(mv), Some(score)) => println!("{} ({}) plays {}  score={}", bot.name, bot.side(), mv, score),
        _ => println!("{} ({}) has no legal move", bot.name, bot.side()),
    }
    println!(
        "nodes={} cutoffs={}\n",
        outcome.stats.nodes, outcome.stats.cutoffs
    );
    print!("{}", outcome.board);
}
