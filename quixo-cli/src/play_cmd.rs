//! Play command - full games between bots or against a random mover
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_config(), play_match(), report_results()
//! - Level 3: play_single_game(), compute_match_statistics()
//! - Level 4: formatting utilities

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use quixo_core::{BotConfig, Game, GameResult, Move, QuixoBot, Side};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Number of games to play (the bot alternates sides)
    #[arg(long, default_value = "1")]
    pub games: usize,

    /// Maximum plies before a game is called a draw
    #[arg(long, default_value = "200")]
    pub max_plies: usize,

    /// Play against a random mover instead of a second bot
    #[arg(long)]
    pub random_opponent: bool,

    /// Bot configuration JSON file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Search depth below the root move (overrides the config file)
    #[arg(long)]
    pub depth: Option<u32>,

    /// Print every board as the game goes
    #[arg(long)]
    pub verbose: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug)]
struct GameRecord {
    game_number: usize,
    result: GameResult,
    plies: usize,
    /// Side played by the bot when facing the random mover
    bot_side: Option<Side>,
    moves: Vec<(Side, Move)>,
}

/// Aggregated match results
#[derive(Clone, Debug)]
struct MatchResults {
    games: Vec<GameRecord>,
    x_wins: usize,
    o_wins: usize,
    draws: usize,
    bot_wins: usize,
    avg_plies: f32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let config = load_config(&args)?;

    tracing::info!(
        "Starting {} game(s): {} vs {} (depth={})",
        args.games,
        config.name,
        if args.random_opponent { "random" } else { "itself" },
        config.search.depth
    );

    let results = play_match(&config, &args, seed);
    report_results(&results, &args)?;

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn load_config(args: &PlayArgs) -> Result<BotConfig> {
    let mut config = match &args.config {
        Some(path) => BotConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => BotConfig::default(),
    };
    if let Some(depth) = args.depth {
        config.search.depth = depth;
    }
    Ok(config)
}

/// Play all games in the match
fn play_match(config: &BotConfig, args: &PlayArgs, seed: Option<u64>) -> MatchResults {
    let mut rng = create_rng(seed);
    let mut games = Vec::with_capacity(args.games);

    for game_num in 0..args.games {
        // Alternate sides for fairness
        let bot_side = if game_num % 2 == 0 { Side::X } else { Side::O };
        let record = play_single_game(config, bot_side, game_num + 1, args, &mut rng);

        tracing::info!(
            "Game {}: {:?} ({} plies)",
            record.game_number,
            record.result,
            record.plies
        );

        games.push(record);
    }

    compute_match_statistics(games)
}

/// Report match results
fn report_results(results: &MatchResults, args: &PlayArgs) -> Result<()> {
    if args.json {
        print_json_results(results)?;
    } else {
        print_text_results(results);
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play one game; X always moves first
fn play_single_game(
    config: &BotConfig,
    bot_side: Side,
    game_number: usize,
    args: &PlayArgs,
    rng: &mut ChaCha8Rng,
) -> GameRecord {
    let mut x_bot = QuixoBot::from_config(config);
    x_bot.reset(Side::X);
    let mut o_bot = x_bot.clone();
    o_bot.reset(Side::O);

    let mut game = Game::new(Side::X);
    let mut result = GameResult::Ongoing;

    while result == GameResult::Ongoing && game.history().len() < args.max_plies {
        let mover = game.to_move();
        let mv = if args.random_opponent && mover != bot_side {
            game.legal_moves().choose(rng).copied()
        } else if mover == Side::X {
            x_bot.best_move(game.board())
        } else {
            o_bot.best_move(game.board())
        };

        let Some(mv) = mv else {
            tracing::warn!("{} has no legal move, stopping game {}", mover, game_number);
            break;
        };

        result = game.play(mv);
        if args.verbose {
            println!("{} plays {}\n{}", mover, mv, game.board());
        }
    }

    GameRecord {
        game_number,
        result,
        plies: game.history().len(),
        bot_side: args.random_opponent.then_some(bot_side),
        moves: game.history().to_vec(),
    }
}

/// Compute aggregate statistics from game records
fn compute_match_statistics(games: Vec<GameRecord>) -> MatchResults {
    let x_wins = games
        .iter()
        .filter(|g| g.result == GameResult::Winner(Side::X))
        .count();
    let o_wins = games
        .iter()
        .filter(|g| g.result == GameResult::Winner(Side::O))
        .count();
    let draws = games
        .iter()
        .filter(|g| g.result == GameResult::Ongoing)
        .count();
    let bot_wins = games
        .iter()
        .filter(|g| matches!(g.bot_side, Some(side) if g.result == GameResult::Winner(side)))
        .count();

    let total_plies: usize = games.iter().map(|g| g.plies).sum();
    let avg_plies = if games.is_empty() {
        0.0
    } else {
        total_plies as f32 / games.len() as f32
    };

    MatchResults {
        games,
        x_wins,
        o_wins,
        draws,
        bot_wins,
        avg_plies,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn percent(count: usize, total: usize) -> f32 {
    if total > 0 {
        count as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

/// Print results as JSON
fn print_json_results(results: &MatchResults) -> Result<()> {
    println!("{}", json_results(results)?);
    Ok(())
}

fn json_results(results: &MatchResults) -> Result<String> {
    #[derive(serde::Serialize)]
    struct JsonGame {
        game_number: usize,
        result: String,
        plies: usize,
        bot_side: Option<Side>,
        moves: Vec<String>,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        total_games: usize,
        x_wins: usize,
        o_wins: usize,
        draws: usize,
        bot_wins: usize,
        avg_plies: f32,
        games: Vec<JsonGame>,
    }

    let output = JsonOutput {
        total_games: results.games.len(),
        x_wins: results.x_wins,
        o_wins: results.o_wins,
        draws: results.draws,
        bot_wins: results.bot_wins,
        avg_plies: results.avg_plies,
        games: results
            .games
            .iter()
            .map(|g| JsonGame {
                game_number: g.game_number,
                result: format_result(g.result),
                plies: g.plies,
                bot_side: g.bot_side,
                moves: g
                    .moves
                    .iter()
                    .map(|(side, mv)| format!("{} {}", side, mv))
                    .collect(),
            })
            .collect(),
    };

    Ok(serde_json::to_string_pretty(&output)?)
}

/// Print results as text
fn print_text_results(results: &MatchResults) {
    let total = results.games.len();

    println!("\n=== Match Results ===");
    println!("Total games: {}", total);
    println!("X wins:      {} ({:.1}%)", results.x_wins, percent(results.x_wins, total));
    println!("O wins:      {} ({:.1}%)", results.o_wins, percent(results.o_wins, total));
    println!("Draws:       {} ({:.1}%)", results.draws, percent(results.draws, total));
    if results.games.iter().any(|g| g.bot_side.is_some()) {
        println!("Bot wins:    {} ({:.1}%)", results.bot_wins, percent(results.bot_wins, total));
    }
    println!("Avg plies:   {:.1}", results.avg_plies);
}

fn format_result(result: GameResult) -> String {
    match result {
        GameResult::Ongoing => "Draw".to_string(),
        GameResult::Winner(side) => format!("{} wins", side),
    }
}
