//! Benchmark command - compare alpha-beta against full-width minimax
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: run_depth_benchmarks(), report_results()
//! - Level 3: benchmark_search(), random_position()
//! - Level 4: timing utilities, formatting

use std::time::{Duration, Instant};

use anyhow::{ensure, Result};
use clap::Args;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use quixo_core::{
    apply_move, generate_moves, outcome, Board, GameResult, QuixoBot, SearchConfig, Side,
};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct BenchmarkArgs {
    /// Number of random positions per depth
    #[arg(long, default_value = "20")]
    pub positions: usize,

    /// Random plies played from the empty board to reach each position
    #[arg(long, default_value = "12")]
    pub plies: usize,

    /// Maximum search depth to test
    #[arg(long, default_value = "2")]
    pub depth: u32,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Results of a single benchmark run
#[derive(Clone, Debug)]
struct BenchmarkResult {
    name: String,
    positions: usize,
    total_time: Duration,
    avg_time_per_position: Duration,
    nodes: u64,
    cutoffs: u64,
    /// Positions where both searches picked the same move
    agreements: usize,
}

#[derive(Clone, Debug)]
struct AllResults {
    results: Vec<BenchmarkResult>,
    system_info: String,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run benchmark command
///
/// 1. Draw random reachable positions
/// 2. Search each with and without pruning at every depth
/// 3. Report timings, node counts and move agreement
pub fn run(args: BenchmarkArgs, seed: Option<u64>) -> Result<()> {
    ensure!(args.positions > 0, "--positions must be at least 1");

    tracing::info!(
        "Starting benchmarks: {} positions, max depth {}",
        args.positions,
        args.depth
    );

    let mut rng = create_rng(seed);
    let positions: Vec<(Board, Side)> = (0..args.positions)
        .map(|_| random_position(&mut rng, args.plies))
        .collect();

    let mut all_results = AllResults {
        results: Vec::new(),
        system_info: get_system_info(),
    };
    run_depth_benchmarks(&positions, args.depth, &mut all_results);

    for r in &all_results.results {
        if r.agreements != r.positions {
            tracing::warn!(
                "{}: pruned and full-width search disagreed on {} position(s)",
                r.name,
                r.positions - r.agreements
            );
        }
    }

    report_results(&all_results, &args)?;

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn run_depth_benchmarks(positions: &[(Board, Side)], max_depth: u32, results: &mut AllResults) {
    for depth in 0..=max_depth {
        tracing::info!("Benchmarking depth {}...", depth);
        let (full, reference) =
            benchmark_search(positions, SearchConfig { depth, pruning: false }, None);
        let (pruned, _) = benchmark_search(
            positions,
            SearchConfig { depth, pruning: true },
            Some(reference.as_slice()),
        );
        results.results.push(full);
        results.results.push(pruned);
    }
}

fn report_results(results: &AllResults, args: &BenchmarkArgs) -> Result<()> {
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

/// Search every position; returns the timing summary and the chosen boards.
/// When `reference` is given, agreements are counted against it.
fn benchmark_search(
    positions: &[(Board, Side)],
    search: SearchConfig,
    reference: Option<&[Board]>,
) -> (BenchmarkResult, Vec<Board>) {
    let mut chosen = Vec::with_capacity(positions.len());
    let mut nodes = 0;
    let mut cutoffs = 0;

    let start = Instant::now();
    for (board, side) in positions {
        let outcome = QuixoBot::new(*side).with_search(search).search(board);
        nodes += outcome.stats.nodes;
        cutoffs += outcome.stats.cutoffs;
        chosen.push(outcome.board);
    }
    let total_time = start.elapsed();

    let agreements = match reference {
        Some(reference) => reference
            .iter()
            .zip(&chosen)
            .filter(|(a, b)| a == b)
            .count(),
        None => positions.len(),
    };

    let name = format!(
        "{} D{}",
        if search.pruning { "Alpha-Beta" } else { "Minimax" },
        search.depth
    );
    let result = BenchmarkResult {
        name,
        positions: positions.len(),
        total_time,
        avg_time_per_position: total_time / positions.len().max(1) as u32,
        nodes,
        cutoffs,
        agreements,
    };
    (result, chosen)
}

/// Position reached by random legal play from the empty board, stopping
/// before any move that would end the game
fn random_position(rng: &mut ChaCha8Rng, plies: usize) -> (Board, Side) {
    let mut board = Board::new();
    let mut side = Side::X;

    for _ in 0..plies {
        let Some(&mv) = generate_moves(&board, side).choose(rng) else {
            break;
        };
        let next = apply_move(&board, mv, side);
        if outcome(&next, side) != GameResult::Ongoing {
            break;
        }
        board = next;
        side = side.opponent();
    }

    (board, side)
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

/// Get system information string
fn get_system_info() -> String {
    format!(
        "quixo {}, {} CPUs",
        env!("CARGO_PKG_VERSION"),
        std::thread::available_parallelism()
            .map(|p| p.get())
            .unwrap_or(1)
    )
}

/// Format duration for display
fn format_duration(d: Duration) -> String {
    if d.as_secs() >= 60 {
        format!("{}m {:.1}s", d.as_secs() / 60, (d.as_secs() % 60) as f64 + d.subsec_millis() as f64 / 1000.0)
    } else if d.as_secs() >= 1 {
        format!("{:.2}s", d.as_secs_f64())
    } else if d.as_millis() >= 1 {
        format!("{:.1}ms", d.as_secs_f64() * 1000.0)
    } else {
        format!("{:.1}us", d.as_secs_f64() * 1_000_000.0)
    }
}

/// Print results as JSON
fn print_json_results(results: &AllResults) -> Result<()> {
    println!("{}", json_results(results)?);
    Ok(())
}

fn json_results(results: &AllResults) -> Result<String> {
    #[derive(serde::Serialize)]
    struct JsonBenchmark {
        name: String,
        positions: usize,
        total_time_ms: u64,
        avg_time_ms: f64,
        nodes: u64,
        cutoffs: u64,
        agreements: usize,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        system_info: String,
        benchmarks: Vec<JsonBenchmark>,
    }

    let output = JsonOutput {
        system_info: results.system_info.clone(),
        benchmarks: results
            .results
            .iter()
            .map(|r| JsonBenchmark {
                name: r.name.clone(),
                positions: r.positions,
                total_time_ms: r.total_time.as_millis() as u64,
                avg_time_ms: r.avg_time_per_position.as_secs_f64() * 1000.0,
                nodes: r.nodes,
                cutoffs: r.cutoffs,
                agreements: r.agreements,
            })
            .collect(),
    };

    Ok(serde_json::to_string_pretty(&output)?)
}

/// Print results as text table
fn print_text_results(results: &AllResults) {
    println!("\n=== Quixo Search Benchmark ===");
    println!("System: {}\n", results.system_info);

    println!(
        "{:<16} {:>9} {:>12} {:>12} {:>12} {:>10} {:>8}",
        "Search", "Positions", "Total Time", "Avg/Pos", "Nodes", "Cutoffs", "Agree"
    );
    println!("{}", "-".repeat(86));

    for r in &results.results {
        println!(
            "{:<16} {:>9} {:>12} {:>12} {:>12} {:>10} {:>8}",
            r.name,
            r.positions,
            format_duration(r.total_time),
            format_duration(r.avg_time_per_position),
            r.nodes,
            r.cutoffs,
            format!("{}/{}", r.agreements, r.positions)
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================
