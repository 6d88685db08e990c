//! Quixo Core - Game engine and AI
//!
//! This crate provides the decision engine for Quixo:
//! - 5x5 board model with row, column and diagonal lines
//! - Win detection, move generation and move application
//! - Line-based static evaluation
//! - Depth-limited minimax with alpha-beta pruning

pub mod board;
pub mod game;
pub mod eval;
pub mod ai;
pub mod config;
pub mod error;

// Re-exports for convenient access
pub use board::{Board, Cell, Side, BOARD_SIZE, LINE_COUNT};
pub use game::{apply_move, generate_moves, is_winner, outcome, Direction, Game, GameResult, Move};
pub use eval::{evaluate, line_value, Heuristics, Score};
pub use ai::{QuixoBot, SearchConfig, SearchOutcome, SearchStats, Searcher};
pub use config::BotConfig;
pub use error::{QuixoError, Result};
