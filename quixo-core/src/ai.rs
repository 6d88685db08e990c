//! Minimax AI with alpha-beta pruning

use serde::{Deserialize, Serialize};

use crate::board::{Board, Side};
use crate::config::BotConfig;
use crate::eval::{evaluate, Heuristics, Score};
use crate::game::{apply_move, generate_moves, is_winner, Move};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Plies searched below each root move (the opponent's reply)
pub const DEFAULT_DEPTH: u32 = 1;

/// Default bot name
pub const BOT_NAME: &str = "Strategix";

// ============================================================================
// CONFIGURATION AND RESULTS
// ============================================================================

/// Search parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Depth handed to `minimax` for each root move
    pub depth: u32,
    /// Alpha-beta cutoffs; `false` searches full width
    pub pruning: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            pruning: true,
        }
    }
}

/// Node counters for one decision
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    pub nodes: u64,
    pub cutoffs: u64,
}

/// Result of a root search
#[derive(Clone, Debug)]
pub struct SearchOutcome {
    /// Chosen move, `None` if the bot has no legal move
    pub mv: Option<Move>,
    /// Board after the chosen move (the input board when `mv` is `None`)
    pub board: Board,
    pub score: Option<Score>,
    pub stats: SearchStats,
}

// ============================================================================
// MINIMAX
// ============================================================================

/// Depth-first minimax over board copies, scored from `side`'s perspective
pub struct Searcher<'a> {
    side: Side,
    heuristics: &'a Heuristics,
    pruning: bool,
    stats: SearchStats,
}

impl<'a> Searcher<'a> {
    pub fn new(side: Side, heuristics: &'a Heuristics, pruning: bool) -> Self {
        Self {
            side,
            heuristics,
            pruning,
            stats: SearchStats::default(),
        }
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Minimax value of `board`.
    ///
    /// Stops at depth 0 or when either side holds a complete line and returns the
    /// static evaluation; the line bonus alone marks a won or lost position.
    pub fn minimax(
        &mut self,
        board: &Board,
        depth: u32,
        mut alpha: Score,
        mut beta: Score,
        maximizing: bool,
    ) -> Score {
        self.stats.nodes += 1;

        if depth == 0 || is_winner(board, self.side) || is_winner(board, self.side.opponent()) {
            return evaluate(board, self.side, self.heuristics);
        }

        let mover = if maximizing {
            self.side
        } else {
            self.side.opponent()
        };
        let moves = generate_moves(board, mover);
        if moves.is_empty() {
            return evaluate(board, self.side, self.heuristics);
        }

        let mut best = if maximizing { Score::MIN } else { Score::MAX };
        for mv in moves {
            let child = apply_move(board, mv, mover);
            let value = self.minimax(&child, depth - 1, alpha, beta, !maximizing);

            if maximizing {
                best = best.max(value);
                alpha = alpha.max(value);
            } else {
                best = best.min(value);
                beta = beta.min(value);
            }

            if self.pruning && beta <= alpha {
                self.stats.cutoffs += 1;
                break;
            }
        }

        best
    }
}

// ============================================================================
// BOT
// ============================================================================

/// Quixo bot playing a fixed side
#[derive(Clone, Debug)]
pub struct QuixoBot {
    pub name: String,
    side: Side,
    opponent: Side,
    pub search: SearchConfig,
    pub heuristics: Heuristics,
}

impl QuixoBot {
    pub fn new(side: Side) -> Self {
        Self {
            name: BOT_NAME.to_string(),
            side,
            opponent: side.opponent(),
            search: SearchConfig::default(),
            heuristics: Heuristics::default(),
        }
    }

    pub fn from_config(config: &BotConfig) -> Self {
        Self {
            name: config.name.clone(),
            side: config.side,
            opponent: config.side.opponent(),
            search: config.search,
            heuristics: config.heuristics.clone(),
        }
    }

    pub fn with_search(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn opponent(&self) -> Side {
        self.opponent
    }

    /// Switch sides between games
    pub fn reset(&mut self, side: Side) {
        self.side = side;
        self.opponent = side.opponent();
    }

    /// Board after the bot's chosen move, or the input board if it has none
    pub fn play_turn(&self, board: &Board) -> Board {
        self.search(board).board
    }

    pub fn best_move(&self, board: &Board) -> Option<Move> {
        self.search(board).mv
    }

    /// Static evaluation from the bot's perspective
    pub fn evaluate(&self, board: &Board) -> Score {
        evaluate(board, self.side, &self.heuristics)
    }

    /// Search every root move; the opponent replies next, so each child is
    /// scored as a minimizing node. Ties keep the first move generated.
    pub fn search(&self, board: &Board) -> SearchOutcome {
        let mut searcher = Searcher::new(self.side, &self.heuristics, self.search.pruning);
        let mut best: Option<(Score, Move, Board)> = None;

        for mv in generate_moves(board, self.side) {
            let child = apply_move(board, mv, self.side);
            let value = searcher.minimax(&child, self.search.depth, Score::MIN, Score::MAX, false);
            tracing::trace!("{} candidate {} -> {}", self.name, mv, value);

            if best.map_or(true, |(best_value, _, _)| value > best_value) {
                best = Some((value, mv, child));
            }
        }

        let stats = searcher.stats();
        match best {
            Some((score, mv, child)) => {
                tracing::debug!(
                    "{} ({}) plays {} score={} nodes={} cutoffs={}",
                    self.name,
                    self.side,
                    mv,
                    score,
                    stats.nodes,
                    stats.cutoffs
                );
                SearchOutcome {
                    mv: Some(mv),
                    board: child,
                    score: Some(score),
                    stats,
                }
            }
            None => {
                tracing::debug!("{} ({}) has no legal move", self.name, self.side);
                SearchOutcome {
                    mv: None,
                    board: *board,
                    score: None,
                    stats,
                }
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{outcome, Direction, GameResult};
    use rand::prelude::*;
    use rand_chacha::ChaCha8Rng;

    /// Random position reached by legal play from the empty board
    fn random_position(rng: &mut ChaCha8Rng, plies: usize) -> (Board, Side) {
        let mut board = Board::new();
        let mut side = Side::X;
        for _ in 0..plies {
            let moves = generate_moves(&board, side);
            let next = apply_move(&board, moves[rng.gen_range(0..moves.len())], side);
            if outcome(&next, side) != GameResult::Ongoing {
                break;
            }
            board = next;
            side = side.opponent();
        }
        (board, side)
    }

    #[test]
    fn test_completes_open_row() {
        let board: Board = "XXXX.\n.....\n.....\n.....\n.....".parse().unwrap();
        let bot = QuixoBot::new(Side::X);
        let next = bot.play_turn(&board);

        assert!(is_winner(&next, Side::X));
        assert_eq!(next.row(0), [Side::X.cell(); 5]);
    }

    #[test]
    fn test_no_legal_move_returns_board() {
        let board: Board = "OOOOO\nO...O\nO.X.O\nO...O\nOOOOO".parse().unwrap();
        let bot = QuixoBot::new(Side::X);
        let outcome = bot.search(&board);

        assert_eq!(outcome.mv, None);
        assert_eq!(outcome.board, board);
        assert_eq!(bot.play_turn(&board), board);
    }

    #[test]
    fn test_decision_is_deterministic() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let (board, side) = random_position(&mut rng, 8);
        let bot = QuixoBot::new(side);
        assert_eq!(bot.play_turn(&board), bot.play_turn(&board));
    }

    #[test]
    fn test_pruning_matches_full_width() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        for plies in [0, 4, 8, 12, 16] {
            let (board, side) = random_position(&mut rng, plies);
            let pruned = QuixoBot::new(side).search(&board);
            let full = QuixoBot::new(side)
                .with_search(SearchConfig {
                    pruning: false,
                    ..SearchConfig::default()
                })
                .search(&board);

            assert_eq!(pruned.mv, full.mv);
            assert_eq!(pruned.score, full.score);
            assert!(pruned.stats.nodes <= full.stats.nodes);
            assert_eq!(full.stats.cutoffs, 0);
        }
    }

    #[test]
    fn test_pruning_matches_full_width_deeper() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let (board, side) = random_position(&mut rng, 10);
        let search = SearchConfig { depth: 2, pruning: true };
        let pruned = QuixoBot::new(side).with_search(search).search(&board);
        let full = QuixoBot::new(side)
            .with_search(SearchConfig { pruning: false, ..search })
            .search(&board);

        assert_eq!(pruned.mv, full.mv);
        assert_eq!(pruned.score, full.score);
        assert!(pruned.stats.nodes < full.stats.nodes);
    }

    #[test]
    fn test_reset_switches_sides() {
        let mut bot = QuixoBot::new(Side::X);
        assert_eq!(bot.opponent(), Side::O);
        bot.reset(Side::O);
        assert_eq!(bot.side(), Side::O);
        assert_eq!(bot.opponent(), Side::X);

        let board: Board = "OOOO.\n.....\n.....\n.....\n.....".parse().unwrap();
        assert!(is_winner(&bot.play_turn(&board), Side::O));
    }

    #[test]
    fn test_minimax_cutoff_on_terminal() {
        let heuristics = Heuristics::default();
        let board: Board = "OOOOO\n.....\n.....\n.....\n.....".parse().unwrap();
        let mut searcher = Searcher::new(Side::X, &heuristics, true);
        let value = searcher.minimax(&board, 3, Score::MIN, Score::MAX, true);

        assert_eq!(value, evaluate(&board, Side::X, &heuristics));
        assert_eq!(searcher.stats().nodes, 1);
    }

    #[test]
    fn test_first_move_wins_ties() {
        // A lone mark scores nothing, so every root move ties at 0
        // and the first generated move is kept.
        let bot = QuixoBot::new(Side::X).with_search(SearchConfig { depth: 0, pruning: true });
        let board = Board::new();
        let chosen = bot.best_move(&board).unwrap();

        let best_value = generate_moves(&board, Side::X)
            .into_iter()
            .map(|mv| bot.evaluate(&apply_move(&board, mv, Side::X)))
            .max()
            .unwrap();
        let first_best = generate_moves(&board, Side::X)
            .into_iter()
            .find(|&mv| bot.evaluate(&apply_move(&board, mv, Side::X)) == best_value)
            .unwrap();
        assert_eq!(chosen, first_best);
        assert_eq!(chosen, Move::new(0, 0, Direction::Right));
    }
}
