//! Position evaluation

use serde::{Deserialize, Serialize};

use crate::board::{Board, Cell, Line, Side, LINE_COUNT};
use crate::error::{QuixoError, Result};

/// Heuristic score in bonus units
pub type Score = i32;

/// Line bonus tables.
///
/// Two independent bonuses are summed per line: one keyed on how many cells
/// the side holds with every other cell empty, one keyed on the longest
/// contiguous run of the side's marks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heuristics {
    /// 5 marks, 0 empty
    pub full_line: Score,
    /// 4 marks, 1 empty
    pub four_open: Score,
    /// 3 marks, 2 empty
    pub three_open: Score,
    /// 2 marks, 3 empty
    pub two_open: Score,
    /// Indexed by longest run length (0..=5)
    pub run_bonus: [Score; 6],
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            full_line: 2003,
            four_open: 50,
            three_open: 16,
            two_open: 5,
            // A run of 5 is already paid for by `full_line`
            run_bonus: [0, 0, 5, 50, 2003, 0],
        }
    }
}

impl Heuristics {
    fn split_bonus(&self, count: usize, empty: usize) -> Score {
        match (count, empty) {
            (5, 0) => self.full_line,
            (4, 1) => self.four_open,
            (3, 2) => self.three_open,
            (2, 3) => self.two_open,
            _ => 0,
        }
    }

    /// Check that the tables are safe to search with.
    ///
    /// Every score must fit in `Score`: a line is worth at most the largest split
    /// bonus plus the largest run bonus, counted for both sides on all lines.
    /// Then each winning-class bonus (a full line with its run-of-5 bonus, or a
    /// run of 4) must outweigh every non-winning bonus one side could collect
    /// across all lines at once.
    pub fn validate(&self) -> Result<()> {
        let splits = [self.full_line, self.four_open, self.three_open, self.two_open];
        let largest = |values: &[Score]| {
            values
                .iter()
                .map(|&v| i64::from(v).abs())
                .max()
                .unwrap_or(0)
        };
        let peak = (largest(&splits[..]) + largest(&self.run_bonus[..])) * 2 * LINE_COUNT as i64;
        if peak > i64::from(Score::MAX) {
            return Err(QuixoError::HeuristicsOverflow { peak });
        }

        let best_split = i64::from(self.four_open.max(self.three_open).max(self.two_open).max(0));
        let best_run = i64::from(self.run_bonus[..4].iter().copied().max().unwrap_or(0).max(0));
        let non_winning = LINE_COUNT as i64 * (best_split + best_run);
        let full = i64::from(self.full_line) + i64::from(self.run_bonus[5]);
        let winning = full.min(i64::from(self.run_bonus[4]));

        if winning <= non_winning {
            // Both fit in `Score`: each is bounded by `peak`
            return Err(QuixoError::WeakHeuristics {
                winning: winning as Score,
                non_winning: non_winning as Score,
            });
        }
        Ok(())
    }
}

/// Heuristic value of a single line for `side`
pub fn line_value(line: &Line, side: Side, heuristics: &Heuristics) -> Score {
    let mut count = 0;
    let mut empty = 0;
    let mut run = 0;
    let mut longest = 0;

    for &cell in line {
        if cell.is(side) {
            count += 1;
            run += 1;
            longest = longest.max(run);
        } else {
            if cell == Cell::Empty {
                empty += 1;
            }
            run = 0;
        }
    }

    heuristics.split_bonus(count, empty) + heuristics.run_bonus[longest]
}

/// Evaluate `board` from `side`'s perspective.
///
/// Antisymmetric: `evaluate(b, s) == -evaluate(b, s.opponent())`.
pub fn evaluate(board: &Board, side: Side, heuristics: &Heuristics) -> Score {
    let opponent = side.opponent();
    board
        .lines()
        .iter()
        .map(|line| line_value(line, side, heuristics) - line_value(line, opponent, heuristics))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BOARD_SIZE;
    use rand::prelude::*;
    use rand_chacha::ChaCha8Rng;

    fn line(s: &str) -> Line {
        let cells: Vec<Cell> = s.chars().map(|c| Cell::try_from(c).unwrap()).collect();
        cells.try_into().unwrap()
    }

    #[test]
    fn test_line_values() {
        let h = Heuristics::default();
        assert_eq!(line_value(&line("XXXXX"), Side::X, &h), 2003);
        assert_eq!(line_value(&line("XXXX."), Side::X, &h), 50 + 2003);
        assert_eq!(line_value(&line("XX.XX"), Side::X, &h), 50 + 5);
        assert_eq!(line_value(&line("X.X.X"), Side::X, &h), 16);
        assert_eq!(line_value(&line("XXX.."), Side::X, &h), 16 + 50);
        assert_eq!(line_value(&line("XX..."), Side::X, &h), 5 + 5);
        assert_eq!(line_value(&line("XXO.."), Side::X, &h), 5);
        assert_eq!(line_value(&line("XOXOX"), Side::X, &h), 0);
        assert_eq!(line_value(&line("....."), Side::X, &h), 0);
    }

    #[test]
    fn test_opponent_breaks_run_like_empty() {
        let h = Heuristics::default();
        assert_eq!(line_value(&line("XXOXX"), Side::X, &h), 5);
        assert_eq!(line_value(&line("XX.XX"), Side::X, &h) - 50, 5);
    }

    #[test]
    fn test_empty_board_is_even() {
        assert_eq!(evaluate(&Board::new(), Side::X, &Heuristics::default()), 0);
    }

    #[test]
    fn test_evaluate_antisymmetric() {
        let h = Heuristics::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..200 {
            let mut board = Board::new();
            for r in 0..BOARD_SIZE {
                for c in 0..BOARD_SIZE {
                    let cell = [Cell::Empty, Cell::X, Cell::O][rng.gen_range(0..3)];
                    board.set(r, c, cell);
                }
            }
            assert_eq!(evaluate(&board, Side::X, &h), -evaluate(&board, Side::O, &h));
        }
    }

    #[test]
    fn test_completed_line_dominates() {
        let h = Heuristics::default();
        let won: Board = "XXXXX\n.....\n.....\n.....\n.....".parse().unwrap();
        let strong: Board = "XXXX.\nXXX..\nXX...\nX....\n.....".parse().unwrap();
        assert!(evaluate(&won, Side::X, &h) > 0);
        assert!(evaluate(&won, Side::X, &h) >= h.full_line);
        assert!(evaluate(&strong, Side::O, &h) < 0);
    }

    #[test]
    fn test_validate() {
        assert!(Heuristics::default().validate().is_ok());

        let weak = Heuristics {
            four_open: 500,
            ..Heuristics::default()
        };
        assert!(matches!(
            weak.validate(),
            Err(QuixoError::WeakHeuristics { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_tables_that_overflow() {
        // Large enough to overflow the dominance product itself
        let huge = Heuristics {
            full_line: 2_000_000_000,
            four_open: 500_000_000,
            run_bonus: [0, 0, 5, 50, 2_000_000_000, 0],
            ..Heuristics::default()
        };
        assert!(matches!(
            huge.validate(),
            Err(QuixoError::HeuristicsOverflow { .. })
        ));

        // Dominant, but summing both sides over all lines would overflow
        let dominant = Heuristics {
            full_line: 1_000_000_000,
            run_bonus: [0, 0, 5, 50, 1_000_000_000, 0],
            ..Heuristics::default()
        };
        assert!(matches!(
            dominant.validate(),
            Err(QuixoError::HeuristicsOverflow { .. })
        ));
    }

    #[test]
    fn test_accepted_tables_evaluate_without_overflow() {
        let h = Heuristics {
            full_line: 40_000_000,
            run_bonus: [0, 0, 5, 50, 40_000_000, 0],
            ..Heuristics::default()
        };
        assert!(h.validate().is_ok());

        let board: Board = "XXXX.\nXXXX.\nXXXX.\n.....\n.....".parse().unwrap();
        let score = evaluate(&board, Side::X, &h);
        assert!(score > 0);
        assert_eq!(score, -evaluate(&board, Side::O, &h));
    }

    #[test]
    fn test_validate_counts_run_of_five() {
        let negative = Heuristics {
            run_bonus: [0, 0, 5, 50, 2003, -1900],
            ..Heuristics::default()
        };
        assert!(matches!(
            negative.validate(),
            Err(QuixoError::WeakHeuristics { .. })
        ));

        let huge = Heuristics {
            run_bonus: [0, 0, 5, 50, 2003, Score::MAX],
            ..Heuristics::default()
        };
        assert!(matches!(
            huge.validate(),
            Err(QuixoError::HeuristicsOverflow { .. })
        ));
    }
}
