//! Win detection, move generation and move application

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Cell, Side, BOARD_SIZE};
use crate::error::QuixoError;

const LAST: usize = BOARD_SIZE - 1;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Push direction: the edge of the row/column the picked-up cube is re-inserted at
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn to_char(self) -> char {
        match self {
            Direction::Up => 'U',
            Direction::Down => 'D',
            Direction::Left => 'L',
            Direction::Right => 'R',
        }
    }
}

impl TryFrom<char> for Direction {
    type Error = QuixoError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c.to_ascii_uppercase() {
            'U' => Ok(Direction::Up),
            'D' => Ok(Direction::Down),
            'L' => Ok(Direction::Left),
            'R' => Ok(Direction::Right),
            _ => Err(QuixoError::InvalidDirection(c)),
        }
    }
}

/// A move: pick up the border cube at (row, col) and push it in `direction`.
/// Only meaningful relative to a board and a mover.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub row: usize,
    pub col: usize,
    pub direction: Direction,
}

impl Move {
    pub const fn new(row: usize, col: usize, direction: Direction) -> Self {
        Self { row, col, direction }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}) {}", self.row, self.col, self.direction.to_char())
    }
}

/// Game result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Ongoing,
    Winner(Side),
}

// ============================================================================
// WIN DETECTION
// ============================================================================

/// True if `side` fills at least one row, column or diagonal
pub fn is_winner(board: &Board, side: Side) -> bool {
    board
        .lines()
        .iter()
        .any(|line| line.iter().all(|cell| cell.is(side)))
}

/// Adjudicate a board right after `mover` moved.
///
/// When both sides hold a complete line the side that did not move wins:
/// completing the opponent's line loses even if it completes your own.
pub fn outcome(board: &Board, mover: Side) -> GameResult {
    let mover_line = is_winner(board, mover);
    let other_line = is_winner(board, mover.opponent());
    match (mover_line, other_line) {
        (_, true) => GameResult::Winner(mover.opponent()),
        (true, false) => GameResult::Winner(mover),
        (false, false) => GameResult::Ongoing,
    }
}

// ============================================================================
// MOVE GENERATION
// ============================================================================

/// All legal moves for `side`.
///
/// Top and bottom rows are scanned first (corners included), then the left and
/// right columns over the interior rows, so every corner is visited once.
pub fn generate_moves(board: &Board, side: Side) -> Vec<Move> {
    let mut moves = Vec::with_capacity(44);
    let selectable = |row: usize, col: usize| {
        let cell = board.get(row, col);
        cell.is(side) || cell == Cell::Empty
    };

    for row in [0, LAST] {
        for col in 0..BOARD_SIZE {
            if !selectable(row, col) {
                continue;
            }
            if col > 0 {
                moves.push(Move::new(row, col, Direction::Left));
            }
            if col < LAST {
                moves.push(Move::new(row, col, Direction::Right));
            }
            let vertical = if row == 0 { Direction::Down } else { Direction::Up };
            moves.push(Move::new(row, col, vertical));
        }
    }

    for col in [0, LAST] {
        for row in 1..LAST {
            if !selectable(row, col) {
                continue;
            }
            moves.push(Move::new(row, col, Direction::Up));
            moves.push(Move::new(row, col, Direction::Down));
            let horizontal = if col == 0 { Direction::Right } else { Direction::Left };
            moves.push(Move::new(row, col, horizontal));
        }
    }

    moves
}

/// True if `mv` is one of the moves `side` may play on `board`
pub fn is_legal(board: &Board, mv: Move, side: Side) -> bool {
    generate_moves(board, side).contains(&mv)
}

// ============================================================================
// MOVE APPLICATION
// ============================================================================

/// Board after `side` plays `mv`.
///
/// The cube at (row, col) is removed, the cells between it and the target edge
/// slide one step toward the gap, and `side`'s mark fills the edge slot.
/// `mv` must be legal for `board` and `side`.
pub fn apply_move(board: &Board, mv: Move, side: Side) -> Board {
    debug_assert!(is_legal(board, mv, side), "illegal move {} for {}", mv, side);

    let mut next = *board;
    let Move { row, col, direction } = mv;
    match direction {
        Direction::Up => {
            for i in (1..=row).rev() {
                next.set(i, col, next.get(i - 1, col));
            }
            next.set(0, col, side.cell());
        }
        Direction::Down => {
            for i in row..LAST {
                next.set(i, col, next.get(i + 1, col));
            }
            next.set(LAST, col, side.cell());
        }
        Direction::Left => {
            for i in (1..=col).rev() {
                next.set(row, i, next.get(row, i - 1));
            }
            next.set(row, 0, side.cell());
        }
        Direction::Right => {
            for i in col..LAST {
                next.set(row, i, next.get(row, i + 1));
            }
            next.set(row, LAST, side.cell());
        }
    }
    next
}

// ============================================================================
// GAME DRIVER
// ============================================================================

/// Game in progress: board, side to move and move history
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    to_move: Side,
    history: Vec<(Side, Move)>,
}

impl Game {
    /// Empty board with `first` to move
    pub fn new(first: Side) -> Self {
        Self::from_board(Board::new(), first)
    }

    pub fn from_board(board: Board, to_move: Side) -> Self {
        Self {
            board,
            to_move,
            history: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn to_move(&self) -> Side {
        self.to_move
    }

    pub fn history(&self) -> &[(Side, Move)] {
        &self.history
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        generate_moves(&self.board, self.to_move)
    }

    /// Play `mv` for the side to move. Panics if the move is illegal.
    pub fn play(&mut self, mv: Move) -> GameResult {
        assert!(
            is_legal(&self.board, mv, self.to_move),
            "illegal move {} for {}",
            mv,
            self.to_move
        );
        self.board = apply_move(&self.board, mv, self.to_move);
        self.history.push((self.to_move, mv));
        self.to_move = self.to_move.opponent();
        self.result()
    }

    /// Result as seen after the last move
    pub fn result(&self) -> GameResult {
        outcome(&self.board, self.to_move.opponent())
    }
}
