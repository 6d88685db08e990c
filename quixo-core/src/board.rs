//! 5x5 Quixo board with row-major cells

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::QuixoError;

/// Board width and height
pub const BOARD_SIZE: usize = 5;

/// Number of winning lines (5 rows, 5 columns, 2 diagonals)
pub const LINE_COUNT: usize = 2 * BOARD_SIZE + 2;

/// One of the 12 winning lines, in board order
pub type Line = [Cell; BOARD_SIZE];

// ============================================================================
// SIDES AND CELLS
// ============================================================================

/// Player mark. The two sides are additive inverses of each other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    X,
    O,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::X => Side::O,
            Side::O => Side::X,
        }
    }

    /// Signed symbol: X = 1, O = -1
    pub fn symbol(self) -> i8 {
        match self {
            Side::X => 1,
            Side::O => -1,
        }
    }

    pub fn cell(self) -> Cell {
        match self {
            Side::X => Cell::X,
            Side::O => Cell::O,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::X => "X",
            Side::O => "O",
        })
    }
}

impl FromStr for Side {
    type Err = QuixoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "X" | "x" | "1" => Ok(Side::X),
            "O" | "o" | "-1" => Ok(Side::O),
            other => Err(QuixoError::UnknownSide(other.to_string())),
        }
    }
}

/// Cell contents
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum Cell {
    #[default]
    Empty = 0,
    X = 1,
    O = -1,
}

impl Cell {
    pub fn symbol(self) -> i8 {
        self as i8
    }

    /// True if the cell holds `side`'s mark
    pub fn is(self, side: Side) -> bool {
        self == side.cell()
    }

    fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }
}

impl TryFrom<i8> for Cell {
    type Error = QuixoError;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Cell::Empty),
            1 => Ok(Cell::X),
            -1 => Ok(Cell::O),
            other => Err(QuixoError::InvalidCell(other)),
        }
    }
}

impl TryFrom<char> for Cell {
    type Error = QuixoError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            '.' | '_' | '0' => Ok(Cell::Empty),
            'X' | 'x' => Ok(Cell::X),
            'O' | 'o' => Ok(Cell::O),
            other => Err(QuixoError::InvalidSymbol(other)),
        }
    }
}

// ============================================================================
// BOARD
// ============================================================================

/// Board snapshot (copy to mutate)
///
/// Serialized as a nested 5x5 array of `-1 / 0 / 1`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<i8>>", into = "Vec<Vec<i8>>")]
pub struct Board {
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// Empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// Cell at (row, col). Panics when out of range.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Cell {
        assert!(
            row < BOARD_SIZE && col < BOARD_SIZE,
            "cell ({row}, {col}) is off the board"
        );
        self.cells[row][col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        assert!(
            row < BOARD_SIZE && col < BOARD_SIZE,
            "cell ({row}, {col}) is off the board"
        );
        self.cells[row][col] = cell;
    }

    pub fn row(&self, row: usize) -> Line {
        std::array::from_fn(|col| self.get(row, col))
    }

    pub fn column(&self, col: usize) -> Line {
        std::array::from_fn(|row| self.get(row, col))
    }

    /// Top-left to bottom-right
    pub fn diagonal(&self) -> Line {
        std::array::from_fn(|i| self.get(i, i))
    }

    /// Top-right to bottom-left
    pub fn anti_diagonal(&self) -> Line {
        std::array::from_fn(|i| self.get(i, BOARD_SIZE - 1 - i))
    }

    /// All 12 lines: rows, then columns, then the two diagonals
    pub fn lines(&self) -> [Line; LINE_COUNT] {
        std::array::from_fn(|i| match i {
            i if i < BOARD_SIZE => self.row(i),
            i if i < 2 * BOARD_SIZE => self.column(i - BOARD_SIZE),
            i if i == 2 * BOARD_SIZE => self.diagonal(),
            _ => self.anti_diagonal(),
        })
    }

    /// Number of cells holding `cell`
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().flatten().filter(|&&c| c == cell).count()
    }

    /// True if (row, col) is on the outer ring
    pub fn is_border(row: usize, col: usize) -> bool {
        row == 0 || row == BOARD_SIZE - 1 || col == 0 || col == BOARD_SIZE - 1
    }
}

impl TryFrom<Vec<Vec<i8>>> for Board {
    type Error = QuixoError;

    fn try_from(rows: Vec<Vec<i8>>) -> Result<Self, Self::Error> {
        let shape_error = || QuixoError::InvalidBoardShape {
            rows: rows.len(),
            cols: rows.iter().map(Vec::len).max().unwrap_or(0),
        };
        if rows.len() != BOARD_SIZE || rows.iter().any(|r| r.len() != BOARD_SIZE) {
            return Err(shape_error());
        }
        let mut board = Board::new();
        for (r, row) in rows.iter().enumerate() {
            for (c, &value) in row.iter().enumerate() {
                board.cells[r][c] = Cell::try_from(value)?;
            }
        }
        Ok(board)
    }
}

impl From<Board> for Vec<Vec<i8>> {
    fn from(board: Board) -> Self {
        board
            .cells
            .iter()
            .map(|row| row.iter().map(|c| c.symbol()).collect())
            .collect()
    }
}

impl FromStr for Board {
    type Err = QuixoError;

    /// Parse five lines of five symbols (`X`, `O`, `.`); whitespace inside a line is ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<Vec<char>> = s
            .lines()
            .map(|line| line.chars().filter(|c| !c.is_whitespace()).collect::<Vec<_>>())
            .filter(|row| !row.is_empty())
            .collect();

        if rows.len() != BOARD_SIZE || rows.iter().any(|r| r.len() != BOARD_SIZE) {
            return Err(QuixoError::InvalidBoardShape {
                rows: rows.len(),
                cols: rows.iter().map(Vec::len).max().unwrap_or(0),
            });
        }

        let mut board = Board::new();
        for (r, row) in rows.iter().enumerate() {
            for (c, &ch) in row.iter().enumerate() {
                board.cells[r][c] = Cell::try_from(ch)?;
            }
        }
        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            let line: String = row.iter().map(|c| c.to_char()).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_inverse() {
        assert_eq!(Side::X.opponent(), Side::O);
        assert_eq!(Side::O.opponent(), Side::X);
        assert_eq!(Side::X.symbol(), -Side::O.symbol());
    }

    #[test]
    fn test_lines_preserve_order() {
        let board: Board = "XO...\n.X...\n..O..\n...X.\nO...X".parse().unwrap();
        assert_eq!(board.row(0), [Cell::X, Cell::O, Cell::Empty, Cell::Empty, Cell::Empty]);
        assert_eq!(board.column(0), [Cell::X, Cell::Empty, Cell::Empty, Cell::Empty, Cell::O]);
        assert_eq!(board.diagonal(), [Cell::X, Cell::X, Cell::O, Cell::X, Cell::X]);
        assert_eq!(board.anti_diagonal(), [Cell::Empty, Cell::Empty, Cell::O, Cell::Empty, Cell::O]);

        let lines = board.lines();
        assert_eq!(lines.len(), LINE_COUNT);
        assert_eq!(lines[0], board.row(0));
        assert_eq!(lines[5], board.column(0));
        assert_eq!(lines[10], board.diagonal());
        assert_eq!(lines[11], board.anti_diagonal());
    }

    #[test]
    #[should_panic(expected = "off the board")]
    fn test_out_of_range_panics() {
        Board::new().get(5, 0);
    }

    #[test]
    fn test_text_roundtrip() {
        let text = "X...O\n.....\n..X..\n.....\nO...X\n";
        let board: Board = text.parse().unwrap();
        assert_eq!(board.to_string(), text);
        assert_eq!(board.count(Cell::X), 3);
        assert_eq!(board.count(Cell::O), 2);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "XXXX\n.....\n.....\n.....\n.....".parse::<Board>(),
            Err(QuixoError::InvalidBoardShape { .. })
        ));
        assert!(matches!(
            "XXXXZ\n.....\n.....\n.....\n.....".parse::<Board>(),
            Err(QuixoError::InvalidSymbol('Z'))
        ));
    }

    #[test]
    fn test_json_uses_signed_symbols() {
        let board: Board = "X....\n.....\n.....\n.....\n....O".parse().unwrap();
        let json = serde_json::to_string(&board).unwrap();
        assert!(json.starts_with("[[1,0,0,0,0]"));
        assert!(json.ends_with("[0,0,0,0,-1]]"));

        let back: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(back, board);

        assert!(serde_json::from_str::<Board>("[[2,0,0,0,0]]").is_err());
    }

    #[test]
    fn test_nested_rows_must_be_five_by_five() {
        let mut rows = vec![vec![0i8; BOARD_SIZE]; BOARD_SIZE];
        rows[2][3] = -1;
        let board = Board::try_from(rows.clone()).unwrap();
        assert_eq!(board.get(2, 3), Cell::O);

        rows[4].push(0);
        assert!(matches!(
            Board::try_from(rows),
            Err(QuixoError::InvalidBoardShape { .. })
        ));
        assert!(matches!(
            Board::try_from(vec![vec![0i8; BOARD_SIZE]; 4]),
            Err(QuixoError::InvalidBoardShape { .. })
        ));
        assert!(matches!(
            Board::try_from(vec![vec![3i8; BOARD_SIZE]; BOARD_SIZE]),
            Err(QuixoError::InvalidCell(3))
        ));
    }

    #[test]
    fn test_border_ring() {
        let border = (0..BOARD_SIZE)
            .flat_map(|r| (0..BOARD_SIZE).map(move |c| (r, c)))
            .filter(|&(r, c)| Board::is_border(r, c))
            .count();
        assert_eq!(border, 16);
        assert!(!Board::is_border(2, 2));
    }
}
