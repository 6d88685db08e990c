//! Error types for board parsing and configuration

/// Errors raised at the engine's input edges
#[derive(Debug, thiserror::Error)]
pub enum QuixoError {
    #[error("Invalid cell value: {0} (expected -1, 0 or 1)")]
    InvalidCell(i8),

    #[error("Invalid board shape: {rows} rows, widest row {cols} (expected 5x5)")]
    InvalidBoardShape { rows: usize, cols: usize },

    #[error("Invalid board symbol: {0:?}")]
    InvalidSymbol(char),

    #[error("Unknown side: {0:?} (expected X or O)")]
    UnknownSide(String),

    #[error("Invalid direction: {0:?} (expected U, D, L or R)")]
    InvalidDirection(char),

    #[error("Winning bonus {winning} does not dominate non-winning total {non_winning}")]
    WeakHeuristics { winning: i32, non_winning: i32 },

    #[error("Heuristic bonuses too large: scores could reach {peak}, beyond the i32 range")]
    HeuristicsOverflow { peak: i64 },
}

/// Convenience Result type for engine operations
pub type Result<T> = std::result::Result<T, QuixoError>;
