use std::fmt;

/// Fallible-seam errors for [`crate::Board`]. These are the `InvalidState`
/// and `ConfigError` roles from spec.md §7 — the board itself never needs
/// anything richer, since search failures (`NoMove`) and timing
/// (`DeadlineExceeded`) are orchestrator-level concerns, not board ones.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// `place_stone` on a cell that is already occupied.
    Occupied { x: u16, y: u16 },
    /// A coordinate outside `[0, width) x [0, height)`.
    OutOfBounds { x: u16, y: u16 },
    /// `undo_stone` called on a cell that doesn't hold the expected stone.
    NotPresent { x: u16, y: u16 },
    /// `initialize_board` with a non-positive width or height.
    InvalidDimensions { width: u16, height: u16 },
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            BoardError::Occupied { x, y } => write!(f, "cell ({x},{y}) is already occupied"),
            BoardError::OutOfBounds { x, y } => write!(f, "cell ({x},{y}) is out of bounds"),
            BoardError::NotPresent { x, y } => {
                write!(f, "cell ({x},{y}) does not hold the expected stone")
            }
            BoardError::InvalidDimensions { width, height } => {
                write!(f, "invalid board dimensions {width}x{height}")
            }
        }
    }
}

impl std::error::Error for BoardError {}
