use gomoku_core::Move;

/// Which bound `value` represents relative to the window it was searched
/// with (spec.md §3's Transposition Entry).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    Exact,
    Lower,
    Upper,
}

#[derive(Debug, Clone, Copy)]
pub struct Entry {
    pub value: i64,
    pub depth: u8,
    pub flag: Flag,
    pub age: u32,
    pub best_move: Option<Move>,
}
