use gomoku_core::Move;

/// The principal variation line found by one search call.
#[derive(Default)]
pub struct PvLine {
    moves: Vec<Move>,
}

impl PvLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.moves.clear();
    }

    pub fn first(&self) -> Option<Move> {
        self.moves.first().copied()
    }

    pub fn update_line(&mut self, mv: Move, child: &mut Self) {
        self.moves.clear();
        self.moves.push(mv);
        self.moves.append(&mut child.moves);
    }
}
