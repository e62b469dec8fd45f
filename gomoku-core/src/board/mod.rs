mod zobrist;

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use crate::{BoardError, Player};
use zobrist::ZobristTable;

/// The four line directions a five-in-a-row can run along: horizontal,
/// vertical, and the two diagonals. Shared by `check_win`, line-window
/// extraction, and every threat scanner built on top of this board.
pub const DIRECTIONS: [(i32, i32); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

/// Length of a line needed to win.
pub const WIN_LENGTH: usize = 5;

/// Radius (Chebyshev distance) that `get_valid_moves` expands around
/// existing stones (spec.md §4.1).
pub const DEFAULT_MOVE_RADIUS: u16 = 2;

/// Radius (Chebyshev distance) that a mutation dirties for incremental
/// evaluation (spec.md §3 invariant (c)). Line windows only ever reach 4
/// cells either side of a stone, so this is the tightest radius that still
/// satisfies the invariant (spec.md §9 Open Questions explicitly allows
/// narrowing from the naive 9x9 neighborhood down to this).
pub const EVAL_DIRTY_RADIUS: i32 = 4;

pub const DEFAULT_BOARD_SIZE: u16 = 20;

/// A single length-9 line window, centered on index 4, over the alphabet
/// `{.,#,1,2}` (spec.md §3). `#` marks a step that left the board.
pub type LineWindow = [u8; 9];

/// A board coordinate, `(x, y)`, also doubling as a move: "play at this
/// cell". Kept as a bare tuple (not a newtype) since every crate in this
/// workspace treats coordinates this way and a wrapper would only add
/// noise at the many call sites that destructure it.
pub type Move = (u16, u16);

/// Square grid position state: move count, incremental Zobrist hash, and
/// the dirty-set that downstream incremental evaluators (gomoku-engine's
/// `Evaluator`) consume and clear. Evaluation scores themselves are *not*
/// stored here — they depend on the Pattern Catalog, which lives one layer
/// up, in gomoku-engine — but the bookkeeping needed to maintain them
/// incrementally is, since it is purely a function of stone placement.
#[derive(Clone)]
pub struct Board {
    width: u16,
    height: u16,
    cells: Vec<Option<Player>>,
    move_count: u32,
    hash: u64,
    zobrist: Arc<ZobristTable>,
    occupied: BTreeSet<(u16, u16)>,
    dirty: HashSet<(u16, u16)>,
}

impl Board {
    /// `initialize_board(W, H)` from spec.md §4.9's collaborator contract.
    pub fn new(width: u16, height: u16) -> Result<Self, BoardError> {
        if width == 0 || height == 0 {
            return Err(BoardError::InvalidDimensions { width, height });
        }

        Ok(Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
            move_count: 0,
            hash: 0,
            zobrist: zobrist::table_for(width, height),
            occupied: BTreeSet::new(),
            dirty: HashSet::new(),
        })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn zobrist_key(&self) -> u64 {
        self.hash
    }

    pub fn center(&self) -> (u16, u16) {
        (self.width / 2, self.height / 2)
    }

    pub fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Player> {
        if !self.in_bounds(x, y) {
            return None;
        }
        self.cells[self.index(x, y)]
    }

    pub fn is_empty(&self, x: u16, y: u16) -> bool {
        self.in_bounds(x, y) && self.cells[self.index(x, y)].is_none()
    }

    pub fn is_full(&self) -> bool {
        self.move_count as usize == self.width as usize * self.height as usize
    }

    /// Places `player`'s stone at `(x, y)`, updating the move count, the
    /// Zobrist hash, and the dirty-set in one step. Fails with `Occupied`
    /// on a non-empty cell (spec.md §4.1) or `OutOfBounds` off the grid.
    pub fn place_stone(&mut self, x: u16, y: u16, player: Player) -> Result<(), BoardError> {
        if !self.in_bounds(x, y) {
            return Err(BoardError::OutOfBounds { x, y });
        }
        let idx = self.index(x, y);
        if self.cells[idx].is_some() {
            return Err(BoardError::Occupied { x, y });
        }

        self.cells[idx] = Some(player);
        self.move_count += 1;
        self.hash ^= self.zobrist.key(x, y, player);
        self.occupied.insert((x, y));
        self.mark_dirty(x, y);
        Ok(())
    }

    /// Inverse of `place_stone`. Requires the cell to currently hold
    /// `player` — this is the "stack-discipline" invariant (spec.md §3)
    /// that lets search use place/undo instead of cloning.
    pub fn undo_stone(&mut self, x: u16, y: u16, player: Player) -> Result<(), BoardError> {
        if !self.in_bounds(x, y) {
            return Err(BoardError::OutOfBounds { x, y });
        }
        let idx = self.index(x, y);
        if self.cells[idx] != Some(player) {
            return Err(BoardError::NotPresent { x, y });
        }

        self.cells[idx] = None;
        self.move_count -= 1;
        self.hash ^= self.zobrist.key(x, y, player);
        self.occupied.remove(&(x, y));
        self.mark_dirty(x, y);
        Ok(())
    }

    fn mark_dirty(&mut self, x: u16, y: u16) {
        let (cx, cy) = (x as i32, y as i32);
        for dy in -EVAL_DIRTY_RADIUS..=EVAL_DIRTY_RADIUS {
            for dx in -EVAL_DIRTY_RADIUS..=EVAL_DIRTY_RADIUS {
                let (nx, ny) = (cx + dx, cy + dy);
                if nx >= 0 && ny >= 0 && (nx as u16) < self.width && (ny as u16) < self.height {
                    self.dirty.insert((nx as u16, ny as u16));
                }
            }
        }
    }

    /// Drains and returns the set of cells whose cached evaluation needs
    /// recomputing. Consumers (the Evaluator) call this once per decision
    /// after all search-time place/undo pairs have unwound, since dirtying
    /// during search is transient and self-cancelling.
    pub fn take_dirty(&mut self) -> HashSet<(u16, u16)> {
        std::mem::take(&mut self.dirty)
    }

    pub fn dirty_cells(&self) -> &HashSet<(u16, u16)> {
        &self.dirty
    }

    /// Every empty cell within `DEFAULT_MOVE_RADIUS` of an occupied one, or
    /// just the center on an empty board (spec.md §4.1). Order is sorted by
    /// `(y, x)` so it is deterministic across runs — the spec only requires
    /// determinism, not any particular order.
    pub fn get_valid_moves(&self) -> Vec<(u16, u16)> {
        self.get_valid_moves_within(DEFAULT_MOVE_RADIUS)
    }

    pub fn get_valid_moves_within(&self, radius: u16) -> Vec<(u16, u16)> {
        if self.occupied.is_empty() {
            return vec![self.center()];
        }

        let r = radius as i32;
        let mut candidates = BTreeSet::new();
        for &(x, y) in &self.occupied {
            let (cx, cy) = (x as i32, y as i32);
            for dy in -r..=r {
                for dx in -r..=r {
                    let (nx, ny) = (cx + dx, cy + dy);
                    if nx >= 0 && ny >= 0 && (nx as u16) < self.width && (ny as u16) < self.height {
                        let (nx, ny) = (nx as u16, ny as u16);
                        if self.is_empty(nx, ny) {
                            candidates.insert((nx, ny));
                        }
                    }
                }
            }
        }
        candidates.into_iter().collect()
    }

    /// True iff `(x, y)` lies on a same-colored maximal line of length >= 5
    /// in any of the four directions (spec.md §4.1).
    pub fn check_win(&self, x: u16, y: u16, player: Player) -> bool {
        DIRECTIONS
            .iter()
            .any(|&(dx, dy)| self.count_line(x, y, dx, dy, player) >= WIN_LENGTH)
    }

    /// Total run length through `(x, y)` along `(dx, dy)` and its opposite,
    /// counting `(x, y)` itself. `(x, y)` need not currently hold `player`
    /// (callers probe hypothetical placements with place/undo around this).
    fn count_line(&self, x: u16, y: u16, dx: i32, dy: i32, player: Player) -> usize {
        1 + self.count_direction(x, y, dx, dy, player) + self.count_direction(x, y, -dx, -dy, player)
    }

    fn count_direction(&self, x: u16, y: u16, dx: i32, dy: i32, player: Player) -> usize {
        let mut count = 0;
        let (mut cx, mut cy) = (x as i32 + dx, y as i32 + dy);
        while cx >= 0 && cy >= 0 && (cx as u16) < self.width && (cy as u16) < self.height {
            if self.cells[self.index(cx as u16, cy as u16)] != Some(player) {
                break;
            }
            count += 1;
            cx += dx;
            cy += dy;
        }
        count
    }

    /// Extracts the length-9 line window centered on `(x, y)` along
    /// `(dx, dy)`, emitting `#` for any step that leaves the board
    /// (spec.md §3's Line Window / Pattern Catalog alphabet).
    pub fn line_window(&self, x: u16, y: u16, dx: i32, dy: i32) -> LineWindow {
        let mut window = [b'#'; 9];
        let (cx, cy) = (x as i32, y as i32);
        for (i, slot) in window.iter_mut().enumerate() {
            let step = i as i32 - 4;
            let (nx, ny) = (cx + step * dx, cy + step * dy);
            if nx >= 0 && ny >= 0 && (nx as u16) < self.width && (ny as u16) < self.height {
                *slot = match self.cells[self.index(nx as u16, ny as u16)] {
                    None => b'.',
                    Some(p) => p.to_digit(),
                };
            }
        }
        window
    }

    /// Deep clone, including hash, occupancy, and the dirty-set (spec.md
    /// §4.1's `copy`). `Board` already derives `Clone`; this is kept as an
    /// explicitly named alias since the spec calls the operation `copy`
    /// and callers (notably pondering, which hands a clone to a background
    /// task) read better spelling it out.
    pub fn copy(&self) -> Self {
        self.clone()
    }
}
