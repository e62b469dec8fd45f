use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::Player;

/// The seed used to build every Zobrist table. Fixed so that "the same
/// board dimensions always produce the same table across runs" (spec.md
/// §4.1), mirroring `Board._init_zobrist`'s `random.seed(42)` in the
/// original implementation.
const ZOBRIST_SEED: u64 = 42;

/// Per-(x, y, player) XOR keys for one board size. Shared behind an `Arc`
/// so that `Board::copy` (spec.md §4.1) is a cheap clone rather than a
/// re-derivation of the whole table.
pub struct ZobristTable {
    width: u16,
    keys: Vec<u64>,
}

impl ZobristTable {
    fn build(width: u16, height: u16) -> Self {
        let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED ^ ((width as u64) << 32) ^ height as u64);
        let count = width as usize * height as usize * 2;
        let keys = (0..count).map(|_| rng.gen::<u64>()).collect();
        Self { width, keys }
    }

    #[inline]
    pub fn key(&self, x: u16, y: u16, player: Player) -> u64 {
        let index = (y as usize * self.width as usize + x as usize) * 2 + player.to_index();
        self.keys[index]
    }
}

static TABLES: Lazy<Mutex<HashMap<(u16, u16), Arc<ZobristTable>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Returns the (lazily built, process-wide cached) Zobrist table for a given
/// board size. Building is O(width*height) and happens at most once per
/// distinct size ever requested.
pub fn table_for(width: u16, height: u16) -> Arc<ZobristTable> {
    let mut tables = TABLES.lock().unwrap();
    tables
        .entry((width, height))
        .or_insert_with(|| Arc::new(ZobristTable::build(width, height)))
        .clone()
}
