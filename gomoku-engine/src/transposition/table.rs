use rustc_hash::FxHashMap;

use super::entry::Entry;

/// Fraction of the table evicted at once when it fills up. Evicting in
/// batches instead of one entry per over-capacity store keeps the
/// amortized cost of a store low — the alternative (a full scan to find
/// the single oldest entry on every store once the table is full) turns
/// every store into an O(n) operation.
const EVICTION_BATCH_FRACTION: f64 = 0.1;

/// Bounded, recency-evicting map from Zobrist hash to [`Entry`] (spec.md
/// §3's Transposition Entry, §4.10). Safe by construction: earlier
/// generations of this kind of table reached for an unsynchronized
/// raw-pointer scheme to avoid locking, which is not reproduced here —
/// this is a plain `HashMap` with a logical clock standing in for true
/// LRU order, batch-evicted rather than single-evicted for the reason
/// above.
pub struct TranspositionTable {
    entries: FxHashMap<u64, (Entry, u64)>,
    clock: u64,
    max_size: usize,
}

impl TranspositionTable {
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: FxHashMap::default(),
            clock: 0,
            max_size,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reads move the key to "most recent" (spec.md §4.10).
    pub fn probe(&mut self, hash: u64) -> Option<Entry> {
        self.clock += 1;
        let clock = self.clock;
        self.entries.get_mut(&hash).map(|(entry, last_used)| {
            *last_used = clock;
            *entry
        })
    }

    /// Updates move the key to "most recent" (spec.md §4.10).
    pub fn store(&mut self, hash: u64, entry: Entry) {
        self.clock += 1;
        if self.entries.len() >= self.max_size && !self.entries.contains_key(&hash) {
            self.evict_batch();
        }
        self.entries.insert(hash, (entry, self.clock));
    }

    fn evict_batch(&mut self) {
        let batch = ((self.max_size as f64 * EVICTION_BATCH_FRACTION) as usize).max(1);
        let mut by_recency: Vec<(u64, u64)> =
            self.entries.iter().map(|(&hash, &(_, last_used))| (hash, last_used)).collect();
        by_recency.sort_by_key(|&(_, last_used)| last_used);
        for (hash, _) in by_recency.into_iter().take(batch) {
            self.entries.remove(&hash);
        }
    }

    /// Full reset. Used only explicitly (spec.md §4.10: "Cleared only on
    /// explicit reset").
    pub fn clear(&mut self) {
        self.entries.clear();
        self.clock = 0;
    }
}
