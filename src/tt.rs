//! The concurrent transposition table.
//!
//! A fixed-size, direct-mapped cache from Zobrist hash to partial
//! search results, shared by every search worker. One mutex serializes
//! all access — entries are small and the critical sections are a few
//! loads and stores, so contention stays cheap compared to the search
//! work between probes. Collisions are lossy by design: two positions
//! mapping to the same slot simply fight over it under the
//! replacement policy.
//!
//! The *protected hash* shields the root position of the ongoing
//! search: its slot can only be replaced by entries for the same
//! hash, so concurrent workers exploring other positions can never
//! evict the result the facade is polling for.

use crate::board::Move;
use crate::constants::TT_SIZE;
use parking_lot::Mutex;

/// Whether a stored value is exact or a window bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum Bound {
    Exact,
    /// The true value is at most the stored value (the node failed
    /// low).
    Upper,
    /// The true value is at least the stored value (the node failed
    /// high, a beta cutoff occurred).
    Lower,
}

/// A partial search result for one position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtEntry {
    pub hash: u64,
    pub best_move: Option<Move>,
    /// Search depth the value was computed at; 0 marks a seed entry
    /// holding at most a best move.
    pub depth: u8,
    pub value: i32,
    pub bound: Bound,
}

impl TtEntry {
    /// A placeholder entry for `hash` with no knowledge attached.
    fn seed(hash: u64) -> TtEntry {
        TtEntry {
            hash,
            best_move: None,
            depth: 0,
            value: 0,
            bound: Bound::Exact,
        }
    }

    fn vacant() -> TtEntry {
        TtEntry::seed(0)
    }

    fn is_vacant(&self) -> bool {
        self.hash == 0 && self.depth == 0
    }
}

struct Slots {
    entries: Box<[TtEntry]>,
    protected: u64,
}

/// The table itself. Sized at construction, interior-synchronized;
/// clone the surrounding `Arc` to share it with workers.
pub struct TranspositionTable {
    slots: Mutex<Slots>,
}

impl TranspositionTable {
    /// A table with [`TT_SIZE`] slots.
    pub fn new() -> TranspositionTable {
        TranspositionTable::with_slots(TT_SIZE)
    }

    /// A table with `size` slots; `size` must be a power of two.
    pub fn with_slots(size: usize) -> TranspositionTable {
        assert!(size.is_power_of_two());
        TranspositionTable {
            slots: Mutex::new(Slots {
                entries: vec![TtEntry::vacant(); size].into_boxed_slice(),
                protected: 0,
            }),
        }
    }

    fn index(&self, hash: u64, len: usize) -> usize {
        (hash as usize) & (len - 1)
    }

    /// The entry stored for `hash`, if its slot has not been taken
    /// over by a colliding position.
    pub fn get(&self, hash: u64) -> Option<TtEntry> {
        let slots = self.slots.lock();
        let entry = slots.entries[self.index(hash, slots.entries.len())];
        (entry.hash == hash).then_some(entry)
    }

    /// Offers `entry` to its slot under the replacement policy: a
    /// vacant slot always accepts, the same hash accepts equal or
    /// deeper results, and a different hash is displaced unless it is
    /// the protected one.
    pub fn put(&self, entry: TtEntry) {
        let mut slots = self.slots.lock();
        let index = self.index(entry.hash, slots.entries.len());
        let previous = slots.entries[index];

        let store = previous.is_vacant()
            || (previous.hash == entry.hash && previous.depth <= entry.depth)
            || (previous.hash != entry.hash && previous.hash != slots.protected);

        if store {
            slots.entries[index] = entry;
        }
    }

    /// Empties the table. The protected hash survives; a new game
    /// protects a fresh root anyway.
    pub fn clear(&self) {
        let mut slots = self.slots.lock();
        slots.entries.fill(TtEntry::vacant());
    }

    /// Registers `hash` as the protected root. If its slot currently
    /// belongs to a different position, the slot is reset to a seed
    /// entry for `hash` so the root always owns its slot from the
    /// start of the search.
    pub fn set_protected(&self, hash: u64) {
        let mut slots = self.slots.lock();
        slots.protected = hash;
        let index = self.index(hash, slots.entries.len());
        if slots.entries[index].hash != hash {
            slots.entries[index] = TtEntry::seed(hash);
        }
    }
}

impl Default for TranspositionTable {
    fn default() -> TranspositionTable {
        TranspositionTable::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardPos;
    use std::sync::Arc;

    fn entry(hash: u64, depth: u8, value: i32) -> TtEntry {
        TtEntry {
            hash,
            best_move: Some(Move::new(BoardPos::new(4, 6), BoardPos::new(4, 4))),
            depth,
            value,
            bound: Bound::Exact,
        }
    }

    #[test]
    fn get_returns_only_matching_hashes() {
        let tt = TranspositionTable::with_slots(16);
        assert_eq!(tt.get(5), None);

        tt.put(entry(5, 3, 42));
        assert_eq!(tt.get(5).unwrap().value, 42);
        // Hash 21 collides with 5 in a 16-slot table but must not be
        // reported for it.
        assert_eq!(tt.get(21), None);
    }

    #[test]
    fn deeper_results_replace_shallower_ones() {
        let tt = TranspositionTable::with_slots(16);
        tt.put(entry(5, 3, 1));
        tt.put(entry(5, 2, 2));
        assert_eq!(tt.get(5).unwrap().value, 1, "shallower must not replace");

        tt.put(entry(5, 3, 3));
        assert_eq!(tt.get(5).unwrap().value, 3, "equal depth replaces");

        tt.put(entry(5, 7, 4));
        assert_eq!(tt.get(5).unwrap().depth, 7, "deeper replaces");
    }

    #[test]
    fn colliding_hashes_displace_unprotected_entries() {
        let tt = TranspositionTable::with_slots(16);
        tt.put(entry(5, 9, 1));
        tt.put(entry(21, 1, 2));
        assert_eq!(tt.get(5), None);
        assert_eq!(tt.get(21).unwrap().value, 2);
    }

    #[test]
    fn protected_hash_cannot_be_displaced() {
        let tt = TranspositionTable::with_slots(16);
        tt.set_protected(5);
        tt.put(entry(5, 4, 10));

        tt.put(entry(21, 9, 99));
        assert_eq!(tt.get(5).unwrap().value, 10, "protected entry survives");
        assert_eq!(tt.get(21), None);

        // The protected hash itself may still improve.
        tt.put(entry(5, 6, 11));
        assert_eq!(tt.get(5).unwrap().value, 11);
    }

    #[test]
    fn set_protected_reseeds_foreign_slot() {
        let tt = TranspositionTable::with_slots(16);
        tt.put(entry(21, 9, 99));

        // Protecting a colliding hash evicts the previous owner and
        // seeds an empty entry for the new root.
        tt.set_protected(5);
        assert_eq!(tt.get(21), None);
        let seeded = tt.get(5).unwrap();
        assert_eq!(seeded.depth, 0);
        assert_eq!(seeded.best_move, None);
    }

    #[test]
    fn clear_empties_every_slot() {
        let tt = TranspositionTable::with_slots(16);
        for hash in 1..=8 {
            tt.put(entry(hash, 1, hash as i32));
        }
        tt.clear();
        for hash in 1..=8 {
            assert_eq!(tt.get(hash), None);
        }
    }

    #[test]
    fn concurrent_access_never_returns_a_foreign_entry() {
        let tt = Arc::new(TranspositionTable::with_slots(64));
        let threads: Vec<_> = (0..8u64)
            .map(|t| {
                let tt = Arc::clone(&tt);
                std::thread::spawn(move || {
                    for i in 0..2_000u64 {
                        // Many colliding hashes across threads.
                        let hash = 1 + t + i * 8;
                        tt.put(entry(hash, (i % 30) as u8, hash as i32));
                        for probe in (1..=8u64).map(|p| 1 + p + i * 8) {
                            if let Some(found) = tt.get(probe) {
                                assert_eq!(found.hash, probe);
                                assert_eq!(found.value, probe as i32);
                            }
                        }
                    }
                })
            })
            .collect();
        for thread in threads {
            thread.join().unwrap();
        }
    }
}
