//! The transposition table: a fixed-size, always-replace hash map
//! keyed by Zobrist hash.

use crate::chess_move::Move;

pub const DEFAULT_SIZE_LOG2: u32 = 22;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NodeType {
    /// Exact score.
    Pv,
    /// Stored score is a lower bound (the node failed high).
    Cut,
    /// Stored score is an upper bound (no move raised alpha).
    All,
}

#[derive(Clone, Copy, Debug)]
pub struct TTEntry {
    pub hash: u64,
    pub best_move: Move,
    pub eval: i32,
    pub depth: i32,
    pub node_type: NodeType,
}

impl TTEntry {
    const EMPTY_HASH: u64 = 0;

    fn is_empty(&self) -> bool {
        self.hash == Self::EMPTY_HASH
    }
}

/// Whether a stored entry's bound is enough to settle the caller's
/// current alpha/beta window outright, per §4.4's usability rule.
pub fn is_usable(entry: &TTEntry, remaining_depth: i32, alpha: i32, beta: i32) -> bool {
    if entry.depth < remaining_depth {
        return false;
    }
    match entry.node_type {
        NodeType::Pv => true,
        NodeType::All => entry.eval < alpha,
        NodeType::Cut => entry.eval >= beta,
    }
}

pub struct TranspositionTable {
    entries: Vec<TTEntry>,
    mask: u64,
}

impl TranspositionTable {
    pub fn new(size_log2: u32) -> TranspositionTable {
        let size = 1usize << size_log2;
        let placeholder = TTEntry {
            hash: TTEntry::EMPTY_HASH,
            best_move: Move::INVALID,
            eval: 0,
            depth: 0,
            node_type: NodeType::All,
        };
        TranspositionTable {
            entries: vec![placeholder; size],
            mask: (size as u64) - 1,
        }
    }

    #[inline]
    fn index(&self, hash: u64) -> usize {
        (hash & self.mask) as usize
    }

    /// Looks up `hash`. A hit requires the stored hash to match
    /// exactly (the index alone is not a confirmation, since indices
    /// collide).
    pub fn probe(&self, hash: u64) -> Option<&TTEntry> {
        let entry = &self.entries[self.index(hash)];
        if !entry.is_empty() && entry.hash == hash {
            Some(entry)
        } else {
            None
        }
    }

    /// Always-replace store: whatever was at this index, colliding or
    /// not, is overwritten.
    pub fn store(&mut self, hash: u64, best_move: Move, eval: i32, depth: i32, node_type: NodeType) {
        let idx = self.index(hash);
        self.entries[idx] = TTEntry { hash, best_move, eval, depth, node_type };
    }

    pub fn clear(&mut self) {
        for entry in self.entries.iter_mut() {
            entry.hash = TTEntry::EMPTY_HASH;
        }
    }

    pub fn capacity(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_then_probe_hits() {
        let mut tt = TranspositionTable::new(10);
        tt.store(12345, Move::INVALID, 42, 3, NodeType::Pv);
        let entry = tt.probe(12345).unwrap();
        assert_eq!(entry.eval, 42);
        assert_eq!(entry.depth, 3);
    }

    #[test]
    fn probe_miss_on_collision() {
        let mut tt = TranspositionTable::new(4); // 16 entries
        tt.store(0, Move::INVALID, 1, 1, NodeType::Pv);
        tt.store(16, Move::INVALID, 2, 1, NodeType::Pv); // same index, different hash
        assert!(tt.probe(0).is_none());
        assert_eq!(tt.probe(16).unwrap().eval, 2);
    }

    #[test]
    fn usability_rules() {
        let entry = TTEntry { hash: 1, best_move: Move::INVALID, eval: 100, depth: 5, node_type: NodeType::Cut };
        assert!(is_usable(&entry, 5, 0, 90)); // CUT, eval >= beta
        assert!(!is_usable(&entry, 5, 0, 110)); // CUT, eval < beta
        assert!(!is_usable(&entry, 6, 0, 90)); // insufficient depth
    }
}
