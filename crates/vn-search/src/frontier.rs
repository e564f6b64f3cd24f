//! `Frontier` — the open set: a binary min-heap with in-place updates.
//!
//! `std::collections::BinaryHeap` cannot lower the score of a queued item, so
//! the usual trick is to push duplicates and skip stale pops.  The search
//! instead keeps exactly one entry per key: a `key → heap slot` map lets
//! [`Frontier::update`] find the entry in O(1) and re-heapify in O(log n).
//!
//! # Ordering
//!
//! Lower score first; equal scores prefer the lower heuristic (closer to the
//! goal), then the earlier insertion.  The ordering is total, so pops are
//! reproducible for identical inputs.

use std::cmp::Ordering;
use std::hash::Hash;

use rustc_hash::FxHashMap;

struct Entry<K, T> {
    key:       K,
    item:      T,
    score:     f64,
    heuristic: f64,
    seq:       u64,
}

impl<K, T> Entry<K, T> {
    #[inline]
    fn cmp_priority(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| self.heuristic.total_cmp(&other.heuristic))
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Mutable min-priority queue keyed by `K`, holding one `T` per key.
pub struct Frontier<K, T> {
    heap:     Vec<Entry<K, T>>,
    slots:    FxHashMap<K, usize>,
    next_seq: u64,
}

impl<K: Copy + Eq + Hash, T> Default for Frontier<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq + Hash, T> Frontier<K, T> {
    pub fn new() -> Self {
        Self {
            heap:     Vec::new(),
            slots:    FxHashMap::default(),
            next_seq: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.slots.contains_key(key)
    }

    /// Score of the next item `pop_min` would return.
    pub fn peek_score(&self) -> Option<f64> {
        self.heap.first().map(|e| e.score)
    }

    /// Queue `item` under `key`.
    ///
    /// If `key` is already queued this behaves like [`update`][Self::update]
    /// and returns whether the stored entry was replaced.
    pub fn insert(&mut self, key: K, item: T, score: f64, heuristic: f64) -> bool {
        if self.contains(&key) {
            return self.update(&key, item, score, heuristic);
        }
        let slot = self.heap.len();
        self.heap.push(Entry { key, item, score, heuristic, seq: self.next_seq });
        self.next_seq += 1;
        self.slots.insert(key, slot);
        self.sift_up(slot);
        true
    }

    /// Replace the entry for `key` if `score` is strictly better.
    ///
    /// Returns `false` (and changes nothing) when `key` is not queued or the
    /// new score does not improve on the stored one.  The entry keeps its
    /// original insertion sequence for tie-breaking.
    pub fn update(&mut self, key: &K, item: T, score: f64, heuristic: f64) -> bool {
        let Some(&slot) = self.slots.get(key) else {
            return false;
        };
        let entry = &mut self.heap[slot];
        if score >= entry.score {
            return false;
        }
        entry.item = item;
        entry.score = score;
        entry.heuristic = heuristic;
        self.sift_up(slot);
        true
    }

    /// Remove and return the item with the smallest priority.
    pub fn pop_min(&mut self) -> Option<T> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.swap(0, last);
        let entry = self.heap.pop()?;
        self.slots.remove(&entry.key);
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some(entry.item)
    }

    pub fn clear(&mut self) {
        self.heap.clear();
        self.slots.clear();
    }

    // ── Heap internals ────────────────────────────────────────────────────

    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.heap.swap(a, b);
        self.slots.insert(self.heap[a].key, a);
        self.slots.insert(self.heap[b].key, b);
    }

    fn sift_up(&mut self, mut slot: usize) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if self.heap[slot].cmp_priority(&self.heap[parent]) != Ordering::Less {
                break;
            }
            self.swap(slot, parent);
            slot = parent;
        }
    }

    fn sift_down(&mut self, mut slot: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * slot + 1;
            let right = left + 1;
            let mut smallest = slot;
            if left < len && self.heap[left].cmp_priority(&self.heap[smallest]) == Ordering::Less {
                smallest = left;
            }
            if right < len && self.heap[right].cmp_priority(&self.heap[smallest]) == Ordering::Less {
                smallest = right;
            }
            if smallest == slot {
                break;
            }
            self.swap(slot, smallest);
            slot = smallest;
        }
    }
}
