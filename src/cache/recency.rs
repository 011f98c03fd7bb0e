//! Recency Tracker Module
//!
//! Orders keys by last access time for least-recently-used eviction.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use chrono::Utc;

use crate::error::{CacheError, Result};

// == Recency Record ==
/// A key together with the moment it was last used.
#[derive(Debug, Clone)]
struct RecencyRecord<K> {
    key: K,
    /// Unix milliseconds, never decreasing across records
    last_used: u64,
    /// Issue order, separates records stamped in the same millisecond
    sequence: u64,
}

impl<K> RecencyRecord<K> {
    /// Heap ordering key. Compared as a tuple, never by subtraction.
    fn rank(&self) -> (u64, u64) {
        (self.last_used, self.sequence)
    }
}

// == Recency Tracker ==
/// Tracks access recency for LRU eviction.
///
/// Records live in a binary min-heap keyed by `(last_used, sequence)`, so the
/// root is always the least recently used key. A key→slot index makes
/// `touch` and `remove` O(log n) instead of a linear scan.
#[derive(Debug)]
pub struct RecencyTracker<K> {
    /// Heap of records, root = least recently used
    heap: Vec<RecencyRecord<K>>,
    /// Position of each key inside `heap`
    slots: HashMap<K, usize>,
    /// Next sequence number to hand out
    next_sequence: u64,
    /// Most recent timestamp handed out
    last_stamp: u64,
}

impl<K: Eq + Hash + Clone> Default for RecencyTracker<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash + Clone> RecencyTracker<K> {
    // == Constructor ==
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self {
            heap: Vec::new(),
            slots: HashMap::new(),
            next_sequence: 0,
            last_stamp: 0,
        }
    }

    // == Add ==
    /// Starts tracking `key` with the current timestamp.
    ///
    /// Returns false and leaves the existing record alone if the key is
    /// already tracked.
    pub fn add(&mut self, key: K) -> bool {
        if self.slots.contains_key(&key) {
            return false;
        }
        let (last_used, sequence) = self.stamp();
        self.push(key, last_used, sequence);
        true
    }

    // == Remove ==
    /// Stops tracking `key`, whatever its timestamp.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.slots.get(key).copied() {
            Some(slot) => {
                self.remove_slot(slot);
                true
            }
            None => false,
        }
    }

    // == Peek ==
    /// Returns the least recently used key without removing it.
    pub fn peek(&self) -> Result<&K> {
        self.heap
            .first()
            .map(|record| &record.key)
            .ok_or(CacheError::EmptyQueue)
    }

    // == Poll ==
    /// Removes and returns the least recently used key.
    pub fn poll(&mut self) -> Result<K> {
        if self.heap.is_empty() {
            return Err(CacheError::EmptyQueue);
        }
        Ok(self.remove_slot(0).key)
    }

    // == Touch ==
    /// Marks `key` as used right now, tracking it if it was not already.
    ///
    /// An existing record is restamped in place, so the key is never
    /// observed as untracked in between.
    pub fn touch(&mut self, key: K) {
        let (last_used, sequence) = self.stamp();
        match self.slots.get(&key).copied() {
            Some(slot) => {
                let record = &mut self.heap[slot];
                record.last_used = last_used;
                record.sequence = sequence;
                self.sift_down(slot);
            }
            None => self.push(key, last_used, sequence),
        }
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    // == Contains ==
    /// Checks if a key is being tracked.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.slots.contains_key(key)
    }

    /// Returns the timestamp recorded for `key`.
    pub fn last_used<Q>(&self, key: &Q) -> Option<u64>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.slots.get(key).map(|&slot| self.heap[slot].last_used)
    }

    /// Iterates tracked keys in heap order.
    ///
    /// Only the first key is guaranteed to be the least recently used; use
    /// `peek`/`poll` when order matters.
    pub fn iter(&self) -> impl Iterator<Item = &K> + '_ {
        self.heap.iter().map(|record| &record.key)
    }

    // == Clear ==
    /// Drops every record.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.slots.clear();
    }

    // == Heap Maintenance ==
    fn stamp(&mut self) -> (u64, u64) {
        // Wall clock may step backwards; issued stamps must not.
        let now = current_timestamp_ms().max(self.last_stamp);
        self.last_stamp = now;
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        (now, sequence)
    }

    fn push(&mut self, key: K, last_used: u64, sequence: u64) {
        let slot = self.heap.len();
        self.slots.insert(key.clone(), slot);
        self.heap.push(RecencyRecord {
            key,
            last_used,
            sequence,
        });
        self.sift_up(slot);
    }

    fn remove_slot(&mut self, slot: usize) -> RecencyRecord<K> {
        let record = self.heap.swap_remove(slot);
        self.slots.remove(&record.key);
        if slot < self.heap.len() {
            if let Some(moved) = self.slots.get_mut(&self.heap[slot].key) {
                *moved = slot;
            }
            if self.sift_up(slot) == slot {
                self.sift_down(slot);
            }
        }
        record
    }

    fn sift_up(&mut self, mut slot: usize) -> usize {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if self.heap[slot].rank() >= self.heap[parent].rank() {
                break;
            }
            self.swap(slot, parent);
            slot = parent;
        }
        slot
    }

    fn sift_down(&mut self, mut slot: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * slot + 1;
            let right = left + 1;
            let mut smallest = slot;
            if left < len && self.heap[left].rank() < self.heap[smallest].rank() {
                smallest = left;
            }
            if right < len && self.heap[right].rank() < self.heap[smallest].rank() {
                smallest = right;
            }
            if smallest == slot {
                break;
            }
            self.swap(slot, smallest);
            slot = smallest;
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        if let Some(slot) = self.slots.get_mut(&self.heap[a].key) {
            *slot = a;
        }
        if let Some(slot) = self.slots.get_mut(&self.heap[b].key) {
            *slot = b;
        }
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
}
