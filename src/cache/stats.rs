//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, and evictions.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache performance metrics and current occupancy.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed cache retrievals
    pub misses: u64,
    /// Number of entries evicted (and disposed) by trim
    pub evictions: u64,
    /// Number of stale recency records discarded by trim
    pub divergences: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
    /// Units currently held
    pub total_size: usize,
    /// Maximum units allowed
    pub max_size: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Record Hit ==
    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Eviction ==
    /// Increments the eviction counter.
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    // == Record Divergence ==
    /// Increments the stale-record counter.
    pub fn record_divergence(&mut self) {
        self.divergences += 1;
    }

    // == Update Occupancy ==
    /// Updates the entry count and size figures.
    pub fn set_occupancy(&mut self, entries: usize, total_size: usize, max_size: usize) {
        self.total_entries = entries;
        self.total_size = total_size;
        self.max_size = max_size;
    }

    /// Fraction of the quota in use, 0.0 for a zero-capacity cache.
    pub fn fill_ratio(&self) -> f64 {
        if self.max_size == 0 {
            0.0
        } else {
            self.total_size as f64 / self.max_size as f64
        }
    }
}
