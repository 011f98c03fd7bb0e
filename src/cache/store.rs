//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with recency tracking and a
//! size quota.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use tracing::{debug, error, warn};

use crate::cache::{CacheEntry, CacheStats, RecencyTracker, Resource, DEFAULT_MAX_SIZE};
use crate::config::Config;
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Size-bounded resource cache with least-recently-used eviction.
///
/// Every entry costs [`Resource::size_units`] against `max_size`. Whenever the
/// total would exceed the quota, the least recently used entries are evicted
/// and disposed until it fits again.
///
/// The store is not synchronised; callers sharing it must wrap it in a
/// single lock.
#[derive(Debug)]
pub struct CacheStore<K, V> {
    /// Key-resource storage
    entries: HashMap<K, CacheEntry<V>>,
    /// Eviction order
    recency: RecencyTracker<K>,
    /// Performance statistics
    stats: CacheStats,
    /// Sum of `size_units` over all entries
    total_size: usize,
    /// Quota in size units
    max_size: usize,
    /// Register keys with the tracker even when `get` misses
    touch_on_miss: bool,
}

impl<K, V> Default for CacheStore<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Resource,
{
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SIZE)
    }
}

impl<K, V> CacheStore<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Resource,
{
    // == Constructor ==
    /// Creates an empty store holding at most `max_size` units.
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: HashMap::new(),
            recency: RecencyTracker::new(),
            stats: CacheStats::new(),
            total_size: 0,
            max_size,
            touch_on_miss: false,
        }
    }

    /// Creates a store from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.max_size).with_touch_on_miss(config.touch_on_miss)
    }

    /// Enables or disables recency registration on `get` misses.
    ///
    /// When enabled, a missed key is tracked without being stored, leaving a
    /// stale record that trim later discards. Off by default.
    pub fn with_touch_on_miss(mut self, enabled: bool) -> Self {
        self.touch_on_miss = enabled;
        self
    }

    // == Put ==
    /// Stores `resource` under `key`, evicting least recently used entries
    /// as needed.
    ///
    /// A resource already stored under `key` is disposed first. Returns
    /// whether such a replacement happened.
    ///
    /// # Errors
    /// `ResourceTooLarge` if the resource alone exceeds the quota. The store
    /// is left untouched and the rejected resource is dropped.
    pub fn put(&mut self, key: K, resource: V) -> Result<bool> {
        let entry = CacheEntry::new(resource);
        if entry.size_units > self.max_size {
            return Err(CacheError::ResourceTooLarge {
                size: entry.size_units,
                capacity: self.max_size,
            });
        }

        let replaced = match self.entries.remove(&key) {
            Some(previous) => {
                self.recency.remove(&key);
                self.total_size -= previous.dispose();
                true
            }
            None => false,
        };

        self.total_size += entry.size_units;
        if let Err(err) = self.trim() {
            self.total_size -= entry.size_units;
            return Err(err);
        }

        debug!(
            key = ?key,
            units = entry.size_units,
            total = self.total_size,
            max = self.max_size,
            replaced,
            "Stored resource"
        );
        self.recency.touch(key.clone());
        self.entries.insert(key, entry);
        Ok(replaced)
    }

    /// Stores every pair in order, stopping at the first rejection.
    pub fn put_all<I>(&mut self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, resource) in items {
            self.put(key, resource)?;
        }
        Ok(())
    }

    // == Get ==
    /// Returns the resource stored under `key`, marking it most recently used.
    ///
    /// The resource stays owned by the cache.
    ///
    /// The borrowed key must convert back into `K` so that touch-on-miss can
    /// track it; `Box<str>` and `Rc<str>` keys are looked up with `&str`.
    /// Stores keyed by `&str` itself are read with `get(&"key")`.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned + ?Sized,
        Q::Owned: Into<K>,
    {
        let stored = self.entries.get_key_value(key).map(|(k, _)| k.clone());
        match stored {
            Some(stored) => {
                self.recency.touch(stored);
                self.stats.record_hit();
                self.entries.get(key).map(|entry| &entry.resource)
            }
            None => {
                self.stats.record_miss();
                if self.touch_on_miss {
                    self.recency.touch(key.to_owned().into());
                }
                None
            }
        }
    }

    // == Remove ==
    /// Takes the resource stored under `key` out of the cache.
    ///
    /// Ownership passes to the caller; the resource is not disposed.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.recency.remove(key);
        let entry = self.entries.remove(key)?;
        self.total_size -= entry.size_units;
        debug!(units = entry.size_units, total = self.total_size, "Removed resource");
        Some(entry.into_resource())
    }

    // == Clear ==
    /// Empties the cache.
    ///
    /// With `dispose_resources` every resource is disposed and nothing is
    /// returned; otherwise the entries are handed back to the caller.
    pub fn clear(&mut self, dispose_resources: bool) -> Vec<(K, V)> {
        let drained: Vec<(K, CacheEntry<V>)> = self.entries.drain().collect();
        self.recency.clear();
        self.total_size = 0;
        debug!(entries = drained.len(), dispose_resources, "Cleared cache");

        if dispose_resources {
            for (_, entry) in drained {
                entry.dispose();
            }
            Vec::new()
        } else {
            drained
                .into_iter()
                .map(|(key, entry)| (key, entry.into_resource()))
                .collect()
        }
    }

    // == Capacity ==
    /// Returns the quota in size units.
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Changes the quota, evicting entries if the cache no longer fits.
    pub fn set_max_size(&mut self, max_size: usize) -> Result<()> {
        self.max_size = max_size;
        self.trim()
    }

    /// Checks whether `resource` could be stored at the current quota.
    pub fn fits(&self, resource: &V) -> bool {
        resource.size_units() <= self.max_size
    }

    // == Trim ==
    /// Evicts least recently used entries until the quota holds.
    ///
    /// Each pass consumes one recency record, so the loop runs at most once
    /// per record present on entry.
    fn trim(&mut self) -> Result<()> {
        while self.total_size > self.max_size {
            let candidate = match self.recency.poll() {
                Ok(candidate) => candidate,
                Err(_) => {
                    error!(
                        total = self.total_size,
                        max = self.max_size,
                        entries = self.entries.len(),
                        "Recency tracker exhausted before quota was restored"
                    );
                    return Err(CacheError::TrackerExhausted {
                        total: self.total_size,
                        capacity: self.max_size,
                    });
                }
            };

            match self.entries.remove(&candidate) {
                Some(entry) => {
                    let units = entry.dispose();
                    self.total_size -= units;
                    self.stats.record_eviction();
                    debug!(
                        key = ?candidate,
                        units,
                        total = self.total_size,
                        max = self.max_size,
                        "Evicted least recently used resource"
                    );
                }
                None => {
                    self.stats.record_divergence();
                    warn!(key = ?candidate, "Recency record has no cached entry, discarding");
                }
            }
        }
        Ok(())
    }

    // == Accessors ==
    /// Returns the units currently held.
    pub fn size(&self) -> usize {
        self.total_size
    }

    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }

    pub fn contains_value(&self, resource: &V) -> bool
    where
        V: PartialEq,
    {
        self.entries.values().any(|entry| &entry.resource == resource)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.entries.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.entries.values().map(|entry| &entry.resource)
    }

    /// Iterates entries without affecting recency.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.entries.iter().map(|(key, entry)| (key, &entry.resource))
    }

    /// Read-only view of the current mapping.
    ///
    /// The view borrows the store, so the cache cannot change while it is
    /// alive and no mutation can bypass size accounting.
    pub fn snapshot(&self) -> HashMap<&K, &V> {
        self.iter().collect()
    }

    /// Returns the next eviction candidate without touching it.
    pub fn eldest(&self) -> Option<&K> {
        self.recency.peek().ok()
    }

    /// Read access to the recency tracker.
    pub fn recency(&self) -> &RecencyTracker<K> {
        &self.recency
    }

    pub fn touch_on_miss(&self) -> bool {
        self.touch_on_miss
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_occupancy(self.entries.len(), self.total_size, self.max_size);
        stats
    }
}
