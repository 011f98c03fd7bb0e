//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the size, recency and eviction invariants against
//! arbitrary operation sequences.

use proptest::prelude::*;
use std::collections::{HashSet, VecDeque};

use crate::cache::{CacheStore, Resource, SIZE_UNIT_BYTES};
use crate::error::CacheError;

// == Test Configuration ==
const TEST_MAX_SIZE: usize = 32;

// == Strategies ==
/// Small key space so operations collide often
fn key_strategy() -> impl Strategy<Value = u8> {
    0u8..12
}

/// Byte sizes from sub-unit up to a quarter of the test quota
fn bytes_strategy() -> impl Strategy<Value = usize> {
    prop_oneof![
        0usize..SIZE_UNIT_BYTES,
        SIZE_UNIT_BYTES..(TEST_MAX_SIZE / 4 + 1) * SIZE_UNIT_BYTES,
    ]
}

#[derive(Debug, Clone)]
enum CacheOp {
    Put { key: u8, bytes: usize },
    Get { key: u8 },
    Remove { key: u8 },
    Resize { max_size: usize },
    Clear,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        6 => (key_strategy(), bytes_strategy()).prop_map(|(key, bytes)| CacheOp::Put { key, bytes }),
        4 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        2 => key_strategy().prop_map(|key| CacheOp::Remove { key }),
        1 => (0usize..=TEST_MAX_SIZE * 2).prop_map(|max_size| CacheOp::Resize { max_size }),
        1 => Just(CacheOp::Clear),
    ]
}

// == Reference Model ==
/// Straightforward LRU list used as an oracle.
#[derive(Debug)]
struct Model {
    /// Front = least recently used
    order: VecDeque<(u8, usize)>,
    max_size: usize,
}

impl Model {
    fn new(max_size: usize) -> Self {
        Self {
            order: VecDeque::new(),
            max_size,
        }
    }

    fn total(&self) -> usize {
        self.order.iter().map(|(_, units)| units).sum()
    }

    fn take(&mut self, key: u8) -> Option<usize> {
        let pos = self.order.iter().position(|(k, _)| *k == key)?;
        self.order.remove(pos).map(|(_, units)| units)
    }

    fn trim(&mut self, extra: usize) {
        while self.total() + extra > self.max_size {
            if self.order.pop_front().is_none() {
                break;
            }
        }
    }

    fn put(&mut self, key: u8, units: usize) -> bool {
        if units > self.max_size {
            return false;
        }
        self.take(key);
        self.trim(units);
        self.order.push_back((key, units));
        true
    }

    fn get(&mut self, key: u8) -> bool {
        match self.take(key) {
            Some(units) => {
                self.order.push_back((key, units));
                true
            }
            None => false,
        }
    }

    fn resize(&mut self, max_size: usize) {
        self.max_size = max_size;
        self.trim(0);
    }

    fn keys(&self) -> HashSet<u8> {
        self.order.iter().map(|(k, _)| *k).collect()
    }
}

fn assert_invariants(store: &CacheStore<u8, Vec<u8>>) -> Result<(), TestCaseError> {
    let sum: usize = store.values().map(|v| v.size_units()).sum();
    prop_assert_eq!(store.size(), sum, "Size counter drifted from entries");
    prop_assert!(
        store.size() <= store.max_size(),
        "Size {} exceeds max {}",
        store.size(),
        store.max_size()
    );
    let stored: HashSet<u8> = store.keys().copied().collect();
    let tracked: HashSet<u8> = store.recency().iter().copied().collect();
    prop_assert_eq!(stored, tracked, "Tracker and store disagree on keys");
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // *For any* operation sequence, the size counter equals the sum of entry
    // sizes, never exceeds the quota, and the tracker mirrors the store.
    #[test]
    fn prop_invariants_hold(ops in prop::collection::vec(cache_op_strategy(), 1..120)) {
        let mut store = CacheStore::new(TEST_MAX_SIZE);

        for op in ops {
            match op {
                CacheOp::Put { key, bytes } => {
                    let _ = store.put(key, vec![0u8; bytes]);
                }
                CacheOp::Get { key } => {
                    let _ = store.get(&key);
                }
                CacheOp::Remove { key } => {
                    let _ = store.remove(&key);
                }
                CacheOp::Resize { max_size } => {
                    prop_assert!(store.set_max_size(max_size).is_ok());
                }
                CacheOp::Clear => {
                    store.clear(true);
                }
            }
            assert_invariants(&store)?;
        }
    }

    // *For any* sequence of puts, gets and resizes, the cache holds exactly
    // the keys an LRU list oracle would hold.
    #[test]
    fn prop_eviction_matches_lru_model(ops in prop::collection::vec(cache_op_strategy(), 1..120)) {
        let mut store = CacheStore::new(TEST_MAX_SIZE);
        let mut model = Model::new(TEST_MAX_SIZE);

        for op in ops {
            match op {
                CacheOp::Put { key, bytes } => {
                    let units = bytes / SIZE_UNIT_BYTES;
                    let accepted = model.put(key, units);
                    prop_assert_eq!(store.put(key, vec![0u8; bytes]).is_ok(), accepted);
                }
                CacheOp::Get { key } => {
                    let hit = model.get(key);
                    prop_assert_eq!(store.get(&key).is_some(), hit);
                }
                CacheOp::Remove { key } => {
                    let expected = model.take(key);
                    prop_assert_eq!(store.remove(&key).map(|v| v.size_units()), expected);
                }
                CacheOp::Resize { max_size } => {
                    model.resize(max_size);
                    store.set_max_size(max_size).unwrap();
                }
                CacheOp::Clear => {
                    model.order.clear();
                    store.clear(true);
                }
            }
            let stored: HashSet<u8> = store.keys().copied().collect();
            prop_assert_eq!(stored, model.keys());
            prop_assert_eq!(store.size(), model.total());
            prop_assert_eq!(store.eldest().copied(), model.order.front().map(|(k, _)| *k));
        }
    }

    // *For any* key and resource, storing then reading returns the same
    // resource, and the key stops being the eviction candidate.
    #[test]
    fn prop_roundtrip_and_refresh(
        keys in prop::collection::hash_set(key_strategy(), 2..8),
        payload in prop::collection::vec(any::<u8>(), 0..4096)
    ) {
        let keys: Vec<u8> = keys.into_iter().collect();
        let mut store = CacheStore::new(TEST_MAX_SIZE);
        for key in &keys {
            store.put(*key, vec![*key; 16]).unwrap();
        }

        let target = keys[0];
        store.put(target, payload.clone()).unwrap();
        prop_assert_eq!(store.get(&target), Some(&payload));
        prop_assert_ne!(store.eldest(), Some(&target));
        prop_assert_eq!(store.eldest(), Some(&keys[1]));
    }

    // *For any* resource larger than the quota, put fails and nothing changes.
    #[test]
    fn prop_oversized_put_rejected(
        max_size in 0usize..16,
        extra_units in 1usize..8,
        preload in prop::collection::vec((key_strategy(), 0usize..SIZE_UNIT_BYTES), 0..5)
    ) {
        let mut store = CacheStore::new(max_size);
        for (key, bytes) in preload {
            store.put(key, vec![0u8; bytes]).unwrap();
        }
        let before_len = store.len();
        let before_size = store.size();

        let units = max_size + extra_units;
        let result = store.put(200u8, vec![0u8; units * SIZE_UNIT_BYTES]);

        prop_assert_eq!(result, Err(CacheError::ResourceTooLarge { size: units, capacity: max_size }));
        prop_assert_eq!(store.len(), before_len);
        prop_assert_eq!(store.size(), before_size);
        prop_assert!(!store.recency().contains(&200u8));
    }

    // *For any* operation sequence in touch-on-miss mode, the size invariants
    // still hold and every stored key stays tracked.
    #[test]
    fn prop_touch_on_miss_keeps_size_invariants(ops in prop::collection::vec(cache_op_strategy(), 1..120)) {
        let mut store = CacheStore::new(TEST_MAX_SIZE).with_touch_on_miss(true);

        for op in ops {
            match op {
                CacheOp::Put { key, bytes } => {
                    let _ = store.put(key, vec![0u8; bytes]);
                }
                CacheOp::Get { key } => {
                    let _ = store.get(&key);
                }
                CacheOp::Remove { key } => {
                    let _ = store.remove(&key);
                }
                CacheOp::Resize { max_size } => {
                    prop_assert!(store.set_max_size(max_size).is_ok());
                }
                CacheOp::Clear => {
                    store.clear(false);
                }
            }
            let sum: usize = store.values().map(|v| v.size_units()).sum();
            prop_assert_eq!(store.size(), sum);
            prop_assert!(store.size() <= store.max_size());
            for key in store.keys() {
                prop_assert!(store.recency().contains(key));
            }
        }
    }
}
