//! Cache Module
//!
//! Provides a size-bounded resource cache with least-recently-used eviction.

mod entry;
mod recency;
mod resource;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use recency::{current_timestamp_ms, RecencyTracker};
pub use resource::{Resource, SIZE_UNIT_BYTES};
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Default capacity in size units (4 MiB)
pub const DEFAULT_MAX_SIZE: usize = 4096;
