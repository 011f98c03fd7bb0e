//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with their quota cost.

use crate::cache::Resource;

// == Cache Entry ==
/// Represents a single cache entry with its resource and size metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<V> {
    /// The stored resource
    pub resource: V,
    /// Quota cost, computed once at insertion
    pub size_units: usize,
}

impl<V: Resource> CacheEntry<V> {
    // == Constructor ==
    /// Wraps a resource, fixing its size at insertion time.
    pub fn new(resource: V) -> Self {
        let size_units = resource.size_units();
        Self {
            resource,
            size_units,
        }
    }

    // == Dispose ==
    /// Disposes the resource and returns the units it occupied.
    pub fn dispose(self) -> usize {
        self.resource.dispose();
        self.size_units
    }

    /// Unwraps the resource without disposing it.
    pub fn into_resource(self) -> V {
        self.resource
    }
}
