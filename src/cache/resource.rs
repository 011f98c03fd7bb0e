//! Resource Module
//!
//! Defines what the cache can hold: values with a byte footprint that can be
//! released explicitly.

/// Number of bytes in one quota unit.
pub const SIZE_UNIT_BYTES: usize = 1024;

// == Resource Trait ==
/// A disposable, sized value held by the cache.
///
/// `dispose` consumes the resource, so a disposed value can never be
/// disposed twice or touched afterwards.
pub trait Resource {
    /// Size of the resource's backing memory in bytes.
    fn byte_count(&self) -> usize;

    /// Quota cost of the resource, truncated to whole units.
    ///
    /// Anything smaller than [`SIZE_UNIT_BYTES`] costs nothing.
    fn size_units(&self) -> usize {
        self.byte_count() / SIZE_UNIT_BYTES
    }

    /// Releases the underlying memory immediately.
    fn dispose(self)
    where
        Self: Sized,
    {
        drop(self);
    }
}

impl Resource for Vec<u8> {
    fn byte_count(&self) -> usize {
        self.len()
    }
}

impl Resource for Box<[u8]> {
    fn byte_count(&self) -> usize {
        self.len()
    }
}
