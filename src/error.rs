//! Error types for the bitmap cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache and its shell.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// A single resource is larger than the whole cache
    #[error("Resource of {size} units exceeds cache capacity of {capacity} units")]
    ResourceTooLarge { size: usize, capacity: usize },

    /// Recency tracker was asked for a candidate while holding no records
    #[error("Recency queue is empty")]
    EmptyQueue,

    /// Trim consumed every recency record but the quota is still exceeded
    #[error("Recency tracker exhausted with {total} units held against a capacity of {capacity}")]
    TrackerExhausted { total: usize, capacity: usize },

    /// Pixel buffer size does not fit in `usize`
    #[error("Bitmap of {width}x{height} pixels exceeds addressable memory")]
    BitmapOverflow { width: u32, height: u32 },

    /// Key not present in the cache
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Shell input could not be parsed
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CacheError::ResourceTooLarge {
            size: 5,
            capacity: 4,
        };
        assert_eq!(
            err.to_string(),
            "Resource of 5 units exceeds cache capacity of 4 units"
        );
        assert_eq!(CacheError::EmptyQueue.to_string(), "Recency queue is empty");
        assert_eq!(
            CacheError::BitmapOverflow {
                width: 7,
                height: 9
            }
            .to_string(),
            "Bitmap of 7x9 pixels exceeds addressable memory"
        );
        assert!(CacheError::InvalidCommand("nope".to_string())
            .to_string()
            .contains("nope"));
    }
}
