//! Shell Replies
//!
//! Each command answers with one JSON object per line.

use serde::Serialize;

use crate::bitmap::PixelFormat;
use crate::cache::CacheStats;
use crate::error::CacheError;

/// Any reply the shell can print.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Reply {
    Put(PutReply),
    Get(GetReply),
    Delete(DeleteReply),
    Clear(ClearReply),
    Resize(ResizeReply),
    Stats(StatsReply),
    Keys(KeysReply),
    Help(HelpReply),
    Error(ErrorReply),
}

impl From<CacheError> for Reply {
    fn from(err: CacheError) -> Self {
        Reply::Error(ErrorReply::new(err.to_string()))
    }
}

/// Reply to `put`
#[derive(Debug, Clone, Serialize)]
pub struct PutReply {
    /// Success message
    pub message: String,
    /// The key that was stored
    pub key: String,
    /// Quota cost of the new bitmap
    pub units: usize,
    /// Whether an older bitmap was replaced and disposed
    pub replaced: bool,
}

impl PutReply {
    pub fn new(key: impl Into<String>, units: usize, replaced: bool) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' stored", key),
            key,
            units,
            replaced,
        }
    }
}

/// Reply to `get`
#[derive(Debug, Clone, Serialize)]
pub struct GetReply {
    pub key: String,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub units: usize,
}

/// Reply to `del`
#[derive(Debug, Clone, Serialize)]
pub struct DeleteReply {
    /// Success message
    pub message: String,
    /// The key that was removed
    pub key: String,
    /// Units released from the quota
    pub units: usize,
}

impl DeleteReply {
    pub fn new(key: impl Into<String>, units: usize) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' removed", key),
            key,
            units,
        }
    }
}

/// Reply to `clear`
#[derive(Debug, Clone, Serialize)]
pub struct ClearReply {
    pub message: String,
    /// Entries handed back undisposed
    pub released: usize,
}

impl ClearReply {
    pub fn new(disposed: bool, released: usize) -> Self {
        let message = if disposed {
            "Cache cleared, resources disposed".to_string()
        } else {
            format!("Cache cleared, {} resources released", released)
        };
        Self { message, released }
    }
}

/// Reply to `resize`
#[derive(Debug, Clone, Serialize)]
pub struct ResizeReply {
    pub max_size: usize,
    pub total_size: usize,
    pub total_entries: usize,
}

/// Reply to `stats`
#[derive(Debug, Clone, Serialize)]
pub struct StatsReply {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub divergences: u64,
    pub total_entries: usize,
    pub total_size: usize,
    pub max_size: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsReply {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            divergences: stats.divergences,
            total_entries: stats.total_entries,
            total_size: stats.total_size,
            max_size: stats.max_size,
        }
    }
}

/// Reply to `keys`, sorted by key
#[derive(Debug, Clone, Serialize)]
pub struct KeysReply {
    pub keys: Vec<String>,
}

/// Reply to `help`
#[derive(Debug, Clone, Serialize)]
pub struct HelpReply {
    pub commands: Vec<&'static str>,
}

impl Default for HelpReply {
    fn default() -> Self {
        Self {
            commands: vec![
                "put <key> <width> <height> [alpha8|rgb565|argb4444|argb8888]",
                "get <key>",
                "del <key>",
                "clear [keep]",
                "resize <units>",
                "stats",
                "keys",
                "help",
                "quit",
            ],
        }
    }
}

/// Reply for any failed command
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReply {
    pub error: String,
}

impl ErrorReply {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_reply_serialize() {
        let reply = Reply::Put(PutReply::new("logo", 8, false));
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["key"], "logo");
        assert_eq!(json["units"], 8);
        assert_eq!(json["replaced"], false);
        assert!(json["message"].as_str().unwrap().contains("logo"));
    }

    #[test]
    fn test_error_reply_from_cache_error() {
        let reply = Reply::from(CacheError::NotFound("ghost".to_string()));
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["error"], "Key not found: ghost");
    }

    #[test]
    fn test_stats_reply_hit_rate() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_miss();
        let reply = StatsReply::from(stats);
        assert_eq!(reply.hit_rate, 0.5);
    }

    #[test]
    fn test_get_reply_format_lowercase() {
        let reply = GetReply {
            key: "k".to_string(),
            width: 1,
            height: 1,
            format: PixelFormat::Rgb565,
            units: 0,
        };
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["format"], "rgb565");
    }

    #[test]
    fn test_clear_reply_messages() {
        assert!(ClearReply::new(true, 0).message.contains("disposed"));
        assert!(ClearReply::new(false, 3).message.contains("3"));
    }
}
