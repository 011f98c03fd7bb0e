//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;

use crate::cache::DEFAULT_MAX_SIZE;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum total size of cached resources, in KiB units
    pub max_size: usize,
    /// Register missed keys with the recency tracker (compatibility mode)
    pub touch_on_miss: bool,
    /// Seconds between occupancy reports, 0 disables reporting
    pub report_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_SIZE` - Capacity in KiB units (default: 4096)
    /// - `CACHE_TOUCH_ON_MISS` - `true`/`1`/`yes` to track missed keys (default: false)
    /// - `CACHE_REPORT_INTERVAL` - Report interval in seconds (default: 30)
    pub fn from_env() -> Self {
        Self {
            max_size: env::var("CACHE_MAX_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_SIZE),
            touch_on_miss: env::var("CACHE_TOUCH_ON_MISS")
                .ok()
                .and_then(|v| parse_flag(&v))
                .unwrap_or(false),
            report_interval: env::var("CACHE_REPORT_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            touch_on_miss: false,
            report_interval: 30,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
