//! Bitmap Cache - A size-bounded resource cache
//!
//! Keeps disposable resources under a fixed KiB quota, evicting the least
//! recently used entries and disposing them when the quota is exceeded.

pub mod bitmap;
pub mod cache;
pub mod config;
pub mod error;
pub mod shell;
pub mod tasks;

pub use bitmap::{Bitmap, PixelFormat};
pub use cache::{CacheStore, RecencyTracker, Resource};
pub use config::Config;
pub use error::{CacheError, Result};
pub use shell::ShellState;
pub use tasks::spawn_report_task;
