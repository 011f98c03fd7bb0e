//! Shell Module
//!
//! Line-oriented front end that drives a single bitmap cache.
//!
//! # Commands
//! - `put <key> <width> <height> [format]` - Allocate and cache a bitmap
//! - `get <key>` - Look a bitmap up
//! - `del <key>` - Remove a bitmap
//! - `clear [keep]` - Empty the cache
//! - `resize <units>` - Change the quota
//! - `stats`, `keys`, `help`, `quit`

pub mod command;
pub mod handlers;
pub mod replies;

pub use command::Command;
pub use handlers::{execute, run_shell, BitmapStore, ShellState};
pub use replies::Reply;
