//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside the shell.
//!
//! # Tasks
//! - Occupancy report: logs cache fill level and hit rate at a fixed interval

mod report;

pub use report::spawn_report_task;
