//! Shell Commands
//!
//! Parses one line of shell input into a command.

use crate::bitmap::PixelFormat;
use crate::error::{CacheError, Result};

/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// A single shell instruction.
///
/// # Syntax
/// - `put <key> <width> <height> [format]`
/// - `get <key>`
/// - `del <key>`
/// - `clear [keep]`
/// - `resize <units>`
/// - `stats`, `keys`, `help`, `quit`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Allocate a bitmap and cache it
    Put {
        key: String,
        width: u32,
        height: u32,
        format: PixelFormat,
    },
    /// Look a bitmap up
    Get { key: String },
    /// Take a bitmap out of the cache
    Delete { key: String },
    /// Empty the cache; `dispose` is false for `clear keep`
    Clear { dispose: bool },
    /// Change the quota
    Resize { max_size: usize },
    Stats,
    Keys,
    Help,
    Quit,
}

impl Command {
    /// Parses a trimmed, non-empty input line.
    pub fn parse(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace();
        let name = parts
            .next()
            .ok_or_else(|| CacheError::InvalidCommand("Empty command".to_string()))?;
        let args: Vec<&str> = parts.collect();

        let command = match (name.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("put", [key, width, height]) => Command::Put {
                key: validate_key(key)?,
                width: parse_dimension("width", width)?,
                height: parse_dimension("height", height)?,
                format: PixelFormat::default(),
            },
            ("put", [key, width, height, format]) => Command::Put {
                key: validate_key(key)?,
                width: parse_dimension("width", width)?,
                height: parse_dimension("height", height)?,
                format: format.parse()?,
            },
            ("get", [key]) => Command::Get {
                key: validate_key(key)?,
            },
            ("del", [key]) => Command::Delete {
                key: validate_key(key)?,
            },
            ("clear", []) => Command::Clear { dispose: true },
            ("clear", ["keep"]) => Command::Clear { dispose: false },
            ("resize", [units]) => Command::Resize {
                max_size: units.parse().map_err(|_| {
                    CacheError::InvalidCommand(format!("Invalid size '{}'", units))
                })?,
            },
            ("stats", []) => Command::Stats,
            ("keys", []) => Command::Keys,
            ("help", []) => Command::Help,
            ("quit", []) | ("exit", []) => Command::Quit,
            (other, _) => {
                return Err(CacheError::InvalidCommand(format!(
                    "Unrecognised command or arguments: '{}'",
                    other
                )))
            }
        };
        Ok(command)
    }
}

fn validate_key(key: &str) -> Result<String> {
    if key.len() > MAX_KEY_LENGTH {
        return Err(CacheError::InvalidCommand(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    Ok(key.to_string())
}

fn parse_dimension(name: &str, value: &str) -> Result<u32> {
    match value.parse::<u32>() {
        Ok(0) | Err(_) => Err(CacheError::InvalidCommand(format!(
            "Invalid {} '{}', expected a positive integer",
            name, value
        ))),
        Ok(parsed) => Ok(parsed),
    }
}
