//! Shell Handlers
//!
//! Executes parsed commands against a shared cache and drives the
//! read-eval-print loop.

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::bitmap::Bitmap;
use crate::cache::{CacheStore, Resource, SIZE_UNIT_BYTES};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::shell::command::Command;
use crate::shell::replies::{
    ClearReply, DeleteReply, GetReply, HelpReply, KeysReply, PutReply, Reply, ResizeReply,
    StatsReply,
};

/// Cache of bitmaps keyed by name.
pub type BitmapStore = CacheStore<String, Bitmap>;

/// Shell state shared with background tasks.
///
/// Every access to the cache goes through one mutex, since the store itself
/// is not synchronised.
#[derive(Clone)]
pub struct ShellState {
    /// Lock-guarded cache store
    pub cache: Arc<Mutex<BitmapStore>>,
}

impl ShellState {
    /// Creates a new ShellState with the given cache store.
    pub fn new(cache: BitmapStore) -> Self {
        Self {
            cache: Arc::new(Mutex::new(cache)),
        }
    }

    /// Creates a new ShellState from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(CacheStore::from_config(config))
    }
}

/// Runs one command and builds its reply.
///
/// `Quit` is handled by the loop and answers with help here.
pub async fn execute(state: &ShellState, command: Command) -> Result<Reply> {
    let mut cache = state.cache.lock().await;

    let reply = match command {
        Command::Put {
            key,
            width,
            height,
            format,
        } => {
            // Reject on dimensions alone so oversized input never allocates.
            let units = Bitmap::byte_len(width, height, format)? / SIZE_UNIT_BYTES;
            if units > cache.max_size() {
                return Err(CacheError::ResourceTooLarge {
                    size: units,
                    capacity: cache.max_size(),
                });
            }
            let bitmap = Bitmap::new(width, height, format)?;
            let replaced = cache.put(key.clone(), bitmap)?;
            Reply::Put(PutReply::new(key, units, replaced))
        }
        Command::Get { key } => {
            let bitmap = cache
                .get(key.as_str())
                .ok_or_else(|| CacheError::NotFound(key.clone()))?;
            Reply::Get(GetReply {
                width: bitmap.width(),
                height: bitmap.height(),
                format: bitmap.format(),
                units: bitmap.size_units(),
                key,
            })
        }
        Command::Delete { key } => {
            let bitmap = cache
                .remove(key.as_str())
                .ok_or_else(|| CacheError::NotFound(key.clone()))?;
            let units = bitmap.size_units();
            // The shell is the last owner.
            bitmap.dispose();
            Reply::Delete(DeleteReply::new(key, units))
        }
        Command::Clear { dispose } => {
            let released = cache.clear(dispose);
            Reply::Clear(ClearReply::new(dispose, released.len()))
        }
        Command::Resize { max_size } => {
            cache.set_max_size(max_size)?;
            Reply::Resize(ResizeReply {
                max_size: cache.max_size(),
                total_size: cache.size(),
                total_entries: cache.len(),
            })
        }
        Command::Stats => Reply::Stats(StatsReply::from(cache.stats())),
        Command::Keys => {
            let mut keys: Vec<String> = cache.keys().cloned().collect();
            keys.sort();
            Reply::Keys(KeysReply { keys })
        }
        Command::Help | Command::Quit => Reply::Help(HelpReply::default()),
    };

    Ok(reply)
}

/// Reads commands line by line and writes one JSON reply per line.
///
/// Stops at end of input or on `quit`. Bad input produces an error reply,
/// never ends the loop.
pub async fn run_shell<R, W>(state: ShellState, reader: R, mut writer: W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let reply = match Command::parse(line) {
            Ok(Command::Quit) => {
                info!("Quit requested");
                break;
            }
            Ok(command) => {
                debug!(?command, "Executing command");
                match execute(&state, command).await {
                    Ok(reply) => reply,
                    Err(err) => {
                        warn!("Command failed: {}", err);
                        Reply::from(err)
                    }
                }
            }
            Err(err) => {
                warn!("Rejected input: {}", err);
                Reply::from(err)
            }
        };

        let mut json = serde_json::to_string(&reply)?;
        json.push('\n');
        writer.write_all(json.as_bytes()).await?;
        writer.flush().await?;
    }

    Ok(())
}
