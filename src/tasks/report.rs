//! Occupancy Report Task
//!
//! Background task that periodically logs how full the cache is.

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::info;

use crate::cache::{CacheStore, Resource};

/// Spawns a background task that logs cache occupancy at a fixed interval.
///
/// The task only reads statistics, so it never changes recency order. It
/// runs until aborted.
///
/// # Arguments
/// * `cache` - shared, lock-guarded cache store
/// * `interval_secs` - seconds between reports
///
/// # Example
/// ```ignore
/// let state = ShellState::new(CacheStore::new(4096));
/// let report_handle = spawn_report_task(state.cache.clone(), 30);
/// // Later, during shutdown:
/// report_handle.abort();
/// ```
pub fn spawn_report_task<K, V>(
    cache: Arc<Mutex<CacheStore<K, V>>>,
    interval_secs: u64,
) -> JoinHandle<()>
where
    K: Eq + Hash + Clone + Debug + Send + 'static,
    V: Resource + Send + 'static,
{
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting occupancy report task with interval of {} seconds",
            interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let stats = {
                let cache_guard = cache.lock().await;
                cache_guard.stats()
            };

            info!(
                entries = stats.total_entries,
                size = stats.total_size,
                max = stats.max_size,
                fill_ratio = stats.fill_ratio(),
                hit_rate = stats.hit_rate(),
                evictions = stats.evictions,
                divergences = stats.divergences,
                "Cache occupancy"
            );
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_report_task_leaves_cache_untouched() {
        let cache = Arc::new(Mutex::new(CacheStore::new(100)));
        {
            let mut cache_guard = cache.lock().await;
            cache_guard.put("a".to_string(), vec![0u8; 2048]).unwrap();
            cache_guard.put("b".to_string(), vec![0u8; 2048]).unwrap();
        }

        let handle = spawn_report_task(cache.clone(), 1);

        // Wait for at least one report
        tokio::time::sleep(Duration::from_millis(1500)).await;

        {
            let cache_guard = cache.lock().await;
            assert_eq!(cache_guard.eldest(), Some(&"a".to_string()));
            assert_eq!(cache_guard.stats().hits, 0);
            assert_eq!(cache_guard.size(), 4);
        }

        handle.abort();
    }

    #[tokio::test]
    async fn test_report_task_can_be_aborted() {
        let cache: Arc<Mutex<CacheStore<String, Vec<u8>>>> =
            Arc::new(Mutex::new(CacheStore::new(100)));

        let handle = spawn_report_task(cache, 1);

        // Abort immediately
        handle.abort();

        // Wait a bit and verify task is finished
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
