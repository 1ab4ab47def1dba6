//! Background expiry sweep for the continuation store.

use std::time::Duration;

use chrono::Utc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::store::ContinuationStore;

/// Owns the periodic sweep task started by [`ContinuationStore::spawn_sweeper`].
///
/// Call [`SweeperHandle::shutdown`] for an orderly stop. Dropping the handle
/// aborts the task.
#[derive(Debug)]
pub struct SweeperHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl SweeperHandle {
    /// Signal the sweep task to stop and wait for it to exit.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take()
            && let Err(e) = task.await
        {
            tracing::debug!("continuation sweeper exited abnormally: {e}");
        }
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl ContinuationStore {
    /// Start a task that evicts expired entries every `interval`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_sweeper(&self, interval: Duration) -> SweeperHandle {
        let store = self.clone();
        let (tx, mut rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = &mut rx => break,
                    _ = ticker.tick() => {
                        let evicted = store.sweep(Utc::now()).await;
                        if evicted > 0 {
                            tracing::debug!(evicted, "swept expired continuation entries");
                        }
                    }
                }
            }
        });

        SweeperHandle { shutdown: Some(tx), task: Some(task) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::store::ContinuationEntry;
    use std::sync::Arc;

    fn make_entry() -> ContinuationEntry {
        ContinuationEntry::new(Arc::from("body"), 0, "https://example.com", "Test", "basic-clean")
    }

    #[tokio::test]
    async fn test_sweeper_evicts_in_background() {
        let store = ContinuationStore::new(Duration::ZERO);
        store.put(make_entry()).await;

        let sweeper = store.spawn_sweeper(Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(store.is_empty().await);
        sweeper.shutdown().await;
    }

    #[tokio::test]
    async fn test_sweeper_stops_after_shutdown() {
        let store = ContinuationStore::new(Duration::ZERO);
        let sweeper = store.spawn_sweeper(Duration::from_millis(10));
        sweeper.shutdown().await;

        store.put(make_entry()).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(store.len().await, 1);
    }
}
