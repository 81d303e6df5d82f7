//! Fixed-window counters

use super::{MemoryStore, WindowEntry};
use crate::storage::{CounterStore, WindowCount};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::Instant;

#[async_trait]
impl CounterStore for MemoryStore {
    async fn increment(&self, key: &str, window: Duration) -> Result<WindowCount> {
        let now = Instant::now();

        // The entry guard holds the shard lock until the count is read back.
        let mut entry = self
            .counters
            .entry(key.to_string())
            .or_insert_with(|| WindowEntry {
                count: 0,
                started: now,
                window,
            });

        if entry.is_elapsed(now) {
            entry.count = 0;
            entry.started = now;
            entry.window = window;
        }
        entry.count += 1;

        Ok(WindowCount {
            count: entry.count,
            reset_after: entry.window.saturating_sub(now.duration_since(entry.started)),
        })
    }

    async fn purge_expired(&self) -> Result<usize> {
        let now = Instant::now();
        let before = self.counters.len();
        self.counters.retain(|_, entry| !entry.is_elapsed(now));
        Ok(before.saturating_sub(self.counters.len()))
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
