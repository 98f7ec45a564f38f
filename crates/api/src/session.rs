//! In-memory [`SessionStore`] with idle expiry.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use rendezvous_core::errors::BookingResult;
use rendezvous_core::store::{DraftKey, SessionStore};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

struct Entry {
    value: Value,
    touched_at: Instant,
}

/// Drafts expire `ttl` after they were last written.
pub struct MemorySessionStore {
    entries: RwLock<HashMap<DraftKey, Entry>>,
    ttl: Duration,
}

impl MemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    fn is_expired(&self, entry: &Entry) -> bool {
        entry.touched_at.elapsed() >= self.ttl
    }

    /// Drops every expired draft and returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !self.is_expired(entry));
        let removed = before - entries.len();
        if removed > 0 {
            debug!("Purged {} expired wizard drafts", removed);
        }
        removed
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, key: &DraftKey) -> BookingResult<Option<Value>> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|entry| !self.is_expired(entry))
            .map(|entry| entry.value.clone()))
    }

    async fn set(&self, key: &DraftKey, value: Value) -> BookingResult<()> {
        self.purge_expired().await;
        self.entries.write().await.insert(
            key.clone(),
            Entry {
                value,
                touched_at: Instant::now(),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &DraftKey) -> BookingResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}
