//! Continuation entry storage.
//!
//! Entries are immutable once stored. Advancing a continuation mints a new
//! entry under a new key; the old entry is left to expire.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::hash::compute_continuation_key;
use crate::Error;

/// Default time-to-live for continuation entries (5 minutes).
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

static KEY_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// A paused pagination state.
///
/// `full_markdown` is shared between the entries of one continuation chain,
/// so minting a successor does not copy the document.
#[derive(Debug, Clone)]
pub struct ContinuationEntry {
    pub key: String,
    pub full_markdown: Arc<str>,
    /// Byte offset into `full_markdown`; always on a char boundary.
    pub offset: usize,
    pub source_url: String,
    pub title: String,
    pub method: String,
    pub created_at: DateTime<Utc>,
}

impl ContinuationEntry {
    /// Create an entry with a freshly minted key.
    ///
    /// An offset past the end of the document is clamped to its length.
    pub fn new(
        full_markdown: Arc<str>, offset: usize, source_url: impl Into<String>, title: impl Into<String>,
        method: impl Into<String>,
    ) -> Self {
        let source_url = source_url.into();
        let offset = offset.min(full_markdown.len());
        let created_at = Utc::now();
        let nanos = created_at.timestamp_nanos_opt().unwrap_or_default();
        let sequence = KEY_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let key = compute_continuation_key(&source_url, offset, nanos, sequence);

        Self { key, full_markdown, offset, source_url, title: title.into(), method: method.into(), created_at }
    }

    /// Whether this entry has outlived `ttl` as of `now`.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now.signed_duration_since(self.created_at)
            .to_std()
            .map(|age| age >= ttl)
            .unwrap_or(false)
    }
}

/// Process-wide map from continuation keys to entries.
///
/// Cloning the store yields another handle to the same entries.
#[derive(Clone, Debug)]
pub struct ContinuationStore {
    entries: Arc<RwLock<HashMap<String, ContinuationEntry>>>,
    ttl: Duration,
}

impl Default for ContinuationStore {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl ContinuationStore {
    /// Create an empty store whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self { entries: Arc::new(RwLock::new(HashMap::new())), ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Store an entry under its key, returning the key.
    pub async fn put(&self, entry: ContinuationEntry) -> String {
        let key = entry.key.clone();
        self.entries.write().await.insert(key.clone(), entry);
        key
    }

    /// Resolve a key to its entry.
    ///
    /// Unknown keys, swept keys and keys older than the TTL all produce
    /// `Error::ContinuationInvalid`.
    pub async fn get(&self, key: &str) -> Result<ContinuationEntry, Error> {
        self.get_at(key, Utc::now()).await
    }

    /// Resolve a key as of `now`.
    pub async fn get_at(&self, key: &str, now: DateTime<Utc>) -> Result<ContinuationEntry, Error> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(entry) if !entry.is_expired(now, self.ttl) => Ok(entry.clone()),
            _ => Err(Error::ContinuationInvalid),
        }
    }

    /// Remove an entry. Returns whether it existed.
    pub async fn delete(&self, key: &str) -> bool {
        self.entries.write().await.remove(key).is_some()
    }

    /// Evict every entry expired as of `now`.
    ///
    /// Returns the number of evicted entries.
    pub async fn sweep(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now, self.ttl));
        before - entries.len()
    }

    /// Remove all entries unconditionally.
    ///
    /// Returns the number of removed entries.
    pub async fn clear(&self) -> usize {
        let mut entries = self.entries.write().await;
        let count = entries.len();
        entries.clear();
        count
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
