//! TTL-bounded, write-through memo of URL existence checks.
//!
//! The in-memory map is authoritative for the life of the process. The
//! durable store is best-effort backing: it is read once by
//! [`AvailabilityCache::initialize`] and overwritten with a full snapshot after
//! every mutation. Store failures are logged and never reach callers.
//!
//! Writes are serialized and each one encodes the map as it stands once the
//! write slot is held, so the last write to land is never older than the last
//! acknowledged mutation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::Mutex as WriteLock;

use super::codec;
use super::entry::{CacheEntry, Clock, SystemClock};
use super::store::SnapshotStore;
use crate::config::DEFAULT_CACHE_TTL_MS;

/// Durable availability cache.
///
/// `get` never performs I/O. Expired entries found by `get` are evicted from
/// memory only; the store keeps them until the next persist.
pub struct AvailabilityCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    write_lock: WriteLock<()>,
    store: Arc<dyn SnapshotStore>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl std::fmt::Debug for AvailabilityCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvailabilityCache")
            .field("len", &self.len())
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl AvailabilityCache {
    /// Create an empty cache over `store` using the system clock.
    pub fn new(store: Arc<dyn SnapshotStore>, ttl: Duration) -> Self {
        Self::with_clock(store, ttl, Arc::new(SystemClock))
    }

    /// Create an empty cache with an explicit clock.
    pub fn with_clock(store: Arc<dyn SnapshotStore>, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self { entries: Mutex::new(HashMap::new()), write_lock: WriteLock::new(()), store, clock, ttl }
    }

    /// Create a cache with the default seven day TTL.
    pub fn with_default_ttl(store: Arc<dyn SnapshotStore>) -> Self {
        Self::new(store, Duration::from_millis(DEFAULT_CACHE_TTL_MS))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Load entries from the durable store.
    ///
    /// A missing, unreadable or corrupt slot leaves the cache empty. Entries
    /// already expired are dropped from memory but not written back.
    pub async fn initialize(&self) {
        let payload = match self.store.read().await {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                tracing::debug!("no stored availability cache; starting empty");
                return;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load availability cache");
                return;
            }
        };

        let decoded = match codec::decode(&payload) {
            Ok(decoded) => decoded,
            Err(e) => {
                tracing::error!(error = %e, "failed to load availability cache");
                return;
            }
        };

        let now = self.clock.now_millis();
        let stored = decoded.entries.len();
        let live: Vec<(String, CacheEntry)> = decoded
            .entries
            .into_iter()
            .filter(|(_, entry)| !entry.is_expired(now, self.ttl))
            .collect();
        let loaded = live.len();
        self.lock().extend(live);

        tracing::info!(
            loaded,
            expired = stored - loaded,
            skipped = decoded.skipped.len(),
            "loaded availability cache"
        );
    }

    /// Cached existence for `id`, or `None` on a miss.
    pub fn get(&self, id: &str) -> Option<bool> {
        self.entry(id).map(|entry| entry.exists)
    }

    /// Full cached entry for `id`, with the same expiry rule as [`get`](Self::get).
    pub fn entry(&self, id: &str) -> Option<CacheEntry> {
        let now = self.clock.now_millis();
        let mut entries = self.lock();
        let entry = *entries.get(id)?;

        if entry.is_expired(now, self.ttl) {
            entries.remove(id);
            tracing::debug!(id, "evicted expired availability entry");
            return None;
        }

        Some(entry)
    }

    /// Record the outcome of a probe and persist the full map.
    pub async fn set(&self, id: &str, exists: bool) {
        let entry = CacheEntry::new(exists, self.clock.now_millis());
        self.lock().insert(id.to_string(), entry);
        self.persist().await;
    }

    /// Remove every expired entry. Persists only if something was removed.
    ///
    /// Returns the number of entries removed.
    pub async fn clear_expired(&self) -> usize {
        let now = self.clock.now_millis();
        let removed = {
            let mut entries = self.lock();
            let before = entries.len();
            entries.retain(|_, entry| !entry.is_expired(now, self.ttl));
            before - entries.len()
        };
        if removed == 0 {
            return 0;
        }

        self.persist().await;
        tracing::info!(removed, "cleared expired availability entries");
        removed
    }

    /// Number of entries currently held in memory, expired or not.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Write the current map. Holding `write_lock` across encode and write keeps
    /// snapshots landing in the order they were taken.
    async fn persist(&self) {
        let _guard = self.write_lock.lock().await;
        let snapshot = {
            let entries = self.lock();
            codec::encode(&entries)
        };
        let result = match snapshot {
            Ok(payload) => self.store.write(payload).await,
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            tracing::error!(error = %e, "failed to persist availability cache");
        }
    }
}
