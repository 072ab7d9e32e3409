//! Durable backing for the availability cache.
//!
//! A store holds exactly one serialized snapshot. The cache reads it once at
//! startup and overwrites it in full after every mutation.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::Error;

/// Read/write access to the single snapshot slot.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Read the stored snapshot. `Ok(None)` means the slot has never been written.
    async fn read(&self) -> Result<Option<String>, Error>;

    /// Replace the stored snapshot.
    async fn write(&self, payload: String) -> Result<(), Error>;
}

/// In-memory store with failure injection, for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    payload: Mutex<Option<String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a raw payload.
    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self { payload: Mutex::new(Some(payload.into())), ..Self::default() }
    }

    /// Current raw payload.
    pub fn payload(&self) -> Option<String> {
        self.payload.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn read(&self) -> Result<Option<String>, Error> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Error::StoreRead("memory store unavailable".into()));
        }
        Ok(self.payload())
    }

    async fn write(&self, payload: String) -> Result<(), Error> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::StorePersist("memory store quota exceeded".into()));
        }
        *self.payload.lock().unwrap_or_else(|e| e.into_inner()) = Some(payload);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
