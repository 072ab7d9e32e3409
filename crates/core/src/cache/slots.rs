//! Named-slot storage on top of the SQLite cache database.
//!
//! Each slot holds one opaque payload that is replaced wholesale on write.

use async_trait::async_trait;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite::OptionalExtension;

use super::connection::CacheDb;
use super::store::SnapshotStore;
use crate::Error;

/// Slot name used for the availability snapshot.
pub const AVAILABILITY_SLOT: &str = "course_availability_cache";

impl CacheDb {
    /// Read the payload stored under `name`.
    pub async fn read_slot(&self, name: &str) -> Result<Option<String>, Error> {
        let name = name.to_string();
        self.conn
            .call(move |conn| -> Result<Option<String>, Error> {
                let payload = conn
                    .query_row("SELECT payload FROM slots WHERE name = ?1", params![name], |row| row.get(0))
                    .optional()?;
                Ok(payload)
            })
            .await
            .map_err(Error::from)
    }

    /// Replace the payload stored under `name`.
    pub async fn write_slot(&self, name: &str, payload: String) -> Result<(), Error> {
        let name = name.to_string();
        let now = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO slots (name, payload, updated_at) VALUES (?1, ?2, ?3)
                     ON CONFLICT(name) DO UPDATE SET
                        payload = excluded.payload,
                        updated_at = excluded.updated_at",
                    params![name, payload, now],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Remove the slot entirely. Returns whether it existed.
    pub async fn delete_slot(&self, name: &str) -> Result<bool, Error> {
        let name = name.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let count = conn.execute("DELETE FROM slots WHERE name = ?1", params![name])?;
                Ok(count > 0)
            })
            .await
            .map_err(Error::from)
    }
}

/// A single slot in a [`CacheDb`] used as a snapshot store.
#[derive(Debug, Clone)]
pub struct SlotStore {
    db: CacheDb,
    name: String,
}

impl SlotStore {
    pub fn new(db: CacheDb, name: impl Into<String>) -> Self {
        Self { db, name: name.into() }
    }

    /// Store backed by the default availability slot.
    pub fn availability(db: CacheDb) -> Self {
        Self::new(db, AVAILABILITY_SLOT)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl SnapshotStore for SlotStore {
    async fn read(&self) -> Result<Option<String>, Error> {
        self.db
            .read_slot(&self.name)
            .await
            .map_err(|e| Error::StoreRead(format!("slot {}: {e}", self.name)))
    }

    async fn write(&self, payload: String) -> Result<(), Error> {
        self.db
            .write_slot(&self.name, payload)
            .await
            .map_err(|e| Error::StorePersist(format!("slot {}: {e}", self.name)))
    }
}
