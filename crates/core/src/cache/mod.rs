//! Durable availability cache.
//!
//! This module provides the TTL-bounded memo that sits in front of the
//! existence probe, plus the storage it persists to:
//!
//! - Versioned snapshot codec with per-record validation
//! - Pluggable snapshot stores (SQLite slot, in-memory)
//! - SQLite connection handling and schema migrations

pub mod availability;
pub mod codec;
pub mod connection;
pub mod entry;
pub mod migrations;
pub mod slots;
pub mod store;

pub use crate::Error;

pub use availability::AvailabilityCache;
pub use connection::CacheDb;
pub use entry::{CacheEntry, Clock, ManualClock, SystemClock};
pub use slots::{AVAILABILITY_SLOT, SlotStore};
pub use store::{MemoryStore, SnapshotStore};
