//! Core types and shared functionality for course-nav.
//!
//! This crate provides:
//! - The durable availability cache and its SQLite backing
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{AvailabilityCache, CacheDb, CacheEntry, SnapshotStore};
pub use config::AppConfig;
pub use error::Error;
