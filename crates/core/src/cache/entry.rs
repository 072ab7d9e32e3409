//! Availability entries and the clock they are stamped with.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// One memoized existence check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    /// Outcome of the last probe.
    pub exists: bool,
    /// Wall-clock time the entry was written, in epoch milliseconds.
    #[serde(alias = "timestamp")]
    pub recorded_at: i64,
}

impl CacheEntry {
    pub fn new(exists: bool, recorded_at: i64) -> Self {
        Self { exists, recorded_at }
    }

    /// Age of the entry at `now`. Negative when the entry is stamped in the future.
    pub fn age_ms(&self, now: i64) -> i64 {
        now.saturating_sub(self.recorded_at)
    }

    /// An entry is usable while `now - recorded_at < ttl`.
    pub fn is_expired(&self, now: i64, ttl: Duration) -> bool {
        self.age_ms(now) >= ttl_millis(ttl)
    }
}

pub(crate) fn ttl_millis(ttl: Duration) -> i64 {
    i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX)
}

/// Source of wall-clock time in epoch milliseconds.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

/// Reads the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Hand-driven clock for tests and replay.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(start_millis: i64) -> Self {
        Self { now: AtomicI64::new(start_millis) }
    }

    pub fn set(&self, millis: i64) {
        self.now.store(millis, Ordering::SeqCst);
    }

    pub fn advance(&self, by: Duration) {
        self.now.fetch_add(ttl_millis(by), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}
