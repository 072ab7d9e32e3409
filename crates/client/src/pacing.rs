//! Request pacing for cache-miss probes.
//!
//! The sweep calls [`PacingPolicy::pace`] immediately before each probe. The
//! policy decides how long to hold the caller back.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

use coursenav_core::AppConfig;
use coursenav_core::config::PacingMode;

/// Throttle applied before each outbound probe.
#[async_trait]
pub trait PacingPolicy: Send + Sync {
    async fn pace(&self);
}

/// Sleep the same delay before every probe.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// No throttling at all.
    pub fn none() -> Self {
        Self::new(Duration::ZERO)
    }
}

#[async_trait]
impl PacingPolicy for FixedDelay {
    async fn pace(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

/// Enforce a minimum spacing between consecutive probes.
///
/// Only the part of the interval not already spent elsewhere is slept.
#[derive(Debug)]
pub struct MinInterval {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl MinInterval {
    pub fn new(min_interval: Duration) -> Self {
        Self { last_request: Mutex::new(None), min_interval }
    }
}

#[async_trait]
impl PacingPolicy for MinInterval {
    async fn pace(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

/// Build the pacing policy selected by configuration.
pub fn from_config(config: &AppConfig) -> Arc<dyn PacingPolicy> {
    match config.pacing_mode {
        PacingMode::Fixed => Arc::new(FixedDelay::new(config.pacing_delay())),
        PacingMode::Interval => Arc::new(MinInterval::new(config.pacing_delay())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_waited(start: Instant, expected_ms: u64) {
        let elapsed = start.elapsed();
        assert!(
            elapsed >= Duration::from_millis(expected_ms) && elapsed < Duration::from_millis(expected_ms + 5),
            "waited {elapsed:?}, expected about {expected_ms}ms"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_fixed_delay_sleeps_every_time() {
        let pacing = FixedDelay::new(Duration::from_millis(100));
        let start = Instant::now();

        pacing.pace().await;
        pacing.pace().await;

        assert_waited(start, 200);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fixed_delay_none_is_immediate() {
        let start = Instant::now();
        FixedDelay::none().pace().await;
        assert_waited(start, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_min_interval_first_call_is_free() {
        let pacing = MinInterval::new(Duration::from_millis(100));
        let start = Instant::now();

        pacing.pace().await;
        assert_waited(start, 0);

        pacing.pace().await;
        assert_waited(start, 100);
    }

    #[tokio::test(start_paused = true)]
    async fn test_min_interval_credits_elapsed_time() {
        let pacing = MinInterval::new(Duration::from_millis(100));
        pacing.pace().await;

        tokio::time::advance(Duration::from_millis(60)).await;
        let start = Instant::now();
        pacing.pace().await;

        assert_waited(start, 40);
    }

    #[tokio::test(start_paused = true)]
    async fn test_from_config_selects_mode() {
        let fixed = from_config(&AppConfig::default());
        let start = Instant::now();
        fixed.pace().await;
        fixed.pace().await;
        assert_waited(start, 200);

        let interval = from_config(&AppConfig { pacing_mode: PacingMode::Interval, ..Default::default() });
        let start = Instant::now();
        interval.pace().await;
        interval.pace().await;
        assert_waited(start, 100);
    }
}
