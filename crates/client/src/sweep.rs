//! Batch availability resolution.
//!
//! Identifiers are resolved strictly one after another in input order: cache
//! first, then a paced probe on a miss. Each resolution is handed to the caller
//! as soon as it is known, and every identifier yields exactly one resolution.

use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use coursenav_core::AvailabilityCache;

use crate::pacing::PacingPolicy;
use crate::probe::ExistenceProbe;

/// Where a resolution came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    /// Valid cache entry, no network.
    Cache,
    /// Cache miss, answered by the probe.
    Probe,
}

/// Outcome for a single identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Resolution {
    pub id: String,
    pub exists: bool,
    pub source: ResolutionSource,
}

/// Result of one sweep.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SweepReport {
    /// One entry per input identifier, in input order.
    pub resolutions: Vec<Resolution>,
    pub hits: usize,
    pub misses: usize,
    /// Entries held by the cache once the sweep finished.
    pub cache_size: usize,
}

impl SweepReport {
    /// Resolved booleans in input order.
    pub fn values(&self) -> Vec<bool> {
        self.resolutions.iter().map(|r| r.exists).collect()
    }
}

/// Resolves identifiers against the cache, probing on misses.
#[derive(Clone)]
pub struct AvailabilitySweep {
    cache: Arc<AvailabilityCache>,
    probe: Arc<dyn ExistenceProbe>,
    pacing: Arc<dyn PacingPolicy>,
}

impl AvailabilitySweep {
    pub fn new(cache: Arc<AvailabilityCache>, probe: Arc<dyn ExistenceProbe>, pacing: Arc<dyn PacingPolicy>) -> Self {
        Self { cache, probe, pacing }
    }

    pub fn cache(&self) -> &AvailabilityCache {
        &self.cache
    }

    /// Resolve every identifier, reporting each one through `on_resolved`.
    pub async fn resolve_all<I, S, F>(&self, ids: I, mut on_resolved: F) -> SweepReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: FnMut(&Resolution),
    {
        let mut report = SweepReport::default();

        for id in ids {
            let id = id.as_ref();
            let resolution = match self.cache.get(id) {
                Some(exists) => {
                    report.hits += 1;
                    tracing::debug!(id, exists, "cache hit");
                    Resolution { id: id.to_string(), exists, source: ResolutionSource::Cache }
                }
                None => {
                    report.misses += 1;
                    tracing::debug!(id, "cache miss; probing");
                    self.pacing.pace().await;
                    let exists = self.probe.probe(id).await;
                    self.cache.set(id, exists).await;
                    Resolution { id: id.to_string(), exists, source: ResolutionSource::Probe }
                }
            };

            on_resolved(&resolution);
            report.resolutions.push(resolution);
        }

        report.cache_size = self.cache.len();
        tracing::info!(
            checked = report.resolutions.len(),
            hits = report.hits,
            misses = report.misses,
            cache_size = report.cache_size,
            "availability sweep complete"
        );

        report
    }

    /// Resolve every identifier without a per-item callback.
    pub async fn resolve<I, S>(&self, ids: I) -> SweepReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.resolve_all(ids, |_| {}).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pacing::FixedDelay;
    use async_trait::async_trait;
    use coursenav_core::cache::{ManualClock, MemoryStore};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Probe with scripted answers that records every call.
    #[derive(Default)]
    struct ScriptedProbe {
        answers: HashMap<String, bool>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedProbe {
        fn new(answers: &[(&str, bool)]) -> Self {
            Self {
                answers: answers.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ExistenceProbe for ScriptedProbe {
        async fn probe(&self, id: &str) -> bool {
            self.calls.lock().unwrap().push(id.to_string());
            self.answers.get(id).copied().unwrap_or(false)
        }
    }

    fn cache() -> Arc<AvailabilityCache> {
        Arc::new(AvailabilityCache::with_clock(
            Arc::new(MemoryStore::new()),
            Duration::from_millis(1000),
            Arc::new(ManualClock::new(0)),
        ))
    }

    fn sweep(cache: &Arc<AvailabilityCache>, probe: &Arc<ScriptedProbe>) -> AvailabilitySweep {
        AvailabilitySweep::new(cache.clone(), probe.clone(), Arc::new(FixedDelay::none()))
    }

    #[tokio::test]
    async fn test_mixed_hit_and_miss() {
        let cache = cache();
        cache.set("A", true).await;
        let probe = Arc::new(ScriptedProbe::new(&[("B", false)]));

        let report = sweep(&cache, &probe).resolve(["A", "B"]).await;

        assert_eq!(report.values(), vec![true, false]);
        assert_eq!((report.hits, report.misses), (1, 1));
        assert_eq!(probe.calls(), vec!["B".to_string()]);
        assert_eq!(cache.get("B"), Some(false));
        assert_eq!(report.cache_size, 2);
    }

    #[tokio::test]
    async fn test_cached_subset_is_never_probed() {
        let cache = cache();
        cache.set("a", false).await;
        cache.set("c", true).await;
        let probe = Arc::new(ScriptedProbe::new(&[("b", true), ("d", true)]));

        let report = sweep(&cache, &probe).resolve(["a", "b", "c", "d", "e"]).await;

        assert_eq!(report.values(), vec![false, true, true, true, false]);
        assert_eq!(probe.calls(), vec!["b".to_string(), "d".to_string(), "e".to_string()]);
        assert_eq!((report.hits, report.misses), (2, 3));
    }

    #[tokio::test]
    async fn test_callback_sees_every_id_in_order() {
        let cache = cache();
        cache.set("y", true).await;
        let probe = Arc::new(ScriptedProbe::new(&[("x", true)]));

        let mut seen = Vec::new();
        let report = sweep(&cache, &probe)
            .resolve_all(vec!["x".to_string(), "y".to_string(), "z".to_string()], |r| {
                seen.push((r.id.clone(), r.exists, r.source))
            })
            .await;

        assert_eq!(
            seen,
            vec![
                ("x".to_string(), true, ResolutionSource::Probe),
                ("y".to_string(), true, ResolutionSource::Cache),
                ("z".to_string(), false, ResolutionSource::Probe),
            ]
        );
        assert_eq!(report.resolutions.len(), 3);
    }

    #[tokio::test]
    async fn test_second_sweep_is_all_hits() {
        let cache = cache();
        let probe = Arc::new(ScriptedProbe::new(&[("p", true)]));
        let sweep = sweep(&cache, &probe);

        let first = sweep.resolve(["p", "q"]).await;
        let second = sweep.resolve(["p", "q"]).await;

        assert_eq!(first.misses, 2);
        assert_eq!((second.hits, second.misses), (2, 0));
        assert_eq!(second.values(), first.values());
        assert_eq!(probe.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let cache = cache();
        let probe = Arc::new(ScriptedProbe::default());

        let report = sweep(&cache, &probe).resolve(Vec::<String>::new()).await;

        assert!(report.resolutions.is_empty());
        assert_eq!((report.hits, report.misses, report.cache_size), (0, 0, 0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pacing_applies_only_to_misses() {
        let cache = cache();
        cache.set("hit", true).await;
        let probe = Arc::new(ScriptedProbe::default());
        let pacing = Arc::new(FixedDelay::new(Duration::from_millis(100)));
        let sweep = AvailabilitySweep::new(cache.clone(), probe.clone(), pacing);

        let start = tokio::time::Instant::now();
        sweep.resolve(["hit", "miss-1", "miss-2"]).await;
        let elapsed = start.elapsed();

        assert!(elapsed >= Duration::from_millis(200) && elapsed < Duration::from_millis(300));
    }
}
