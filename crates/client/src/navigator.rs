//! Wiring from configuration to a ready-to-use availability sweep.

use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use coursenav_core::cache::{AvailabilityCache, CacheDb, CacheEntry, SlotStore};
use coursenav_core::{AppConfig, Error};

use crate::course::{CourseInfo, TermGrid};
use crate::pacing;
use crate::probe::{self, ExistenceProbe, HttpProbe, ProbeConfig};
use crate::sweep::{AvailabilitySweep, Resolution};

/// Term grid for one course with the sweep that annotated it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CourseTerms {
    pub grid: TermGrid,
    pub hits: usize,
    pub misses: usize,
    pub cache_size: usize,
}

/// Owns the cache, probe and pacing for one process.
#[derive(Clone)]
pub struct Navigator {
    config: AppConfig,
    db: CacheDb,
    sweep: AvailabilitySweep,
}

impl Navigator {
    /// Open the database named in `config`, load the cache and build an HTTP probe.
    pub async fn open(config: AppConfig) -> Result<Self, Error> {
        let db = CacheDb::open(&config.db_path).await?;
        let probe = Arc::new(HttpProbe::new(ProbeConfig::from(&config))?);
        Self::with_probe(config, db, probe).await
    }

    /// Build over an existing database with a caller-supplied probe.
    pub async fn with_probe(config: AppConfig, db: CacheDb, probe: Arc<dyn ExistenceProbe>) -> Result<Self, Error> {
        let cache = Arc::new(AvailabilityCache::new(Arc::new(SlotStore::availability(db.clone())), config.cache_ttl()));
        cache.initialize().await;

        let sweep = AvailabilitySweep::new(cache, probe, pacing::from_config(&config));
        Ok(Self { config, db, sweep })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn db(&self) -> &CacheDb {
        &self.db
    }

    pub fn cache(&self) -> &AvailabilityCache {
        self.sweep.cache()
    }

    /// Empty term grid for the course page at `location`.
    pub fn grid_for(&self, location: &str) -> Result<TermGrid, Error> {
        let course = CourseInfo::parse(location)?;
        Ok(TermGrid::build(&course, &self.config.catalog_base_url, self.config.first_year, self.config.last_year))
    }

    /// Resolve availability for every other term of the course at `location`.
    pub async fn check<F>(&self, location: &str, on_resolved: F) -> Result<CourseTerms, Error>
    where
        F: FnMut(&Resolution),
    {
        let mut grid = self.grid_for(location)?;
        tracing::info!(course = %grid.course.full_course_code, "checking term availability");

        let report = self.sweep.resolve_all(grid.candidates(), on_resolved).await;
        grid.apply(&report.resolutions);

        Ok(CourseTerms { grid, hits: report.hits, misses: report.misses, cache_size: report.cache_size })
    }

    /// Cached entry for `url`, keyed the same way the grid generates URLs.
    pub fn lookup(&self, url: &str) -> Option<CacheEntry> {
        self.cache().entry(&probe::cache_key(url))
    }

    /// Drop expired entries and persist. Returns the number removed.
    pub async fn purge_expired(&self) -> usize {
        self.cache().clear_expired().await
    }
}
