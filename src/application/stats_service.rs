// Stats aggregation - cumulative production counters
use crate::application::state_cache::StateCache;
use crate::domain::stats::Stats;
use std::sync::{Arc, RwLock};

/// Cache key for the serialized counters.
pub const STATS_STATE_KEY: &str = "production_stats";

/// Owns the cumulative production counters.
///
/// Counters are process-independent and never reset by stopping a process;
/// every update is flushed to the local cache so they survive a restart.
pub struct StatsAggregator {
    stats: RwLock<Stats>,
    cache: Arc<dyn StateCache>,
}

impl StatsAggregator {
    /// Rehydrate the counters from the local cache, defaulting to zeroes
    /// when no prior state exists.
    pub fn load(cache: Arc<dyn StateCache>) -> Self {
        let stats = match cache.read(STATS_STATE_KEY) {
            Ok(Some(blob)) => match serde_json::from_str::<Stats>(&blob) {
                Ok(stats) => stats,
                Err(e) => {
                    tracing::warn!("discarding unreadable stats state: {e}");
                    Stats::default()
                }
            },
            Ok(None) => Stats::default(),
            Err(e) => {
                tracing::warn!("failed to read stats state: {e:#}");
                Stats::default()
            }
        };

        Self {
            stats: RwLock::new(stats),
            cache,
        }
    }

    /// Count one generated reading. Called exactly once per tick per running
    /// process, never for operator-set targets.
    pub fn record_production(&self, defective: bool) {
        let mut stats = self.stats.write().unwrap();
        stats.record(defective);
        self.persist(*stats);
    }

    pub fn snapshot(&self) -> Stats {
        *self.stats.read().unwrap()
    }

    fn persist(&self, stats: Stats) {
        match serde_json::to_string(&stats) {
            Ok(blob) => {
                if let Err(e) = self.cache.write(STATS_STATE_KEY, &blob) {
                    tracing::warn!("failed to persist stats state: {e:#}");
                }
            }
            Err(e) => tracing::warn!("failed to serialize stats state: {e}"),
        }
    }
}
