//! Two-level cache hierarchy.
//!
//! Owns the cache levels in one arena, shallowest first, and routes trace
//! events into L1. Each level reaches the next through the slice of deeper
//! levels it is handed, so no level outlives or aliases another.

use crate::common::{AccessKind, ConfigError, Level, Serviced};
use crate::config::{HierarchyConfig, TimingConfig};
use crate::core::cache::Cache;
use crate::stats::SimStats;

/// L1 (with optional victim cache) backed by L2, backed by memory.
#[derive(Clone, Debug)]
pub struct Hierarchy {
    levels: Vec<Cache>,
    timing: TimingConfig,
}

impl Hierarchy {
    /// Validates `config` and builds the hierarchy, L2 first.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] naming the first invalid parameter.
    pub fn setup(config: &HierarchyConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let l2 = Cache::new(Level::L2, &config.l2, 0)?;
        let l1 = Cache::new(Level::L1, &config.l1, config.victim_blocks)?;

        Ok(Self {
            levels: vec![l1, l2],
            timing: config.timing,
        })
    }

    /// The cache at `level`.
    pub fn cache(&self, level: Level) -> &Cache {
        match level {
            Level::L1 => &self.levels[0],
            Level::L2 => &self.levels[1],
        }
    }

    /// Timing model used by [`finalize`](Self::finalize).
    pub const fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    /// Feeds one trace event to L1.
    ///
    /// Counts the event kind, then issues a read or a (non-write-back) write.
    ///
    /// # Returns
    ///
    /// Where the access was satisfied.
    pub fn handle_event(&mut self, kind: AccessKind, address: u64, stats: &mut SimStats) -> Serviced {
        let Some((l1, lower)) = self.levels.split_first_mut() else {
            return Serviced::Memory;
        };

        match kind {
            AccessKind::Read => {
                stats.reads += 1;
                l1.read(lower, address, stats)
            }
            AccessKind::Write => {
                stats.writes += 1;
                l1.write(lower, address, false, stats)
            }
        }
    }

    /// Computes the derived statistics and releases the caches.
    pub fn finalize(self, stats: &mut SimStats) {
        let l1 = self.cache(Level::L1);
        let l2 = self.cache(Level::L2);
        stats.finalize(
            &self.timing,
            l1.geometry().ways_exp(),
            l2.geometry().ways_exp(),
            l1.victim_cache().is_some(),
        );

        tracing::debug!(
            accesses = stats.l1.accesses,
            l1_aat = stats.l1.avg_access_time,
            l2_aat = stats.l2.avg_access_time,
            "hierarchy finalized"
        );
    }
}
