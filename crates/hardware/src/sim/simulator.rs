//! Simulator: owns the hierarchy and the statistics side-by-side.
//!
//! The caches only ever borrow the statistics record for the duration of one
//! event, so keeping both here lets a run be driven one event at a time.

use crate::common::{ConfigError, Serviced, TraceError};
use crate::config::HierarchyConfig;
use crate::core::Hierarchy;
use crate::sim::loader::TraceEvent;
use crate::stats::SimStats;

/// Top-level simulator: cache hierarchy + statistics.
#[derive(Debug)]
pub struct Simulator {
    hierarchy: Hierarchy,
    stats: SimStats,
}

impl Simulator {
    /// Builds the hierarchy described by `config`.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] naming the first invalid parameter.
    pub fn new(config: &HierarchyConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            hierarchy: Hierarchy::setup(config)?,
            stats: SimStats::default(),
        })
    }

    /// Applies one trace event.
    pub fn step(&mut self, event: TraceEvent) -> Serviced {
        self.hierarchy
            .handle_event(event.kind, event.address, &mut self.stats)
    }

    /// Applies every event from `events`, stopping at the first trace error.
    ///
    /// `observe` is called after each event with where it was serviced.
    ///
    /// # Returns
    ///
    /// The number of events applied.
    ///
    /// # Errors
    ///
    /// Returns the first [`TraceError`] produced by `events`. Events before
    /// it have already been applied.
    pub fn run<I, F>(&mut self, events: I, mut observe: F) -> Result<u64, TraceError>
    where
        I: IntoIterator<Item = Result<TraceEvent, TraceError>>,
        F: FnMut(&TraceEvent, Serviced),
    {
        let mut applied = 0;
        for event in events {
            let event = event?;
            let serviced = self.step(event);
            observe(&event, serviced);
            applied += 1;
        }
        Ok(applied)
    }

    /// The hierarchy being simulated.
    pub const fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    /// Counters so far (derived timing fields are not yet filled in).
    pub const fn stats(&self) -> &SimStats {
        &self.stats
    }

    /// Finalizes the statistics and tears down the hierarchy.
    pub fn finish(self) -> SimStats {
        let Self {
            hierarchy,
            mut stats,
        } = self;
        hierarchy.finalize(&mut stats);
        stats
    }
}
