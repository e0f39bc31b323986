//! Two-level cache hierarchy simulator library.
//!
//! This crate replays a memory trace against an L1/L2 hierarchy and reports
//! the resulting statistics:
//! 1. **Core:** Set-associative caches with LRU replacement, write-back/write-allocate
//!    policy, and an optional fully-associative victim cache behind L1.
//! 2. **Configuration:** Cache shapes as power-of-two exponents plus a closed-form timing model.
//! 3. **Simulation:** Trace parsing and a driver that feeds events to the hierarchy.
//! 4. **Statistics:** Per-level counters, miss rates, and average access times.

/// Common types (address decomposition, access kinds, errors).
pub mod common;
/// Simulator configuration (defaults, per-level shapes, timing model).
pub mod config;
/// Cache levels, victim cache, and the two-level hierarchy.
pub mod core;
/// Trace loader and simulation driver.
pub mod sim;
/// Statistics collection, finalization, and reporting.
pub mod stats;

/// Root configuration type; use `HierarchyConfig::default()` or deserialize from JSON.
pub use crate::config::HierarchyConfig;
/// The L1/L2 hierarchy; construct with `Hierarchy::setup`.
pub use crate::core::Hierarchy;
/// Trace-driven simulator owning a hierarchy and its statistics.
pub use crate::sim::Simulator;
/// Statistics record updated by every access.
pub use crate::stats::SimStats;
