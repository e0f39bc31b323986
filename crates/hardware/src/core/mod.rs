//! Cache hierarchy simulation engine.
//!
//! This module contains the set-associative cache level (with its sets, lines,
//! and victim cache) and the two-level hierarchy that drives it.

/// Set-associative cache level, sets, lines, and victim cache.
pub mod cache;

/// L1/L2 hierarchy: setup, per-event dispatch, finalization.
pub mod hierarchy;

pub use self::cache::Cache;
pub use self::hierarchy::Hierarchy;
