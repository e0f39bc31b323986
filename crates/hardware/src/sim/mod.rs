//! Trace loading and simulation driving.
//!
//! Provides the trace parser and the [`Simulator`] that feeds parsed events
//! through the cache hierarchy.

/// Trace parsing and streaming.
pub mod loader;

/// Hierarchy + statistics driver.
pub mod simulator;

pub use self::loader::{TraceEvent, TraceReader};
pub use self::simulator::Simulator;
