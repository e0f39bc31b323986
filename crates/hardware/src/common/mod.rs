//! Common types shared by every part of the cache simulator.
//!
//! This module provides the small vocabulary the rest of the crate is written in:
//! 1. **Address Decomposition:** Cache geometry and `(tag, index)` splitting.
//! 2. **Access Types:** Read/write kinds, hierarchy levels, and service outcomes.
//! 3. **Error Handling:** Configuration and trace error types.

/// Cache geometry and address decomposition.
pub mod addr;

/// Access kind, level, and service outcome definitions.
pub mod data;

/// Error types.
pub mod error;

pub use addr::{BlockAddr, CacheGeometry};
pub use data::{AccessKind, Level, Serviced};
pub use error::{ConfigError, TraceError};
