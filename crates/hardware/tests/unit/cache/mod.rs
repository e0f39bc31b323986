//! # Cache Level Tests
//!
//! Verifies the read/write protocol of a single level and its interaction
//! with the level below and the victim cache.
