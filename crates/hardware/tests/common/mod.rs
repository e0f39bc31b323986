//! Shared test infrastructure for the cache simulator tests.
