//! Memory access and hierarchy level identifiers.
//!
//! These small enums are shared by the trace parser, the cache levels, and the
//! statistics record:
//! 1. **Access Kind:** Whether a trace event loads or stores.
//! 2. **Level:** Which cache in the hierarchy an operation is counted against.
//! 3. **Serviced:** Where in the hierarchy a demand access was satisfied.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of memory access carried by a trace event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessKind {
    /// Data load.
    Read,
    /// Data store.
    Write,
}

impl AccessKind {
    /// Parses the single-character tag used in trace files (`r`/`R`, `w`/`W`).
    pub const fn from_tag(tag: char) -> Option<Self> {
        match tag {
            'r' | 'R' => Some(Self::Read),
            'w' | 'W' => Some(Self::Write),
            _ => None,
        }
    }

    /// Lower-case trace tag for this access kind.
    pub const fn tag(self) -> char {
        match self {
            Self::Read => 'r',
            Self::Write => 'w',
        }
    }
}

/// Identity of a cache level; selects which counters an operation updates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    /// First-level cache, the one the trace talks to.
    L1,
    /// Second-level cache, backed by flat memory.
    L2,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::L1 => write!(f, "L1"),
            Self::L2 => write!(f, "L2"),
        }
    }
}

/// Where a demand access was finally satisfied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Serviced {
    /// Hit in the given cache level.
    Hit(Level),
    /// Missed the given level but hit in that level's victim cache.
    Victim(Level),
    /// Missed every level; fetched from backing memory.
    Memory,
}

impl fmt::Display for Serviced {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hit(level) => write!(f, "{level} hit"),
            Self::Victim(level) => write!(f, "{level} victim hit"),
            Self::Memory => write!(f, "memory"),
        }
    }
}
