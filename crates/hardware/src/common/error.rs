//! Configuration and trace error definitions.
//!
//! The simulation itself is total over valid inputs; every failure the
//! library can report happens before or around it:
//! 1. **Configuration Errors:** Cache shapes that cannot be built, rejected eagerly at setup.
//! 2. **Trace Errors:** I/O failures and malformed lines while reading a trace.

use thiserror::Error;

/// A hierarchy configuration that cannot be simulated.
///
/// Every variant names the offending parameter (`c1`, `b1`, `s1`, `v`, `c2`,
/// `b2`, `s2`, or a timing field) so the caller can point at it directly.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An exponent is too large to express as a 64-bit byte count.
    #[error("{param} = {value} is too large (exponents must be below 64)")]
    ExponentTooLarge {
        /// Parameter name.
        param: &'static str,
        /// Rejected exponent.
        value: u32,
    },

    /// Block size exceeds the total cache size.
    #[error("{param} = {block_exp} gives blocks larger than the 2^{cache_exp}-byte cache")]
    BlockLargerThanCache {
        /// Parameter name.
        param: &'static str,
        /// Block size exponent.
        block_exp: u32,
        /// Cache size exponent.
        cache_exp: u32,
    },

    /// The level holds more blocks than the simulator will allocate.
    #[error("{param} gives 2^{lines_exp} blocks, more than the supported 2^{max}")]
    TooManyBlocks {
        /// Parameter name.
        param: &'static str,
        /// Exponent of the number of blocks in the cache.
        lines_exp: u32,
        /// Largest supported block-count exponent.
        max: u32,
    },

    /// Associativity exceeds the number of blocks, so the set count is not integral.
    #[error(
        "{param} = {ways_exp} asks for 2^{ways_exp} ways but the cache only holds 2^{lines_exp} blocks"
    )]
    NonIntegralSets {
        /// Parameter name.
        param: &'static str,
        /// Associativity exponent.
        ways_exp: u32,
        /// Exponent of the number of blocks in the cache.
        lines_exp: u32,
    },

    /// Victim cache larger than the supported maximum.
    #[error("v = {blocks} exceeds the maximum victim cache size of {max} blocks")]
    VictimCacheTooLarge {
        /// Requested number of victim blocks.
        blocks: usize,
        /// Largest supported victim cache.
        max: usize,
    },

    /// A timing constant is negative or not finite.
    #[error("timing parameter {param} = {value} must be finite and non-negative")]
    Timing {
        /// Parameter name.
        param: &'static str,
        /// Rejected value.
        value: f64,
    },

    /// Configuration text is not valid JSON for a hierarchy config.
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// Configuration file could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Name of the rejected parameter, if the error concerns a single one.
    pub const fn param(&self) -> Option<&'static str> {
        match self {
            Self::ExponentTooLarge { param, .. }
            | Self::BlockLargerThanCache { param, .. }
            | Self::TooManyBlocks { param, .. }
            | Self::NonIntegralSets { param, .. }
            | Self::Timing { param, .. } => Some(*param),
            Self::VictimCacheTooLarge { .. } => Some("v"),
            Self::Parse(_) | Self::Io(_) => None,
        }
    }
}

/// Failure while reading a memory trace.
#[derive(Error, Debug)]
pub enum TraceError {
    /// Underlying reader failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A line does not follow the `<r|w> <hex address>` format.
    #[error("trace line {line}: {reason}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What was wrong with the line.
        reason: String,
    },
}
