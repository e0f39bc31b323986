//! Configuration system for the cache simulator.
//!
//! This module defines the structures that parameterize a simulation run. It provides:
//! 1. **Defaults:** Baseline cache shapes and timing constants.
//! 2. **Structures:** Per-level geometry, victim cache size, and the timing model.
//! 3. **Validation:** Eager rejection of shapes that cannot be built, naming the bad parameter.
//!
//! Configuration is supplied as JSON (`HierarchyConfig::from_json`), built from the
//! seven classic exponents (`HierarchyConfig::from_exponents`), or taken from
//! `HierarchyConfig::default()`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::{CacheGeometry, ConfigError, Level};

/// Default configuration constants for the simulator.
mod defaults {
    /// L1 capacity exponent (4 KiB).
    pub const L1_SIZE_EXP: u32 = 12;

    /// L1 block size exponent (32-byte blocks).
    pub const L1_BLOCK_EXP: u32 = 5;

    /// L1 associativity exponent (8-way).
    pub const L1_WAYS_EXP: u32 = 3;

    /// Victim cache entries between L1 and L2.
    pub const VICTIM_BLOCKS: usize = 3;

    /// L2 capacity exponent (32 KiB).
    pub const L2_SIZE_EXP: u32 = 15;

    /// L2 block size exponent (32-byte blocks).
    pub const L2_BLOCK_EXP: u32 = 5;

    /// L2 associativity exponent (16-way).
    pub const L2_WAYS_EXP: u32 = 4;

    /// L1 hit time with a direct-mapped array, in cycles.
    pub const L1_HIT_BASE: f64 = 2.0;

    /// Extra L1 hit time per doubling of associativity.
    pub const L1_HIT_PER_WAY_EXP: f64 = 0.2;

    /// L2 hit time with a direct-mapped array, in cycles.
    pub const L2_HIT_BASE: f64 = 4.0;

    /// Extra L2 hit time per doubling of associativity.
    pub const L2_HIT_PER_WAY_EXP: f64 = 0.4;

    /// Flat backing-memory latency charged on an L2 miss.
    pub const MEMORY_PENALTY: f64 = 500.0;
}

/// Largest supported victim cache, in blocks.
pub const MAX_VICTIM_BLOCKS: usize = 4;

/// Largest supported block count per level, as an exponent (16 Mi blocks).
pub const MAX_LINES_EXP: u32 = 24;

/// Root configuration for a two-level hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HierarchyConfig {
    /// First-level cache shape.
    #[serde(default = "CacheConfig::l1_default")]
    pub l1: CacheConfig,

    /// Second-level cache shape.
    #[serde(default = "CacheConfig::l2_default")]
    pub l2: CacheConfig,

    /// Victim cache entries attached to L1 (0 disables it).
    #[serde(default = "HierarchyConfig::default_victim_blocks")]
    pub victim_blocks: usize,

    /// Timing model used when the statistics are finalized.
    #[serde(default)]
    pub timing: TimingConfig,
}

impl HierarchyConfig {
    /// Returns the default number of victim cache entries.
    fn default_victim_blocks() -> usize {
        defaults::VICTIM_BLOCKS
    }

    /// Builds a configuration from the seven hierarchy exponents.
    ///
    /// # Arguments
    ///
    /// * `c1`, `b1`, `s1` - L1 holds `2^c1` bytes in `2^b1`-byte blocks, `2^s1` per set
    /// * `v` - Victim cache entries (blocks of `2^b1` bytes)
    /// * `c2`, `b2`, `s2` - L2 shape, same meaning as for L1
    ///
    /// Timing uses the defaults. The result is not validated; call
    /// [`validate`](Self::validate) or hand it to
    /// [`Hierarchy::setup`](crate::core::Hierarchy::setup).
    #[allow(clippy::too_many_arguments)]
    pub fn from_exponents(c1: u32, b1: u32, s1: u32, v: usize, c2: u32, b2: u32, s2: u32) -> Self {
        Self {
            l1: CacheConfig::new(c1, b1, s1),
            l2: CacheConfig::new(c2, b2, s2),
            victim_blocks: v,
            timing: TimingConfig::default(),
        }
    }

    /// Parses a JSON configuration and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and any validation
    /// error from [`validate`](Self::validate).
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
    /// same errors as [`from_json`](Self::from_json).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Checks every parameter, failing on the first one that cannot be simulated.
    ///
    /// Hierarchy ordering (`c2 >= c1`, `b2 >= b1`, `s2 >= s1`) is the caller's
    /// responsibility and only produces a warning.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] naming the first invalid parameter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let _ = self.l1.geometry(Level::L1)?;
        let _ = self.l2.geometry(Level::L2)?;

        if self.victim_blocks > MAX_VICTIM_BLOCKS {
            return Err(ConfigError::VictimCacheTooLarge {
                blocks: self.victim_blocks,
                max: MAX_VICTIM_BLOCKS,
            });
        }

        self.timing.validate()?;

        if self.l2.size_exp < self.l1.size_exp
            || self.l2.block_exp < self.l1.block_exp
            || self.l2.ways_exp < self.l1.ways_exp
        {
            tracing::warn!(
                l1 = ?self.l1,
                l2 = ?self.l2,
                "L2 is smaller than L1 in capacity, block size, or associativity"
            );
        }

        Ok(())
    }
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            l1: CacheConfig::l1_default(),
            l2: CacheConfig::l2_default(),
            victim_blocks: defaults::VICTIM_BLOCKS,
            timing: TimingConfig::default(),
        }
    }
}

/// Shape of a single cache level, as power-of-two exponents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Total capacity is `2^size_exp` bytes.
    pub size_exp: u32,

    /// Blocks are `2^block_exp` bytes.
    pub block_exp: u32,

    /// Each set holds `2^ways_exp` blocks.
    pub ways_exp: u32,
}

impl CacheConfig {
    /// Creates a cache shape from its three exponents.
    pub const fn new(size_exp: u32, block_exp: u32, ways_exp: u32) -> Self {
        Self {
            size_exp,
            block_exp,
            ways_exp,
        }
    }

    /// Returns the default L1 shape.
    pub const fn l1_default() -> Self {
        Self::new(
            defaults::L1_SIZE_EXP,
            defaults::L1_BLOCK_EXP,
            defaults::L1_WAYS_EXP,
        )
    }

    /// Returns the default L2 shape.
    pub const fn l2_default() -> Self {
        Self::new(
            defaults::L2_SIZE_EXP,
            defaults::L2_BLOCK_EXP,
            defaults::L2_WAYS_EXP,
        )
    }

    /// Validates the shape and returns its geometry.
    ///
    /// `level` only selects the parameter names used in errors
    /// (`c1`/`b1`/`s1` or `c2`/`b2`/`s2`).
    ///
    /// # Errors
    ///
    /// * [`ConfigError::ExponentTooLarge`] if any exponent is 64 or more
    /// * [`ConfigError::BlockLargerThanCache`] if `block_exp > size_exp`
    /// * [`ConfigError::TooManyBlocks`] if `size_exp - block_exp` exceeds [`MAX_LINES_EXP`]
    /// * [`ConfigError::NonIntegralSets`] if `ways_exp > size_exp - block_exp`
    pub fn geometry(&self, level: Level) -> Result<CacheGeometry, ConfigError> {
        let (c, b, s) = match level {
            Level::L1 => ("c1", "b1", "s1"),
            Level::L2 => ("c2", "b2", "s2"),
        };

        for (param, value) in [(c, self.size_exp), (b, self.block_exp), (s, self.ways_exp)] {
            if value >= u64::BITS {
                return Err(ConfigError::ExponentTooLarge { param, value });
            }
        }

        if self.block_exp > self.size_exp {
            return Err(ConfigError::BlockLargerThanCache {
                param: b,
                block_exp: self.block_exp,
                cache_exp: self.size_exp,
            });
        }

        let lines_exp = self.size_exp - self.block_exp;
        if lines_exp > MAX_LINES_EXP {
            return Err(ConfigError::TooManyBlocks {
                param: c,
                lines_exp,
                max: MAX_LINES_EXP,
            });
        }

        if self.ways_exp > lines_exp {
            return Err(ConfigError::NonIntegralSets {
                param: s,
                ways_exp: self.ways_exp,
                lines_exp,
            });
        }

        Ok(CacheGeometry::from_validated(
            self.size_exp,
            self.block_exp,
            self.ways_exp,
        ))
    }
}

/// Closed-form timing model applied when statistics are finalized.
///
/// Hit time grows linearly with the associativity exponent:
/// `hit_time = base + per_way_exp * s`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimingConfig {
    /// L1 hit time for a direct-mapped array.
    #[serde(default = "TimingConfig::default_l1_hit_base")]
    pub l1_hit_base: f64,

    /// L1 hit time added per unit of associativity exponent.
    #[serde(default = "TimingConfig::default_l1_hit_per_way_exp")]
    pub l1_hit_per_way_exp: f64,

    /// L2 hit time for a direct-mapped array.
    #[serde(default = "TimingConfig::default_l2_hit_base")]
    pub l2_hit_base: f64,

    /// L2 hit time added per unit of associativity exponent.
    #[serde(default = "TimingConfig::default_l2_hit_per_way_exp")]
    pub l2_hit_per_way_exp: f64,

    /// Backing memory latency, the L2 miss penalty.
    #[serde(default = "TimingConfig::default_memory_penalty")]
    pub memory_penalty: f64,
}

impl TimingConfig {
    fn default_l1_hit_base() -> f64 {
        defaults::L1_HIT_BASE
    }

    fn default_l1_hit_per_way_exp() -> f64 {
        defaults::L1_HIT_PER_WAY_EXP
    }

    fn default_l2_hit_base() -> f64 {
        defaults::L2_HIT_BASE
    }

    fn default_l2_hit_per_way_exp() -> f64 {
        defaults::L2_HIT_PER_WAY_EXP
    }

    fn default_memory_penalty() -> f64 {
        defaults::MEMORY_PENALTY
    }

    /// Hit time of `level` when it is `2^ways_exp`-way set associative.
    pub fn hit_time(&self, level: Level, ways_exp: u32) -> f64 {
        let (base, per_way_exp) = match level {
            Level::L1 => (self.l1_hit_base, self.l1_hit_per_way_exp),
            Level::L2 => (self.l2_hit_base, self.l2_hit_per_way_exp),
        };
        base + per_way_exp * f64::from(ways_exp)
    }

    /// Rejects negative or non-finite constants.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Timing`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("l1_hit_base", self.l1_hit_base),
            ("l1_hit_per_way_exp", self.l1_hit_per_way_exp),
            ("l2_hit_base", self.l2_hit_base),
            ("l2_hit_per_way_exp", self.l2_hit_per_way_exp),
            ("memory_penalty", self.memory_penalty),
        ];
        for (param, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Timing { param, value });
            }
        }
        Ok(())
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            l1_hit_base: defaults::L1_HIT_BASE,
            l1_hit_per_way_exp: defaults::L1_HIT_PER_WAY_EXP,
            l2_hit_base: defaults::L2_HIT_BASE,
            l2_hit_per_way_exp: defaults::L2_HIT_PER_WAY_EXP,
            memory_penalty: defaults::MEMORY_PENALTY,
        }
    }
}
