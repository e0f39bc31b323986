//! Cache geometry and address decomposition.
//!
//! This module splits a byte address into the fields a set-associative cache
//! indexes by. It provides the following:
//! 1. **Geometry:** Capacity, block size, and associativity as power-of-two exponents.
//! 2. **Decomposition:** Block number, set index, and tag for any address.
//!
//! A geometry is only constructed from a validated [`CacheConfig`](crate::config::CacheConfig),
//! so the set count is always a non-zero power of two.

/// Power-of-two shape of a single cache level.
///
/// Capacity is `2^size_exp` bytes, blocks are `2^block_exp` bytes, and each
/// set holds `2^ways_exp` blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheGeometry {
    size_exp: u32,
    block_exp: u32,
    ways_exp: u32,
}

/// The `(tag, index)` pair an address maps to in a particular geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockAddr {
    /// Upper address bits identifying the block within its set.
    pub tag: u64,
    /// Set index the block maps into.
    pub index: usize,
}

impl CacheGeometry {
    /// Creates a geometry from exponents already checked by config validation.
    pub(crate) const fn from_validated(size_exp: u32, block_exp: u32, ways_exp: u32) -> Self {
        Self {
            size_exp,
            block_exp,
            ways_exp,
        }
    }

    /// Total capacity in bytes.
    #[inline]
    pub const fn size_bytes(&self) -> u64 {
        1 << self.size_exp
    }

    /// Block (line) size in bytes.
    #[inline]
    pub const fn block_bytes(&self) -> u64 {
        1 << self.block_exp
    }

    /// Number of blocks per set.
    #[inline]
    pub const fn ways(&self) -> usize {
        1 << self.ways_exp
    }

    /// Associativity exponent (`s` in `2^s`-way).
    #[inline]
    pub const fn ways_exp(&self) -> u32 {
        self.ways_exp
    }

    /// Block size exponent (`b` in `2^b`-byte blocks).
    #[inline]
    pub const fn block_exp(&self) -> u32 {
        self.block_exp
    }

    /// Number of sets: `capacity / block_size / associativity`.
    #[inline]
    pub const fn num_sets(&self) -> u64 {
        1 << (self.size_exp - self.block_exp - self.ways_exp)
    }

    /// Block number of `addr` (the address with the offset bits dropped).
    #[inline]
    pub const fn block_number(&self, addr: u64) -> u64 {
        addr / self.block_bytes()
    }

    /// Splits `addr` into its tag and set index.
    ///
    /// `block_number = addr / block_size`, `index = block_number % sets`,
    /// `tag = block_number / sets`.
    #[inline]
    pub const fn decompose(&self, addr: u64) -> BlockAddr {
        let block = self.block_number(addr);
        let sets = self.num_sets();
        BlockAddr {
            tag: block / sets,
            index: (block % sets) as usize,
        }
    }
}
