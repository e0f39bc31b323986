//! Fully-associative victim cache.
//!
//! Holds lines recently evicted from its owning cache, most recent at the
//! front. A hit hands the line back to the owner, so the entry is removed
//! rather than promoted. Lines arrive clean: the owner writes a dirty line
//! back to the next level before inserting it here.

use std::collections::VecDeque;

use super::block::Block;
use crate::stats::SimStats;

/// Small fully-associative buffer of evicted lines.
#[derive(Clone, Debug)]
pub struct VictimCache {
    capacity: usize,
    block_bytes: u64,
    blocks: VecDeque<Block>,
}

impl VictimCache {
    /// Creates a victim cache of `capacity` entries for `2^block_exp`-byte lines.
    ///
    /// Starts full of invalid placeholders.
    pub fn new(capacity: usize, block_exp: u32) -> Self {
        Self {
            capacity,
            block_bytes: 1 << block_exp,
            blocks: std::iter::repeat_n(Block::INVALID, capacity).collect(),
        }
    }

    /// Configured number of entries.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries currently present, placeholders included.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// True when every entry has been handed back.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Entries in most-recent-first order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }

    /// Whether a valid entry holds the line containing `address`.
    pub fn contains(&self, address: u64) -> bool {
        let tag = self.tag(address);
        self.blocks.iter().any(|b| b.matches(tag))
    }

    /// The victim tag is the whole block number.
    #[inline]
    const fn tag(&self, address: u64) -> u64 {
        address / self.block_bytes
    }

    /// Looks up `address`, removing the entry on a hit.
    ///
    /// Counts a victim access, and a victim hit when found.
    pub fn probe(&mut self, address: u64, stats: &mut SimStats) -> bool {
        stats.victim_accesses += 1;

        let tag = self.tag(address);
        let Some(pos) = self.blocks.iter().position(|b| b.matches(tag)) else {
            return false;
        };

        stats.victim_hits += 1;
        let _ = self.blocks.remove(pos);
        true
    }

    /// Inserts a clean line for `address` at the front, dropping the oldest entry if full.
    pub fn insert(&mut self, address: u64) {
        if self.capacity == 0 {
            return;
        }
        if self.blocks.len() >= self.capacity {
            if let Some(dropped) = self.blocks.pop_back() {
                if dropped.valid {
                    tracing::trace!(address = format_args!("{:#x}", dropped.address), "victim cache drop");
                }
            }
        }
        let tag = self.tag(address);
        self.blocks.push_front(Block::filled(tag, address, false));
    }

    /// Appends an invalid placeholder at the back if there is room.
    ///
    /// Used when the owner evicted a never-filled slot, so queue order is kept
    /// without pretending the victim cache holds anything.
    pub fn insert_invalid(&mut self) {
        if self.blocks.len() < self.capacity {
            self.blocks.push_back(Block::INVALID);
        }
    }
}
