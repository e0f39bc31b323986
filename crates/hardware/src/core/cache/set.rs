//! LRU-ordered cache set.
//!
//! A set always holds exactly `associativity` slots, ordered from most
//! recently used (front) to least recently used (back). Empty slots are
//! invalid blocks, so a cold set evicts placeholders before real data.

use std::collections::VecDeque;

use super::block::Block;

/// One set of a set-associative cache.
#[derive(Clone, Debug)]
pub struct Set {
    blocks: VecDeque<Block>,
}

impl Set {
    /// Creates a set of `ways` invalid slots.
    pub fn new(ways: usize) -> Self {
        Self {
            blocks: std::iter::repeat_n(Block::INVALID, ways).collect(),
        }
    }

    /// Number of slots, valid or not. Always the configured associativity.
    #[inline]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// True only for a zero-way set, which validation never produces.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Slots in MRU-to-LRU order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }

    /// Position of the valid slot holding `tag`, if any.
    #[inline]
    pub fn find(&self, tag: u64) -> Option<usize> {
        self.blocks.iter().position(|b| b.matches(tag))
    }

    /// Moves the slot at `way` to the MRU position, marking it dirty on a write.
    pub fn promote(&mut self, way: usize, write: bool) {
        if let Some(mut block) = self.blocks.remove(way) {
            block.dirty |= write;
            self.blocks.push_front(block);
        }
    }

    /// Removes and returns the LRU slot.
    ///
    /// The set is one slot short until [`insert_mru`](Self::insert_mru) refills it.
    pub fn evict_lru(&mut self) -> Block {
        self.blocks.pop_back().unwrap_or_default()
    }

    /// Places `block` in the MRU position.
    pub fn insert_mru(&mut self, block: Block) {
        self.blocks.push_front(block);
    }
}
