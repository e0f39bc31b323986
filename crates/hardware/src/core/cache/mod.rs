//! Set-Associative Cache Level.
//!
//! This module implements one level of a write-back, write-allocate cache
//! hierarchy with LRU replacement and an optional victim cache. It models:
//! 1. **Lookup:** Address decomposition into tag and set index, then a tag scan.
//! 2. **Replacement:** Move-to-front on hit, evict-from-back on fill.
//! 3. **Write-back:** Dirty evictions are written to the next level immediately.
//! 4. **Victim Cache:** Evicted lines are parked and can be reclaimed on a later miss.
//!
//! A level does not own or point at the level below it. The caller passes the
//! deeper levels as a slice on every operation (`lower[0]` is the next level,
//! an empty slice means backing memory), so the whole hierarchy can live in a
//! single `Vec<Cache>`.

/// Cache line record.
pub mod block;
/// LRU-ordered set of lines.
pub mod set;
/// Fully-associative victim cache.
pub mod victim;

pub use self::block::Block;
pub use self::set::Set;
pub use self::victim::VictimCache;

use crate::common::{AccessKind, BlockAddr, CacheGeometry, ConfigError, Level, Serviced};
use crate::config::CacheConfig;
use crate::stats::SimStats;

/// One level of the cache hierarchy.
#[derive(Clone, Debug)]
pub struct Cache {
    level: Level,
    geometry: CacheGeometry,
    sets: Vec<Set>,
    victim: Option<VictimCache>,
}

impl Cache {
    /// Creates a cache level from its shape.
    ///
    /// # Arguments
    ///
    /// * `level` - Which counters this level updates
    /// * `config` - Capacity, block size, and associativity exponents
    /// * `victim_blocks` - Victim cache entries; 0 for none
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] from [`CacheConfig::geometry`] if the shape is invalid.
    pub fn new(level: Level, config: &CacheConfig, victim_blocks: usize) -> Result<Self, ConfigError> {
        let geometry = config.geometry(level)?;
        let sets = (0..geometry.num_sets())
            .map(|_| Set::new(geometry.ways()))
            .collect();
        let victim =
            (victim_blocks > 0).then(|| VictimCache::new(victim_blocks, geometry.block_exp()));

        tracing::debug!(
            %level,
            size = geometry.size_bytes(),
            block = geometry.block_bytes(),
            ways = geometry.ways(),
            sets = geometry.num_sets(),
            victim_blocks,
            "cache level built"
        );

        Ok(Self {
            level,
            geometry,
            sets,
            victim,
        })
    }

    /// Level identity.
    pub const fn level(&self) -> Level {
        self.level
    }

    /// Shape of this level.
    pub const fn geometry(&self) -> &CacheGeometry {
        &self.geometry
    }

    /// All sets, indexed by set number.
    pub fn sets(&self) -> &[Set] {
        &self.sets
    }

    /// The attached victim cache, if configured.
    pub const fn victim_cache(&self) -> Option<&VictimCache> {
        self.victim.as_ref()
    }

    /// Whether the line containing `address` is resident in the main array.
    ///
    /// Does not look in the victim cache and does not touch LRU order.
    pub fn contains(&self, address: u64) -> bool {
        self.lookup(address).is_some()
    }

    /// Dirty bit of the resident line holding `address`, or `None` if absent.
    pub fn is_dirty(&self, address: u64) -> Option<bool> {
        self.lookup(address).map(|b| b.dirty)
    }

    fn lookup(&self, address: u64) -> Option<&Block> {
        let BlockAddr { tag, index } = self.geometry.decompose(address);
        self.sets
            .get(index)
            .and_then(|set| set.blocks().find(|b| b.matches(tag)))
    }

    /// Services a load.
    ///
    /// On a miss the victim cache is probed first; if that misses too, the
    /// line is fetched with a read on `lower[0]` (nothing, for backing memory).
    /// Either way the LRU line is evicted and a clean line is filled.
    ///
    /// # Arguments
    ///
    /// * `lower` - Deeper levels, next level first
    /// * `address` - Byte address
    /// * `stats` - Counters to update
    ///
    /// # Returns
    ///
    /// Where the access was satisfied.
    pub fn read(&mut self, lower: &mut [Self], address: u64, stats: &mut SimStats) -> Serviced {
        self.access(lower, address, AccessKind::Read, false, stats)
    }

    /// Services a store.
    ///
    /// Same protocol as [`read`](Self::read) except that the resident or newly
    /// filled line ends up dirty. `is_writeback` marks a store issued by the
    /// level above for a dirty eviction; it only changes what is logged.
    pub fn write(
        &mut self,
        lower: &mut [Self],
        address: u64,
        is_writeback: bool,
        stats: &mut SimStats,
    ) -> Serviced {
        self.access(lower, address, AccessKind::Write, is_writeback, stats)
    }

    fn access(
        &mut self,
        lower: &mut [Self],
        address: u64,
        kind: AccessKind,
        is_writeback: bool,
        stats: &mut SimStats,
    ) -> Serviced {
        let is_write = kind == AccessKind::Write;
        stats.level_mut(self.level).accesses += 1;

        let BlockAddr { tag, index } = self.geometry.decompose(address);

        if let Some(way) = self.sets[index].find(tag) {
            self.sets[index].promote(way, is_write);
            tracing::trace!(
                level = %self.level,
                address = format_args!("{address:#x}"),
                ?kind,
                is_writeback,
                "hit"
            );
            return Serviced::Hit(self.level);
        }

        let counters = stats.level_mut(self.level);
        match kind {
            AccessKind::Read => counters.read_misses += 1,
            AccessKind::Write => counters.write_misses += 1,
        }

        let incoming = Block::filled(tag, address, is_write);

        let victim_hit = self
            .victim
            .as_mut()
            .is_some_and(|victim| victim.probe(address, stats));
        if victim_hit {
            tracing::trace!(
                level = %self.level,
                address = format_args!("{address:#x}"),
                ?kind,
                "victim cache hit"
            );
            self.fill(lower, index, incoming, stats);
            return Serviced::Victim(self.level);
        }

        tracing::trace!(
            level = %self.level,
            address = format_args!("{address:#x}"),
            ?kind,
            is_writeback,
            "miss"
        );

        let serviced = match lower.split_first_mut() {
            Some((next, deeper)) => next.read(deeper, address, stats),
            None => Serviced::Memory,
        };
        self.fill(lower, index, incoming, stats);
        serviced
    }

    /// Replaces the LRU line of set `index` with `incoming`.
    ///
    /// A dirty victim is written back to `lower[0]` first, then parked in the
    /// victim cache (as a placeholder if it was never valid).
    fn fill(&mut self, lower: &mut [Self], index: usize, incoming: Block, stats: &mut SimStats) {
        let evicted = self.sets[index].evict_lru();

        if evicted.dirty {
            stats.level_mut(self.level).write_backs += 1;
            tracing::trace!(
                level = %self.level,
                address = format_args!("{:#x}", evicted.address),
                "write-back"
            );
            if let Some((next, deeper)) = lower.split_first_mut() {
                let _ = next.write(deeper, evicted.address, true, stats);
            }
        }

        if let Some(victim) = self.victim.as_mut() {
            if evicted.valid {
                victim.insert(evicted.address);
            } else {
                victim.insert_invalid();
            }
        }

        self.sets[index].insert_mru(incoming);
    }
}
