//! # Hierarchy Tests
//!
//! Scenarios driven through `Hierarchy::handle_event`, the entry point the
//! trace driver uses.

use cachesim_core::common::{AccessKind, Level, Serviced};
use cachesim_core::config::HierarchyConfig;
use cachesim_core::core::Hierarchy;
use cachesim_core::stats::SimStats;
use rstest::rstest;

use crate::common::harness::TestHierarchy;

#[test]
fn setup_builds_both_levels() {
    let h = Hierarchy::setup(&HierarchyConfig::from_exponents(10, 4, 1, 2, 14, 5, 3)).unwrap();

    let l1 = h.cache(Level::L1);
    assert_eq!(l1.level(), Level::L1);
    assert_eq!(l1.sets().len(), 32);
    assert_eq!(l1.victim_cache().map(|v| v.capacity()), Some(2));

    let l2 = h.cache(Level::L2);
    assert_eq!(l2.level(), Level::L2);
    assert_eq!(l2.sets().len(), 64);
    assert!(l2.victim_cache().is_none());
}

#[test]
fn setup_rejects_invalid_configuration() {
    let err = Hierarchy::setup(&HierarchyConfig::from_exponents(10, 4, 7, 0, 14, 5, 3)).unwrap_err();
    assert_eq!(err.param(), Some("s1"));
}

#[test]
fn setup_rejects_unallocatable_shape() {
    let config = HierarchyConfig::from_exponents(63, 0, 0, 0, 63, 0, 0);
    let err = Hierarchy::setup(&config).unwrap_err();
    assert_eq!(err.param(), Some("c1"));
}

#[test]
fn handle_event_counts_reads_and_writes() {
    let mut h = Hierarchy::setup(&HierarchyConfig::default()).unwrap();
    let mut stats = SimStats::default();

    let _ = h.handle_event(AccessKind::Read, 0x1000, &mut stats);
    let _ = h.handle_event(AccessKind::Write, 0x1000, &mut stats);
    let _ = h.handle_event(AccessKind::Read, 0x2000, &mut stats);

    assert_eq!(stats.reads, 2);
    assert_eq!(stats.writes, 1);
    assert_eq!(stats.accesses(), 3);
}

#[test]
fn serviced_reports_deepest_level_reached() {
    let mut h = TestHierarchy::new(5, 4, 0, 0, 10, 4, 1);

    assert_eq!(h.read(0x0), Serviced::Memory);
    assert_eq!(h.read(0x0), Serviced::Hit(Level::L1));
    assert_eq!(h.read(0x20), Serviced::Memory);
    assert_eq!(h.read(0x0), Serviced::Hit(Level::L2));
}

/// Fully associative L1 of four 16-byte blocks: every new address misses, and
/// once the fifth arrives the earliest is evicted first.
#[test]
fn fully_associative_evicts_in_access_order() {
    let mut h = TestHierarchy::new(6, 4, 2, 0, 12, 4, 3);
    assert_eq!(h.l1().sets().len(), 1);

    h.replay(&[('r', 0x00), ('r', 0x10), ('r', 0x20), ('r', 0x30)]);
    assert_eq!(h.stats.l1.misses(), h.stats.l1.accesses);

    let _ = h.read(0x40);
    assert_eq!(h.stats.l1.misses(), 5);
    assert!(!h.l1().contains(0x00), "earliest address goes first");
    for addr in [0x10, 0x20, 0x30, 0x40] {
        assert!(h.l1().contains(addr));
    }

    let _ = h.read(0x00);
    assert!(!h.l1().contains(0x10));
}

#[rstest]
#[case::four_blocks(6, 4)]
#[case::eight_blocks(7, 8)]
#[case::sixteen_blocks(8, 16)]
fn fully_associative_distinct_addresses_always_miss(#[case] c1: u32, #[case] blocks: u64) {
    let ways_exp = c1 - 4;
    let mut h = TestHierarchy::new(c1, 4, ways_exp, 0, 14, 4, 4);

    for i in 0..blocks * 3 {
        let _ = h.read(i * 16);
    }
    let stats = h.finish();
    assert_eq!(stats.l1.miss_rate, 1.0);
}

/// Write-backs cascade: a dirty L1 eviction reaches L2 before L1 fills its
/// new line, and a dirty L2 eviction is counted at L2.
#[test]
fn write_backs_cascade_through_both_levels() {
    // L1: one 16-byte line. L2: two 16-byte lines, direct-mapped.
    let mut h = TestHierarchy::new(4, 4, 0, 0, 5, 4, 0);

    h.replay(&[('w', 0x00), ('w', 0x20), ('w', 0x40)]);
    // L1 evicted 0x00 and 0x20 dirty.
    assert_eq!(h.stats.l1.write_backs, 2);

    // Each fetch evicts from L2 before the L1 write-back lands, so both
    // write-backs miss and only the dirty 0x00 is pushed out to memory.
    assert_eq!(h.stats.l2.read_misses, 3);
    assert_eq!(h.stats.l2.write_misses, 2);
    assert_eq!(h.stats.l2.write_backs, 1);
    assert_eq!(h.l2().is_dirty(0x20), Some(true));
    assert_eq!(
        h.stats.l2.accesses,
        h.stats.l1.misses() + h.stats.l1.write_backs
    );
}

#[test]
fn handle_event_is_deterministic() {
    let ops = [
        ('r', 0x100),
        ('w', 0x2100),
        ('r', 0x4100),
        ('w', 0x100),
        ('r', 0x8100),
        ('r', 0x2100),
    ];
    let mut a = TestHierarchy::new(10, 5, 1, 2, 14, 5, 2);
    let mut b = TestHierarchy::new(10, 5, 1, 2, 14, 5, 2);
    a.replay(&ops);
    b.replay(&ops);
    pretty_assertions::assert_eq!(a.stats, b.stats);
}
