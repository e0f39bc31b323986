//! # Trace and Simulator Tests
//!
//! Trace line parsing, file loading, and end-to-end runs through `Simulator`.

use std::io::Write;

use cachesim_core::Simulator;
use cachesim_core::common::{AccessKind, Level, Serviced, TraceError};
use cachesim_core::config::HierarchyConfig;
use cachesim_core::sim::loader::{TraceEvent, TraceReader, load_trace, open_trace, parse_line};
use rstest::rstest;

fn write_trace(text: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

// ══════════════════════════════════════════════════════════
// 1. Line parsing
// ══════════════════════════════════════════════════════════

#[rstest]
#[case::lower_read("r 1f", AccessKind::Read, 0x1f)]
#[case::upper_read("R 1F", AccessKind::Read, 0x1f)]
#[case::lower_write("w 0x400", AccessKind::Write, 0x400)]
#[case::upper_write("W 0X400", AccessKind::Write, 0x400)]
#[case::padded("  r\t7ffe0010  ", AccessKind::Read, 0x7ffe_0010)]
#[case::max_address("w ffffffffffffffff", AccessKind::Write, u64::MAX)]
fn parses_valid_lines(#[case] line: &str, #[case] kind: AccessKind, #[case] address: u64) {
    let event = parse_line(line, 1).unwrap().unwrap();
    assert_eq!(event, TraceEvent { kind, address });
}

#[rstest]
#[case::blank("")]
#[case::whitespace(" \t ")]
#[case::comment("# generated by tracer")]
#[case::indented_comment("   # r 10")]
fn skips_non_events(#[case] line: &str) {
    assert_eq!(parse_line(line, 1).unwrap(), None);
}

#[rstest]
#[case::unknown_kind("x 10", "unknown access kind")]
#[case::long_kind("rw 10", "unknown access kind")]
#[case::missing_address("r", "missing address")]
#[case::bad_hex("w 0xg1", "bad address")]
#[case::overflow("r 1ffffffffffffffff", "bad address")]
#[case::trailing_field("r 10 4", "unexpected field")]
fn rejects_malformed_lines(#[case] line: &str, #[case] reason_prefix: &str) {
    match parse_line(line, 42) {
        Err(TraceError::Parse { line, reason }) => {
            assert_eq!(line, 42);
            assert!(reason.starts_with(reason_prefix), "reason was {reason:?}");
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn parse_error_message_names_line() {
    let err = parse_line("q 10", 7).unwrap_err();
    assert!(err.to_string().contains('7'), "message was {err}");
}

// ══════════════════════════════════════════════════════════
// 2. Loading
// ══════════════════════════════════════════════════════════

#[test]
fn load_trace_reads_every_event() {
    let file = write_trace("# header\nr 0\nw 20\n\nR 0x40\n");
    let events = load_trace(file.path()).unwrap();
    assert_eq!(
        events,
        vec![
            TraceEvent::read(0x0),
            TraceEvent::write(0x20),
            TraceEvent::read(0x40)
        ]
    );
}

#[test]
fn load_trace_stops_at_first_bad_line() {
    let file = write_trace("r 0\nr 10\nbogus\nr 20\n");
    match load_trace(file.path()) {
        Err(TraceError::Parse { line, .. }) => assert_eq!(line, 3),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn open_trace_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = open_trace(dir.path().join("missing.trace")).unwrap_err();
    assert!(matches!(err, TraceError::Io(_)), "got {err:?}");
}

#[test]
fn open_trace_streams_lazily() {
    let file = write_trace("r 0\nw 1\n");
    let mut reader = open_trace(file.path()).unwrap();
    assert_eq!(reader.next().unwrap().unwrap(), TraceEvent::read(0x0));
    assert_eq!(reader.next().unwrap().unwrap(), TraceEvent::write(0x1));
    assert!(reader.next().is_none());
}

// ══════════════════════════════════════════════════════════
// 3. Simulator
// ══════════════════════════════════════════════════════════

fn tiny_config(victim_blocks: usize) -> HierarchyConfig {
    HierarchyConfig::from_exponents(5, 4, 0, victim_blocks, 10, 4, 1)
}

#[test]
fn simulator_rejects_invalid_config() {
    let err = Simulator::new(&HierarchyConfig::from_exponents(5, 6, 0, 0, 10, 4, 1)).unwrap_err();
    assert_eq!(err.param(), Some("b1"));
}

#[test]
fn simulator_run_reports_each_event() {
    let mut sim = Simulator::new(&tiny_config(1)).unwrap();
    let trace = "r 0\nr 20\nr 0\nr 0\n";

    let mut seen = Vec::new();
    let applied = sim
        .run(TraceReader::new(trace.as_bytes()), |event, serviced| {
            seen.push((event.address, serviced));
        })
        .unwrap();

    assert_eq!(applied, 4);
    assert_eq!(
        seen,
        vec![
            (0x0, Serviced::Memory),
            (0x20, Serviced::Memory),
            (0x0, Serviced::Victim(Level::L1)),
            (0x0, Serviced::Hit(Level::L1)),
        ]
    );
    assert_eq!(sim.stats().reads, 4);
}

#[test]
fn simulator_run_keeps_events_before_error() {
    let mut sim = Simulator::new(&tiny_config(0)).unwrap();
    let trace = "w 0\nr 10\nz 20\nr 30\n";

    let err = sim
        .run(TraceReader::new(trace.as_bytes()), |_, _| {})
        .unwrap_err();
    assert!(matches!(err, TraceError::Parse { line: 3, .. }), "got {err:?}");

    let stats = sim.finish();
    assert_eq!(stats.writes, 1);
    assert_eq!(stats.reads, 1);
    assert_eq!(stats.l1.accesses, 2);
}

#[test]
fn simulator_step_matches_run() {
    let events = [
        TraceEvent::write(0x100),
        TraceEvent::read(0x300),
        TraceEvent::read(0x100),
        TraceEvent::write(0x500),
    ];

    let mut stepped = Simulator::new(&tiny_config(2)).unwrap();
    for event in events {
        let _ = stepped.step(event);
    }

    let mut ran = Simulator::new(&tiny_config(2)).unwrap();
    let applied = ran.run(events.into_iter().map(Ok), |_, _| {}).unwrap();
    assert_eq!(applied, 4);

    pretty_assertions::assert_eq!(stepped.finish(), ran.finish());
}

#[test]
fn simulator_finish_fills_timing() {
    let mut sim = Simulator::new(&HierarchyConfig::default()).unwrap();
    let _ = sim.step(TraceEvent::read(0x1234));
    assert!(sim.hierarchy().cache(Level::L1).contains(0x1234));

    let stats = sim.finish();
    assert_eq!(stats.l1.misses(), 1);
    assert!(stats.l1.avg_access_time > stats.l1.hit_time);
    assert!(stats.l2.avg_access_time >= 500.0);
    assert!((stats.victim_miss_rate - 1.0).abs() < 1e-12);
}

#[test]
fn simulator_on_empty_trace() {
    let mut sim = Simulator::new(&HierarchyConfig::default()).unwrap();
    let applied = sim
        .run(TraceReader::new("# nothing here\n".as_bytes()), |_, _| {})
        .unwrap();
    assert_eq!(applied, 0);

    let stats = sim.finish();
    assert_eq!(stats.accesses(), 0);
    assert!(stats.l1.avg_access_time.is_nan());
}
