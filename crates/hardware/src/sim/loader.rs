//! Memory Trace Loader.
//!
//! This module turns trace text into access events. It performs:
//! 1. **Line parsing:** `<kind> <address>` where kind is `r`/`R` or `w`/`W`
//!    and the address is hexadecimal, with or without `0x`.
//! 2. **Streaming:** [`TraceReader`] yields events lazily from any `BufRead`,
//!    so multi-gigabyte traces are never held in memory.
//!
//! Blank lines and lines starting with `#` are skipped.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::common::{AccessKind, TraceError};

/// One memory access from a trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceEvent {
    /// Load or store.
    pub kind: AccessKind,
    /// Byte address.
    pub address: u64,
}

impl TraceEvent {
    /// Creates a read event.
    pub const fn read(address: u64) -> Self {
        Self {
            kind: AccessKind::Read,
            address,
        }
    }

    /// Creates a write event.
    pub const fn write(address: u64) -> Self {
        Self {
            kind: AccessKind::Write,
            address,
        }
    }
}

/// Parses a single trace line.
///
/// # Arguments
///
/// * `line` - Raw line text
/// * `line_no` - 1-based line number, used in errors
///
/// # Returns
///
/// `Ok(None)` for blank and comment lines, otherwise the event.
///
/// # Errors
///
/// Returns [`TraceError::Parse`] for an unknown access kind, a missing or
/// non-hexadecimal address, or trailing fields.
pub fn parse_line(line: &str, line_no: usize) -> Result<Option<TraceEvent>, TraceError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let parse_err = |reason: String| TraceError::Parse {
        line: line_no,
        reason,
    };

    let mut fields = line.split_whitespace();
    let tag = fields.next().unwrap_or_default();
    let mut chars = tag.chars();
    let kind = match (chars.next(), chars.next()) {
        (Some(c), None) => AccessKind::from_tag(c),
        _ => None,
    }
    .ok_or_else(|| parse_err(format!("unknown access kind '{tag}'")))?;

    let raw = fields
        .next()
        .ok_or_else(|| parse_err("missing address".to_owned()))?;
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .unwrap_or(raw);
    let address = u64::from_str_radix(digits, 16)
        .map_err(|e| parse_err(format!("bad address '{raw}': {e}")))?;

    if let Some(extra) = fields.next() {
        return Err(parse_err(format!("unexpected field '{extra}'")));
    }

    Ok(Some(TraceEvent { kind, address }))
}

/// Streaming trace parser over any buffered reader.
#[derive(Debug)]
pub struct TraceReader<R> {
    lines: io::Lines<R>,
    line_no: usize,
}

impl<R: BufRead> TraceReader<R> {
    /// Wraps `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<TraceEvent, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_no += 1;
            match parse_line(&line, self.line_no) {
                Ok(Some(event)) => return Some(Ok(event)),
                Ok(None) => {}
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Opens a trace file for streaming.
///
/// # Errors
///
/// Returns [`TraceError::Io`] if the file cannot be opened.
pub fn open_trace(path: impl AsRef<Path>) -> Result<TraceReader<BufReader<File>>, TraceError> {
    let file = File::open(path)?;
    Ok(TraceReader::new(BufReader::new(file)))
}

/// Reads a whole trace into memory.
///
/// # Errors
///
/// Returns the first I/O or parse error.
pub fn load_trace(path: impl AsRef<Path>) -> Result<Vec<TraceEvent>, TraceError> {
    open_trace(path)?.collect()
}
