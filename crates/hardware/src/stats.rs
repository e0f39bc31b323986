//! Simulation statistics collection and reporting.
//!
//! This module tracks the counters a cache hierarchy run produces. It provides:
//! 1. **Trace mix:** Reads and writes issued by the trace.
//! 2. **Per level:** Accesses, read/write misses, and write-backs for L1 and L2.
//! 3. **Victim cache:** Probes and hits.
//! 4. **Timing:** Hit time, miss rate, miss penalty, and average access time per level,
//!    computed once by [`SimStats::finalize`].
//!
//! Rates with a zero denominator are `NaN`, the "undefined" sentinel.

use std::io::{self, Write};

use serde::Serialize;

use crate::common::Level;
use crate::config::TimingConfig;

/// Counters and derived timing for one cache level.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct LevelStats {
    /// Accesses that reached this level (demand and write-back).
    pub accesses: u64,
    /// Read accesses that missed.
    pub read_misses: u64,
    /// Write accesses that missed.
    pub write_misses: u64,
    /// Dirty lines evicted from this level.
    pub write_backs: u64,

    /// Hit time in cycles (set by finalization).
    pub hit_time: f64,
    /// `(read_misses + write_misses) / accesses`, `NaN` without accesses.
    pub miss_rate: f64,
    /// Cost of a miss at this level.
    pub miss_penalty: f64,
    /// `hit_time + miss_rate * miss_penalty`, `NaN` without accesses.
    pub avg_access_time: f64,
}

impl LevelStats {
    /// Total misses of either kind.
    pub const fn misses(&self) -> u64 {
        self.read_misses + self.write_misses
    }

    /// Accesses that hit.
    pub const fn hits(&self) -> u64 {
        self.accesses.saturating_sub(self.misses())
    }

    /// Fills the derived fields from the counters and the given timing.
    fn derive(&mut self, hit_time: f64, miss_penalty: f64) {
        self.hit_time = hit_time;
        self.miss_penalty = miss_penalty;
        self.miss_rate = ratio(self.misses(), self.accesses);
        self.avg_access_time = if self.accesses == 0 {
            f64::NAN
        } else {
            hit_time + penalty_term(self.misses(), self.miss_rate, miss_penalty)
        };
    }
}

/// Simulation statistics for a two-level hierarchy run.
///
/// Owned by the caller and passed by `&mut` into every operation; the caches
/// never hold on to it.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SimStats {
    /// Read events in the trace.
    pub reads: u64,
    /// Write events in the trace.
    pub writes: u64,

    /// L1 counters and timing.
    pub l1: LevelStats,
    /// L2 counters and timing.
    pub l2: LevelStats,

    /// Victim cache probes (one per L1 miss when a victim cache is configured).
    pub victim_accesses: u64,
    /// Probes that found the line.
    pub victim_hits: u64,
    /// `(victim_accesses - victim_hits) / victim_accesses`, `NaN` when never probed.
    pub victim_miss_rate: f64,
}

/// Section names for selective stats output.
///
/// Pass an empty slice to [`SimStats::print_sections`] to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "l1", "victim", "l2", "timing"];

/// `num / den`, or `NaN` when `den` is zero.
fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 {
        f64::NAN
    } else {
        num as f64 / den as f64
    }
}

/// `rate * penalty`, or zero when nothing missed.
///
/// Keeps an undefined penalty from a never-reached level out of the result.
fn penalty_term(misses: u64, rate: f64, penalty: f64) -> f64 {
    if misses == 0 { 0.0 } else { rate * penalty }
}

impl SimStats {
    /// Counters for `level`.
    pub const fn level(&self, level: Level) -> &LevelStats {
        match level {
            Level::L1 => &self.l1,
            Level::L2 => &self.l2,
        }
    }

    /// Mutable counters for `level`.
    pub const fn level_mut(&mut self, level: Level) -> &mut LevelStats {
        match level {
            Level::L1 => &mut self.l1,
            Level::L2 => &mut self.l2,
        }
    }

    /// Demand accesses seen by L1 (equals `reads + writes`).
    pub const fn accesses(&self) -> u64 {
        self.l1.accesses
    }

    /// Computes hit times, miss rates, penalties, and average access times.
    ///
    /// L2's penalty is the flat memory latency. L1's penalty is L2's average
    /// access time, scaled by the victim cache miss rate when one is present.
    ///
    /// # Arguments
    ///
    /// * `timing` - Hit time and memory latency constants
    /// * `l1_ways_exp`, `l2_ways_exp` - Associativity exponents of each level
    /// * `has_victim` - Whether L1 has a victim cache
    pub fn finalize(
        &mut self,
        timing: &TimingConfig,
        l1_ways_exp: u32,
        l2_ways_exp: u32,
        has_victim: bool,
    ) {
        self.l2.derive(
            timing.hit_time(Level::L2, l2_ways_exp),
            timing.memory_penalty,
        );
        let aat2 = self.l2.avg_access_time;

        let l1_penalty = if has_victim {
            let victim_misses = self.victim_accesses.saturating_sub(self.victim_hits);
            self.victim_miss_rate = ratio(victim_misses, self.victim_accesses);
            penalty_term(victim_misses, self.victim_miss_rate, aat2)
        } else {
            self.victim_miss_rate = f64::NAN;
            aat2
        };

        self.l1
            .derive(timing.hit_time(Level::L1, l1_ways_exp), l1_penalty);
    }

    /// Writes the requested report sections to `out`.
    ///
    /// Each element of `sections` should be one of [`STATS_SECTIONS`]; an
    /// empty slice writes everything.
    ///
    /// # Errors
    ///
    /// Propagates write failures from `out`.
    pub fn write_sections(&self, out: &mut impl Write, sections: &[String]) -> io::Result<()> {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);

        writeln!(out, "==========================================================")?;
        writeln!(out, "CACHE HIERARCHY STATISTICS")?;
        writeln!(out, "==========================================================")?;
        if want("summary") {
            writeln!(out, "accesses                 {}", self.accesses())?;
            writeln!(out, "reads                    {}", self.reads)?;
            writeln!(out, "writes                   {}", self.writes)?;
            writeln!(out, "----------------------------------------------------------")?;
        }
        if want("l1") {
            write_level(out, "L1", &self.l1)?;
        }
        if want("victim") {
            writeln!(out, "VICTIM CACHE")?;
            writeln!(out, "  vc.accesses            {}", self.victim_accesses)?;
            writeln!(out, "  vc.hits                {}", self.victim_hits)?;
            writeln!(out, "  vc.miss_rate           {}", fmt_rate(self.victim_miss_rate))?;
            writeln!(out, "----------------------------------------------------------")?;
        }
        if want("l2") {
            write_level(out, "L2", &self.l2)?;
        }
        if want("timing") {
            writeln!(out, "AVERAGE ACCESS TIME")?;
            writeln!(out, "  aat.l1                 {}", fmt_cycles(self.l1.avg_access_time))?;
            writeln!(out, "  aat.l2                 {}", fmt_cycles(self.l2.avg_access_time))?;
        }
        writeln!(out, "==========================================================")?;
        Ok(())
    }

    /// Prints only the requested statistics sections to stdout.
    ///
    /// # Errors
    ///
    /// Fails if stdout is closed.
    pub fn print_sections(&self, sections: &[String]) -> io::Result<()> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        self.write_sections(&mut lock, sections)
    }

    /// Prints all statistics sections to stdout.
    ///
    /// # Errors
    ///
    /// Fails if stdout is closed.
    pub fn print(&self) -> io::Result<()> {
        self.print_sections(&[])
    }
}

fn write_level(out: &mut impl Write, name: &str, stats: &LevelStats) -> io::Result<()> {
    let key = name.to_lowercase();
    writeln!(out, "{name} CACHE")?;
    writeln!(out, "  {key}.accesses            {}", stats.accesses)?;
    writeln!(out, "  {key}.read_misses         {}", stats.read_misses)?;
    writeln!(out, "  {key}.write_misses        {}", stats.write_misses)?;
    writeln!(out, "  {key}.write_backs         {}", stats.write_backs)?;
    writeln!(out, "  {key}.miss_rate           {}", fmt_rate(stats.miss_rate))?;
    writeln!(out, "----------------------------------------------------------")?;
    Ok(())
}

fn fmt_rate(rate: f64) -> String {
    if rate.is_nan() {
        "n/a".to_owned()
    } else {
        format!("{:.2}%", rate * 100.0)
    }
}

fn fmt_cycles(cycles: f64) -> String {
    if cycles.is_nan() {
        "n/a".to_owned()
    } else {
        format!("{cycles:.4} cycles")
    }
}
