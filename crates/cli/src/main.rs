//! Cache hierarchy simulator CLI.
//!
//! This binary replays a memory trace through an L1/L2 hierarchy. It performs:
//! 1. **Configuration:** Builds the hierarchy from the seven exponent flags or a JSON config file.
//! 2. **Replay:** Streams the trace (file or stdin) one event at a time.
//! 3. **Reporting:** Prints the statistics report, or the raw statistics as JSON.

use std::io::{self, Write};
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cachesim_core::common::Serviced;
use cachesim_core::config::HierarchyConfig;
use cachesim_core::sim::{Simulator, TraceReader, loader};
use cachesim_core::stats::{STATS_SECTIONS, SimStats};

#[derive(Parser, Debug)]
#[command(
    name = "cachesim",
    author,
    version,
    about = "Two-level cache hierarchy simulator",
    long_about = "Replay a memory trace (`r <hex addr>` / `w <hex addr>` per line) through an L1 cache with an optional victim cache, backed by an L2 cache and flat memory.\n\nExamples:\n  cachesim -i traces/gcc.trace\n  cachesim -c 10 -b 4 -s 1 -v 2 -i traces/astar.trace --json\n  cachesim --config hierarchy.json < traces/bzip2.trace"
)]
struct Cli {
    /// L1 holds 2^C1 bytes.
    #[arg(short = 'c', default_value_t = 12)]
    c1: u32,

    /// L1 blocks are 2^B1 bytes.
    #[arg(short = 'b', default_value_t = 5)]
    b1: u32,

    /// L1 is 2^S1-way set associative.
    #[arg(short = 's', default_value_t = 3)]
    s1: u32,

    /// Victim cache entries (0 disables it).
    #[arg(short = 'v', default_value_t = 3)]
    v: usize,

    /// L2 holds 2^C2 bytes.
    #[arg(short = 'C', default_value_t = 15)]
    c2: u32,

    /// L2 blocks are 2^B2 bytes.
    #[arg(short = 'B', default_value_t = 5)]
    b2: u32,

    /// L2 is 2^S2-way set associative.
    #[arg(short = 'S', default_value_t = 4)]
    s2: u32,

    /// JSON hierarchy configuration; replaces the exponent flags.
    #[arg(long)]
    config: Option<String>,

    /// Trace file to replay; reads stdin when omitted.
    #[arg(short, long)]
    input: Option<String>,

    /// Print the statistics as JSON instead of the text report.
    #[arg(long)]
    json: bool,

    /// Print where each access was serviced.
    #[arg(long)]
    verbose: bool,

    /// Report sections to print (comma separated); all when omitted.
    #[arg(long, value_delimiter = ',', value_parser = clap::builder::PossibleValuesParser::new(STATS_SECTIONS.iter().copied()))]
    sections: Vec<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("[!] {e}");
        process::exit(1);
    }
}

/// Builds the simulator, replays the trace, and prints the report.
fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => HierarchyConfig::from_file(path)?,
        None => HierarchyConfig::from_exponents(cli.c1, cli.b1, cli.s1, cli.v, cli.c2, cli.b2, cli.s2),
    };

    let mut sim = Simulator::new(&config)?;
    tracing::info!(?config, "simulator configured");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut verbose_err = None;
    let mut observe = |event: &loader::TraceEvent, serviced: Serviced| {
        if cli.verbose && verbose_err.is_none() {
            if let Err(e) = writeln!(
                out,
                "{} {:#x} {}",
                event.kind.tag(),
                event.address,
                serviced
            ) {
                verbose_err = Some(e);
            }
        }
    };

    let applied = match &cli.input {
        Some(path) => sim.run(loader::open_trace(path)?, &mut observe)?,
        None => sim.run(TraceReader::new(io::stdin().lock()), &mut observe)?,
    };
    if let Some(e) = verbose_err {
        return Err(e.into());
    }
    drop(out);
    tracing::info!(applied, "trace replayed");

    let stats = sim.finish();
    report(&stats, cli)
}

fn report(stats: &SimStats, cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.json {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        serde_json::to_writer_pretty(&mut out, stats)?;
        writeln!(out)?;
    } else {
        stats.print_sections(&cli.sections)?;
    }
    Ok(())
}
