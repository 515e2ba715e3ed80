mod journal;
mod replay;
mod trace;

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use doorway_counter::{active_config, PeakPolicy};
use journal::ReplayJournal;
use replay::{replay, ReplaySettings};
use trace::{parse_trace, zone_label};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyArg {
    Strict,
    Lenient,
}

impl From<PolicyArg> for PeakPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Strict => PeakPolicy::Strict,
            PolicyArg::Lenient => PeakPolicy::Lenient,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "trace_replay")]
#[command(about = "Replays recorded doorway distance traces through the people counter")]
struct Cli {
    trace: PathBuf,
    #[arg(long)]
    floor: Option<i32>,
    #[arg(long)]
    range: Option<i32>,
    #[arg(long)]
    vacancy: Option<u8>,
    #[arg(long)]
    window: Option<usize>,
    #[arg(long)]
    tolerance: Option<u16>,
    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,
    #[arg(long = "expect-count", allow_hyphen_values = true)]
    expect_count: Option<i32>,
    /// Also write count changes and a summary as JSON lines to this file.
    #[arg(long)]
    journal: Option<PathBuf>,
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn settings(&self) -> ReplaySettings {
        let defaults = active_config().thresholds;
        let geometry = (self.floor.is_some() || self.range.is_some() || self.vacancy.is_some())
            .then(|| {
                (
                    self.floor.unwrap_or(defaults.floor),
                    self.range.unwrap_or(defaults.floor_to_ceiling),
                    self.vacancy.unwrap_or(defaults.vacancy_percent),
                )
            });
        ReplaySettings {
            geometry,
            window_size: self.window,
            dispersion_tolerance: self.tolerance,
            policy: self.policy.map(PeakPolicy::from),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Stdout carries the CSV, so diagnostics go to stderr.
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let samples = parse_trace(&cli.trace)?;
    if samples.is_empty() {
        warn!("{} holds no samples", cli.trace.display());
    }

    let mut counter = cli.settings().build_counter();
    let report = replay(&mut counter, &samples);

    println!("change,index,zone,distance,applied,count");
    for change in &report.changes {
        println!(
            "change,{},{},{},{},{}",
            change.sample_index,
            zone_label(change.zone),
            change.distance,
            change.applied,
            change.people_count
        );
    }
    info!(
        "replayed {} samples: {} peaks, {} episodes, final count {}",
        report.samples, report.peaks, report.episodes, report.final_count
    );

    if let Some(path) = &cli.journal {
        ReplayJournal::create(path)?.write_report(&cli.trace, &report)?;
    }

    if let Some(expected) = cli.expect_count {
        if report.final_count != expected {
            bail!(
                "count mismatch: expected {expected}, got {}",
                report.final_count
            );
        }
    }
    Ok(())
}
