use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};
use serde_json::{json, Value};

use crate::replay::{CountChange, ReplayReport};
use crate::trace::zone_label;

/// JSON-lines record of one replay: a `change` line per applied count change, then a
/// closing `summary` line.
pub struct ReplayJournal {
    out: BufWriter<File>,
}

impl ReplayJournal {
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let file = File::create(path)
            .with_context(|| format!("failed to create journal {}", path.display()))?;
        Ok(Self {
            out: BufWriter::new(file),
        })
    }

    pub fn write_report(&mut self, trace: &Path, report: &ReplayReport) -> Result<()> {
        for change in &report.changes {
            self.write_entry(&change_entry(change))?;
        }
        self.write_entry(&summary_entry(trace, report))?;
        self.out.flush().context("failed to flush journal")
    }

    fn write_entry(&mut self, entry: &Value) -> Result<()> {
        writeln!(self.out, "{entry}").context("failed to write journal entry")
    }
}

fn change_entry(change: &CountChange) -> Value {
    json!({
        "kind": "change",
        "sample": change.sample_index,
        "zone": zone_label(change.zone),
        "distance": change.distance,
        "applied": change.applied,
        "count": change.people_count,
    })
}

fn summary_entry(trace: &Path, report: &ReplayReport) -> Value {
    json!({
        "kind": "summary",
        "trace": trace.display().to_string(),
        "samples": report.samples,
        "peaks": report.peaks,
        "episodes": report.episodes,
        "final_count": report.final_count,
    })
}
