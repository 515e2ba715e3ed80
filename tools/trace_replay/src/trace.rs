use std::{fs, path::Path};

use anyhow::{anyhow, bail, Context, Result};
use doorway_counter::{DistanceSample, Zone};

/// Reads a trace file into samples in feed order.
///
/// Each non-blank, non-`#` line is either `sample,<left|right>,<distance>` or
/// `pair,<left>,<right>`, where a pair expands to the left reading followed by the right.
pub fn parse_trace(path: &Path) -> Result<Vec<DistanceSample>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read trace {}", path.display()))?;
    parse_trace_str(&raw).with_context(|| format!("invalid trace {}", path.display()))
}

pub fn parse_trace_str(raw: &str) -> Result<Vec<DistanceSample>> {
    let mut samples = Vec::new();
    for (idx, line) in raw.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        parse_line(trimmed, &mut samples).with_context(|| format!("line {line_no}"))?;
    }
    Ok(samples)
}

fn parse_line(line: &str, out: &mut Vec<DistanceSample>) -> Result<()> {
    let parts: Vec<&str> = line.split(',').map(str::trim).collect();
    match parts.as_slice() {
        ["sample", zone, distance] => {
            out.push(DistanceSample::new(parse_zone(zone)?, parse_distance(distance)?));
        }
        ["pair", left, right] => {
            out.push(DistanceSample::new(Zone::Left, parse_distance(left)?));
            out.push(DistanceSample::new(Zone::Right, parse_distance(right)?));
        }
        [kind, ..] if *kind == "sample" || *kind == "pair" => {
            bail!("`{kind}` expects 3 columns, got {}", parts.len());
        }
        [kind, ..] => bail!("unknown record kind `{kind}`"),
        [] => {}
    }
    Ok(())
}

pub fn parse_zone(raw: &str) -> Result<Zone> {
    match raw.to_ascii_lowercase().as_str() {
        "left" | "l" => Ok(Zone::Left),
        "right" | "r" => Ok(Zone::Right),
        _ => Err(anyhow!("invalid zone `{raw}` (use left|right)")),
    }
}

fn parse_distance(raw: &str) -> Result<i32> {
    raw.parse::<i32>()
        .with_context(|| format!("invalid distance `{raw}`"))
}

pub fn zone_label(zone: Zone) -> &'static str {
    match zone {
        Zone::Left => "left",
        Zone::Right => "right",
    }
}
