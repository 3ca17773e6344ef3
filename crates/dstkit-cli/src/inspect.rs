//! # Inspect Subcommand
//!
//! Lists a DST data file: the region and its standard and DST zones when
//! the file carries them, then each change's UTC instant, the local wall
//! clock on both sides, its kind, and the offsets before and after.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use dstkit_core::{
    iso8601, DstEntry, DstSpecial, OffsetResolver, TimezoneInfo, TransitionKind,
    TICKS_PER_MILLISECOND,
};

use crate::config::{CliConfig, OutputArgs, OutputFormat};

/// Arguments for the `dstkit inspect` subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// DST data file (JSON, or YAML by .yaml/.yml extension).
    #[arg(long, short)]
    pub transitions: Option<PathBuf>,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// A zone, as listed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneSummary {
    pub abbreviation: String,
    pub name: String,
    pub total_offset: String,
    pub dst: bool,
}

impl From<&TimezoneInfo> for ZoneSummary {
    fn from(zone: &TimezoneInfo) -> Self {
        Self {
            abbreviation: zone.abbreviation.clone(),
            name: zone.name.clone(),
            total_offset: iso8601::format_offset(
                zone.total_offset().ticks() / TICKS_PER_MILLISECOND,
            ),
            dst: zone.is_dst(),
        }
    }
}

/// The whole listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// `None` for a bare transition list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standard_zone: Option<ZoneSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dst_zone: Option<ZoneSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special: Option<DstSpecial>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dst_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dst_end: Option<String>,
    pub year: Option<i32>,
    pub transitions: Vec<TransitionRow>,
}

impl InspectReport {
    /// Summarize an entry and list its transitions.
    pub fn build(entry: &DstEntry) -> Self {
        let has_zone = entry.standard_timezone != TimezoneInfo::default();
        Self {
            region: entry.region.as_ref().map(|r| {
                if r.description.is_empty() {
                    r.country.clone()
                } else {
                    format!("{}, {}", r.country, r.description)
                }
            }),
            standard_zone: has_zone.then(|| ZoneSummary::from(&entry.standard_timezone)),
            dst_zone: entry.dst_timezone.as_ref().map(ZoneSummary::from),
            special: entry.special,
            dst_start: entry.dst_start.map(|i| i.to_string()),
            dst_end: entry.dst_end.map(|i| i.to_string()),
            year: entry.time_changes.year(),
            transitions: rows(&entry.time_changes),
        }
    }
}

/// One transition, as listed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionRow {
    pub index: usize,
    pub utc_time: String,
    pub old_local_time: String,
    pub new_local_time: String,
    pub kind: TransitionKind,
    /// `None` when the record's instants lie outside the tick range.
    pub offset_before: Option<String>,
    pub offset_after: String,
}

/// Build the listing rows for every transition.
pub fn rows(resolver: &OffsetResolver) -> Vec<TransitionRow> {
    resolver
        .transitions()
        .iter()
        .enumerate()
        .map(|(index, t)| TransitionRow {
            index,
            utc_time: t.utc_time().to_string(),
            old_local_time: t.old_local_time().to_iso_date_time(),
            new_local_time: t.new_local_time().to_iso_date_time(),
            kind: t.kind(),
            offset_before: t
                .pre_transition_offset()
                .ok()
                .map(|d| iso8601::format_offset(d.ticks() / TICKS_PER_MILLISECOND)),
            offset_after: iso8601::format_offset(
                t.new_total_offset().ticks() / TICKS_PER_MILLISECOND,
            ),
        })
        .collect()
}

/// Execute the inspect subcommand.
pub fn run_inspect(args: &InspectArgs, config: &CliConfig) -> Result<u8> {
    let path = crate::transitions_path(args.transitions.as_deref(), config)?;
    let report = InspectReport::build(&crate::load_dst_entry(&path)?);

    match config.output_for(&args.output) {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            match report.year {
                Some(year) => println!(
                    "{}: {} transitions in {}",
                    path.display(),
                    report.transitions.len(),
                    year
                ),
                None => println!("{}: no transitions", path.display()),
            }
            if let Some(region) = &report.region {
                println!("  region   {region}");
            }
            for (label, zone) in [("standard", &report.standard_zone), ("dst     ", &report.dst_zone)] {
                if let Some(zone) = zone {
                    println!("  {label} {} ({}) {}", zone.abbreviation, zone.name, zone.total_offset);
                }
            }
            if let Some(special) = report.special {
                println!("  special  {special}");
            }
            if let (Some(start), Some(end)) = (&report.dst_start, &report.dst_end) {
                println!("  dst      {start} -> {end}");
            }
            for row in &report.transitions {
                println!(
                    "  [{}] {:<7} utc {}  local {} -> {}  offset {} -> {}",
                    row.index,
                    row.kind.as_str(),
                    row.utc_time,
                    row.old_local_time,
                    row.new_local_time,
                    row.offset_before.as_deref().unwrap_or("?"),
                    row.offset_after
                );
            }
        }
    }
    Ok(0)
}
