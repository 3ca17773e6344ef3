//! # Resolve Subcommand
//!
//! Resolves the UTC offset of a local wall-clock time against a DST data
//! file. Prints the offset, the governing transition and the regime that
//! applied. A region without clock changes (`special` set, no
//! transitions) reports its standard zone's offset.
//!
//! Exit code 1 means the local time could not be resolved (skipped by a
//! clock change, outside the file's year, or no data). Unreadable files
//! and malformed input are errors.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use dstkit_core::{
    iso8601, DstEntry, Instant, Regime, ResolveError, TICKS_PER_MILLISECOND, TICKS_PER_SECOND,
};

use crate::config::{CliConfig, OutputArgs, OutputFormat};

/// Arguments for the `dstkit resolve` subcommand.
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Local time to resolve, e.g. 2020-10-25T02:30:00.
    #[arg(value_name = "LOCAL")]
    pub local: String,

    /// DST data file (JSON, or YAML by .yaml/.yml extension).
    #[arg(long, short)]
    pub transitions: Option<PathBuf>,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// A successful resolution, as printed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolveReport {
    pub local: String,
    pub offset: String,
    pub offset_seconds: i64,
    /// `None` when the region has no clock changes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regime: Option<Regime>,
}

/// Resolve `local` against a DST entry.
pub fn resolve_report(entry: &DstEntry, local: &Instant) -> Result<ResolveReport, ResolveError> {
    let (offset, governing) = if entry.special.is_some() && entry.time_changes.is_empty() {
        (entry.resolve(local)?, None)
    } else {
        let resolution = entry.time_changes.resolve_detailed(local)?;
        (resolution.offset, Some(resolution))
    };
    let ticks = offset.ticks();
    Ok(ResolveReport {
        local: local.to_iso_date_time(),
        offset: iso8601::format_offset(ticks / TICKS_PER_MILLISECOND),
        offset_seconds: ticks / TICKS_PER_SECOND,
        transition_index: governing.map(|r| r.transition_index),
        regime: governing.map(|r| r.regime),
    })
}

/// Execute the resolve subcommand.
///
/// Returns exit code: 0 on success, 1 if the local time cannot be resolved.
pub fn run_resolve(args: &ResolveArgs, config: &CliConfig) -> Result<u8> {
    let path = crate::transitions_path(args.transitions.as_deref(), config)?;
    let entry = crate::load_dst_entry(&path)?;

    let local = Instant::from_iso(&args.local)
        .with_context(|| format!("cannot parse local time {:?}", args.local))?;
    if config.validate_calendar {
        local
            .validate_calendar()
            .with_context(|| format!("{:?} is not a calendar date", args.local))?;
    }

    let output = config.output_for(&args.output);
    match resolve_report(&entry, &local) {
        Ok(report) => {
            match output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                OutputFormat::Text => match (report.transition_index, report.regime) {
                    (Some(index), Some(regime)) => println!(
                        "{}  {}  (transition {}, {})",
                        report.local,
                        report.offset,
                        index,
                        regime_label(regime)
                    ),
                    _ => println!("{}  {}  (no clock changes)", report.local, report.offset),
                },
            }
            Ok(0)
        }
        Err(e) => {
            tracing::debug!(local = %local, error = ?e, "resolution failed");
            match output {
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "local": local.to_iso_date_time(),
                        "error": e.to_string(),
                    }))?
                ),
                OutputFormat::Text => println!("FAIL: {}: {}", local.to_iso_date_time(), e),
            }
            Ok(1)
        }
    }
}

fn regime_label(regime: Regime) -> &'static str {
    match regime {
        Regime::PreTransition => "before",
        Regime::PostTransition => "after",
    }
}
