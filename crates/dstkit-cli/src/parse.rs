//! # Parse Subcommand
//!
//! Parses ISO-8601 text the way the core does and shows every derived
//! form: the ISO date and date-time, the precision, the absolute tick
//! count, and the offset when the text carried one.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use dstkit_core::{iso8601, Instant, Precision};

use crate::config::{CliConfig, OutputArgs, OutputFormat};

/// Arguments for the `dstkit parse` subcommand.
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// ISO-8601 dates or date-times.
    #[arg(value_name = "ISO", required = true)]
    pub inputs: Vec<String>,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Reject calendar-invalid fields (month 13, 31 April, ...).
    #[arg(long)]
    pub strict: bool,
}

/// Everything `parse` reports about one input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseReport {
    pub input: String,
    pub precision: Precision,
    /// The instant at its own precision, with its offset when known.
    pub display: String,
    pub iso_date: String,
    pub iso_date_time: String,
    /// `None` when the instant lies outside the tick range.
    pub absolute_ticks: Option<i64>,
    pub offset: Option<String>,
    pub offset_millis: Option<i64>,
}

impl ParseReport {
    /// Parse `input`, optionally enforcing calendar ranges.
    pub fn build(input: &str, strict: bool) -> Result<Self> {
        let instant = Instant::from_iso(input).with_context(|| format!("cannot parse {input:?}"))?;
        if strict {
            instant
                .validate_calendar()
                .with_context(|| format!("{input:?} is not a calendar date"))?;
        }
        Ok(Self {
            input: input.to_string(),
            precision: instant.precision(),
            display: instant.to_string(),
            iso_date: instant.to_iso_date(),
            iso_date_time: instant.to_iso_date_time(),
            absolute_ticks: instant.to_absolute_ticks().ok(),
            offset: instant.offset_millis().map(iso8601::format_offset),
            offset_millis: instant.offset_millis(),
        })
    }

    fn render_text(&self) -> String {
        let ticks = self
            .absolute_ticks
            .map_or_else(|| "out of range".to_string(), |t| t.to_string());
        let offset = self.offset.as_deref().unwrap_or("none");
        format!(
            "{}\n  display:   {}\n  date:      {}\n  date-time: {}\n  precision: {:?}\n  ticks:     {}\n  offset:    {}",
            self.input, self.display, self.iso_date, self.iso_date_time, self.precision, ticks, offset
        )
    }
}

/// Execute the parse subcommand.
///
/// Returns exit code 0; a malformed input is an error.
pub fn run_parse(args: &ParseArgs, config: &CliConfig) -> Result<u8> {
    let strict = args.strict || config.validate_calendar;
    let reports = args
        .inputs
        .iter()
        .map(|input| ParseReport::build(input, strict))
        .collect::<Result<Vec<_>>>()?;

    match config.output_for(&args.output) {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
        OutputFormat::Text => {
            for report in &reports {
                println!("{}", report.render_text());
            }
        }
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_for_date_time_with_offset() {
        let r = ParseReport::build("2020-03-29t01:00:00+02:00", false).unwrap();
        assert_eq!(r.iso_date, "2020-03-29");
        assert_eq!(r.iso_date_time, "2020-03-29T01:00:00");
        assert_eq!(r.precision, Precision::Second);
        assert_eq!(r.offset.as_deref(), Some("+02:00"));
        assert_eq!(r.offset_millis, Some(7_200_000));
        assert_eq!(r.display, "2020-03-29T01:00:00+02:00");
        assert!(r.absolute_ticks.is_some());
    }

    #[test]
    fn test_report_for_date_only() {
        let r = ParseReport::build("2020-01-01", false).unwrap();
        assert_eq!(r.precision, Precision::Day);
        assert_eq!(r.absolute_ticks, Some(637_134_336_000_000_000));
        assert_eq!(r.offset, None);
        assert!(r.render_text().contains("offset:    none"));
    }

    #[test]
    fn test_strict_mode_rejects_calendar_invalid() {
        assert!(ParseReport::build("2021-13-01", false).is_ok());
        assert!(ParseReport::build("2021-13-01", true).is_err());
    }

    #[test]
    fn test_malformed_input_fails_whole_run() {
        let args = ParseArgs {
            inputs: vec!["2020-01-01".into(), "garbage".into()],
            output: OutputArgs::default(),
            strict: false,
        };
        let err = run_parse(&args, &CliConfig::default()).unwrap_err();
        assert!(format!("{err:#}").contains("garbage"));
    }

    #[test]
    fn test_json_report_shape() {
        let r = ParseReport::build("2020-06-01T12:00", false).unwrap();
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["precision"], "minute");
        assert_eq!(v["display"], "2020-06-01T12:00");
        assert_eq!(v["iso_date_time"], "2020-06-01T12:00:00");
        assert!(v["offset"].is_null());
    }
}
