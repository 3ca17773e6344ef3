//! # Zone Metadata
//!
//! Descriptive time zone records as reported alongside transitions, the
//! special DST classifications a location can carry, and the per-region
//! DST entry that bundles them with the year's transition list.
//!
//! `DstSpecial` maps to its wire keyword through one static table, used by
//! `as_str`, `FromStr` and serde alike.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::duration::{Duration, TICKS_PER_MILLISECOND, TICKS_PER_SECOND};
use crate::error::{OverflowError, ParseError, ResolveError, TimeError};
use crate::instant::Instant;
use crate::iso8601;
use crate::resolver::OffsetResolver;

/// A location's time zone as described by the data service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimezoneInfo {
    /// Zone abbreviation, e.g. `CEST`.
    #[serde(rename = "zoneabb", default)]
    pub abbreviation: String,
    /// Full zone name, e.g. `Central European Summer Time`.
    #[serde(rename = "zonename", default)]
    pub name: String,
    /// Textual offset (`+02:00`) when the service supplied one.
    #[serde(default, with = "offset_text", skip_serializing_if = "Option::is_none")]
    pub offset: Option<Duration>,
    /// Standard offset from UTC, in seconds.
    #[serde(rename = "zoneoffset", default)]
    pub basic_offset_seconds: i32,
    /// Additional DST offset, in seconds.
    #[serde(rename = "zonedst", default)]
    pub dst_offset_seconds: i32,
    /// Standard plus DST offset, in seconds.
    #[serde(rename = "zonetotaloffset", default)]
    pub total_offset_seconds: i32,
}

impl TimezoneInfo {
    /// Create a zone record without a textual offset.
    pub fn new(
        abbreviation: impl Into<String>,
        name: impl Into<String>,
        basic_offset_seconds: i32,
        dst_offset_seconds: i32,
        total_offset_seconds: i32,
    ) -> Self {
        Self {
            abbreviation: abbreviation.into(),
            name: name.into(),
            offset: None,
            basic_offset_seconds,
            dst_offset_seconds,
            total_offset_seconds,
        }
    }

    /// Attach a textual offset such as `+02:00` or `-05:30`.
    pub fn with_offset_text(mut self, text: &str) -> Result<Self, TimeError> {
        self.offset = Some(offset_from_text(text)?);
        Ok(self)
    }

    /// Whether daylight saving time is in effect.
    pub fn is_dst(&self) -> bool {
        self.dst_offset_seconds != 0
    }

    /// Total offset from UTC.
    pub fn total_offset(&self) -> Duration {
        Duration::from_ticks(i64::from(self.total_offset_seconds) * TICKS_PER_SECOND)
    }
}

fn offset_from_text(text: &str) -> Result<Duration, TimeError> {
    let millis = iso8601::parse_offset(text)?;
    let ticks = millis
        .checked_mul(TICKS_PER_MILLISECOND)
        .ok_or(OverflowError::new("offset"))?;
    Ok(Duration::from_ticks(ticks))
}

/// serde adapter storing an optional offset as `±HH:MM` text.
mod offset_text {
    use super::*;

    pub fn serialize<S: Serializer>(offset: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match offset {
            Some(d) => s.serialize_str(&iso8601::format_offset(d.ticks() / TICKS_PER_MILLISECOND)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Option::<String>::deserialize(d)?
            .map(|text| offset_from_text(&text).map_err(serde::de::Error::custom))
            .transpose()
    }
}

/// Locations that do not follow a regular DST schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DstSpecial {
    /// The location never observes daylight saving time.
    NoDaylightSavingTime,
    /// The location is on daylight saving time all year.
    DaylightSavingTimeAllYear,
}

const DST_SPECIAL_TABLE: &[(DstSpecial, &str)] = &[
    (DstSpecial::NoDaylightSavingTime, "nodst"),
    (DstSpecial::DaylightSavingTimeAllYear, "allyear"),
];

impl DstSpecial {
    /// Every variant, in table order.
    pub fn all() -> impl Iterator<Item = DstSpecial> {
        DST_SPECIAL_TABLE.iter().map(|(kind, _)| *kind)
    }

    /// The wire keyword.
    pub fn as_str(&self) -> &'static str {
        DST_SPECIAL_TABLE
            .iter()
            .find(|(kind, _)| kind == self)
            .map(|(_, text)| *text)
            .unwrap_or_default()
    }
}

impl fmt::Display for DstSpecial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DstSpecial {
    type Err = ParseError;

    /// Case-sensitive match against the wire keywords.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DST_SPECIAL_TABLE
            .iter()
            .find(|(_, text)| *text == s)
            .map(|(kind, _)| *kind)
            .ok_or_else(|| ParseError::UnknownKeyword {
                kind: "dst special",
                text: s.to_string(),
            })
    }
}

impl Serialize for DstSpecial {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DstSpecial {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let text = String::deserialize(d)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// The geographical region a DST entry applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Country name.
    #[serde(default)]
    pub country: String,
    /// Textual description of the region within the country.
    #[serde(rename = "desc", default)]
    pub description: String,
    /// Name of the biggest place in the region.
    #[serde(rename = "biggestplace", default)]
    pub biggest_place: String,
}

/// DST rules for one region in one year.
///
/// `dst_timezone`, `dst_start` and `dst_end` are absent when the region has
/// no clock changes that year. A region on DST all year reports its DST zone
/// as `standard_timezone` and sets `special`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DstEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<Region>,
    #[serde(rename = "stdtimezone")]
    pub standard_timezone: TimezoneInfo,
    #[serde(rename = "dsttimezone", default, skip_serializing_if = "Option::is_none")]
    pub dst_timezone: Option<TimezoneInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special: Option<DstSpecial>,
    #[serde(rename = "dststart", default, skip_serializing_if = "Option::is_none")]
    pub dst_start: Option<Instant>,
    #[serde(rename = "dstend", default, skip_serializing_if = "Option::is_none")]
    pub dst_end: Option<Instant>,
    #[serde(rename = "timechanges", default)]
    pub time_changes: OffsetResolver,
}

impl DstEntry {
    /// Whether the region changes its clocks during the year.
    pub fn has_clock_changes(&self) -> bool {
        self.special.is_none() && !self.time_changes.is_empty()
    }

    /// UTC offset for a local time in this region.
    ///
    /// A region with a special classification and no time changes keeps its
    /// standard zone's total offset all year, for any year. Otherwise the
    /// transition list decides.
    ///
    /// # Errors
    ///
    /// Whatever [`OffsetResolver::resolve`] reports.
    pub fn resolve(&self, local: &Instant) -> Result<Duration, ResolveError> {
        if self.special.is_some() && self.time_changes.is_empty() {
            return Ok(self.standard_timezone.total_offset());
        }
        self.time_changes.resolve(local)
    }
}

impl From<OffsetResolver> for DstEntry {
    /// An entry carrying only a transition list.
    fn from(time_changes: OffsetResolver) -> Self {
        Self {
            time_changes,
            ..Self::default()
        }
    }
}
