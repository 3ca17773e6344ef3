//! # Instant: Partial-Precision Calendar Timestamps
//!
//! Defines `Instant`, a calendar date/time as reported by the upstream data
//! service: a year, then month, day, hour, minute and second, each of which
//! may be absent, plus an optional UTC offset taken from ISO-8601 text.
//!
//! ## Field Container, Not a Validated Date
//!
//! Fields are stored exactly as given. `Instant::new(2021, 13, 0, 25, 0, 0)`
//! is a valid value; the upstream service is trusted and must never be
//! second-guessed on the hot path. Range checks live in the explicit,
//! optional [`Instant::validate_calendar()`] layer. Absent fields read as
//! zero through the accessors and in tick arithmetic.
//!
//! ## Absolute Ticks
//!
//! [`Instant::to_absolute_ticks()`] treats the fields as a UTC wall-clock
//! reading. The offset is NOT applied. The count is proleptic-Gregorian
//! milliseconds since the Unix epoch, rescaled to ticks and shifted by
//! [`TICKS_AT_UNIX_EPOCH`], so tick 0 is 0001-01-01T00:00. Out-of-range
//! months, days, hours and minutes roll over into the neighbouring unit
//! (month 13 of 2020 is January 2021). The second field is ignored.
//!
//! ## Minute Granularity
//!
//! [`Instant::compare_by_minute()`] orders instants by their tick value.
//! Because ticks ignore seconds, `10:30:00` and `10:30:59` compare equal.
//! The offset resolver relies on exactly this behaviour.
//!
//! ## Formatting Asymmetry
//!
//! [`Instant::to_iso_date_time()`] always prints every clock field and
//! never appends the offset, even when one was parsed. `Display` follows
//! [`Instant::precision()`] instead: absent fields are omitted and a known
//! offset is always appended.
//!
//! ## Serde Form
//!
//! An instant serializes as its `Display` string whenever
//! [`Instant::from_iso()`] reads that string back to the same value. The
//! others serialize as a map of their present fields:
//! year or month precision, a date carrying an offset, negative fields,
//! and sub-minute offsets. Deserialization accepts either form.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::duration::{Duration, TICKS_PER_MILLISECOND, TICKS_PER_MINUTE};
use crate::error::{CalendarError, OverflowError, ParseError};
use crate::iso8601;

/// Ticks between 0001-01-01T00:00 and the Unix epoch (1970-01-01T00:00).
///
/// Paired response parsers must agree with this value bit for bit.
pub const TICKS_AT_UNIX_EPOCH: i64 = 621_355_968_000_000_000;

/// Days between 0000-03-01 and 1970-01-01 in the proleptic Gregorian calendar.
const DAYS_TO_UNIX_EPOCH: i64 = 719_468;
const DAYS_PER_ERA: i64 = 146_097;

/// The finest field an [`Instant`] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precision {
    /// Year only.
    Year,
    /// Year and month.
    Month,
    /// Calendar date.
    Day,
    /// Date and hour.
    Hour,
    /// Date, hour and minute.
    Minute,
    /// Date and full clock time.
    Second,
}

/// A calendar timestamp with independently optional precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "InstantRepr", into = "InstantRepr")]
pub struct Instant {
    year: i32,
    month: Option<i32>,
    day: Option<i32>,
    hour: Option<i32>,
    minute: Option<i32>,
    second: Option<i32>,
    offset_millis: Option<i64>,
}

impl Instant {
    /// A year-only instant.
    pub const fn year_only(year: i32) -> Self {
        Self {
            year,
            month: None,
            day: None,
            hour: None,
            minute: None,
            second: None,
            offset_millis: None,
        }
    }

    /// A year-and-month instant.
    pub const fn year_month(year: i32, month: i32) -> Self {
        let mut instant = Self::year_only(year);
        instant.month = Some(month);
        instant
    }

    /// A calendar date.
    pub const fn date(year: i32, month: i32, day: i32) -> Self {
        let mut instant = Self::year_month(year, month);
        instant.day = Some(day);
        instant
    }

    /// A date with an hour.
    pub const fn date_hour(year: i32, month: i32, day: i32, hour: i32) -> Self {
        let mut instant = Self::date(year, month, day);
        instant.hour = Some(hour);
        instant
    }

    /// A date with hour and minute.
    pub const fn date_hour_minute(year: i32, month: i32, day: i32, hour: i32, minute: i32) -> Self {
        let mut instant = Self::date_hour(year, month, day, hour);
        instant.minute = Some(minute);
        instant
    }

    /// A fully specified date and time.
    pub const fn new(year: i32, month: i32, day: i32, hour: i32, minute: i32, second: i32) -> Self {
        let mut instant = Self::date_hour_minute(year, month, day, hour, minute);
        instant.second = Some(second);
        instant
    }

    /// Parse `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM[:SS][offset]`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] for malformed text. Calendar ranges are not checked.
    pub fn from_iso(text: &str) -> Result<Self, ParseError> {
        let p = iso8601::parse(text)?;
        Ok(Self {
            year: p.year,
            month: Some(p.month),
            day: Some(p.day),
            hour: p.hour,
            minute: p.minute,
            second: p.second,
            offset_millis: p.offset_millis,
        })
    }

    /// The same instant carrying a UTC offset in milliseconds.
    pub const fn with_offset_millis(mut self, offset_millis: i64) -> Self {
        self.offset_millis = Some(offset_millis);
        self
    }

    /// Calendar year.
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Month, or 0 when absent.
    pub fn month(&self) -> i32 {
        self.month.unwrap_or(0)
    }

    /// Day of month, or 0 when absent.
    pub fn day(&self) -> i32 {
        self.day.unwrap_or(0)
    }

    /// Hour, or 0 when absent.
    pub fn hour(&self) -> i32 {
        self.hour.unwrap_or(0)
    }

    /// Minute, or 0 when absent.
    pub fn minute(&self) -> i32 {
        self.minute.unwrap_or(0)
    }

    /// Second, or 0 when absent.
    pub fn second(&self) -> i32 {
        self.second.unwrap_or(0)
    }

    /// The finest field present.
    pub fn precision(&self) -> Precision {
        if self.second.is_some() {
            Precision::Second
        } else if self.minute.is_some() {
            Precision::Minute
        } else if self.hour.is_some() {
            Precision::Hour
        } else if self.day.is_some() {
            Precision::Day
        } else if self.month.is_some() {
            Precision::Month
        } else {
            Precision::Year
        }
    }

    /// UTC offset in milliseconds, if the source text carried one.
    pub const fn offset_millis(&self) -> Option<i64> {
        self.offset_millis
    }

    /// UTC offset as a [`Duration`], if known and representable.
    pub fn offset(&self) -> Option<Duration> {
        self.offset_millis
            .and_then(|ms| ms.checked_mul(TICKS_PER_MILLISECOND))
            .map(Duration::from_ticks)
    }

    /// `YYYY-MM-DD`, zero-padded.
    ///
    /// Negative years print with a leading sign inside the padding width
    /// (`-001-01-01`), which [`Instant::from_iso()`] cannot read back.
    pub fn to_iso_date(&self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month(), self.day())
    }

    /// `YYYY-MM-DDTHH:MM:SS`, zero-padded. The offset is never appended.
    pub fn to_iso_date_time(&self) -> String {
        format!(
            "{}T{:02}:{:02}:{:02}",
            self.to_iso_date(),
            self.hour(),
            self.minute(),
            self.second()
        )
    }

    /// Ticks since 0001-01-01T00:00, reading the fields as UTC wall-clock.
    ///
    /// # Errors
    ///
    /// Returns [`OverflowError`] if the instant lies outside the i64 tick
    /// range (roughly years beyond ±29 000).
    pub fn to_absolute_ticks(&self) -> Result<i64, OverflowError> {
        i64::try_from(self.wide_ticks()).map_err(|_| OverflowError::new("to_absolute_ticks"))
    }

    /// Order two instants by absolute ticks. Seconds never participate.
    pub fn compare_by_minute(a: &Instant, b: &Instant) -> Ordering {
        a.wide_ticks().cmp(&b.wide_ticks())
    }

    /// Check every present field against the proleptic Gregorian calendar.
    ///
    /// This is the optional strict layer; nothing in the core calls it.
    pub fn validate_calendar(&self) -> Result<(), CalendarError> {
        if let Some(month) = self.month {
            check_range("month", month, 1, 12)?;
            if let Some(day) = self.day {
                check_range("day", day, 1, days_in_month(self.year, month))?;
            }
        }
        if let Some(hour) = self.hour {
            check_range("hour", hour, 0, 23)?;
        }
        if let Some(minute) = self.minute {
            check_range("minute", minute, 0, 59)?;
        }
        if let Some(second) = self.second {
            check_range("second", second, 0, 59)?;
        }
        Ok(())
    }

    /// Convert to a chrono date-time, or `None` if any field (read through
    /// the accessors, so absent month/day are 0) is calendar-invalid.
    pub fn to_naive_date_time(&self) -> Option<NaiveDateTime> {
        let date = NaiveDate::from_ymd_opt(
            self.year,
            u32::try_from(self.month()).ok()?,
            u32::try_from(self.day()).ok()?,
        )?;
        date.and_hms_opt(
            u32::try_from(self.hour()).ok()?,
            u32::try_from(self.minute()).ok()?,
            u32::try_from(self.second()).ok()?,
        )
    }

    /// Whether `Display` output parses back to this exact value.
    fn has_iso_form(&self) -> bool {
        let fields = [self.month, self.day, self.hour, self.minute, self.second];
        let non_negative = self.year >= 0 && fields.iter().flatten().all(|v| *v >= 0);
        let offset_fits = self.offset_millis.map_or(true, |ms| {
            ms % iso8601::MILLIS_PER_MINUTE == 0
                && ms.unsigned_abs() / 3_600_000 <= i32::MAX as u64
        });
        let offset_placeable = self.hour.is_some() || self.offset_millis.is_none();
        self.day.is_some() && non_negative && offset_fits && offset_placeable
    }

    /// Tick count in widened arithmetic; never overflows for i32 fields.
    fn wide_ticks(&self) -> i128 {
        let month_index = i64::from(self.month()) - 1;
        let year = i64::from(self.year) + month_index.div_euclid(12);
        let month = month_index.rem_euclid(12) + 1;
        let days = days_from_civil(year, month) + i64::from(self.day()) - 1;
        let minutes =
            i128::from(days) * 1_440 + i128::from(self.hour()) * 60 + i128::from(self.minute());
        minutes * i128::from(TICKS_PER_MINUTE) + i128::from(TICKS_AT_UNIX_EPOCH)
    }
}

/// Days from 1970-01-01 to the first of `month` in `year` (proleptic
/// Gregorian, `month` in `1..=12`).
fn days_from_civil(year: i64, month: i64) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let year_of_era = y - era * 400;
    let shifted_month = (month + 9) % 12;
    let day_of_year = (153 * shifted_month + 2) / 5;
    let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
    era * DAYS_PER_ERA + day_of_era - DAYS_TO_UNIX_EPOCH
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i32, month: i32) -> i32 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

fn check_range(field: &'static str, value: i32, min: i32, max: i32) -> Result<(), CalendarError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(CalendarError::FieldOutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

impl fmt::Display for Instant {
    /// Every present field in ISO-8601 order, then the offset (`Z` for
    /// zero) when one is known.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.year)?;
        if let Some(month) = self.month {
            write!(f, "-{month:02}")?;
        }
        if let Some(day) = self.day {
            write!(f, "-{day:02}")?;
        }
        if let Some(hour) = self.hour {
            write!(f, "T{hour:02}")?;
        }
        if let Some(minute) = self.minute {
            write!(f, ":{minute:02}")?;
        }
        if let Some(second) = self.second {
            write!(f, ":{second:02}")?;
        }
        match self.offset_millis {
            Some(0) => f.write_str("Z"),
            Some(ms) => f.write_str(&iso8601::format_offset(ms)),
            None => Ok(()),
        }
    }
}

impl FromStr for Instant {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_iso(s)
    }
}

impl TryFrom<String> for Instant {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_iso(&s)
    }
}

/// Wire form: ISO text when it is lossless, otherwise explicit fields.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum InstantRepr {
    Iso(String),
    Fields(InstantFields),
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct InstantFields {
    year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    month: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    day: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    hour: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    minute: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    second: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    offset_millis: Option<i64>,
}

impl From<Instant> for InstantRepr {
    fn from(i: Instant) -> Self {
        if i.has_iso_form() {
            return Self::Iso(i.to_string());
        }
        Self::Fields(InstantFields {
            year: i.year,
            month: i.month,
            day: i.day,
            hour: i.hour,
            minute: i.minute,
            second: i.second,
            offset_millis: i.offset_millis,
        })
    }
}

impl TryFrom<InstantRepr> for Instant {
    type Error = ParseError;

    fn try_from(repr: InstantRepr) -> Result<Self, Self::Error> {
        let f = match repr {
            InstantRepr::Iso(text) => return Self::from_iso(&text),
            InstantRepr::Fields(f) => f,
        };
        // Precision is a prefix: a field may only be present if every
        // coarser one is.
        let chain = [
            ("month", f.month),
            ("day", f.day),
            ("hour", f.hour),
            ("minute", f.minute),
            ("second", f.second),
        ];
        let mut first_absent = None;
        for (name, value) in chain {
            match (value, first_absent) {
                (None, None) => first_absent = Some(name),
                (Some(_), Some(component)) => {
                    return Err(ParseError::MissingComponent {
                        input: format!("{f:?}"),
                        component,
                    })
                }
                _ => {}
            }
        }
        Ok(Self {
            year: f.year,
            month: f.month,
            day: f.day,
            hour: f.hour,
            minute: f.minute,
            second: f.second,
            offset_millis: f.offset_millis,
        })
    }
}

impl From<NaiveDateTime> for Instant {
    fn from(dt: NaiveDateTime) -> Self {
        // chrono guarantees month/day/clock fields fit comfortably in i32.
        Self::new(
            dt.year(),
            dt.month() as i32,
            dt.day() as i32,
            dt.hour() as i32,
            dt.minute() as i32,
            dt.second() as i32,
        )
    }
}
