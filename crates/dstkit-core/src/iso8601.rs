//! # ISO-8601 Parsing: Restricted, Permissive Grammar
//!
//! Parses the two shapes the upstream data service emits:
//!
//! ```text
//! YYYY-MM-DD
//! YYYY-MM-DDTHH:MM[:SS][+HH:MM|-HH:MM|Z]
//! ```
//!
//! ## Permissiveness Invariant
//!
//! Only syntax is checked. Calendar ranges are not: `2021-13-00` parses to
//! month 13, day 0. The service is trusted to send meaningful values, and
//! future-dated or unusual strings must never be rejected here. Callers that
//! want range checks use [`Instant::validate_calendar`](crate::Instant::validate_calendar).
//!
//! ## Offsets
//!
//! The time part is split at its first `-` (negative offset) or, failing
//! that, its first `+` (positive offset). A trailing `Z` marks an explicit
//! zero offset. Offsets are reported in milliseconds:
//! `sign * (hours * 60 + minutes) * 60_000`.

use crate::error::ParseError;

pub(crate) const MILLIS_PER_MINUTE: i64 = 60_000;

/// Component fields extracted from ISO-8601 text.
///
/// Clock fields are `None` when the text carried no time part (or stopped
/// before that field); `offset_millis` is `None` when no offset was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedDateTime {
    /// Calendar year.
    pub year: i32,
    /// Month as written (not range-checked).
    pub month: i32,
    /// Day of month as written (not range-checked).
    pub day: i32,
    /// Hour, if a time part was present.
    pub hour: Option<i32>,
    /// Minute, if present.
    pub minute: Option<i32>,
    /// Second, if present.
    pub second: Option<i32>,
    /// UTC offset in milliseconds, if present.
    pub offset_millis: Option<i64>,
}

/// Parse a restricted ISO-8601 date or date-time.
///
/// # Errors
///
/// Returns [`ParseError`] when a numeric component is malformed, when the
/// date has fewer or more than three components, when the clock has more
/// than three components, or when an offset lacks its minutes.
pub fn parse(input: &str) -> Result<ParsedDateTime, ParseError> {
    let text = input.to_uppercase();

    let (date_part, time_part) = match text.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (text.as_str(), None),
    };

    let (year, month, day) = parse_date(input, date_part)?;
    let mut parsed = ParsedDateTime {
        year,
        month,
        day,
        hour: None,
        minute: None,
        second: None,
        offset_millis: None,
    };

    if let Some(time) = time_part {
        let (clock, offset_millis) = split_offset(input, time)?;
        let mut fields = clock.split(':');
        parsed.hour = Some(number(input, "hour", fields.next().unwrap_or(""))?);
        parsed.minute = fields.next().map(|m| number(input, "minute", m)).transpose()?;
        parsed.second = fields.next().map(|s| number(input, "second", s)).transpose()?;
        if let Some(extra) = fields.next() {
            return Err(ParseError::UnexpectedComponent {
                input: input.to_string(),
                component: "clock",
                text: extra.to_string(),
            });
        }
        parsed.offset_millis = offset_millis;
    }

    Ok(parsed)
}

/// Parse a textual UTC offset (`+HH:MM`, `-HH:MM`, `HH:MM`, or `Z`) into
/// milliseconds.
pub fn parse_offset(input: &str) -> Result<i64, ParseError> {
    let text = input.trim().to_uppercase();
    if text == "Z" {
        return Ok(0);
    }
    let (sign, body) = match text.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, text.strip_prefix('+').unwrap_or(text.as_str())),
    };
    offset_body(input, sign, body)
}

/// Format an offset in milliseconds as `+HH:MM` / `-HH:MM`.
///
/// Sub-minute remainders are dropped.
pub fn format_offset(offset_millis: i64) -> String {
    let sign = if offset_millis < 0 { '-' } else { '+' };
    let total_minutes = offset_millis.unsigned_abs() / MILLIS_PER_MINUTE as u64;
    format!("{sign}{:02}:{:02}", total_minutes / 60, total_minutes % 60)
}

fn parse_date(input: &str, date: &str) -> Result<(i32, i32, i32), ParseError> {
    let mut fields = date.split('-');
    let year = required(input, "year", fields.next())?;
    let month = required(input, "month", fields.next())?;
    let day = required(input, "day", fields.next())?;
    if let Some(extra) = fields.next() {
        return Err(ParseError::UnexpectedComponent {
            input: input.to_string(),
            component: "date",
            text: extra.to_string(),
        });
    }
    Ok((year, month, day))
}

/// Split `HH:MM[:SS]` from its offset suffix.
fn split_offset<'a>(input: &str, time: &'a str) -> Result<(&'a str, Option<i64>), ParseError> {
    if let Some((clock, offset)) = time.split_once('-') {
        return Ok((clock, Some(offset_body(input, -1, offset)?)));
    }
    if let Some((clock, offset)) = time.split_once('+') {
        return Ok((clock, Some(offset_body(input, 1, offset)?)));
    }
    if let Some(clock) = time.strip_suffix('Z') {
        return Ok((clock, Some(0)));
    }
    Ok((time, None))
}

/// Parse `HH:MM[Z]` into signed milliseconds.
fn offset_body(input: &str, sign: i64, body: &str) -> Result<i64, ParseError> {
    let body = body.strip_suffix('Z').unwrap_or(body);
    let mut fields = body.split(':');
    let hours = required(input, "offset hours", fields.next())?;
    let minutes = required(input, "offset minutes", fields.next())?;
    if let Some(extra) = fields.next() {
        return Err(ParseError::UnexpectedComponent {
            input: input.to_string(),
            component: "offset",
            text: extra.to_string(),
        });
    }
    let total_minutes = i64::from(hours) * 60 + i64::from(minutes);
    Ok(sign * total_minutes * MILLIS_PER_MINUTE)
}

fn required(input: &str, component: &'static str, field: Option<&str>) -> Result<i32, ParseError> {
    match field {
        Some(text) => number(input, component, text),
        None => Err(ParseError::MissingComponent {
            input: input.to_string(),
            component,
        }),
    }
}

fn number(input: &str, component: &'static str, text: &str) -> Result<i32, ParseError> {
    if text.is_empty() {
        return Err(ParseError::MissingComponent {
            input: input.to_string(),
            component,
        });
    }
    text.parse::<i32>().map_err(|_| ParseError::InvalidNumber {
        input: input.to_string(),
        component,
        text: text.to_string(),
    })
}
