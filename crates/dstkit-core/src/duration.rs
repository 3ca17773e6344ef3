//! # Duration: Signed Tick-Resolution Time Span
//!
//! Defines `Duration`, a signed count of 100-nanosecond ticks. The tick is
//! the resolution used by the upstream data service, so offsets derived
//! from its instants are exact at this granularity.
//!
//! ## Overflow Invariant
//!
//! `checked_add`, `checked_sub`, `checked_neg` and `checked_abs` never wrap.
//! Overflow is detected with the two's-complement sign-bit rule: an add
//! overflowed iff both operands carry the same sign bit and the result does
//! not; a subtract overflowed iff the operands' sign bits differ and the
//! result's sign bit differs from the left operand's. `Duration::MIN`
//! cannot be negated.
//!
//! ## Construction
//!
//! - [`Duration::from_ticks()`]: exact, infallible.
//! - [`Duration::from_seconds()`] and friends: scale a floating value to
//!   whole milliseconds, rounding half away from zero.
//! - [`Duration::from_hms()`] / [`Duration::from_parts()`]: from integer
//!   clock components.

use std::cmp::Ordering;
use std::fmt;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::error::OverflowError;

/// Ticks in one millisecond.
pub const TICKS_PER_MILLISECOND: i64 = 10_000;
/// Ticks in one second.
pub const TICKS_PER_SECOND: i64 = TICKS_PER_MILLISECOND * 1_000;
/// Ticks in one minute.
pub const TICKS_PER_MINUTE: i64 = TICKS_PER_SECOND * 60;
/// Ticks in one hour.
pub const TICKS_PER_HOUR: i64 = TICKS_PER_MINUTE * 60;
/// Ticks in one day.
pub const TICKS_PER_DAY: i64 = TICKS_PER_HOUR * 24;

const MILLIS_PER_SECOND: f64 = 1_000.0;
const MILLIS_PER_MINUTE: f64 = MILLIS_PER_SECOND * 60.0;
const MILLIS_PER_HOUR: f64 = MILLIS_PER_MINUTE * 60.0;
const MILLIS_PER_DAY: f64 = MILLIS_PER_HOUR * 24.0;

const MAX_SECONDS: i64 = i64::MAX / TICKS_PER_SECOND;
const MIN_SECONDS: i64 = i64::MIN / TICKS_PER_SECOND;
const MAX_MILLISECONDS: i64 = i64::MAX / TICKS_PER_MILLISECOND;
const MIN_MILLISECONDS: i64 = i64::MIN / TICKS_PER_MILLISECOND;

/// A signed span of time measured in 100-nanosecond ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Duration {
    ticks: i64,
}

impl Duration {
    /// The empty span.
    pub const ZERO: Duration = Duration { ticks: 0 };
    /// The largest representable span.
    pub const MAX: Duration = Duration { ticks: i64::MAX };
    /// The smallest (most negative) representable span.
    pub const MIN: Duration = Duration { ticks: i64::MIN };

    /// Create a span of exactly `ticks` ticks.
    pub const fn from_ticks(ticks: i64) -> Self {
        Self { ticks }
    }

    /// Create a span from fractional milliseconds.
    pub fn from_milliseconds(value: f64) -> Result<Self, OverflowError> {
        interval(value, 1.0)
    }

    /// Create a span from fractional seconds.
    pub fn from_seconds(value: f64) -> Result<Self, OverflowError> {
        interval(value, MILLIS_PER_SECOND)
    }

    /// Create a span from fractional minutes.
    pub fn from_minutes(value: f64) -> Result<Self, OverflowError> {
        interval(value, MILLIS_PER_MINUTE)
    }

    /// Create a span from fractional hours.
    pub fn from_hours(value: f64) -> Result<Self, OverflowError> {
        interval(value, MILLIS_PER_HOUR)
    }

    /// Create a span from fractional days.
    pub fn from_days(value: f64) -> Result<Self, OverflowError> {
        interval(value, MILLIS_PER_DAY)
    }

    /// Create a span from whole hours, minutes and seconds.
    pub fn from_hms(hours: i32, minutes: i32, seconds: i32) -> Result<Self, OverflowError> {
        let total = i64::from(hours) * 3_600 + i64::from(minutes) * 60 + i64::from(seconds);
        if !(MIN_SECONDS..=MAX_SECONDS).contains(&total) {
            return Err(OverflowError::new("from_hms"));
        }
        Ok(Self::from_ticks(total * TICKS_PER_SECOND))
    }

    /// Create a span from whole days, hours, minutes, seconds and milliseconds.
    pub fn from_parts(
        days: i32,
        hours: i32,
        minutes: i32,
        seconds: i32,
        milliseconds: i32,
    ) -> Result<Self, OverflowError> {
        let total_seconds = i64::from(days) * 86_400
            + i64::from(hours) * 3_600
            + i64::from(minutes) * 60
            + i64::from(seconds);
        // i32 inputs keep this product well inside i64.
        let total_millis = total_seconds * 1_000 + i64::from(milliseconds);
        if !(MIN_MILLISECONDS..=MAX_MILLISECONDS).contains(&total_millis) {
            return Err(OverflowError::new("from_parts"));
        }
        Ok(Self::from_ticks(total_millis * TICKS_PER_MILLISECOND))
    }

    /// Raw tick count.
    pub const fn ticks(&self) -> i64 {
        self.ticks
    }

    /// Whole days component.
    pub const fn days(&self) -> i64 {
        self.ticks / TICKS_PER_DAY
    }

    /// Hours component (`-23..=23`).
    pub const fn hours(&self) -> i32 {
        ((self.ticks / TICKS_PER_HOUR) % 24) as i32
    }

    /// Minutes component (`-59..=59`).
    pub const fn minutes(&self) -> i32 {
        ((self.ticks / TICKS_PER_MINUTE) % 60) as i32
    }

    /// Seconds component (`-59..=59`).
    pub const fn seconds(&self) -> i32 {
        ((self.ticks / TICKS_PER_SECOND) % 60) as i32
    }

    /// Milliseconds component (`-999..=999`).
    pub const fn milliseconds(&self) -> i32 {
        ((self.ticks / TICKS_PER_MILLISECOND) % 1_000) as i32
    }

    /// The span expressed in fractional days.
    pub fn total_days(&self) -> f64 {
        self.ticks as f64 / TICKS_PER_DAY as f64
    }

    /// The span expressed in fractional hours.
    pub fn total_hours(&self) -> f64 {
        self.ticks as f64 / TICKS_PER_HOUR as f64
    }

    /// The span expressed in fractional minutes.
    pub fn total_minutes(&self) -> f64 {
        self.ticks as f64 / TICKS_PER_MINUTE as f64
    }

    /// The span expressed in fractional seconds.
    pub fn total_seconds(&self) -> f64 {
        self.ticks as f64 / TICKS_PER_SECOND as f64
    }

    /// The span expressed in fractional milliseconds, clamped to the
    /// range of whole milliseconds a `Duration` can hold.
    pub fn total_milliseconds(&self) -> f64 {
        let millis = self.ticks as f64 / TICKS_PER_MILLISECOND as f64;
        millis.clamp(MIN_MILLISECONDS as f64, MAX_MILLISECONDS as f64)
    }

    /// Sum of two spans.
    pub fn checked_add(self, other: Duration) -> Result<Duration, OverflowError> {
        let result = self.ticks.wrapping_add(other.ticks);
        if (self.ticks >> 63) == (other.ticks >> 63) && (self.ticks >> 63) != (result >> 63) {
            return Err(OverflowError::new("add"));
        }
        Ok(Self::from_ticks(result))
    }

    /// Difference of two spans.
    pub fn checked_sub(self, other: Duration) -> Result<Duration, OverflowError> {
        let result = self.ticks.wrapping_sub(other.ticks);
        if (self.ticks >> 63) != (other.ticks >> 63) && (self.ticks >> 63) != (result >> 63) {
            return Err(OverflowError::new("subtract"));
        }
        Ok(Self::from_ticks(result))
    }

    /// The span with its sign flipped.
    pub fn checked_neg(self) -> Result<Duration, OverflowError> {
        if self.ticks == i64::MIN {
            return Err(OverflowError::new("negate"));
        }
        Ok(Self::from_ticks(-self.ticks))
    }

    /// The absolute value of the span.
    pub fn checked_abs(self) -> Result<Duration, OverflowError> {
        if self.ticks == i64::MIN {
            return Err(OverflowError::new("abs"));
        }
        Ok(Self::from_ticks(self.ticks.abs()))
    }

    /// Three-way comparison by tick count.
    pub fn compare(a: Duration, b: Duration) -> Ordering {
        a.ticks.cmp(&b.ticks)
    }

    /// `-1`, `0` or `1` according to the sign of the span.
    pub const fn signum(&self) -> i64 {
        self.ticks.signum()
    }
}

/// Scale `value` by `millis_per_unit`, round half away from zero to whole
/// milliseconds, and convert to ticks.
fn interval(value: f64, millis_per_unit: f64) -> Result<Duration, OverflowError> {
    let scaled = value * millis_per_unit;
    let millis = scaled + if value >= 0.0 { 0.5 } else { -0.5 };
    if !millis.is_finite() || millis > MAX_MILLISECONDS as f64 || millis < MIN_MILLISECONDS as f64 {
        return Err(OverflowError::new("interval"));
    }
    let ticks = (millis as i64)
        .checked_mul(TICKS_PER_MILLISECOND)
        .ok_or(OverflowError::new("interval"))?;
    Ok(Duration::from_ticks(ticks))
}

impl fmt::Display for Duration {
    /// Formats as `[-][d.]hh:mm:ss[.fffffff]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let magnitude = self.ticks.unsigned_abs();
        let day = TICKS_PER_DAY as u64;
        let hour = TICKS_PER_HOUR as u64;
        let minute = TICKS_PER_MINUTE as u64;
        let second = TICKS_PER_SECOND as u64;

        if self.ticks < 0 {
            f.write_str("-")?;
        }
        let days = magnitude / day;
        if days > 0 {
            write!(f, "{days}.")?;
        }
        write!(
            f,
            "{:02}:{:02}:{:02}",
            (magnitude / hour) % 24,
            (magnitude / minute) % 60,
            (magnitude / second) % 60,
        )?;
        let fraction = magnitude % second;
        if fraction > 0 {
            write!(f, ".{fraction:07}")?;
        }
        Ok(())
    }
}

impl From<Duration> for TimeDelta {
    fn from(d: Duration) -> Self {
        // Splitting keeps the nanosecond product inside i64 for every tick count.
        TimeDelta::microseconds(d.ticks / 10) + TimeDelta::nanoseconds((d.ticks % 10) * 100)
    }
}

impl TryFrom<TimeDelta> for Duration {
    type Error = OverflowError;

    /// Sub-tick nanoseconds are truncated toward zero.
    fn try_from(delta: TimeDelta) -> Result<Self, Self::Error> {
        let micros = delta
            .num_microseconds()
            .ok_or(OverflowError::new("from_time_delta"))?;
        let sub_micro_ticks = i64::from((delta.subsec_nanos() % 1_000) / 100);
        micros
            .checked_mul(10)
            .and_then(|t| t.checked_add(sub_micro_ticks))
            .map(Duration::from_ticks)
            .ok_or(OverflowError::new("from_time_delta"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_constants() {
        assert_eq!(TICKS_PER_SECOND, 10_000_000);
        assert_eq!(TICKS_PER_MINUTE, 600_000_000);
        assert_eq!(TICKS_PER_HOUR, 36_000_000_000);
        assert_eq!(TICKS_PER_DAY, 864_000_000_000);
    }

    #[test]
    fn test_from_seconds_scales_to_ticks() {
        let d = Duration::from_seconds(7200.0).unwrap();
        assert_eq!(d.ticks(), 7200 * TICKS_PER_SECOND);
        assert_eq!(d.hours(), 2);
        assert_eq!(d.total_hours(), 2.0);
    }

    #[test]
    fn test_from_milliseconds_rounds_half_away_from_zero() {
        assert_eq!(Duration::from_milliseconds(1.5).unwrap().ticks(), 2 * TICKS_PER_MILLISECOND);
        assert_eq!(Duration::from_milliseconds(-1.5).unwrap().ticks(), -2 * TICKS_PER_MILLISECOND);
        assert_eq!(Duration::from_milliseconds(1.4).unwrap().ticks(), TICKS_PER_MILLISECOND);
        assert_eq!(Duration::from_milliseconds(-1.4).unwrap().ticks(), -TICKS_PER_MILLISECOND);
    }

    #[test]
    fn test_fractional_units_truncate_below_milliseconds() {
        // 0.0001 s is 0.1 ms, which rounds to zero whole milliseconds.
        assert_eq!(Duration::from_seconds(0.0001).unwrap(), Duration::ZERO);
        assert_eq!(Duration::from_minutes(0.5).unwrap().ticks(), 30 * TICKS_PER_SECOND);
        assert_eq!(Duration::from_days(1.0).unwrap().days(), 1);
        assert_eq!(Duration::from_hours(-5.5).unwrap().minutes(), -30);
    }

    #[test]
    fn test_interval_rejects_out_of_range_and_nan() {
        assert!(Duration::from_days(1e12).is_err());
        assert!(Duration::from_days(-1e12).is_err());
        assert!(Duration::from_seconds(f64::NAN).is_err());
        assert!(Duration::from_seconds(f64::INFINITY).is_err());
    }

    #[test]
    fn test_from_hms_and_parts() {
        let d = Duration::from_hms(5, 30, 0).unwrap();
        assert_eq!(d.ticks(), 19_800 * TICKS_PER_SECOND);
        let d = Duration::from_parts(1, 2, 3, 4, 5).unwrap();
        assert_eq!(d.days(), 1);
        assert_eq!(d.hours(), 2);
        assert_eq!(d.minutes(), 3);
        assert_eq!(d.seconds(), 4);
        assert_eq!(d.milliseconds(), 5);
        assert!(Duration::from_hms(i32::MAX, 0, 0).is_err());
        assert!(Duration::from_parts(i32::MAX, 0, 0, 0, 0).is_err());
    }

    #[test]
    fn test_add_detects_overflow() {
        let max = Duration::MAX;
        assert!(max.checked_add(Duration::from_ticks(1)).is_err());
        assert!(Duration::MIN.checked_add(Duration::from_ticks(-1)).is_err());
        // Mixed signs never overflow.
        assert_eq!(
            max.checked_add(Duration::MIN).unwrap().ticks(),
            -1
        );
    }

    #[test]
    fn test_sub_detects_overflow() {
        assert!(Duration::MIN.checked_sub(Duration::from_ticks(1)).is_err());
        assert!(Duration::MAX.checked_sub(Duration::from_ticks(-1)).is_err());
        assert!(Duration::ZERO.checked_sub(Duration::MIN).is_err());
        assert_eq!(
            Duration::from_ticks(5).checked_sub(Duration::from_ticks(7)).unwrap().ticks(),
            -2
        );
    }

    #[test]
    fn test_negate_min_always_overflows() {
        assert!(Duration::MIN.checked_neg().is_err());
        assert!(Duration::MIN.checked_abs().is_err());
        assert_eq!(Duration::MAX.checked_neg().unwrap().ticks(), -i64::MAX);
        assert_eq!(Duration::from_ticks(-9).checked_abs().unwrap().ticks(), 9);
    }

    #[test]
    fn test_compare_and_ordering() {
        let a = Duration::from_ticks(1);
        let b = Duration::from_ticks(2);
        assert_eq!(Duration::compare(a, b), Ordering::Less);
        assert_eq!(Duration::compare(b, a), Ordering::Greater);
        assert_eq!(Duration::compare(a, a), Ordering::Equal);
        assert!(a < b);
    }

    #[test]
    fn test_components_truncate_toward_zero() {
        let d = Duration::from_hms(-1, -30, 0).unwrap();
        assert_eq!(d.hours(), -1);
        assert_eq!(d.minutes(), -30);
        assert_eq!(d.signum(), -1);
    }

    #[test]
    fn test_total_milliseconds_clamps() {
        let clamped = Duration::MAX.total_milliseconds();
        assert_eq!(clamped, MAX_MILLISECONDS as f64);
    }

    #[test]
    fn test_display_format() {
        assert_eq!(Duration::from_hms(2, 0, 0).unwrap().to_string(), "02:00:00");
        assert_eq!(Duration::from_hms(-5, -30, 0).unwrap().to_string(), "-05:30:00");
        assert_eq!(Duration::from_parts(1, 2, 0, 0, 0).unwrap().to_string(), "1.02:00:00");
        assert_eq!(Duration::from_ticks(TICKS_PER_SECOND + 5).to_string(), "00:00:01.0000005");
        assert_eq!(Duration::MIN.to_string(), "-10675199.02:48:05.4775808");
    }

    #[test]
    fn test_time_delta_conversions() {
        let d = Duration::from_ticks(36_000_000_123);
        let delta: TimeDelta = d.into();
        assert_eq!(delta.num_hours(), 1);
        assert_eq!(Duration::try_from(delta).unwrap(), d);

        let negative = Duration::from_ticks(-19_800 * TICKS_PER_SECOND - 7);
        let delta: TimeDelta = negative.into();
        assert_eq!(Duration::try_from(delta).unwrap(), negative);
    }

    #[test]
    fn test_serde_is_transparent_ticks() {
        let d = Duration::from_ticks(42);
        assert_eq!(serde_json::to_string(&d).unwrap(), "42");
        let back: Duration = serde_json::from_str("42").unwrap();
        assert_eq!(back, d);
    }
}
