//! # Transition Records
//!
//! A `TransitionRecord` documents one discrete change of a location's UTC
//! offset: the UTC instant of the change, the local wall clock just before
//! and just after it, and the offsets that apply afterwards.
//!
//! A location owns a list of records ordered by ascending `utc_time`. The
//! ordering is an input contract of the upstream service and is not checked
//! here.
//!
//! Field names on the wire mirror the service's attributes (`utctime`,
//! `oldlocaltime`, `newlocaltime`, `newdst`, `newzone`, `newoffset`).

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::duration::Duration;
use crate::error::OverflowError;
use crate::instant::Instant;

/// Direction of a wall-clock change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    /// Clocks jump forward; the skipped local times do not exist.
    Gap,
    /// Clocks fall back; the repeated local times occur twice.
    Overlap,
    /// The offset metadata changes but the wall clock does not move.
    Reset,
}

impl TransitionKind {
    /// Lower-case identifier used in CLI output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gap => "gap",
            Self::Overlap => "overlap",
            Self::Reset => "reset",
        }
    }
}

impl std::fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One documented UTC-offset change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransitionRecord {
    #[serde(rename = "utctime")]
    utc_time: Instant,
    #[serde(rename = "oldlocaltime")]
    old_local_time: Instant,
    #[serde(rename = "newlocaltime")]
    new_local_time: Instant,
    #[serde(rename = "newdst", default, skip_serializing_if = "Option::is_none")]
    new_daylight_offset_seconds: Option<i32>,
    #[serde(rename = "newzone", default, skip_serializing_if = "Option::is_none")]
    new_timezone_offset_seconds: Option<i32>,
    #[serde(rename = "newoffset", default)]
    new_total_offset_seconds: i32,
}

impl TransitionRecord {
    /// Create a record from its wire fields.
    pub const fn new(
        utc_time: Instant,
        old_local_time: Instant,
        new_local_time: Instant,
        new_daylight_offset_seconds: Option<i32>,
        new_timezone_offset_seconds: Option<i32>,
        new_total_offset_seconds: i32,
    ) -> Self {
        Self {
            utc_time,
            old_local_time,
            new_local_time,
            new_daylight_offset_seconds,
            new_timezone_offset_seconds,
            new_total_offset_seconds,
        }
    }

    /// UTC instant of the change.
    pub const fn utc_time(&self) -> &Instant {
        &self.utc_time
    }

    /// Local wall clock immediately before the change.
    pub const fn old_local_time(&self) -> &Instant {
        &self.old_local_time
    }

    /// Local wall clock immediately after the change.
    pub const fn new_local_time(&self) -> &Instant {
        &self.new_local_time
    }

    /// DST component of the new offset, in seconds, if reported.
    pub const fn new_daylight_offset_seconds(&self) -> Option<i32> {
        self.new_daylight_offset_seconds
    }

    /// Standard (zone) component of the new offset, in seconds, if reported.
    pub const fn new_timezone_offset_seconds(&self) -> Option<i32> {
        self.new_timezone_offset_seconds
    }

    /// Total UTC offset after the change, in seconds.
    pub const fn new_total_offset_seconds(&self) -> i32 {
        self.new_total_offset_seconds
    }

    /// Total UTC offset after the change.
    pub fn new_total_offset(&self) -> Duration {
        // i32 seconds are always representable in i64 ticks.
        Duration::from_ticks(
            i64::from(self.new_total_offset_seconds) * crate::duration::TICKS_PER_SECOND,
        )
    }

    /// Offset in force before the change, derived as `old_local - utc`.
    ///
    /// # Errors
    ///
    /// Returns [`OverflowError`] when either instant lies outside the tick range.
    pub fn pre_transition_offset(&self) -> Result<Duration, OverflowError> {
        let old = Duration::from_ticks(self.old_local_time.to_absolute_ticks()?);
        let utc = Duration::from_ticks(self.utc_time.to_absolute_ticks()?);
        old.checked_sub(utc)
    }

    /// Classify the wall-clock movement.
    pub fn kind(&self) -> TransitionKind {
        match Instant::compare_by_minute(&self.new_local_time, &self.old_local_time) {
            Ordering::Greater => TransitionKind::Gap,
            Ordering::Less => TransitionKind::Overlap,
            Ordering::Equal => TransitionKind::Reset,
        }
    }
}
