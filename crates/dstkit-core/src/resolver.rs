//! # Offset Resolution
//!
//! Given a location's transitions for one year, find the UTC offset that
//! applies to a local wall-clock instant.
//!
//! ## Selection
//!
//! Transitions are scanned in order. For each transition `t`:
//!
//! 1. A local time strictly between `t`'s old and new local times was
//!    skipped by the clock change and fails with
//!    [`ResolveError::NonexistentLocalTime`].
//! 2. A local time at or before `t`'s old local time is governed by `t`.
//! 3. Otherwise `t` governs unless the next transition's new local time has
//!    already been reached, in which case the scan moves on. The last
//!    transition governs everything after it.
//!
//! All comparisons are minute-granular; seconds never participate.
//!
//! The governing transition yields the offset: before its old local time,
//! the offset is derived from the record itself as `old_local - utc`;
//! from then on, it is the transition's reported total offset.
//!
//! ## Ambiguity
//!
//! A local time repeated by a fall-back change matches the earlier regime.
//! The forward scan stops at the first transition whose old local time has
//! not yet passed, which is the pre-transition side of the overlap.
//!
//! The gap check in step 1 only sees the transition under examination. When
//! step 3 lets an earlier transition govern because the next transition's
//! new local time is still ahead, a local time inside that next
//! transition's gap is never tested against it. It resolves with the
//! earlier transition's post-transition offset instead of failing. With a
//! fall-back change followed by a spring-forward change in the same year
//! (southern hemisphere), the spring-forward gap is masked this way.
//!
//! ## Single Year
//!
//! Only a local time in the same calendar year as the first transition's
//! new local time can be resolved. Queries for other years fail with
//! [`ResolveError::OutOfRange`] rather than guessing from a neighbouring
//! year's rules.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::duration::Duration;
use crate::error::ResolveError;
use crate::instant::Instant;
use crate::transition::TransitionRecord;

/// Which side of the governing transition applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    /// The local time precedes the transition's old local time.
    PreTransition,
    /// The local time is at or after the transition's new local time.
    PostTransition,
}

/// Outcome of a successful resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// UTC offset for the queried local time.
    pub offset: Duration,
    /// Index of the governing transition.
    pub transition_index: usize,
    /// Side of the governing transition that applied.
    pub regime: Regime,
}

/// Resolve the UTC offset for `local`.
///
/// # Errors
///
/// See [`resolve_detailed`].
pub fn resolve(transitions: &[TransitionRecord], local: &Instant) -> Result<Duration, ResolveError> {
    resolve_detailed(transitions, local).map(|r| r.offset)
}

/// Resolve the UTC offset for `local`, reporting which transition governed.
///
/// # Errors
///
/// - [`ResolveError::NoTransitionData`] for an empty list.
/// - [`ResolveError::OutOfRange`] when `local` is in a different year.
/// - [`ResolveError::NonexistentLocalTime`] when `local` falls in a gap.
/// - [`ResolveError::Overflow`] when transition instants leave the tick range.
pub fn resolve_detailed(
    transitions: &[TransitionRecord],
    local: &Instant,
) -> Result<Resolution, ResolveError> {
    let first = transitions.first().ok_or(ResolveError::NoTransitionData)?;
    let available = first.new_local_time().year();
    if local.year() != available {
        return Err(ResolveError::OutOfRange {
            requested: local.year(),
            available,
        });
    }

    let (transition_index, governing) = find_governing(transitions, local)?;

    let resolution = if Instant::compare_by_minute(local, governing.old_local_time()) == Ordering::Less {
        Resolution {
            offset: governing.pre_transition_offset()?,
            transition_index,
            regime: Regime::PreTransition,
        }
    } else {
        Resolution {
            offset: governing.new_total_offset(),
            transition_index,
            regime: Regime::PostTransition,
        }
    };

    tracing::trace!(
        local = %local,
        index = resolution.transition_index,
        regime = ?resolution.regime,
        offset_seconds = resolution.offset.total_seconds(),
        "selected governing transition"
    );
    Ok(resolution)
}

fn find_governing<'a>(
    transitions: &'a [TransitionRecord],
    local: &Instant,
) -> Result<(usize, &'a TransitionRecord), ResolveError> {
    for (index, t) in transitions.iter().enumerate() {
        let after_old = Instant::compare_by_minute(local, t.old_local_time()) == Ordering::Greater;
        let before_new = Instant::compare_by_minute(local, t.new_local_time()) == Ordering::Less;
        if after_old && before_new {
            return Err(ResolveError::NonexistentLocalTime {
                local: local.to_iso_date_time(),
                old_local: t.old_local_time().to_iso_date_time(),
                new_local: t.new_local_time().to_iso_date_time(),
            });
        }
        if !after_old {
            return Ok((index, t));
        }
        let Some(next) = transitions.get(index + 1) else {
            return Ok((index, t));
        };
        if Instant::compare_by_minute(local, next.new_local_time()) == Ordering::Less {
            return Ok((index, t));
        }
    }
    Err(ResolveError::NoTransitionData)
}

/// A location's transition list for one year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OffsetResolver {
    transitions: Vec<TransitionRecord>,
}

impl OffsetResolver {
    /// Wrap a transition list ordered by ascending UTC time.
    pub fn new(transitions: Vec<TransitionRecord>) -> Self {
        Self { transitions }
    }

    /// The year this list can resolve, if it has any transitions.
    pub fn year(&self) -> Option<i32> {
        self.transitions.first().map(|t| t.new_local_time().year())
    }

    /// The underlying transitions.
    pub fn transitions(&self) -> &[TransitionRecord] {
        &self.transitions
    }

    /// Number of transitions.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    /// Whether the list has no transitions.
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// See [`resolve`].
    pub fn resolve(&self, local: &Instant) -> Result<Duration, ResolveError> {
        resolve(&self.transitions, local)
    }

    /// See [`resolve_detailed`].
    pub fn resolve_detailed(&self, local: &Instant) -> Result<Resolution, ResolveError> {
        resolve_detailed(&self.transitions, local)
    }
}

impl From<Vec<TransitionRecord>> for OffsetResolver {
    fn from(transitions: Vec<TransitionRecord>) -> Self {
        Self::new(transitions)
    }
}

impl FromIterator<TransitionRecord> for OffsetResolver {
    fn from_iter<I: IntoIterator<Item = TransitionRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
