//! # dstkit-core: Temporal Values and DST Offset Resolution
//!
//! This crate holds the value types a time-data client needs to represent
//! the dates, times and durations the upstream service reports, and the
//! algorithm that turns a location's list of UTC-offset transitions into
//! the offset for any local wall-clock time.
//!
//! ## Key Design Principles
//!
//! 1. **Tick arithmetic.** `Duration` is a signed 64-bit count of
//!    100-nanosecond ticks. Every arithmetic operation is checked and fails
//!    with `OverflowError` instead of wrapping.
//!
//! 2. **Permissive parsing, opt-in validation.** The ISO-8601 parser checks
//!    syntax only. `Instant` stores fields as given; calendar range checks
//!    live in `Instant::validate_calendar()`, which nothing calls implicitly.
//!
//! 3. **Minute-granular resolution.** Offset resolution compares instants by
//!    minute. Seconds never influence which transition governs.
//!
//! 4. **Failures are values.** Resolution distinguishes missing data, a year
//!    outside the list, and a local time skipped by a clock change. Nothing
//!    in this crate panics, logs an error, or retries.
//!
//! ## Crate Policy
//!
//! - No I/O. No shared mutable state; all types are `Send + Sync`.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public value types implement `Serialize`/`Deserialize`.

pub mod duration;
pub mod error;
pub mod instant;
pub mod iso8601;
pub mod resolver;
pub mod transition;
pub mod zone;

// Re-export primary types for ergonomic imports.
pub use duration::{
    Duration, TICKS_PER_DAY, TICKS_PER_HOUR, TICKS_PER_MILLISECOND, TICKS_PER_MINUTE,
    TICKS_PER_SECOND,
};
pub use error::{CalendarError, OverflowError, ParseError, ResolveError, TimeError};
pub use instant::{Instant, Precision, TICKS_AT_UNIX_EPOCH};
pub use resolver::{resolve, resolve_detailed, OffsetResolver, Regime, Resolution};
pub use transition::{TransitionKind, TransitionRecord};
pub use zone::{DstEntry, DstSpecial, Region, TimezoneInfo};
