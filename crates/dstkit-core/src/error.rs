//! # Error Types: Structured Error Hierarchy
//!
//! Defines the error types used throughout dstkit. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Parse errors name the offending input and the component that failed.
//! - Overflow errors name the arithmetic operation that left the tick range.
//! - Resolution errors carry the queried local time and the transition
//!   boundaries that rejected it.
//!
//! Every error is deterministic given its inputs. Nothing in the core logs
//! or retries them; they are returned to the caller as-is.

use thiserror::Error;

/// Top-level error type for dstkit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeError {
    /// ISO-8601 text did not match the accepted grammar.
    #[error("format error: {0}")]
    Parse(#[from] ParseError),

    /// Tick arithmetic left the signed 64-bit range.
    #[error("overflow: {0}")]
    Overflow(#[from] OverflowError),

    /// Offset resolution failed.
    #[error("resolution error: {0}")]
    Resolve(#[from] ResolveError),

    /// Optional calendar validation rejected a field.
    #[error("calendar error: {0}")]
    Calendar(#[from] CalendarError),
}

/// Error while parsing ISO-8601 text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A required component (year, month, day, hour, offset minutes) is absent.
    #[error("missing {component} in {input:?}")]
    MissingComponent {
        /// The full input text.
        input: String,
        /// Name of the missing component.
        component: &'static str,
    },

    /// A component is present but is not a base-10 integer.
    #[error("invalid {component} {text:?} in {input:?}")]
    InvalidNumber {
        /// The full input text.
        input: String,
        /// Name of the component that failed to parse.
        component: &'static str,
        /// The offending substring.
        text: String,
    },

    /// More components were supplied than the grammar allows.
    #[error("unexpected {component} {text:?} in {input:?}")]
    UnexpectedComponent {
        /// The full input text.
        input: String,
        /// Where the surplus text was found.
        component: &'static str,
        /// The surplus text.
        text: String,
    },

    /// A keyword did not match any known wire identifier.
    #[error("unknown {kind}: {text:?}")]
    UnknownKeyword {
        /// What was being parsed.
        kind: &'static str,
        /// The unrecognised text.
        text: String,
    },
}

/// Signed 64-bit tick overflow.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{operation} exceeds the representable tick range")]
pub struct OverflowError {
    /// The operation that overflowed (e.g. `"add"`, `"negate"`).
    pub operation: &'static str,
}

impl OverflowError {
    pub(crate) const fn new(operation: &'static str) -> Self {
        Self { operation }
    }
}

/// Error resolving a local time against a transition list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The location has no time changes to resolve against.
    #[error("no time changes available for this location")]
    NoTransitionData,

    /// The queried year differs from the year the transitions describe.
    #[error("year {requested} is outside year {available} covered by the time changes")]
    OutOfRange {
        /// Year of the queried local time.
        requested: i32,
        /// Year of the first transition's new local time.
        available: i32,
    },

    /// The local time was skipped by a clock change.
    #[error("local time {local} does not exist: it falls between {old_local} and {new_local}")]
    NonexistentLocalTime {
        /// The queried local time.
        local: String,
        /// Local wall clock immediately before the transition.
        old_local: String,
        /// Local wall clock immediately after the transition.
        new_local: String,
    },

    /// Tick arithmetic on the transition instants overflowed.
    #[error(transparent)]
    Overflow(#[from] OverflowError),
}

/// A calendar field outside its valid range.
///
/// Only produced by the explicit checking layer
/// ([`Instant::validate_calendar`](crate::Instant::validate_calendar)).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    /// Field value outside `[min, max]`.
    #[error("{field} {value} is outside {min}..={max}")]
    FieldOutOfRange {
        /// Name of the field.
        field: &'static str,
        /// The rejected value.
        value: i32,
        /// Smallest accepted value.
        min: i32,
        /// Largest accepted value.
        max: i32,
    },
}
