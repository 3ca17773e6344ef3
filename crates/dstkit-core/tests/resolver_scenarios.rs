//! # Resolver Scenarios
//!
//! End-to-end resolution against transition lists in the upstream wire
//! format. Each scenario deserializes a full year of transitions for one
//! location and checks the offsets for representative local times,
//! including both sides of every clock change.

use dstkit_core::{Instant, OffsetResolver, Regime, ResolveError, TransitionKind};

/// Helper: parse a wire-format transition list.
fn load(json: &str) -> OffsetResolver {
    serde_json::from_str(json).expect("fixture should deserialize")
}

/// Helper: resolve an ISO local time to whole seconds.
fn offset_seconds(resolver: &OffsetResolver, local: &str) -> Result<i64, ResolveError> {
    let local: Instant = local.parse().expect("fixture time should parse");
    resolver
        .resolve(&local)
        .map(|d| d.ticks() / dstkit_core::TICKS_PER_SECOND)
}

const OSLO_2020: &str = r#"[
    {
        "utctime": "2020-03-29T01:00:00Z",
        "oldlocaltime": "2020-03-29T02:00:00",
        "newlocaltime": "2020-03-29T03:00:00",
        "newdst": 3600,
        "newzone": 3600,
        "newoffset": 7200
    },
    {
        "utctime": "2020-10-25T01:00:00Z",
        "oldlocaltime": "2020-10-25T03:00:00",
        "newlocaltime": "2020-10-25T02:00:00",
        "newzone": 3600,
        "newoffset": 3600
    }
]"#;

const SYDNEY_2020: &str = r#"[
    {
        "utctime": "2020-04-04T16:00:00Z",
        "oldlocaltime": "2020-04-05T03:00:00",
        "newlocaltime": "2020-04-05T02:00:00",
        "newzone": 36000,
        "newoffset": 36000
    },
    {
        "utctime": "2020-10-03T16:00:00Z",
        "oldlocaltime": "2020-10-04T02:00:00",
        "newlocaltime": "2020-10-04T03:00:00",
        "newdst": 3600,
        "newzone": 36000,
        "newoffset": 39600
    }
]"#;

// ---------------------------------------------------------------------------
// Northern hemisphere: spring forward, then fall back
// ---------------------------------------------------------------------------

#[test]
fn test_oslo_regimes() {
    let oslo = load(OSLO_2020);
    assert_eq!(oslo.year(), Some(2020));
    assert_eq!(offset_seconds(&oslo, "2020-01-15T12:00:00"), Ok(3600));
    assert_eq!(offset_seconds(&oslo, "2020-06-01T12:00:00"), Ok(7200));
    assert_eq!(offset_seconds(&oslo, "2020-12-01T12:00:00"), Ok(3600));
}

#[test]
fn test_oslo_kinds() {
    let oslo = load(OSLO_2020);
    let kinds: Vec<_> = oslo.transitions().iter().map(|t| t.kind()).collect();
    assert_eq!(kinds, vec![TransitionKind::Gap, TransitionKind::Overlap]);
}

#[test]
fn test_oslo_spring_gap() {
    let oslo = load(OSLO_2020);
    assert!(matches!(
        offset_seconds(&oslo, "2020-03-29T02:30:00"),
        Err(ResolveError::NonexistentLocalTime { .. })
    ));
    assert_eq!(offset_seconds(&oslo, "2020-03-29T01:59:00"), Ok(3600));
    assert_eq!(offset_seconds(&oslo, "2020-03-29T03:00:00"), Ok(7200));
}

#[test]
fn test_oslo_autumn_overlap_prefers_summer_time() {
    let oslo = load(OSLO_2020);
    let local: Instant = "2020-10-25T02:30:00".parse().unwrap();
    let res = oslo.resolve_detailed(&local).unwrap();
    assert_eq!(res.offset.hours(), 2);
    assert_eq!(res.regime, Regime::PreTransition);
    assert_eq!(offset_seconds(&oslo, "2020-10-25T03:00:00"), Ok(3600));
}

#[test]
fn test_oslo_other_year() {
    let oslo = load(OSLO_2020);
    assert_eq!(
        offset_seconds(&oslo, "2021-06-01T12:00:00"),
        Err(ResolveError::OutOfRange {
            requested: 2021,
            available: 2020
        })
    );
}

#[test]
fn test_offset_suffix_on_local_time_is_ignored() {
    let oslo = load(OSLO_2020);
    assert_eq!(offset_seconds(&oslo, "2020-06-01T12:00:00+09:00"), Ok(7200));
}

// ---------------------------------------------------------------------------
// Southern hemisphere: fall back first, then spring forward
// ---------------------------------------------------------------------------

#[test]
fn test_sydney_regimes() {
    let sydney = load(SYDNEY_2020);
    assert_eq!(offset_seconds(&sydney, "2020-01-15T12:00:00"), Ok(39600));
    assert_eq!(offset_seconds(&sydney, "2020-07-01T12:00:00"), Ok(36000));
    assert_eq!(offset_seconds(&sydney, "2020-12-25T12:00:00"), Ok(39600));
}

#[test]
fn test_sydney_overlap_prefers_summer_time() {
    let sydney = load(SYDNEY_2020);
    assert_eq!(offset_seconds(&sydney, "2020-04-05T02:30:00"), Ok(39600));
}

#[test]
fn test_sydney_later_gap_masked_by_earlier_transition() {
    let sydney = load(SYDNEY_2020);
    // 02:30 on 4 October was skipped, but the April transition still governs
    // because the October new local time (03:00) has not been reached.
    let local: Instant = "2020-10-04T02:30:00".parse().unwrap();
    let res = sydney.resolve_detailed(&local).unwrap();
    assert_eq!(res.offset.total_seconds(), 36000.0);
    assert_eq!((res.transition_index, res.regime), (0, Regime::PostTransition));
    assert_eq!(offset_seconds(&sydney, "2020-10-04T03:00:00"), Ok(39600));
}

// ---------------------------------------------------------------------------
// Degenerate input
// ---------------------------------------------------------------------------

#[test]
fn test_empty_list() {
    let empty = load("[]");
    assert!(empty.is_empty());
    assert_eq!(
        offset_seconds(&empty, "2020-06-01T12:00:00"),
        Err(ResolveError::NoTransitionData)
    );
}
