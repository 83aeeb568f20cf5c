use bytes::Bytes;

use super::*;

#[test]
fn zadd_nx_with_gt_is_rejected_before_any_ipc_traffic() {
    let err = zadd(
        Bytes::from_static(b"z"),
        [(1.0, Bytes::from_static(b"m"))],
        ZAddOptions {
            exists: Some(ExistCondition::OnlyIfAbsent),
            score_condition: Some(ScoreCondition::GreaterThan),
            ..Default::default()
        },
    )
    .unwrap_err();
    assert!(matches!(
        err.kind(),
        crate::error::ErrorKind::ValidationError { .. }
    ));
}

#[test]
fn zadd_incr_requires_exactly_one_member() {
    let err = zadd(
        Bytes::from_static(b"z"),
        [
            (1.0, Bytes::from_static(b"a")),
            (2.0, Bytes::from_static(b"b")),
        ],
        ZAddOptions {
            increment: true,
            ..Default::default()
        },
    )
    .unwrap_err();
    assert!(matches!(
        err.kind(),
        crate::error::ErrorKind::ValidationError { .. }
    ));
}

#[test]
fn zrange_by_score_appends_byscore_keyword() {
    let cmd = zrange(
        Bytes::from_static(b"z"),
        RangeBy::Score {
            min: Boundary::NegativeInfinity,
            max: Boundary::PositiveInfinity,
        },
        ZRangeOptions::default(),
    )
    .unwrap();
    assert_eq!(
        cmd.args,
        vec![
            Bytes::from_static(b"z"),
            Bytes::from_static(b"-inf"),
            Bytes::from_static(b"+inf"),
            Bytes::from_static(b"BYSCORE"),
        ]
    );
}

#[test]
fn zrange_excludes_lower_bound_with_exclusive_boundary() {
    let cmd = zrange(
        Bytes::from_static(b"z"),
        RangeBy::Score {
            min: Boundary::excluded(1.0),
            max: Boundary::PositiveInfinity,
        },
        ZRangeOptions::default(),
    )
    .unwrap();
    assert_eq!(cmd.args[1], Bytes::from_static(b"(1"));
}

#[test]
fn limit_without_byscore_or_bylex_is_rejected() {
    let err = zrange(
        Bytes::from_static(b"z"),
        RangeBy::Index { start: 0, stop: -1 },
        ZRangeOptions {
            limit: Some((0, 10)),
            ..Default::default()
        },
    )
    .unwrap_err();
    assert!(matches!(
        err.kind(),
        crate::error::ErrorKind::ValidationError { .. }
    ));
}

#[test]
fn zrangestore_rejects_withscores() {
    let err = zrangestore(
        Bytes::from_static(b"dest"),
        Bytes::from_static(b"z"),
        RangeBy::Index { start: 0, stop: -1 },
        ZRangeOptions {
            with_scores: true,
            ..Default::default()
        },
    )
    .unwrap_err();
    assert!(matches!(
        err.kind(),
        crate::error::ErrorKind::ValidationError { .. }
    ));
}
