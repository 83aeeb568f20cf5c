use bytes::Bytes;

use super::*;

#[test]
fn set_emits_ex_as_two_tokens() {
    let cmd = set(
        Bytes::from_static(b"a"),
        Bytes::from_static(b"1"),
        SetOptions {
            expiry: Some(Expiry::relative_seconds(60.0).unwrap()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(
        cmd.args,
        vec![
            Bytes::from_static(b"a"),
            Bytes::from_static(b"1"),
            Bytes::from_static(b"EX"),
            Bytes::from_static(b"60"),
        ]
    );
}

#[test]
fn set_rejects_persist_expiry() {
    let err = set(
        Bytes::from_static(b"a"),
        Bytes::from_static(b"1"),
        SetOptions {
            expiry: Some(Expiry::Persist),
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
fn set_with_ifeq_appends_comparison_value() {
    let cmd = set(
        Bytes::from_static(b"a"),
        Bytes::from_static(b"1"),
        SetOptions {
            condition: Some(ConditionalSet::OnlyIfEqual(Bytes::from_static(b"0"))),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(
        cmd.args,
        vec![
            Bytes::from_static(b"a"),
            Bytes::from_static(b"1"),
            Bytes::from_static(b"IFEQ"),
            Bytes::from_static(b"0"),
        ]
    );
}

#[test]
fn get_ex_rejects_keepttl() {
    let err = get_ex(
        Bytes::from_static(b"a"),
        GetExOptions {
            expiry: Some(Expiry::Keep),
        },
    )
    .unwrap_err();
    assert!(matches!(
        err.kind(),
        crate::error::ErrorKind::ValidationError { .. }
    ));
}

#[test]
fn mset_interleaves_keys_and_values() {
    let cmd = mset([
        (Bytes::from_static(b"a"), Bytes::from_static(b"1")),
        (Bytes::from_static(b"b"), Bytes::from_static(b"2")),
    ]);
    assert_eq!(
        cmd.args,
        vec![
            Bytes::from_static(b"a"),
            Bytes::from_static(b"1"),
            Bytes::from_static(b"b"),
            Bytes::from_static(b"2"),
        ]
    );
}
