use bytes::Bytes;

use super::*;

#[test]
fn hsetex_lists_fields_then_values() {
    let cmd = hsetex(
        Bytes::from_static(b"h"),
        [
            (Bytes::from_static(b"f1"), Bytes::from_static(b"v1")),
            (Bytes::from_static(b"f2"), Bytes::from_static(b"v2")),
        ],
        HSetExOptions::default(),
    )
    .unwrap();
    assert_eq!(
        cmd.args,
        vec![
            Bytes::from_static(b"h"),
            Bytes::from_static(b"FIELDS"),
            Bytes::from_static(b"2"),
            Bytes::from_static(b"f1"),
            Bytes::from_static(b"f2"),
            Bytes::from_static(b"v1"),
            Bytes::from_static(b"v2"),
        ]
    );
}

#[test]
fn hsetex_rejects_persist() {
    let err = hsetex(
        Bytes::from_static(b"h"),
        [],
        HSetExOptions {
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
fn hgetex_rejects_keepttl() {
    let err = hgetex(
        Bytes::from_static(b"h"),
        [Bytes::from_static(b"f1")],
        HGetExOptions {
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
fn hgetex_allows_persist() {
    let cmd = hgetex(
        Bytes::from_static(b"h"),
        [Bytes::from_static(b"f1")],
        HGetExOptions {
            expiry: Some(Expiry::Persist),
        },
    )
    .unwrap();
    assert!(cmd.args.contains(&Bytes::from_static(b"PERSIST")));
}
