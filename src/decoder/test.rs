use bytes::Bytes;

use super::*;

#[test]
fn bytes_decoder_passes_bulk_strings_through() {
    let raw = RawResponse::Bulk(Bytes::from_static(b"hello"));
    let value = BytesDecoder.decode(raw, ExpectedShape::Raw).unwrap();
    assert_eq!(value, Value::Bytes(Bytes::from_static(b"hello")));
}

#[test]
fn utf8_decoder_rejects_invalid_sequences() {
    let raw = RawResponse::Bulk(Bytes::from_static(&[0xff, 0xfe]));
    assert!(Utf8Decoder.decode(raw, ExpectedShape::Raw).is_err());
}

#[test]
fn set_expectation_wraps_top_level_array() {
    let raw = RawResponse::Array(vec![
        RawResponse::Bulk(Bytes::from_static(b"a")),
        RawResponse::Bulk(Bytes::from_static(b"b")),
    ]);
    let value = BytesDecoder.decode(raw, ExpectedShape::Set).unwrap();
    match value {
        Value::Set(items) => assert_eq!(items.len(), 2),
        other => panic!("expected Set, got {other:?}"),
    }
}

#[test]
fn embedded_error_surfaces_as_request_error() {
    let raw = RawResponse::Error(Bytes::from_static(b"WRONGTYPE bad type"));
    let err = BytesDecoder.decode(raw, ExpectedShape::Raw).unwrap_err();
    assert!(matches!(err.kind(), crate::error::ErrorKind::RequestError { .. }));
}

#[test]
fn array_of_sets_expectation_wraps_each_member() {
    let raw = RawResponse::Array(vec![RawResponse::Array(vec![RawResponse::Integer(1)])]);
    let value = BytesDecoder.decode(raw, ExpectedShape::ArrayOfSets).unwrap();
    match value {
        Value::Array(outer) => match &outer[0] {
            Value::Set(inner) => assert_eq!(inner, &vec![Value::Integer(1)]),
            other => panic!("expected inner Set, got {other:?}"),
        },
        other => panic!("expected outer Array, got {other:?}"),
    }
}
