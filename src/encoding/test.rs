use bytes::Bytes;

use super::*;

#[test]
fn arg_builder_preserves_push_order() {
    let args = ArgBuilder::new()
        .push("key")
        .push_int(60)
        .push_if(false, "NX")
        .push_if(true, "XX")
        .build();
    assert_eq!(
        args,
        vec![
            Bytes::from_static(b"key"),
            Bytes::from_static(b"60"),
            Bytes::from_static(b"XX"),
        ]
    );
}

#[test]
fn float_arg_renders_infinities_as_sentinels() {
    assert_eq!(float_arg(f64::INFINITY), Bytes::from_static(b"+inf"));
    assert_eq!(float_arg(f64::NEG_INFINITY), Bytes::from_static(b"-inf"));
    assert_eq!(float_arg(1.5), Bytes::from_static(b"1.5"));
}
