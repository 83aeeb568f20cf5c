use bytes::Bytes;

use super::*;

#[test]
fn full_args_prepends_multi_word_command_tokens() {
    let cmd = Command::new(
        RequestType::ConfigGet,
        vec![Bytes::from_static(b"maxmemory")],
    );
    let args = cmd.full_args();
    assert_eq!(args, vec![Bytes::from("CONFIG"), Bytes::from("GET"), Bytes::from("maxmemory")]);
}

#[test]
fn wire_len_includes_command_tokens() {
    let cmd = Command::new(RequestType::Get, vec![Bytes::from_static(b"a")]);
    assert_eq!(cmd.wire_len(), "GET".len() + 1);
}

#[test]
fn encoding_is_pure_and_idempotent() {
    let build = || Command::new(RequestType::Set, vec![Bytes::from_static(b"k"), Bytes::from_static(b"v")]);
    assert_eq!(build().full_args(), build().full_args());
}
