use super::*;

#[test]
fn validation_error_never_touches_kind_request() {
    let err = Error::validation("NX is mutually exclusive with GT/LT");
    assert!(matches!(err.kind(), ErrorKind::ValidationError { .. }));
    assert!(!err.is_retriable());
}

#[test]
fn connection_error_is_retriable_others_are_not() {
    assert!(Error::connection("link reset").is_retriable());
    assert!(!Error::timeout().is_retriable());
    assert!(!Error::closing().is_retriable());
    assert!(!Error::exec_abort("watch conflict").is_retriable());
}

#[test]
fn error_is_cheaply_cloneable_for_fanning_out_to_batch_slots() {
    let err = Error::exec_abort("watch conflict");
    let slots: Vec<Error> = std::iter::repeat(err).take(4).collect();
    assert_eq!(slots.len(), 4);
}
