use super::*;
use crate::decoder::Value;

#[test]
fn allocate_then_complete_resolves_waiter_and_frees_index() {
    let mut table = CallbackTable::new();
    let (index, receiver) = table.allocate(ExpectedDecoding::Raw);

    table.complete(index, Ok(Value::Integer(42))).unwrap();

    let resolved = receiver.try_recv().unwrap().unwrap();
    assert_eq!(resolved, Value::Integer(42));

    let (reused_index, _) = table.allocate(ExpectedDecoding::Raw);
    assert_eq!(reused_index, index);
}

#[test]
fn complete_on_unknown_index_is_an_internal_error() {
    let mut table = CallbackTable::new();
    assert!(table.complete(7, Ok(Value::Nil)).is_err());
}

#[test]
fn abandoned_slot_discards_late_response_without_error() {
    let mut table = CallbackTable::new();
    let (index, _receiver) = table.allocate(ExpectedDecoding::Raw);
    table.abandon(index);

    assert!(table.complete(index, Ok(Value::Nil)).is_ok());

    let (reused_index, _) = table.allocate(ExpectedDecoding::Raw);
    assert_eq!(reused_index, index);
}

#[test]
fn close_all_resolves_every_live_waiter_with_the_given_error() {
    let mut table = CallbackTable::new();
    let (_index1, receiver1) = table.allocate(ExpectedDecoding::Raw);
    let (_index2, receiver2) = table.allocate(ExpectedDecoding::Set);

    table.close_all(crate::error::Error::closing());

    assert!(receiver1.try_recv().unwrap().is_err());
    assert!(receiver2.try_recv().unwrap().is_err());
}
