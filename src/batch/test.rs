use bytes::Bytes;

use super::*;
use crate::commands::{sets, strings};

#[test]
fn pipeline_preserves_order_and_set_decoding_positions() {
    let mut batch = Batch::pipeline();
    batch
        .add(strings::set(Bytes::from_static(b"a"), Bytes::from_static(b"1"), Default::default()).unwrap())
        .add(sets::smembers(Bytes::from_static(b"s")))
        .add(strings::get(Bytes::from_static(b"a")));

    assert_eq!(batch.len(), 3);
    assert_eq!(batch.set_decoded_positions(), &[1]);

    let (commands, positions) = batch.finish();
    assert_eq!(commands.len(), 3);
    assert_eq!(positions, vec![1]);
}

#[test]
fn atomic_batch_wraps_in_multi_exec_and_shifts_positions() {
    let mut batch = Batch::atomic();
    batch.add(sets::smembers(Bytes::from_static(b"s")));

    let (commands, positions) = batch.finish();
    assert_eq!(commands.len(), 3);
    assert_eq!(commands[0].request_type, RequestType::Multi);
    assert_eq!(commands[2].request_type, RequestType::Exec);
    assert_eq!(positions, vec![1]);
}

#[test]
fn empty_batch_finishes_with_empty_commands() {
    let batch = Batch::pipeline();
    assert!(batch.is_empty());
    let (commands, positions) = batch.finish();
    assert!(commands.is_empty());
    assert!(positions.is_empty());
}

#[test]
fn retry_strategy_defaults_to_no_retry() {
    let batch = Batch::pipeline();
    assert_eq!(batch.retry_strategy(), RetryStrategy::default());
    assert!(!batch.retry_strategy().retry_server_error);
    assert!(!batch.retry_strategy().retry_connection_error);
}
