use std::sync::{Arc, Mutex};

use bytes::Bytes;

use super::*;

#[test]
fn subscribe_and_unsubscribe_update_the_table() {
    let state = PubSubState::new(DeliveryMode::Queue);
    state.subscribe_exact([Bytes::from_static(b"c1"), Bytes::from_static(b"c2")]);
    assert_eq!(state.exact_channels().len(), 2);

    state.unsubscribe_exact([Bytes::from_static(b"c1")]);
    let remaining = state.exact_channels();
    assert_eq!(remaining.len(), 1);
    assert!(remaining.contains(&Bytes::from_static(b"c2")));
}

#[test]
fn sharded_and_pattern_subscriptions_are_independent_sets() {
    let state = PubSubState::new(DeliveryMode::Queue);
    state.subscribe_pattern([Bytes::from_static(b"news.*")]);
    state.subscribe_sharded([Bytes::from_static(b"shard1")]);

    assert_eq!(state.patterns().len(), 1);
    assert_eq!(state.sharded_channels().len(), 1);
    assert!(state.exact_channels().is_empty());
}

#[tokio::test]
async fn queue_mode_delivers_in_order_and_drains() {
    let state = PubSubState::new(DeliveryMode::Queue);
    state.deliver(PubSubMessage {
        channel: Bytes::from_static(b"c"),
        payload: Bytes::from_static(b"first"),
        pattern: None,
    });
    state.deliver(PubSubMessage {
        channel: Bytes::from_static(b"c"),
        payload: Bytes::from_static(b"second"),
        pattern: None,
    });

    let first = state.get_pubsub_message().await.unwrap();
    assert_eq!(first.payload, Bytes::from_static(b"first"));

    let second = state.try_get_pubsub_message().unwrap();
    assert_eq!(second.payload, Bytes::from_static(b"second"));

    assert!(state.try_get_pubsub_message().is_none());
}

#[test]
fn callback_mode_invokes_synchronously() {
    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&received);
    let state = PubSubState::new(DeliveryMode::Callback(Arc::new(move |message: PubSubMessage| {
        sink.lock().unwrap().push(message);
    })));

    state.deliver(PubSubMessage {
        channel: Bytes::from_static(b"c"),
        payload: Bytes::from_static(b"hello"),
        pattern: None,
    });

    assert_eq!(received.lock().unwrap().len(), 1);
    assert_eq!(received.lock().unwrap()[0].payload, Bytes::from_static(b"hello"));
}
