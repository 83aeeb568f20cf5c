//! Crate-level scenario tests (SPEC_FULL §B.4): each function here is one of
//! §8's "concrete end-to-end scenarios", driven against a [`MockTransport`]
//! instead of a real Valkey/Redis server.

use bytes::Bytes;
use pretty_assertions::assert_eq;

use valkey_glide_core::{
    batch::Batch,
    client::Commands,
    decoder::Value,
    encoding::{Boundary, Expiry},
    error::ErrorKind,
    testing::{cluster_harness, standalone_harness},
};

fn bytes_value(s: &str) -> Value {
    Value::Bytes(Bytes::copy_from_slice(s.as_bytes()))
}

#[tokio::test]
async fn set_and_get_with_expiry() {
    let (client, _transport) = standalone_harness(512);

    let set_result = client.set("a", "1").expiry(Expiry::RelativeSeconds(60)).await.unwrap();
    assert_eq!(set_result, bytes_value("OK"));

    let get_result = client.get(Bytes::from_static(b"a")).await.unwrap();
    assert_eq!(get_result, bytes_value("1"));

    let ttl_result = client.ttl(Bytes::from_static(b"a")).await.unwrap();
    match ttl_result {
        Value::Integer(seconds) => assert!((1..=60).contains(&seconds), "TTL {seconds} out of range"),
        other => panic!("expected an integer TTL, got {other:?}"),
    }
}

#[tokio::test]
async fn sorted_set_range_by_score() {
    let (client, _transport) = standalone_harness(512);

    client
        .zadd(
            Bytes::from_static(b"z"),
            [(1.0, Bytes::from_static(b"x")), (2.0, Bytes::from_static(b"y")), (3.0, Bytes::from_static(b"z"))],
            Default::default(),
        )
        .await
        .unwrap();

    let by = valkey_glide_core::commands::sorted_sets::RangeBy::Score {
        min: Boundary::NegativeInfinity,
        max: Boundary::PositiveInfinity,
    };
    let full_range = client.zrange(Bytes::from_static(b"z"), by, Default::default()).await.unwrap();
    assert_eq!(
        full_range,
        Value::Array(vec![bytes_value("x"), bytes_value("y"), bytes_value("z")])
    );

    let by = valkey_glide_core::commands::sorted_sets::RangeBy::Score {
        min: Boundary::excluded(1.0),
        max: Boundary::PositiveInfinity,
    };
    let tail = client.zrange(Bytes::from_static(b"z"), by, Default::default()).await.unwrap();
    assert_eq!(tail, Value::Array(vec![bytes_value("y"), bytes_value("z")]));
}

#[tokio::test]
async fn atomic_batch_aborts_on_watch_violation() {
    let (client, transport) = standalone_harness(512);

    client.watch(vec![Bytes::from_static(b"k")]).await.unwrap();

    // Simulate a concurrent writer mutating the watched key between WATCH
    // and EXEC: directly drive the store through a second client sharing
    // the same transport.
    let other = valkey_glide_core::client::StandaloneClient::new(
        std::sync::Arc::clone(&transport) as std::sync::Arc<dyn valkey_glide_core::multiplexer::Transport>,
        std::sync::Arc::new(valkey_glide_core::decoder::BytesDecoder),
        client.config().clone(),
    );
    other.set("k", "0").await.unwrap();

    let mut batch = Batch::atomic();
    batch.add(valkey_glide_core::commands::strings::incr(Bytes::from_static(b"k")));
    let results = client.exec_batch(batch).await.unwrap();

    assert_eq!(results.len(), 1);
    match results[0].as_ref().unwrap_err().kind() {
        ErrorKind::ExecAbortError { .. } => {}
        other => panic!("expected ExecAbortError, got {other:?}"),
    }
}

#[tokio::test]
async fn pipeline_reports_partial_failure_without_aborting_siblings() {
    let (client, _transport) = standalone_harness(512);

    let mut batch = Batch::pipeline();
    batch
        .add(valkey_glide_core::commands::strings::set(Bytes::from_static(b"a"), Bytes::from_static(b"abc"), Default::default()).unwrap())
        .add(valkey_glide_core::commands::strings::incr(Bytes::from_static(b"a")));

    let results = client.exec_batch(batch).await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].as_ref().unwrap(), &bytes_value("OK"));
    match results[1].as_ref().unwrap_err().kind() {
        ErrorKind::RequestError { .. } => {}
        other => panic!("expected RequestError, got {other:?}"),
    }
}

#[tokio::test]
async fn large_argument_vector_uses_leaked_handle() {
    // A small threshold forces MSET's ~10,000-pair analogue (here, enough
    // pairs to exceed a deliberately tiny threshold) onto the handle path.
    let (client, transport) = standalone_harness(64);

    let pairs: Vec<(Bytes, Bytes)> = (0..50)
        .map(|i| (Bytes::from(format!("key{i}")), Bytes::from(format!("value{i}"))))
        .collect();
    let total_len: usize = pairs.iter().map(|(k, v)| k.len() + v.len()).sum();
    assert!(total_len >= 64, "test fixture must exceed the mock threshold");

    let result = client.mset(pairs).await.unwrap();
    assert_eq!(result, bytes_value("OK"));
    assert!(transport.handle_count() >= 1, "expected at least one leaked handle to have been used");
}

#[tokio::test]
async fn pubsub_fanout_delivers_published_message() {
    let (client, _transport) = standalone_harness(512);

    client.subscribe(vec![Bytes::from_static(b"c")]).await.unwrap();

    // A second connection (sharing the same mock transport/server) publishes.
    client.publish(Bytes::from_static(b"c"), Bytes::from_static(b"hello")).await.unwrap();

    let message = client.get_pubsub_message().await.expect("a message should have been queued");
    assert_eq!(message.channel, Bytes::from_static(b"c"));
    assert_eq!(message.payload, Bytes::from_static(b"hello"));
    assert_eq!(message.pattern, None);
}

#[tokio::test]
async fn cluster_client_surfaces_the_same_command_catalogue() {
    let (client, _transport) = cluster_harness(512);

    let set_result = client.mset(vec![(Bytes::from_static(b"a"), Bytes::from_static(b"1"))]).await.unwrap();
    assert_eq!(set_result, bytes_value("OK"));
    let get_result = client.get(Bytes::from_static(b"a")).await.unwrap();
    assert_eq!(get_result, bytes_value("1"));
}

#[tokio::test]
async fn empty_batch_returns_empty_response() {
    let (client, _transport) = standalone_harness(512);
    let batch = Batch::pipeline();
    let results = client.exec_batch(batch).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn hash_and_stream_round_trips() {
    let (client, _transport) = standalone_harness(512);

    client
        .hset(Bytes::from_static(b"h"), vec![(Bytes::from_static(b"f"), Bytes::from_static(b"v"))])
        .await
        .unwrap();
    let field = client.hget(Bytes::from_static(b"h"), Bytes::from_static(b"f")).await.unwrap();
    assert_eq!(field, bytes_value("v"));

    let id = client
        .xadd(
            Bytes::from_static(b"stream"),
            valkey_glide_core::commands::streams::StreamId::Auto,
            vec![(Bytes::from_static(b"f"), Bytes::from_static(b"v"))],
            Default::default(),
        )
        .await
        .unwrap();
    assert!(matches!(id, Value::Bytes(_)));

    let range = client
        .xrange(Bytes::from_static(b"stream"), Bytes::from_static(b"-"), Bytes::from_static(b"+"), None)
        .await
        .unwrap();
    match range {
        Value::Array(entries) => assert_eq!(entries.len(), 1),
        other => panic!("expected an array of one entry, got {other:?}"),
    }
}
