use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures_util::FutureExt;
use tokio::sync::{mpsc, Mutex as AsyncMutex};

use super::*;
use crate::decoder::{BytesDecoder, Value};
use crate::pubsub::{DeliveryMode, PubSubState};

struct MockTransport {
    outgoing_tx: mpsc::UnboundedSender<OutgoingFrame>,
    incoming_rx: AsyncMutex<mpsc::UnboundedReceiver<IncomingEnvelope>>,
    max_len: usize,
}

impl Transport for MockTransport {
    fn submit(&self, frame: OutgoingFrame) -> transport::SubmitFuture {
        let tx = self.outgoing_tx.clone();
        async move {
            tx.send(frame)
                .map_err(|_| Error::internal("mock transport closed"))
        }
        .boxed()
    }

    fn recv(&self) -> transport::RecvFuture<'_> {
        async move { self.incoming_rx.lock().await.recv().await }.boxed()
    }

    fn leak_vec(&self, _args: crate::protocol::ArgVec) -> (u32, u32) {
        (0, 0)
    }

    fn max_request_args_len(&self) -> usize {
        self.max_len
    }
}

fn build(
    max_len: usize,
    default_timeout: Duration,
) -> (Arc<Multiplexer>, mpsc::UnboundedReceiver<OutgoingFrame>, mpsc::UnboundedSender<IncomingEnvelope>) {
    build_with_pubsub(max_len, default_timeout, Arc::new(PubSubState::new(DeliveryMode::Queue)))
}

fn build_with_pubsub(
    max_len: usize,
    default_timeout: Duration,
    pubsub: Arc<PubSubState>,
) -> (Arc<Multiplexer>, mpsc::UnboundedReceiver<OutgoingFrame>, mpsc::UnboundedSender<IncomingEnvelope>) {
    let (outgoing_tx, outgoing_rx) = mpsc::unbounded_channel();
    let (incoming_tx, incoming_rx) = mpsc::unbounded_channel();
    let transport = Arc::new(MockTransport {
        outgoing_tx,
        incoming_rx: AsyncMutex::new(incoming_rx),
        max_len,
    });
    let mux = Multiplexer::new(transport, Arc::new(BytesDecoder), default_timeout, pubsub);
    (mux, outgoing_rx, incoming_tx)
}

#[tokio::test]
async fn submit_round_trips_a_single_command() {
    let (mux, mut outgoing_rx, incoming_tx) = build(1024, Duration::from_secs(5));

    let handle = tokio::spawn({
        let mux = Arc::clone(&mux);
        async move {
            mux.submit(
                crate::protocol::Command::new(crate::protocol::RequestType::Ping, Vec::new()),
                ExpectedShape::Raw,
                None,
            )
            .await
        }
    });

    let frame = outgoing_rx.recv().await.unwrap();
    incoming_tx
        .send(IncomingEnvelope::Response(IncomingFrame {
            callback_index: frame.callback_index,
            result: FrameResult::Ok(RawResponse::Simple(Bytes::from_static(b"PONG"))),
        }))
        .unwrap();

    let value = handle.await.unwrap().unwrap();
    assert_eq!(value, Value::Bytes(Bytes::from_static(b"PONG")));
}

#[tokio::test]
async fn submit_times_out_and_discards_the_late_response() {
    let (mux, mut outgoing_rx, incoming_tx) = build(1024, Duration::from_millis(20));

    let handle = tokio::spawn({
        let mux = Arc::clone(&mux);
        async move {
            mux.submit(
                crate::protocol::Command::new(crate::protocol::RequestType::Ping, Vec::new()),
                ExpectedShape::Raw,
                None,
            )
            .await
        }
    });

    let frame = outgoing_rx.recv().await.unwrap();
    let result = handle.await.unwrap();
    assert!(matches!(result.unwrap_err().kind(), ErrorKind::TimeoutError));

    // The response arrives after abandonment; delivering it must not panic.
    incoming_tx
        .send(IncomingEnvelope::Response(IncomingFrame {
            callback_index: frame.callback_index,
            result: FrameResult::Ok(RawResponse::Simple(Bytes::from_static(b"PONG"))),
        }))
        .unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;
}

#[tokio::test]
async fn oversize_command_is_submitted_as_a_handle() {
    let (mux, mut outgoing_rx, incoming_tx) = build(4, Duration::from_secs(5));

    let handle = tokio::spawn({
        let mux = Arc::clone(&mux);
        async move {
            mux.submit(
                crate::protocol::Command::new(
                    crate::protocol::RequestType::Set,
                    vec![Bytes::from_static(b"key"), Bytes::from_static(b"value")],
                ),
                ExpectedShape::Raw,
                None,
            )
            .await
        }
    });

    let frame = outgoing_rx.recv().await.unwrap();
    match frame.payload {
        OutgoingPayload::Command(record) => assert!(matches!(record.payload, crate::protocol::Payload::Handle { .. })),
        _ => panic!("expected a single-command payload"),
    }

    incoming_tx
        .send(IncomingEnvelope::Response(IncomingFrame {
            callback_index: frame.callback_index,
            result: FrameResult::Ok(RawResponse::Simple(Bytes::from_static(b"OK"))),
        }))
        .unwrap();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn atomic_batch_strips_multi_exec_wrapper_replies() {
    let (mux, mut outgoing_rx, incoming_tx) = build(1024, Duration::from_secs(5));

    let mut batch = crate::batch::Batch::atomic();
    batch.add(
        crate::commands::strings::set(
            Bytes::from_static(b"k1"),
            Bytes::from_static(b"v1"),
            crate::commands::strings::SetOptions::default(),
        )
        .unwrap(),
    );
    batch.add(crate::commands::strings::get(Bytes::from_static(b"k1")));

    let handle = tokio::spawn({
        let mux = Arc::clone(&mux);
        async move { mux.submit_batch(batch, None).await }
    });

    let frame = outgoing_rx.recv().await.unwrap();
    let records = match frame.payload {
        OutgoingPayload::Batch(records) => records,
        _ => panic!("expected a batch payload"),
    };
    assert_eq!(records.len(), 4);

    incoming_tx
        .send(IncomingEnvelope::Response(IncomingFrame {
            callback_index: frame.callback_index,
            result: FrameResult::Ok(RawResponse::Array(vec![
                RawResponse::Simple(Bytes::from_static(b"OK")), // MULTI
                RawResponse::Simple(Bytes::from_static(b"OK")), // SET result
                RawResponse::Bulk(Bytes::from_static(b"v1")),   // GET result
                RawResponse::Array(vec![]),                     // EXEC
            ])),
        }))
        .unwrap();

    let results = handle.await.unwrap().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].as_ref().unwrap(), &Value::Bytes(Bytes::from_static(b"OK")));
    assert_eq!(results[1].as_ref().unwrap(), &Value::Bytes(Bytes::from_static(b"v1")));
}

#[tokio::test]
async fn pipeline_reports_a_member_error_at_its_position_only() {
    let (mux, mut outgoing_rx, incoming_tx) = build(1024, Duration::from_secs(5));

    let mut batch = crate::batch::Batch::pipeline();
    batch.add(
        crate::commands::strings::set(
            Bytes::from_static(b"k1"),
            Bytes::from_static(b"v1"),
            crate::commands::strings::SetOptions::default(),
        )
        .unwrap(),
    );
    batch.add(crate::commands::strings::incr(Bytes::from_static(b"k1")));

    let handle = tokio::spawn({
        let mux = Arc::clone(&mux);
        async move { mux.submit_batch(batch, None).await }
    });

    let frame = outgoing_rx.recv().await.unwrap();
    incoming_tx
        .send(IncomingEnvelope::Response(IncomingFrame {
            callback_index: frame.callback_index,
            result: FrameResult::Ok(RawResponse::Array(vec![
                RawResponse::Simple(Bytes::from_static(b"OK")),
                RawResponse::Error(Bytes::from_static(b"WRONGTYPE not an integer")),
            ])),
        }))
        .unwrap();

    let results = handle.await.unwrap().unwrap();
    assert!(results[0].is_ok());
    assert!(matches!(results[1].as_ref().unwrap_err().kind(), ErrorKind::RequestError { .. }));
}

#[tokio::test]
async fn empty_batch_never_touches_the_transport() {
    let (mux, _outgoing_rx, _incoming_tx) = build(1024, Duration::from_secs(5));
    let results = mux.submit_batch(crate::batch::Batch::pipeline(), None).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn push_message_is_routed_to_pubsub_state_not_a_callback_slot() {
    let pubsub = Arc::new(PubSubState::new(DeliveryMode::Queue));
    let (_mux, _outgoing_rx, incoming_tx) =
        build_with_pubsub(1024, Duration::from_secs(5), Arc::clone(&pubsub));

    let message = crate::pubsub::PubSubMessage {
        channel: Bytes::from_static(b"news"),
        payload: Bytes::from_static(b"hello"),
        pattern: None,
    };
    incoming_tx
        .send(IncomingEnvelope::PushMessage(message.clone()))
        .unwrap();

    // Give the reader task a chance to drain the channel before polling.
    tokio::time::sleep(Duration::from_millis(20)).await;

    let delivered = pubsub.try_get_pubsub_message().expect("message should be queued");
    assert_eq!(delivered, message);
}
