//! Test-only scaffolding: an in-memory [`Transport`] double standing in for
//! the native IPC channel, so crate-level scenario tests (SPEC_FULL §B.4)
//! can drive a full [`crate::client`] facade without a socket or a real
//! Valkey server. Gated behind the `test-util` feature the way `tokio`
//! gates its own `test-util` feature for the same reason: exported for
//! integration tests under `tests/`, not part of the crate's normal public
//! surface.

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
};

use bytes::Bytes;
use futures_util::FutureExt;
use tokio::sync::{mpsc, Mutex as AsyncMutex};

use crate::{
    client::{ClusterClient, StandaloneClient},
    decoder::{BytesDecoder, Decoder, RawResponse},
    error::{Error, ErrorKind, Result},
    multiplexer::{
        channel::{FrameResult, IncomingEnvelope, IncomingFrame, OutgoingFrame, OutgoingPayload},
        transport, Transport,
    },
    options::{ConnectionConfig, NodeAddress},
    protocol::{ArgVec, CommandRecord, Payload, RequestType},
    pubsub::PubSubMessage,
};

/// A sorted-set member kept as `(score, member)`, resorted after every
/// mutation to match the server's own member ordering (score, then member
/// lexicographically on ties).
type SortedSet = Vec<(f64, Bytes)>;

#[derive(Default)]
struct Store {
    strings: HashMap<Bytes, (Bytes, Option<u64>)>,
    hashes: HashMap<Bytes, HashMap<Bytes, Bytes>>,
    streams: HashMap<Bytes, Vec<(Bytes, Vec<(Bytes, Bytes)>)>>,
    sorted_sets: HashMap<Bytes, SortedSet>,
    versions: HashMap<Bytes, u64>,
    watched: HashMap<Bytes, u64>,
    subscribed_channels: HashSet<Bytes>,
    subscribed_patterns: HashSet<Bytes>,
    handles: HashMap<u64, ArgVec>,
    next_handle: u64,
    /// A logical clock in whole seconds, advanced explicitly by
    /// [`MockTransport::advance_clock`] rather than tied to wall time, so
    /// expiry assertions never race real elapsed time.
    clock: u64,
    next_stream_seq: u64,
}

impl Store {
    fn bump_version(&mut self, key: &Bytes) {
        *self.versions.entry(key.clone()).or_insert(0) += 1;
    }

    fn is_expired(&self, expires_at: Option<u64>) -> bool {
        matches!(expires_at, Some(tick) if self.clock >= tick)
    }
}

/// Drives a [`StandaloneClient`] or [`ClusterClient`] against an in-process
/// key/value store instead of a real socket. No RESP parsing and no slot
/// routing happens here — just enough command interpretation to exercise
/// the dispatch/multiplexing core end to end.
pub struct MockTransport {
    store: Mutex<Store>,
    incoming_tx: mpsc::UnboundedSender<IncomingEnvelope>,
    incoming_rx: AsyncMutex<mpsc::UnboundedReceiver<IncomingEnvelope>>,
    max_request_args_len: usize,
}

impl MockTransport {
    pub fn new(max_request_args_len: usize) -> Arc<Self> {
        let (incoming_tx, incoming_rx) = mpsc::unbounded_channel();
        Arc::new(MockTransport {
            store: Mutex::new(Store::default()),
            incoming_tx,
            incoming_rx: AsyncMutex::new(incoming_rx),
            max_request_args_len,
        })
    }

    /// Number of leaked-vector handles ever created, i.e. how many times a
    /// command crossed [`MockTransport`]'s `max_request_args_len` threshold
    /// and took the handle path instead of inline (§3, §8's large-argument
    /// scenario).
    pub fn handle_count(&self) -> usize {
        self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).handles.len()
    }

    /// Advances the store's logical clock, the only way a TTL set with `EX`
    /// ever lapses in these tests.
    pub fn advance_clock(&self, seconds: u64) {
        self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).clock += seconds;
    }

    fn resolve_args(&self, record: &CommandRecord) -> ArgVec {
        match &record.payload {
            Payload::Inline(args) => args.clone(),
            Payload::Handle { low, high } => {
                let handle = ((*high as u64) << 32) | (*low as u64);
                let full = self
                    .store
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .handles
                    .get(&handle)
                    .cloned()
                    .unwrap_or_default();
                let skip = record.request_type.command_tokens().len();
                full.into_iter().skip(skip).collect()
            }
        }
    }

    /// Executes one already-resolved command, returning its raw reply plus
    /// any pub/sub pushes the execution fans out (e.g. a `PUBLISH` this same
    /// mock connection happens to be subscribed to).
    fn execute(&self, request_type: RequestType, args: ArgVec) -> (FrameResult, Vec<PubSubMessage>) {
        let mut store = self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        match request_type {
            RequestType::Set => {
                let key = args[0].clone();
                let value = args[1].clone();
                let mut expires_at = None;
                let mut i = 2;
                while i < args.len() {
                    if args[i].eq_ignore_ascii_case(b"EX") {
                        let secs: u64 = parse_utf8_int(&args[i + 1]);
                        expires_at = Some(store.clock + secs);
                        i += 2;
                    } else {
                        i += 1;
                    }
                }
                store.strings.insert(key.clone(), (value, expires_at));
                store.bump_version(&key);
                (FrameResult::Ok(RawResponse::Simple(Bytes::from_static(b"OK"))), Vec::new())
            }
            RequestType::Get => {
                let key = &args[0];
                match store.strings.get(key).cloned() {
                    Some((value, expires_at)) if !store.is_expired(expires_at) => {
                        (FrameResult::Ok(RawResponse::Bulk(value)), Vec::new())
                    }
                    _ => (FrameResult::Ok(RawResponse::Nil), Vec::new()),
                }
            }
            RequestType::MSet => {
                let mut i = 0;
                while i + 1 < args.len() {
                    let key = args[i].clone();
                    store.strings.insert(key.clone(), (args[i + 1].clone(), None));
                    store.bump_version(&key);
                    i += 2;
                }
                (FrameResult::Ok(RawResponse::Simple(Bytes::from_static(b"OK"))), Vec::new())
            }
            RequestType::Incr => {
                let key = args[0].clone();
                let current = store
                    .strings
                    .get(&key)
                    .map(|(value, _)| value.clone())
                    .unwrap_or_else(|| Bytes::from_static(b"0"));
                match std::str::from_utf8(&current).ok().and_then(|s| s.parse::<i64>().ok()) {
                    Some(n) => {
                        let next = n + 1;
                        store.strings.insert(key.clone(), (Bytes::from(next.to_string()), None));
                        store.bump_version(&key);
                        (FrameResult::Ok(RawResponse::Integer(next)), Vec::new())
                    }
                    None => {
                        let message = "WRONGTYPE value is not an integer or out of range".to_string();
                        (FrameResult::Error { kind: ErrorKind::RequestError { message: message.clone() }, message }, Vec::new())
                    }
                }
            }
            RequestType::ZAdd => {
                let key = args[0].clone();
                let set = store.sorted_sets.entry(key.clone()).or_default();
                let mut added = 0i64;
                let mut i = 1;
                while i + 1 < args.len() {
                    let score: f64 = parse_utf8_float(&args[i]);
                    let member = args[i + 1].clone();
                    if let Some(existing) = set.iter_mut().find(|(_, m)| *m == member) {
                        existing.0 = score;
                    } else {
                        set.push((score, member));
                        added += 1;
                    }
                    i += 2;
                }
                set.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap().then_with(|| a.1.cmp(&b.1)));
                store.bump_version(&key);
                (FrameResult::Ok(RawResponse::Integer(added)), Vec::new())
            }
            RequestType::ZRange => {
                let key = &args[0];
                let empty = Vec::new();
                let set = store.sorted_sets.get(key).unwrap_or(&empty);
                let min = parse_score_token(&args[1]);
                let max = parse_score_token(&args[2]);
                let with_scores = args.iter().any(|a| a.eq_ignore_ascii_case(b"WITHSCORES"));
                let items: Vec<RawResponse> = set
                    .iter()
                    .filter(|(score, _)| *score >= min && *score <= max)
                    .flat_map(|(score, member)| {
                        let mut out = vec![RawResponse::Bulk(member.clone())];
                        if with_scores {
                            out.push(RawResponse::Bulk(Bytes::from(score.to_string())));
                        }
                        out
                    })
                    .collect();
                (FrameResult::Ok(RawResponse::Array(items)), Vec::new())
            }
            RequestType::Watch => {
                for key in &args {
                    let version = *store.versions.get(key).unwrap_or(&0);
                    store.watched.insert(key.clone(), version);
                }
                (FrameResult::Ok(RawResponse::Simple(Bytes::from_static(b"OK"))), Vec::new())
            }
            RequestType::Unwatch => {
                store.watched.clear();
                (FrameResult::Ok(RawResponse::Simple(Bytes::from_static(b"OK"))), Vec::new())
            }
            RequestType::Subscribe | RequestType::PSubscribe => {
                if request_type == RequestType::Subscribe {
                    store.subscribed_channels.extend(args.iter().cloned());
                } else {
                    store.subscribed_patterns.extend(args.iter().cloned());
                }
                (FrameResult::Ok(RawResponse::Simple(Bytes::from_static(b"OK"))), Vec::new())
            }
            RequestType::Unsubscribe | RequestType::PUnsubscribe => {
                if request_type == RequestType::Unsubscribe {
                    for channel in &args {
                        store.subscribed_channels.remove(channel);
                    }
                } else {
                    for pattern in &args {
                        store.subscribed_patterns.remove(pattern);
                    }
                }
                (FrameResult::Ok(RawResponse::Simple(Bytes::from_static(b"OK"))), Vec::new())
            }
            RequestType::Publish => {
                let channel = args[0].clone();
                let payload = args[1].clone();
                let mut pushes = Vec::new();
                if store.subscribed_channels.contains(&channel) {
                    pushes.push(PubSubMessage {
                        channel: channel.clone(),
                        payload: payload.clone(),
                        pattern: None,
                    });
                }
                for pattern in store.subscribed_patterns.clone() {
                    if glob_matches(&pattern, &channel) {
                        pushes.push(PubSubMessage {
                            channel: channel.clone(),
                            payload: payload.clone(),
                            pattern: Some(pattern),
                        });
                    }
                }
                let receivers = pushes.len() as i64;
                (FrameResult::Ok(RawResponse::Integer(receivers)), pushes)
            }
            RequestType::Ttl => {
                let key = &args[0];
                match store.strings.get(key) {
                    Some((_, Some(expires_at))) if *expires_at > store.clock => {
                        (FrameResult::Ok(RawResponse::Integer((*expires_at - store.clock) as i64)), Vec::new())
                    }
                    Some((_, None)) => (FrameResult::Ok(RawResponse::Integer(-1)), Vec::new()),
                    _ => (FrameResult::Ok(RawResponse::Integer(-2)), Vec::new()),
                }
            }
            RequestType::HSet => {
                let key = args[0].clone();
                let map = store.hashes.entry(key.clone()).or_default();
                let mut added = 0i64;
                let mut i = 1;
                while i + 1 < args.len() {
                    if map.insert(args[i].clone(), args[i + 1].clone()).is_none() {
                        added += 1;
                    }
                    i += 2;
                }
                store.bump_version(&key);
                (FrameResult::Ok(RawResponse::Integer(added)), Vec::new())
            }
            RequestType::HGet => {
                let key = &args[0];
                let field = &args[1];
                match store.hashes.get(key).and_then(|map| map.get(field)).cloned() {
                    Some(value) => (FrameResult::Ok(RawResponse::Bulk(value)), Vec::new()),
                    None => (FrameResult::Ok(RawResponse::Nil), Vec::new()),
                }
            }
            RequestType::XAdd => {
                let key = args[0].clone();
                let id_token = &args[1];
                let id = if id_token.as_ref() == b"*" {
                    store.next_stream_seq += 1;
                    Bytes::from(format!("{}-0", store.next_stream_seq))
                } else {
                    id_token.clone()
                };
                let mut fields = Vec::new();
                let mut i = 2;
                while i + 1 < args.len() {
                    fields.push((args[i].clone(), args[i + 1].clone()));
                    i += 2;
                }
                store.streams.entry(key.clone()).or_default().push((id.clone(), fields));
                store.bump_version(&key);
                (FrameResult::Ok(RawResponse::Bulk(id)), Vec::new())
            }
            RequestType::XRange => {
                let key = &args[0];
                let empty = Vec::new();
                let entries = store.streams.get(key).unwrap_or(&empty);
                let items: Vec<RawResponse> = entries
                    .iter()
                    .map(|(id, fields)| {
                        let flat: Vec<RawResponse> = fields
                            .iter()
                            .flat_map(|(f, v)| vec![RawResponse::Bulk(f.clone()), RawResponse::Bulk(v.clone())])
                            .collect();
                        RawResponse::Array(vec![RawResponse::Bulk(id.clone()), RawResponse::Array(flat)])
                    })
                    .collect();
                (FrameResult::Ok(RawResponse::Array(items)), Vec::new())
            }
            RequestType::Ping => (FrameResult::Ok(RawResponse::Simple(Bytes::from_static(b"PONG"))), Vec::new()),
            RequestType::Select => (FrameResult::Ok(RawResponse::Simple(Bytes::from_static(b"OK"))), Vec::new()),
            other => {
                let message = format!("mock transport has no handler for {other:?}");
                (FrameResult::Error { kind: ErrorKind::RequestError { message: message.clone() }, message }, Vec::new())
            }
        }
    }

    /// `true` if any key watched since the last `WATCH` has mutated, which
    /// aborts the whole atomic batch (§7's ExecAbortError policy).
    fn watch_violated(&self) -> bool {
        let store = self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        store
            .watched
            .iter()
            .any(|(key, version)| store.versions.get(key).copied().unwrap_or(0) != *version)
    }

    fn clear_watches(&self) {
        self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).watched.clear();
    }

    fn process(&self, frame: OutgoingFrame) -> Vec<IncomingEnvelope> {
        match frame.payload {
            OutgoingPayload::Command(record) => {
                let request_type = record.request_type;
                let args = self.resolve_args(&record);
                let (result, pushes) = self.execute(request_type, args);
                let mut out = vec![IncomingEnvelope::Response(IncomingFrame {
                    callback_index: frame.callback_index,
                    result,
                })];
                out.extend(pushes.into_iter().map(IncomingEnvelope::PushMessage));
                out
            }
            OutgoingPayload::Batch(records) => {
                let is_atomic = records.first().map(|r| r.request_type == RequestType::Multi).unwrap_or(false);

                if is_atomic && self.watch_violated() {
                    self.clear_watches();
                    let message = "transaction aborted: a watched key was modified".to_string();
                    return vec![IncomingEnvelope::Response(IncomingFrame {
                        callback_index: frame.callback_index,
                        result: FrameResult::Error {
                            kind: ErrorKind::ExecAbortError { message: message.clone() },
                            message,
                        },
                    })];
                }

                let body = if is_atomic {
                    &records[1..records.len() - 1]
                } else {
                    &records[..]
                };

                let mut replies = Vec::with_capacity(body.len());
                let mut pushes = Vec::new();
                for record in body {
                    let args = self.resolve_args(record);
                    let (result, mut member_pushes) = self.execute(record.request_type, args);
                    pushes.append(&mut member_pushes);
                    replies.push(match result {
                        FrameResult::Ok(raw) => raw,
                        FrameResult::Error { message, .. } => RawResponse::Error(Bytes::from(message)),
                        FrameResult::ClosingError { message } => RawResponse::Error(Bytes::from(message)),
                    });
                }

                if is_atomic {
                    self.clear_watches();
                    let mut wrapped = Vec::with_capacity(replies.len() + 2);
                    wrapped.push(RawResponse::Simple(Bytes::from_static(b"OK"))); // MULTI
                    wrapped.extend(replies);
                    wrapped.push(RawResponse::Array(Vec::new())); // EXEC
                    let mut out = vec![IncomingEnvelope::Response(IncomingFrame {
                        callback_index: frame.callback_index,
                        result: FrameResult::Ok(RawResponse::Array(wrapped)),
                    })];
                    out.extend(pushes.into_iter().map(IncomingEnvelope::PushMessage));
                    out
                } else {
                    let mut out = vec![IncomingEnvelope::Response(IncomingFrame {
                        callback_index: frame.callback_index,
                        result: FrameResult::Ok(RawResponse::Array(replies)),
                    })];
                    out.extend(pushes.into_iter().map(IncomingEnvelope::PushMessage));
                    out
                }
            }
        }
    }
}

impl Transport for MockTransport {
    fn submit(&self, frame: OutgoingFrame) -> transport::SubmitFuture {
        let envelopes = self.process(frame);
        let tx = self.incoming_tx.clone();
        async move {
            for envelope in envelopes {
                tx.send(envelope).map_err(|_| Error::internal("mock transport closed"))?;
            }
            Ok(())
        }
        .boxed()
    }

    fn recv(&self) -> transport::RecvFuture<'_> {
        async move { self.incoming_rx.lock().await.recv().await }.boxed()
    }

    fn leak_vec(&self, args: ArgVec) -> (u32, u32) {
        let mut store = self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let handle = store.next_handle;
        store.next_handle += 1;
        store.handles.insert(handle, args);
        ((handle & 0xFFFF_FFFF) as u32, (handle >> 32) as u32)
    }

    fn max_request_args_len(&self) -> usize {
        self.max_request_args_len
    }
}

fn parse_utf8_int(bytes: &Bytes) -> u64 {
    std::str::from_utf8(bytes).unwrap().parse().unwrap()
}

fn parse_utf8_float(bytes: &Bytes) -> f64 {
    std::str::from_utf8(bytes).unwrap().parse().unwrap()
}

fn parse_score_token(bytes: &Bytes) -> f64 {
    match bytes.as_ref() {
        b"-inf" => f64::NEG_INFINITY,
        b"+inf" => f64::INFINITY,
        raw => {
            let text = std::str::from_utf8(raw).unwrap();
            text.trim_start_matches('(').parse().unwrap()
        }
    }
}

/// Minimal `*`-only glob matcher, sufficient for pattern subscriptions in
/// these scenarios. Real pattern matching belongs to the transport, outside
/// this crate's scope (spec §1).
fn glob_matches(pattern: &Bytes, candidate: &Bytes) -> bool {
    let pattern = std::str::from_utf8(pattern).unwrap_or_default();
    let candidate = std::str::from_utf8(candidate).unwrap_or_default();
    match pattern.split_once('*') {
        None => pattern == candidate,
        Some((prefix, suffix)) => candidate.starts_with(prefix) && candidate.ends_with(suffix),
    }
}

/// Builds a [`StandaloneClient`] over a fresh [`MockTransport`], returning
/// both so a test can drive the store directly (e.g. to advance the clock).
pub fn standalone_harness(max_request_args_len: usize) -> (StandaloneClient, Arc<MockTransport>) {
    let transport = MockTransport::new(max_request_args_len);
    let config = ConnectionConfig::builder()
        .addresses(vec![NodeAddress::new("127.0.0.1", 6379)])
        .build()
        .resolve()
        .expect("default config resolves");
    let client = StandaloneClient::new(
        Arc::clone(&transport) as Arc<dyn Transport>,
        Arc::new(BytesDecoder) as Arc<dyn Decoder>,
        config,
    );
    (client, transport)
}

/// Builds a [`ClusterClient`] over a fresh [`MockTransport`], cluster mode
/// enabled. The mock ignores the routing hint every cluster call attaches —
/// there is only ever one simulated node.
pub fn cluster_harness(max_request_args_len: usize) -> (ClusterClient, Arc<MockTransport>) {
    let transport = MockTransport::new(max_request_args_len);
    let config = ConnectionConfig::builder()
        .addresses(vec![NodeAddress::new("127.0.0.1", 7000)])
        .cluster_mode(true)
        .build()
        .resolve()
        .expect("default config resolves");
    let client = ClusterClient::new(
        Arc::clone(&transport) as Arc<dyn Transport>,
        Arc::new(BytesDecoder) as Arc<dyn Decoder>,
        config,
    );
    (client, transport)
}

#[allow(unused)]
type TestingResult<T> = Result<T>;
