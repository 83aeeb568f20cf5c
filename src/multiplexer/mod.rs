//! Request Multiplexer (C6): owns the IPC channel to the native transport,
//! assigns every outgoing command or batch a callback index, parks a
//! completion waiter under that index, and demultiplexes incoming response
//! frames back to the right waiter (§4.5).

pub mod callback;
pub mod channel;
pub mod transport;

use std::{
    collections::HashSet,
    sync::{Arc, Mutex as StdMutex},
    time::Duration,
};

use bytes::Bytes;
use tokio::sync::{oneshot, Mutex as AsyncMutex};

pub use self::{
    callback::CallbackTable,
    channel::{FrameResult, IncomingEnvelope, IncomingFrame, OutgoingFrame, OutgoingPayload},
    transport::Transport,
};

use crate::{
    batch::Batch,
    decoder::{Decoder, ExpectedShape, RawResponse, Value},
    error::{Error, ErrorKind, Result},
    protocol::{Command, CommandRecord, Payload, RouteHint},
    pubsub::PubSubState,
};

/// A per-call override of the effective timeout (§4.5's three-way
/// resolution). `After` behaves like a plain narrower-or-wider `Duration`;
/// `Unbounded` skips the wait entirely, for blocking commands whose
/// `timeout_secs` argument is `0` — the server's own "block indefinitely"
/// (§8) would otherwise be cut short by `default_timeout`.
#[derive(Debug, Clone, Copy)]
pub enum TimeoutOverride {
    After(Duration),
    Unbounded,
}

/// Owns exactly one IPC channel to a co-process transport (§4.5). Cheap to
/// clone — internally `Arc`-backed — so every [`crate::client`] facade holds
/// one directly rather than wrapping it in another `Arc` itself.
pub struct Multiplexer {
    transport: Arc<dyn Transport>,
    decoder: Arc<dyn Decoder>,
    callbacks: StdMutex<CallbackTable>,
    /// Serializes writes to the IPC channel so that two requests submitted
    /// by the same caller in program order are written in that order, and
    /// so a frame write is never interleaved with another (§4.5, §5).
    write_lock: AsyncMutex<()>,
    default_timeout: Duration,
    pubsub: Arc<PubSubState>,
}

impl Multiplexer {
    /// Builds the multiplexer and spawns its single dedicated reader task,
    /// which polls [`Transport::recv`] in a loop for the lifetime of the
    /// channel (§4.5's "no per-request worker is spawned"). Incoming pub/sub
    /// pushes are routed straight to `pubsub`, sharing the one connection it
    /// was constructed with (§4.6).
    pub fn new(
        transport: Arc<dyn Transport>,
        decoder: Arc<dyn Decoder>,
        default_timeout: Duration,
        pubsub: Arc<PubSubState>,
    ) -> Arc<Self> {
        let this = Arc::new(Multiplexer {
            transport,
            decoder,
            callbacks: StdMutex::new(CallbackTable::new()),
            write_lock: AsyncMutex::new(()),
            default_timeout,
            pubsub,
        });

        let reader = Arc::clone(&this);
        tokio::spawn(async move { reader.run_reader().await });

        this
    }

    async fn run_reader(self: Arc<Self>) {
        loop {
            match self.transport.recv().await {
                Some(IncomingEnvelope::Response(frame)) => self.handle_incoming(frame),
                Some(IncomingEnvelope::PushMessage(message)) => self.pubsub.deliver(message),
                None => {
                    tracing::warn!("IPC channel to transport closed; draining live callback slots");
                    self.callbacks
                        .lock()
                        .unwrap_or_else(|poisoned| poisoned.into_inner())
                        .close_all(Error::closing());
                    break;
                }
            }
        }
    }

    fn handle_incoming(&self, frame: IncomingFrame) {
        let mut callbacks = self.callbacks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        match frame.result {
            FrameResult::Ok(raw) => {
                // A batch slot wants the raw tree; a plain command slot
                // wants it decoded now, under its recorded expected shape.
                if let Some(expected) = callbacks.expected_decoding(frame.callback_index).copied() {
                    let decoded = self.decoder.decode(raw, expected);
                    let _ = callbacks.complete(frame.callback_index, decoded);
                } else {
                    let _ = callbacks.complete_batch(frame.callback_index, Ok(raw));
                }
            }
            FrameResult::Error { kind, message } => {
                let error = error_from_kind(kind, message);
                if callbacks.expected_decoding(frame.callback_index).is_some() {
                    let _ = callbacks.complete(frame.callback_index, Err(error));
                } else {
                    let _ = callbacks.complete_batch(frame.callback_index, Err(error));
                }
            }
            FrameResult::ClosingError { message } => {
                tracing::debug!(%message, "transport reported closing error");
                let error = Error::closing();
                if callbacks.expected_decoding(frame.callback_index).is_some() {
                    let _ = callbacks.complete(frame.callback_index, Err(error));
                } else {
                    let _ = callbacks.complete_batch(frame.callback_index, Err(error));
                }
            }
        }
    }

    /// Converts a pure [`Command`] into a wire-ready [`CommandRecord`],
    /// applying §3's inline/handle threshold rule: the handle variant is
    /// used iff the command's full wire length meets or exceeds the
    /// transport's `MAX_REQUEST_ARGS_LEN`.
    fn to_record(&self, command: Command) -> CommandRecord {
        if command.wire_len() >= self.transport.max_request_args_len() {
            let (low, high) = self.transport.leak_vec(command.full_args());
            CommandRecord {
                request_type: command.request_type,
                payload: Payload::Handle { low, high },
            }
        } else {
            CommandRecord {
                request_type: command.request_type,
                payload: Payload::Inline(command.args),
            }
        }
    }

    async fn write(&self, frame: OutgoingFrame) -> Result<()> {
        let _permit = self.write_lock.lock().await;
        self.transport.submit(frame).await
    }

    /// Submits a single command, waiting up to the effective timeout
    /// (`timeout_override` if given, else the client default) for its
    /// response. Standalone callers always resolve to this; see
    /// [`Multiplexer::submit_routed`] for the cluster-only routed form.
    pub async fn submit(
        &self,
        command: Command,
        expected: ExpectedShape,
        timeout_override: Option<TimeoutOverride>,
    ) -> Result<Value> {
        self.submit_routed(command, expected, timeout_override, None).await
    }

    /// Like [`Multiplexer::submit`], with a cluster-only routing hint
    /// attached to the outgoing frame (§4.7). `route` is `None` for every
    /// standalone call — the transport implicitly targets the single server.
    pub async fn submit_routed(
        &self,
        command: Command,
        expected: ExpectedShape,
        timeout_override: Option<TimeoutOverride>,
        route: Option<RouteHint>,
    ) -> Result<Value> {
        let record = self.to_record(command);
        let (index, receiver) = {
            let mut callbacks = self.callbacks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            callbacks.allocate(expected)
        };

        if let Err(err) = self
            .write(OutgoingFrame {
                callback_index: index,
                payload: OutgoingPayload::Command(record),
                route,
                retry: None,
            })
            .await
        {
            self.callbacks
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .abandon(index);
            return Err(err);
        }

        self.await_response(index, receiver, timeout_override).await
    }

    async fn await_response(
        &self,
        index: u32,
        receiver: oneshot::Receiver<Result<Value>>,
        timeout_override: Option<TimeoutOverride>,
    ) -> Result<Value> {
        let timeout = match timeout_override {
            Some(TimeoutOverride::After(duration)) => Some(duration),
            Some(TimeoutOverride::Unbounded) => None,
            None => Some(self.default_timeout),
        };

        let Some(timeout) = timeout else {
            return match receiver.await {
                Ok(result) => result,
                Err(_) => Err(Error::internal("callback waiter dropped without a response")),
            };
        };

        match tokio::time::timeout(timeout, receiver).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(Error::internal("callback waiter dropped without a response")),
            Err(_) => {
                self.callbacks
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .abandon(index);
                Err(Error::timeout())
            }
        }
    }

    /// Submits an atomic batch or pipeline as a single frame and splits its
    /// single response positionally (§4.3, §4.5). The effective timeout is
    /// `timeout_override` if given, else the batch's own
    /// [`Batch::timeout`], else the client default (§4.5's three-way
    /// resolution). Standalone callers always resolve to this; see
    /// [`Multiplexer::submit_batch_routed`] for the cluster-only routed form.
    pub async fn submit_batch(
        &self,
        batch: Batch,
        timeout_override: Option<Duration>,
    ) -> Result<Vec<Result<Value>>> {
        self.submit_batch_routed(batch, timeout_override, None).await
    }

    /// Like [`Multiplexer::submit_batch`], with a cluster-only routing hint
    /// attached to the outgoing frame.
    pub async fn submit_batch_routed(
        &self,
        batch: Batch,
        timeout_override: Option<Duration>,
        route: Option<RouteHint>,
    ) -> Result<Vec<Result<Value>>> {
        let original_len = batch.len();
        if original_len == 0 {
            return Ok(Vec::new());
        }

        let is_atomic = batch.is_atomic();
        let batch_timeout = batch.timeout();
        // An atomic batch is never retried silently (redriving MULTI/EXEC
        // risks re-applying already-committed writes), so only a pipeline's
        // strategy is ever forwarded to the transport.
        let retry = (!is_atomic).then(|| batch.retry_strategy());
        let (commands, set_positions) = batch.finish();
        let records: Vec<CommandRecord> = commands.into_iter().map(|c| self.to_record(c)).collect();

        let (index, receiver) = {
            let mut callbacks = self.callbacks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            callbacks.allocate_batch()
        };

        if let Err(err) = self
            .write(OutgoingFrame {
                callback_index: index,
                payload: OutgoingPayload::Batch(records),
                route,
                retry,
            })
            .await
        {
            self.callbacks
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .abandon(index);
            return Err(err);
        }

        let timeout = timeout_override.or(batch_timeout).unwrap_or(self.default_timeout);
        let raw = match tokio::time::timeout(timeout, receiver).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(Error::internal("callback waiter dropped without a response")),
            Err(_) => {
                self.callbacks
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .abandon(index);
                Err(Error::timeout())
            }
        };

        match raw {
            Ok(raw) => Ok(self.decode_batch_response(raw, is_atomic, &set_positions, original_len)),
            // The whole batch failed as one unit (ExecAbortError, a
            // connection drop, or client shutdown): every position reports
            // the same error (§7's ExecAbortError policy, generalized).
            Err(err) => Ok(std::iter::repeat_with(|| Err(err.clone())).take(original_len).collect()),
        }
    }

    /// Splits a batch's single response tree into per-position results,
    /// stripping the synthetic `MULTI`/`EXEC` wrapper replies for an atomic
    /// batch and applying set decoding at the positions `Batch` recorded
    /// (§3's "set-conversion indices are applied post-hoc").
    fn decode_batch_response(
        &self,
        raw: RawResponse,
        is_atomic: bool,
        set_positions: &[usize],
        original_len: usize,
    ) -> Vec<Result<Value>> {
        let items = match raw {
            RawResponse::Array(items) => items,
            other => vec![other],
        };

        let offset = if is_atomic { 1 } else { 0 };
        let body: Vec<RawResponse> = if is_atomic {
            let mut it = items.into_iter();
            it.next(); // MULTI's own reply
            let mut rest: Vec<_> = it.collect();
            rest.pop(); // EXEC's own reply
            rest
        } else {
            items
        };

        let set_positions: HashSet<usize> = set_positions.iter().copied().collect();
        let mut results: Vec<Result<Value>> = body
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                RawResponse::Error(message) => {
                    Err(Error::request(String::from_utf8_lossy(&message).into_owned()))
                }
                other => {
                    let shape = if set_positions.contains(&(i + offset)) {
                        ExpectedShape::Set
                    } else {
                        ExpectedShape::Raw
                    };
                    self.decoder.decode(other, shape)
                }
            })
            .collect();

        // Defensive: a transport that returned a short array (shouldn't
        // happen per §3's invariant) pads with an internal error rather
        // than panicking on an out-of-bounds positional read downstream.
        while results.len() < original_len {
            results.push(Err(Error::internal("batch response shorter than command count")));
        }
        results.truncate(original_len);
        results
    }
}

/// The IPC channel carries a structured `kind` plus a human-readable
/// `message` for every server-reported failure; most kinds already embed
/// their own message, so this prefers that and falls back to the envelope's
/// `message` only for kinds that don't (`Timeout`, `Closing`, `Io`).
fn error_from_kind(kind: ErrorKind, message: String) -> Error {
    match kind {
        ErrorKind::ValidationError { message } => Error::validation(message),
        ErrorKind::RequestError { message } => Error::request(message),
        ErrorKind::ExecAbortError { message } => Error::exec_abort(message),
        ErrorKind::ConnectionError { message } => Error::connection(message),
        ErrorKind::TimeoutError => Error::timeout(),
        ErrorKind::ClosingError => Error::closing(),
        ErrorKind::Internal { message } => Error::internal(message),
        ErrorKind::Io(_) => Error::internal(message),
    }
}

/// Used by command factories and the client facade to bridge raw byte
/// arguments through [`crate::encoding`] without re-importing `bytes`
/// everywhere; re-exported here since every multiplexer entry point takes
/// or returns argument bytes.
pub type ArgBytes = Bytes;

#[cfg(test)]
mod test;
