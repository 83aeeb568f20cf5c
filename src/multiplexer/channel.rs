//! IPC envelope types (§4.5/§6): the frames exchanged with the native
//! transport, independent of whatever wire format actually carries them.

use crate::{
    batch::RetryStrategy,
    decoder::RawResponse,
    error::ErrorKind,
    protocol::{CommandRecord, RouteHint},
    pubsub::PubSubMessage,
};

/// The payload of an outgoing frame. A bare command, a whole batch (atomic
/// or pipeline — already flattened by [`crate::batch::Batch::finish`]), or a
/// script invocation the transport may special-case (e.g. to retry with
/// `EVAL` after an `EVALSHA` cache miss).
#[derive(Debug, Clone)]
pub enum OutgoingPayload {
    Command(CommandRecord),
    Batch(Vec<CommandRecord>),
}

/// One outgoing envelope: `{ callback_index, payload }` from §4.5, plus the
/// optional cluster routing hint from §4.7. Always `None` for a standalone
/// connection. `retry` carries a non-atomic batch's opted-in
/// [`RetryStrategy`] (§4.3) across the IPC channel so the transport — which
/// actually owns retry/backoff execution (§D Non-goals) — can honor it;
/// `None` for a bare command or an atomic batch, which is never silently
/// retried.
#[derive(Debug, Clone)]
pub struct OutgoingFrame {
    pub callback_index: u32,
    pub payload: OutgoingPayload,
    pub route: Option<RouteHint>,
    pub retry: Option<RetryStrategy>,
}

/// The result half of an incoming frame: success, a server-reported error,
/// or the transport announcing it is shutting down.
#[derive(Debug, Clone)]
pub enum FrameResult {
    Ok(RawResponse),
    Error { kind: ErrorKind, message: String },
    ClosingError { message: String },
}

/// One incoming envelope: `{ callback_index, result }` from §4.5. For a
/// batch submission, `results` from every member command arrive as a single
/// frame split positionally by the multiplexer before waiters are resolved;
/// this type models one already-demultiplexed slot response.
#[derive(Debug, Clone)]
pub struct IncomingFrame {
    pub callback_index: u32,
    pub result: FrameResult,
}

/// Everything the transport can hand the multiplexer's reader task: either a
/// demultiplexed command/batch response, or a pub/sub message arriving
/// out-of-band from any command response (§4.6 — "distinguished by the
/// transport, relative to command responses"). The reader routes the latter
/// straight to [`crate::pubsub::PubSubState::deliver`] without touching the
/// callback-slot table.
#[derive(Debug, Clone)]
pub enum IncomingEnvelope {
    Response(IncomingFrame),
    PushMessage(PubSubMessage),
}
