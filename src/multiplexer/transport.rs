//! The transport seam (§6, SPEC_FULL §C.2): the native co-process this core
//! treats as a black box. Production code wires a real IPC client behind
//! this trait; tests wire a `MockTransport`. No RESP parsing, slot routing,
//! or socket I/O belongs on this side of the trait.

use futures_core::future::BoxFuture;

use crate::{error::Result, protocol::ArgVec};

use super::channel::{IncomingEnvelope, OutgoingFrame};

/// Boxed so `Transport` stays object-safe — the multiplexer holds an
/// `Arc<dyn Transport>`, swappable between a real IPC client and a test
/// double without a generic parameter threading through every public type.
/// Matches the teacher's own `BoxFuture` convention at its async trait-object
/// seams (e.g. `src/client.rs`'s `AsyncDropToken`).
pub type SubmitFuture = BoxFuture<'static, Result<()>>;
pub type RecvFuture<'a> = BoxFuture<'a, Option<IncomingEnvelope>>;

pub trait Transport: Send + Sync {
    /// Writes `frame` to the IPC channel. Resolves once the frame has been
    /// handed off, not once a response has arrived — the response surfaces
    /// later through [`Transport::recv`]. Callers serialize concurrent
    /// writers themselves (§4.5's single writer-lock).
    fn submit(&self, frame: OutgoingFrame) -> SubmitFuture;

    /// Awaits the next response frame or pub/sub push from the IPC channel,
    /// or `None` once the channel has closed. Polled in a loop by the
    /// multiplexer's single dedicated reader task — never called
    /// concurrently with itself.
    fn recv(&self) -> RecvFuture<'_>;

    /// Hands an oversize argument vector to the transport's leak-vec
    /// primitive, returning the two 32-bit halves of the opaque 64-bit
    /// handle. Callers must never reconstruct a pointer from these halves.
    fn leak_vec(&self, args: ArgVec) -> (u32, u32);

    /// The transport-defined `MAX_REQUEST_ARGS_LEN` threshold, read once at
    /// startup, that decides between the inline and handle forms of a
    /// [`crate::protocol::Payload`].
    fn max_request_args_len(&self) -> usize;
}
