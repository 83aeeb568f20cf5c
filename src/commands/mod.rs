//! Command Factory (C3): one pure constructor per logical operation,
//! composing [`crate::encoding`] output into [`crate::protocol::Command`]
//! records. A factory never performs I/O, never allocates a callback slot,
//! and never touches global state — its only failure mode is a
//! [`crate::error::ErrorKind::ValidationError`] raised before any Command
//! exists.

pub mod geo;
pub mod hashes;
pub mod hyperloglog;
pub mod keys;
pub mod lists;
pub mod pubsub;
pub mod scripting;
pub mod server;
pub mod sets;
pub mod sorted_sets;
pub mod streams;
pub mod strings;
pub mod transactions;

/// Marker for command factories whose response the [`crate::batch::Batch`]
/// assembler must decode as a set rather than an array (members of
/// `SMEMBERS`, `SINTER`, `SUNION`, `SDIFF`, ...). Recorded by callers that
/// append these commands to a batch; see §3's "side index set".
pub fn expects_set_decoding(request_type: crate::protocol::RequestType) -> bool {
    use crate::protocol::RequestType::*;
    matches!(request_type, SMembers | SInter | SUnion | SDiff)
}
