//! Contains the [`Error`] and [`Result`] types used throughout this crate.

use std::sync::Arc;

use thiserror::Error;

/// The result type returned by every fallible operation in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// An error produced by the command-construction, batching, or multiplexing
/// layers. The inner [`ErrorKind`] is boxed so that `Error` stays small on the
/// stack even though some variants (e.g. [`ErrorKind::RequestError`]) carry a
/// server-provided message.
#[derive(Clone, Debug, Error)]
#[error("{kind}")]
pub struct Error {
    kind: Box<ErrorKind>,
}

impl Error {
    /// Returns the kind of this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        ErrorKind::ValidationError {
            message: message.into(),
        }
        .into()
    }

    pub(crate) fn closing() -> Self {
        ErrorKind::ClosingError.into()
    }

    pub(crate) fn timeout() -> Self {
        ErrorKind::TimeoutError.into()
    }

    /// `true` for error kinds the server documents as safe to retry without
    /// caller-visible side effects (idempotent reads, connection loss before
    /// any bytes were written).
    pub fn is_retriable(&self) -> bool {
        matches!(&*self.kind, ErrorKind::ConnectionError { .. })
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error {
            kind: Box::new(kind),
        }
    }
}

/// The taxonomy of errors this crate can surface to a caller, matching the
/// IPC channel's `Error kinds` (`Request`, `ConnectionError`, `ExecAbort`,
/// `Timeout`, `Closing`) plus the client-side `ValidationError` that never
/// reaches the transport at all.
#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Raised synchronously inside a command factory, before any Command
    /// Record is constructed and before any IPC traffic is generated. For
    /// example: `ZADD` with both `NX` and `GT`, or a non-integer expiry
    /// count passed to `SET`.
    #[error("invalid command arguments: {message}")]
    ValidationError { message: String },

    /// The server rejected a specific command (wrong type, syntax error,
    /// unknown command, ...). In a non-atomic batch this is stored at that
    /// command's position and siblings proceed; in an atomic batch it is
    /// promoted to [`ErrorKind::ExecAbortError`] for every slot in the batch.
    #[error("command failed: {message}")]
    RequestError { message: String },

    /// An atomic batch (`MULTI`/`EXEC`) was aborted, either because a
    /// watched key changed or because one member command failed inside the
    /// transaction. All slots belonging to the batch resolve with this same
    /// error.
    #[error("transaction aborted: {message}")]
    ExecAbortError { message: String },

    /// The link to the server (or, for the multiplexer, the IPC channel to
    /// the native transport) was lost or could not be established.
    #[error("connection error: {message}")]
    ConnectionError { message: String },

    /// The effective timeout (per-call timeout, or batch option, or client
    /// default, whichever is narrowest) elapsed before a response arrived.
    /// The underlying server-side work may still complete; the slot is
    /// reclaimed regardless.
    #[error("operation timed out")]
    TimeoutError,

    /// The client is shutting down. Every live callback slot resolves with
    /// this error and subsequent submits fail immediately with it.
    #[error("client is closing")]
    ClosingError,

    /// An invariant the multiplexer relies on was violated — a response
    /// frame referenced a callback index with no live slot, a decoder saw a
    /// shape it cannot interpret, or similar. This should never happen in
    /// correct operation and always indicates a bug rather than a server or
    /// network condition.
    #[error("internal error: {message}")]
    Internal { message: String },

    /// Wraps an I/O error encountered on the IPC channel itself (as opposed
    /// to the server connection, which is the transport's concern).
    #[error("I/O error: {0}")]
    Io(Arc<std::io::Error>),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        ErrorKind::Io(Arc::new(err)).into()
    }
}

impl Error {
    pub(crate) fn internal(message: impl Into<String>) -> Self {
        ErrorKind::Internal {
            message: message.into(),
        }
        .into()
    }

    pub(crate) fn request(message: impl Into<String>) -> Self {
        ErrorKind::RequestError {
            message: message.into(),
        }
        .into()
    }

    pub(crate) fn exec_abort(message: impl Into<String>) -> Self {
        ErrorKind::ExecAbortError {
            message: message.into(),
        }
        .into()
    }

    pub(crate) fn connection(message: impl Into<String>) -> Self {
        ErrorKind::ConnectionError {
            message: message.into(),
        }
        .into()
    }
}

#[cfg(test)]
mod test;
