//! The Expiry Specification sum type (§3): `Keep`, `Persist`, and four
//! absolute/relative, seconds/milliseconds variants. Integrality is
//! validated at construction so that a non-integer expiry count is a
//! [`crate::error::Error`] raised before any [`crate::protocol::Command`]
//! exists, never a value silently truncated on the wire.

use bytes::Bytes;

use crate::error::{Error, Result};

/// An expiry to attach to a key-setting command (`SET`, `GETEX`, `HSETEX`,
/// `HGETEX`, ...). Not every command accepts every variant — `HSETEX` never
/// accepts `Persist` and `HGETEX` never accepts `Keep`; each factory
/// validates that for itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expiry {
    /// `KEEPTTL`: leave any existing TTL untouched.
    Keep,
    /// `PERSIST`: remove any existing TTL, making the key never expire.
    Persist,
    /// `EXAT seconds`: expire at an absolute Unix timestamp, in seconds.
    AbsoluteSeconds(i64),
    /// `PXAT milliseconds`: expire at an absolute Unix timestamp, in
    /// milliseconds.
    AbsoluteMilliseconds(i64),
    /// `EX seconds`: expire this many seconds from now.
    RelativeSeconds(i64),
    /// `PX milliseconds`: expire this many milliseconds from now.
    RelativeMilliseconds(i64),
}

impl Expiry {
    /// Builds a [`Expiry::RelativeSeconds`] from a duration that the caller
    /// may have supplied as a floating-point number of seconds (e.g. a value
    /// forwarded from a dynamically typed embedder). Fails with
    /// [`crate::error::ErrorKind::ValidationError`] if `seconds` is not a
    /// whole number.
    pub fn relative_seconds(seconds: f64) -> Result<Self> {
        integral(seconds).map(Expiry::RelativeSeconds)
    }

    pub fn relative_millis(millis: f64) -> Result<Self> {
        integral(millis).map(Expiry::RelativeMilliseconds)
    }

    pub fn absolute_seconds(unix_seconds: f64) -> Result<Self> {
        integral(unix_seconds).map(Expiry::AbsoluteSeconds)
    }

    pub fn absolute_millis(unix_millis: f64) -> Result<Self> {
        integral(unix_millis).map(Expiry::AbsoluteMilliseconds)
    }

    /// Encodes to the wire tokens for this expiry. The numeric variants
    /// always emit two tokens (`EX`, `60`), never a single combined token
    /// (`EX 60`) — the server only accepts the two-token form, and the
    /// source project's two competing conventions are resolved in favor of
    /// this one (see `SPEC_FULL.md` §C.4 / the open question in `spec.md`
    /// §9).
    pub fn encode(self) -> Vec<Bytes> {
        match self {
            Expiry::Keep => vec![Bytes::from_static(b"KEEPTTL")],
            Expiry::Persist => vec![Bytes::from_static(b"PERSIST")],
            Expiry::AbsoluteSeconds(n) => {
                vec![Bytes::from_static(b"EXAT"), Bytes::from(n.to_string())]
            }
            Expiry::AbsoluteMilliseconds(n) => {
                vec![Bytes::from_static(b"PXAT"), Bytes::from(n.to_string())]
            }
            Expiry::RelativeSeconds(n) => {
                vec![Bytes::from_static(b"EX"), Bytes::from(n.to_string())]
            }
            Expiry::RelativeMilliseconds(n) => {
                vec![Bytes::from_static(b"PX"), Bytes::from(n.to_string())]
            }
        }
    }
}

fn integral(value: f64) -> Result<i64> {
    if value.fract() != 0.0 || !value.is_finite() {
        return Err(Error::validation(format!(
            "expiry count must be a whole number, got {value}"
        )));
    }
    Ok(value as i64)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn relative_seconds_emits_two_tokens() {
        let expiry = Expiry::relative_seconds(60.0).unwrap();
        assert_eq!(
            expiry.encode(),
            vec![Bytes::from_static(b"EX"), Bytes::from_static(b"60")]
        );
    }

    #[test]
    fn non_integer_expiry_is_rejected_before_any_command_exists() {
        let err = Expiry::relative_seconds(1.5).unwrap_err();
        assert!(matches!(
            err.kind(),
            crate::error::ErrorKind::ValidationError { .. }
        ));
    }

    #[test]
    fn keep_and_persist_are_single_token() {
        assert_eq!(Expiry::Keep.encode(), vec![Bytes::from_static(b"KEEPTTL")]);
        assert_eq!(Expiry::Persist.encode(), vec![Bytes::from_static(b"PERSIST")]);
    }
}
