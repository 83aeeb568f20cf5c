//! Argument Encoder (C1): converts typed primitives into the ordered byte
//! string arguments the server's textual grammar expects. Encoding here is
//! pure — no I/O, no shared state — so that repeated encoding of equal input
//! always yields equal bytes (§3's purity invariant).

mod boundary;
mod expiry;

pub use boundary::{Boundary, Inclusivity, LexBoundary};
pub use expiry::Expiry;

use bytes::Bytes;

use crate::protocol::ArgVec;

/// Anything that can contribute one wire argument. Raw bytes and UTF-8
/// strings pass through untouched; numeric values render as decimal ASCII
/// with no locale dependence.
pub trait ToArg {
    fn to_arg(&self) -> Bytes;
}

impl ToArg for Bytes {
    fn to_arg(&self) -> Bytes {
        self.clone()
    }
}

impl ToArg for &[u8] {
    fn to_arg(&self) -> Bytes {
        Bytes::copy_from_slice(self)
    }
}

impl ToArg for Vec<u8> {
    fn to_arg(&self) -> Bytes {
        Bytes::copy_from_slice(self)
    }
}

impl ToArg for str {
    fn to_arg(&self) -> Bytes {
        Bytes::copy_from_slice(self.as_bytes())
    }
}

impl ToArg for String {
    fn to_arg(&self) -> Bytes {
        Bytes::copy_from_slice(self.as_bytes())
    }
}

impl ToArg for &str {
    fn to_arg(&self) -> Bytes {
        Bytes::copy_from_slice(self.as_bytes())
    }
}

/// Converts a byte-string-like value into an argument, covering both owned
/// and borrowed forms callers pass to command factories.
pub fn arg(value: impl AsRef<[u8]>) -> Bytes {
    Bytes::copy_from_slice(value.as_ref())
}

/// Renders a signed integer as decimal ASCII text.
pub fn int_arg(value: i64) -> Bytes {
    Bytes::from(value.to_string())
}

/// Renders an unsigned integer as decimal ASCII text.
pub fn uint_arg(value: u64) -> Bytes {
    Bytes::from(value.to_string())
}

/// Renders a floating-point score as the server expects: plain decimal text
/// for finite values, and the literal tokens `+inf`/`-inf` for the infinite
/// sentinels a [`crate::encoding::Boundary`] or sorted-set score can carry.
pub fn float_arg(value: f64) -> Bytes {
    if value.is_infinite() {
        Bytes::from_static(if value > 0.0 { b"+inf" } else { b"-inf" })
    } else {
        Bytes::from(format!("{value}"))
    }
}

/// A helper for building argument vectors in command factories: push an
/// argument, a keyword token, or an entire sub-vector, always producing the
/// exact server-grammar order §4.1 specifies.
#[derive(Debug, Default, Clone)]
pub struct ArgBuilder {
    args: ArgVec,
}

impl ArgBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, value: impl AsRef<[u8]>) -> Self {
        self.args.push(arg(value));
        self
    }

    pub fn push_bytes(mut self, value: Bytes) -> Self {
        self.args.push(value);
        self
    }

    pub fn push_int(mut self, value: i64) -> Self {
        self.args.push(int_arg(value));
        self
    }

    pub fn push_float(mut self, value: f64) -> Self {
        self.args.push(float_arg(value));
        self
    }

    pub fn push_if(self, condition: bool, value: impl AsRef<[u8]>) -> Self {
        if condition {
            self.push(value)
        } else {
            self
        }
    }

    pub fn extend(mut self, values: impl IntoIterator<Item = Bytes>) -> Self {
        self.args.extend(values);
        self
    }

    pub fn build(self) -> ArgVec {
        self.args
    }
}

#[cfg(test)]
mod test;
