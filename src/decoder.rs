//! Decoder contract (§9's "exactly one decoder contract" resolution): a
//! single [`Decoder`] trait translating the transport's raw, language-
//! agnostic response tree into the shape a caller asked for, with two stock
//! implementations distinguished only by their string policy.

use bytes::Bytes;

use crate::error::{Error, Result};

/// A transport response before any language-specific decoding: the textual
/// RESP variants merged into one tree, independent of whether the link
/// negotiated RESP2 or RESP3.
#[derive(Debug, Clone, PartialEq)]
pub enum RawResponse {
    Nil,
    Simple(Bytes),
    Bulk(Bytes),
    Integer(i64),
    Double(f64),
    Boolean(bool),
    Array(Vec<RawResponse>),
    Map(Vec<(RawResponse, RawResponse)>),
    /// A server error reply nested as an array element, as a non-atomic
    /// batch's member commands return on the wire: siblings still decode
    /// normally while this position's error surfaces at the caller (§4.3,
    /// §7 "RequestError" in a pipeline). Never produced at the top level of
    /// a single command's response — a top-level command failure arrives as
    /// [`crate::multiplexer::channel::FrameResult::Error`] instead.
    Error(Bytes),
}

/// What shape a [`crate::multiplexer::callback::CallbackTable`] slot expects
/// its response decoded as, recorded at submit time (§3's Callback Slot
/// `expected_decoding` field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpectedShape {
    #[default]
    Raw,
    Set,
    ArrayOfSets,
}

/// A caller-facing decoded value. Collections stay ordered (`Array`) unless
/// the slot's [`ExpectedShape`] asked for set decoding, in which case the
/// response is wrapped as `Set` instead, matching the member/union/
/// intersection/difference command family's reply shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Bytes(Bytes),
    Str(String),
    Integer(i64),
    Double(f64),
    Boolean(bool),
    Array(Vec<Value>),
    Set(Vec<Value>),
    Map(Vec<(Value, Value)>),
}

/// Translates a [`RawResponse`] into a caller-shaped [`Value`]. Implementors
/// choose how bulk/simple strings are represented; everything else about the
/// response tree's structure is shared logic, so only the leaf string
/// conversion is a trait method.
pub trait Decoder: Send + Sync {
    fn decode_string(&self, bytes: Bytes) -> Result<Value>;

    /// Decodes a full response tree, applying `expected` to the top-level
    /// array (if any) per §3's Callback Slot contract.
    fn decode(&self, raw: RawResponse, expected: ExpectedShape) -> Result<Value> {
        let value = self.decode_node(raw)?;
        Ok(match (expected, value) {
            (ExpectedShape::Set, Value::Array(items)) => Value::Set(items),
            (ExpectedShape::ArrayOfSets, Value::Array(items)) => Value::Array(
                items
                    .into_iter()
                    .map(|item| match item {
                        Value::Array(inner) => Value::Set(inner),
                        other => other,
                    })
                    .collect(),
            ),
            (_, value) => value,
        })
    }

    fn decode_node(&self, raw: RawResponse) -> Result<Value> {
        match raw {
            RawResponse::Nil => Ok(Value::Nil),
            RawResponse::Simple(bytes) | RawResponse::Bulk(bytes) => self.decode_string(bytes),
            RawResponse::Integer(n) => Ok(Value::Integer(n)),
            RawResponse::Double(d) => Ok(Value::Double(d)),
            RawResponse::Boolean(b) => Ok(Value::Boolean(b)),
            RawResponse::Array(items) => Ok(Value::Array(
                items
                    .into_iter()
                    .map(|item| self.decode_node(item))
                    .collect::<Result<Vec<_>>>()?,
            )),
            RawResponse::Map(pairs) => Ok(Value::Map(
                pairs
                    .into_iter()
                    .map(|(k, v)| Ok((self.decode_node(k)?, self.decode_node(v)?)))
                    .collect::<Result<Vec<_>>>()?,
            )),
            RawResponse::Error(message) => Err(Error::request(
                String::from_utf8_lossy(&message).into_owned(),
            )),
        }
    }
}

/// Passes bulk/simple strings through untouched as raw bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct BytesDecoder;

impl Decoder for BytesDecoder {
    fn decode_string(&self, bytes: Bytes) -> Result<Value> {
        Ok(Value::Bytes(bytes))
    }
}

/// Decodes bulk/simple strings as UTF-8, failing with a [`crate::error::ErrorKind::ValidationError`]
/// on invalid byte sequences rather than lossily substituting replacement
/// characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf8Decoder;

impl Decoder for Utf8Decoder {
    fn decode_string(&self, bytes: Bytes) -> Result<Value> {
        String::from_utf8(bytes.to_vec())
            .map(Value::Str)
            .map_err(|_| Error::validation("response bytes are not valid UTF-8"))
    }
}

#[cfg(test)]
mod test;
