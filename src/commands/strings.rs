//! String/numeric command factories.

use bytes::Bytes;

use crate::{
    encoding::{ArgBuilder, Expiry},
    error::{Error, Result},
    protocol::{Command, RequestType},
};

/// The conditional-write mode of a `SET`: at most one may be active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionalSet {
    /// `NX`: only set if the key does not already exist.
    OnlyIfAbsent,
    /// `XX`: only set if the key already exists.
    OnlyIfExists,
    /// `IFEQ comparison-value`: only set if the key's current value equals
    /// `comparison-value`.
    OnlyIfEqual(Bytes),
}

#[derive(Debug, Clone, Default)]
pub struct SetOptions {
    pub condition: Option<ConditionalSet>,
    pub return_old_value: Option<bool>,
    pub expiry: Option<Expiry>,
}

/// `SET key value [NX|XX|IFEQ cmp] [GET] [KEEPTTL | EX n | PX n | EXAT n | PXAT n]`.
///
/// Rejects a non-`None` expiry equal to [`Expiry::Persist`] (`SET` has no
/// `PERSIST` token — only `HGETEX` does) before constructing any
/// [`Command`], matching §4.1's "the encoder rejects conflicts with a
/// caller-visible failure".
pub fn set(key: Bytes, value: Bytes, options: SetOptions) -> Result<Command> {
    if matches!(options.expiry, Some(Expiry::Persist)) {
        return Err(Error::validation("SET does not support PERSIST"));
    }

    let mut builder = ArgBuilder::new().push_bytes(key).push_bytes(value);
    match options.condition {
        Some(ConditionalSet::OnlyIfAbsent) => builder = builder.push("NX"),
        Some(ConditionalSet::OnlyIfExists) => builder = builder.push("XX"),
        Some(ConditionalSet::OnlyIfEqual(cmp)) => {
            builder = builder.push("IFEQ").push_bytes(cmp)
        }
        None => {}
    }
    builder = builder.push_if(options.return_old_value.unwrap_or(false), "GET");
    if let Some(expiry) = options.expiry {
        builder = builder.extend(expiry.encode());
    }
    Ok(Command::new(RequestType::Set, builder.build()))
}

pub fn get(key: Bytes) -> Command {
    Command::new(RequestType::Get, ArgBuilder::new().push_bytes(key).build())
}

#[derive(Debug, Clone, Default)]
pub struct GetExOptions {
    pub expiry: Option<Expiry>,
}

/// `GETEX key [EX n | PX n | EXAT n | PXAT n | PERSIST]`. `GETEX` never
/// accepts `KEEPTTL`.
pub fn get_ex(key: Bytes, options: GetExOptions) -> Result<Command> {
    if matches!(options.expiry, Some(Expiry::Keep)) {
        return Err(Error::validation("GETEX does not support KEEPTTL"));
    }
    let mut builder = ArgBuilder::new().push_bytes(key);
    if let Some(expiry) = options.expiry {
        builder = builder.extend(expiry.encode());
    }
    Ok(Command::new(RequestType::GetEx, builder.build()))
}

pub fn get_del(key: Bytes) -> Command {
    Command::new(RequestType::GetDel, ArgBuilder::new().push_bytes(key).build())
}

pub fn mget(keys: impl IntoIterator<Item = Bytes>) -> Command {
    Command::new(RequestType::MGet, ArgBuilder::new().extend(keys).build())
}

pub fn mset(pairs: impl IntoIterator<Item = (Bytes, Bytes)>) -> Command {
    let mut builder = ArgBuilder::new();
    for (k, v) in pairs {
        builder = builder.push_bytes(k).push_bytes(v);
    }
    Command::new(RequestType::MSet, builder.build())
}

pub fn append(key: Bytes, value: Bytes) -> Command {
    Command::new(
        RequestType::Append,
        ArgBuilder::new().push_bytes(key).push_bytes(value).build(),
    )
}

pub fn strlen(key: Bytes) -> Command {
    Command::new(RequestType::StrLen, ArgBuilder::new().push_bytes(key).build())
}

pub fn incr(key: Bytes) -> Command {
    Command::new(RequestType::Incr, ArgBuilder::new().push_bytes(key).build())
}

pub fn incr_by(key: Bytes, delta: i64) -> Command {
    Command::new(
        RequestType::IncrBy,
        ArgBuilder::new().push_bytes(key).push_int(delta).build(),
    )
}

pub fn incr_by_float(key: Bytes, delta: f64) -> Command {
    Command::new(
        RequestType::IncrByFloat,
        ArgBuilder::new().push_bytes(key).push_float(delta).build(),
    )
}

pub fn decr(key: Bytes) -> Command {
    Command::new(RequestType::Decr, ArgBuilder::new().push_bytes(key).build())
}

pub fn decr_by(key: Bytes, delta: i64) -> Command {
    Command::new(
        RequestType::DecrBy,
        ArgBuilder::new().push_bytes(key).push_int(delta).build(),
    )
}

pub fn set_range(key: Bytes, offset: i64, value: Bytes) -> Command {
    Command::new(
        RequestType::SetRange,
        ArgBuilder::new()
            .push_bytes(key)
            .push_int(offset)
            .push_bytes(value)
            .build(),
    )
}

pub fn get_range(key: Bytes, start: i64, end: i64) -> Command {
    Command::new(
        RequestType::GetRange,
        ArgBuilder::new()
            .push_bytes(key)
            .push_int(start)
            .push_int(end)
            .build(),
    )
}

#[cfg(test)]
mod test;
