//! Hash command factories.

use bytes::Bytes;

use crate::{
    encoding::{ArgBuilder, Expiry},
    error::{Error, Result},
    protocol::{Command, RequestType},
};

pub fn hset(key: Bytes, fields: impl IntoIterator<Item = (Bytes, Bytes)>) -> Command {
    let mut builder = ArgBuilder::new().push_bytes(key);
    for (field, value) in fields {
        builder = builder.push_bytes(field).push_bytes(value);
    }
    Command::new(RequestType::HSet, builder.build())
}

pub fn hget(key: Bytes, field: Bytes) -> Command {
    Command::new(
        RequestType::HGet,
        ArgBuilder::new().push_bytes(key).push_bytes(field).build(),
    )
}

pub fn hmget(key: Bytes, fields: impl IntoIterator<Item = Bytes>) -> Command {
    Command::new(
        RequestType::HMGet,
        ArgBuilder::new().push_bytes(key).extend(fields).build(),
    )
}

pub fn hgetall(key: Bytes) -> Command {
    Command::new(RequestType::HGetAll, ArgBuilder::new().push_bytes(key).build())
}

pub fn hdel(key: Bytes, fields: impl IntoIterator<Item = Bytes>) -> Command {
    Command::new(
        RequestType::HDel,
        ArgBuilder::new().push_bytes(key).extend(fields).build(),
    )
}

pub fn hexists(key: Bytes, field: Bytes) -> Command {
    Command::new(
        RequestType::HExists,
        ArgBuilder::new().push_bytes(key).push_bytes(field).build(),
    )
}

pub fn hincr_by(key: Bytes, field: Bytes, delta: i64) -> Command {
    Command::new(
        RequestType::HIncrBy,
        ArgBuilder::new()
            .push_bytes(key)
            .push_bytes(field)
            .push_int(delta)
            .build(),
    )
}

pub fn hincr_by_float(key: Bytes, field: Bytes, delta: f64) -> Command {
    Command::new(
        RequestType::HIncrByFloat,
        ArgBuilder::new()
            .push_bytes(key)
            .push_bytes(field)
            .push_float(delta)
            .build(),
    )
}

pub fn hkeys(key: Bytes) -> Command {
    Command::new(RequestType::HKeys, ArgBuilder::new().push_bytes(key).build())
}

pub fn hvals(key: Bytes) -> Command {
    Command::new(RequestType::HVals, ArgBuilder::new().push_bytes(key).build())
}

pub fn hlen(key: Bytes) -> Command {
    Command::new(RequestType::HLen, ArgBuilder::new().push_bytes(key).build())
}

pub fn hrandfield(key: Bytes, count: Option<i64>, with_values: bool) -> Command {
    let mut builder = ArgBuilder::new().push_bytes(key);
    if let Some(count) = count {
        builder = builder.push_int(count);
        builder = builder.push_if(with_values, "WITHVALUES");
    }
    Command::new(RequestType::HRandField, builder.build())
}

/// The field-existence condition shared by `HSETEX`'s `FNX`/`FXX` tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCondition {
    /// `FNX`: only set if none of the given fields already exist.
    NoneExist,
    /// `FXX`: only set if all of the given fields already exist.
    AllExist,
}

#[derive(Debug, Clone, Default)]
pub struct HSetExOptions {
    pub condition: Option<FieldCondition>,
    pub expiry: Option<Expiry>,
}

/// `HSETEX key [FNX|FXX] [KEEPTTL | EX n | PX n | EXAT n | PXAT n] FIELDS count field... value...`.
/// `HSETEX` never accepts [`Expiry::Persist`].
pub fn hsetex(
    key: Bytes,
    fields: impl IntoIterator<Item = (Bytes, Bytes)>,
    options: HSetExOptions,
) -> Result<Command> {
    if matches!(options.expiry, Some(Expiry::Persist)) {
        return Err(Error::validation("HSETEX does not support PERSIST"));
    }
    let pairs: Vec<(Bytes, Bytes)> = fields.into_iter().collect();

    let mut builder = ArgBuilder::new().push_bytes(key);
    match options.condition {
        Some(FieldCondition::NoneExist) => builder = builder.push("FNX"),
        Some(FieldCondition::AllExist) => builder = builder.push("FXX"),
        None => {}
    }
    if let Some(expiry) = options.expiry {
        builder = builder.extend(expiry.encode());
    }
    builder = builder.push("FIELDS").push_int(pairs.len() as i64);
    for (field, _) in &pairs {
        builder = builder.push_bytes(field.clone());
    }
    for (_, value) in &pairs {
        builder = builder.push_bytes(value.clone());
    }
    Ok(Command::new(RequestType::HSetEx, builder.build()))
}

#[derive(Debug, Clone, Default)]
pub struct HGetExOptions {
    pub expiry: Option<Expiry>,
}

/// `HGETEX key [EX n | PX n | EXAT n | PXAT n | PERSIST] FIELDS count field...`.
/// `HGETEX` never accepts [`Expiry::Keep`].
pub fn hgetex(
    key: Bytes,
    fields: impl IntoIterator<Item = Bytes>,
    options: HGetExOptions,
) -> Result<Command> {
    if matches!(options.expiry, Some(Expiry::Keep)) {
        return Err(Error::validation("HGETEX does not support KEEPTTL"));
    }
    let fields: Vec<Bytes> = fields.into_iter().collect();

    let mut builder = ArgBuilder::new().push_bytes(key);
    if let Some(expiry) = options.expiry {
        builder = builder.extend(expiry.encode());
    }
    builder = builder
        .push("FIELDS")
        .push_int(fields.len() as i64)
        .extend(fields);
    Ok(Command::new(RequestType::HGetEx, builder.build()))
}

#[derive(Debug, Clone, Default)]
pub struct HScanOptions {
    pub match_pattern: Option<Bytes>,
    pub count: Option<i64>,
    pub no_values: bool,
}

pub fn hscan(key: Bytes, cursor: u64, options: HScanOptions) -> Command {
    let mut builder = ArgBuilder::new().push_bytes(key).push_int(cursor as i64);
    if let Some(pattern) = options.match_pattern {
        builder = builder.push("MATCH").push_bytes(pattern);
    }
    if let Some(count) = options.count {
        builder = builder.push("COUNT").push_int(count);
    }
    builder = builder.push_if(options.no_values, "NOVALUES");
    Command::new(RequestType::HScan, builder.build())
}

#[cfg(test)]
mod test;
