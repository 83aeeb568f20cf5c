//! Sorted-set command factories, including the §4.1 `ZADD` and
//! `ZRANGE`/`ZRANGESTORE` validation rules.

use bytes::Bytes;

use crate::{
    encoding::{ArgBuilder, Boundary, LexBoundary},
    error::{Error, Result},
    protocol::{Command, RequestType},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExistCondition {
    /// `NX`: only add new members, never update existing scores.
    OnlyIfAbsent,
    /// `XX`: only update scores of members that already exist.
    OnlyIfExists,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreCondition {
    /// `GT`: only update if the new score is greater than the current one.
    GreaterThan,
    /// `LT`: only update if the new score is less than the current one.
    LessThan,
}

#[derive(Debug, Clone, Default)]
pub struct ZAddOptions {
    pub exists: Option<ExistCondition>,
    pub score_condition: Option<ScoreCondition>,
    /// `CH`: return the number of changed elements instead of added ones.
    pub changed: bool,
    /// `INCR`: treat this as `ZINCRBY`-like increment; requires exactly one
    /// `(score, member)` pair.
    pub increment: bool,
}

/// `ZADD key [NX|XX] [GT|LT] [CH] [INCR] (score member)+`.
///
/// Rejects `NX` combined with `GT`/`LT`, and rejects `INCR` with anything
/// other than exactly one member, both before constructing a [`Command`].
pub fn zadd(
    key: Bytes,
    members: impl IntoIterator<Item = (f64, Bytes)>,
    options: ZAddOptions,
) -> Result<Command> {
    let members: Vec<(f64, Bytes)> = members.into_iter().collect();

    if options.exists == Some(ExistCondition::OnlyIfAbsent) && options.score_condition.is_some() {
        return Err(Error::validation("ZADD: NX cannot be combined with GT or LT"));
    }
    if options.increment && members.len() != 1 {
        return Err(Error::validation(
            "ZADD: INCR requires exactly one (score, member) pair",
        ));
    }

    let mut builder = ArgBuilder::new().push_bytes(key);
    match options.exists {
        Some(ExistCondition::OnlyIfAbsent) => builder = builder.push("NX"),
        Some(ExistCondition::OnlyIfExists) => builder = builder.push("XX"),
        None => {}
    }
    match options.score_condition {
        Some(ScoreCondition::GreaterThan) => builder = builder.push("GT"),
        Some(ScoreCondition::LessThan) => builder = builder.push("LT"),
        None => {}
    }
    builder = builder.push_if(options.changed, "CH");
    builder = builder.push_if(options.increment, "INCR");
    for (score, member) in members {
        builder = builder.push_float(score).push_bytes(member);
    }
    Ok(Command::new(RequestType::ZAdd, builder.build()))
}

pub fn zscore(key: Bytes, member: Bytes) -> Command {
    Command::new(
        RequestType::ZScore,
        ArgBuilder::new().push_bytes(key).push_bytes(member).build(),
    )
}

pub fn zrem(key: Bytes, members: impl IntoIterator<Item = Bytes>) -> Command {
    Command::new(RequestType::ZRem, ArgBuilder::new().push_bytes(key).extend(members).build())
}

pub fn zcard(key: Bytes) -> Command {
    Command::new(RequestType::ZCard, ArgBuilder::new().push_bytes(key).build())
}

pub fn zincrby(key: Bytes, delta: f64, member: Bytes) -> Command {
    Command::new(
        RequestType::ZIncrBy,
        ArgBuilder::new()
            .push_bytes(key)
            .push_float(delta)
            .push_bytes(member)
            .build(),
    )
}

pub fn zrank(key: Bytes, member: Bytes) -> Command {
    Command::new(
        RequestType::ZRank,
        ArgBuilder::new().push_bytes(key).push_bytes(member).build(),
    )
}

pub fn zcount(key: Bytes, min: Boundary, max: Boundary) -> Command {
    Command::new(
        RequestType::ZCount,
        ArgBuilder::new()
            .push_bytes(key)
            .push_bytes(min.encode())
            .push_bytes(max.encode())
            .build(),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopEnd {
    Min,
    Max,
}

pub fn zpop(key: Bytes, end: PopEnd, count: Option<i64>) -> Command {
    let request_type = match end {
        PopEnd::Min => RequestType::ZPopMin,
        PopEnd::Max => RequestType::ZPopMax,
    };
    let mut builder = ArgBuilder::new().push_bytes(key);
    if let Some(count) = count {
        builder = builder.push_int(count);
    }
    Command::new(request_type, builder.build())
}

/// A timeout of `0` blocks indefinitely (§8 boundary behavior).
pub fn blocking_zpop(keys: impl IntoIterator<Item = Bytes>, end: PopEnd, timeout_secs: f64) -> Command {
    let request_type = match end {
        PopEnd::Min => RequestType::BZPopMin,
        PopEnd::Max => RequestType::BZPopMax,
    };
    Command::new(
        request_type,
        ArgBuilder::new().extend(keys).push_float(timeout_secs).build(),
    )
}

/// The range-selection axis of a `ZRANGE`/`ZRANGESTORE` query. Plain index
/// boundaries are always ranks (never wrapped in [`Boundary`]); score and
/// lex ranges carry their own boundary type.
#[derive(Debug, Clone)]
pub enum RangeBy {
    Index { start: i64, stop: i64 },
    Score { min: Boundary, max: Boundary },
    Lex { min: LexBoundary, max: LexBoundary },
}

#[derive(Debug, Clone, Default)]
pub struct ZRangeOptions {
    pub rev: bool,
    /// `LIMIT offset count`. Only valid alongside `BYSCORE` or `BYLEX`.
    pub limit: Option<(i64, i64)>,
    /// `WITHSCORES`. Only valid for non-`BYLEX` ranges, and only on the
    /// non-store `ZRANGE` form (`ZRANGESTORE` never emits it).
    pub with_scores: bool,
}

fn encode_range_by(builder: ArgBuilder, by: &RangeBy) -> Result<ArgBuilder> {
    Ok(match by {
        RangeBy::Index { start, stop } => builder.push_int(*start).push_int(*stop),
        RangeBy::Score { min, max } => builder
            .push_bytes(min.encode())
            .push_bytes(max.encode())
            .push("BYSCORE"),
        RangeBy::Lex { min, max } => builder
            .push_bytes(min.encode())
            .push_bytes(max.encode())
            .push("BYLEX"),
    })
}

fn validate_range_options(by: &RangeBy, options: &ZRangeOptions) -> Result<()> {
    let is_index = matches!(by, RangeBy::Index { .. });
    if options.limit.is_some() && is_index {
        return Err(Error::validation(
            "ZRANGE: LIMIT requires BYSCORE or BYLEX",
        ));
    }
    if options.with_scores && matches!(by, RangeBy::Lex { .. }) {
        return Err(Error::validation("ZRANGE: WITHSCORES is incompatible with BYLEX"));
    }
    Ok(())
}

/// `ZRANGE key start stop [BYSCORE|BYLEX] [REV] [LIMIT offset count] [WITHSCORES]`.
pub fn zrange(key: Bytes, by: RangeBy, options: ZRangeOptions) -> Result<Command> {
    validate_range_options(&by, &options)?;
    let mut builder = ArgBuilder::new().push_bytes(key);
    builder = encode_range_by(builder, &by)?;
    builder = builder.push_if(options.rev, "REV");
    if let Some((offset, count)) = options.limit {
        builder = builder.push("LIMIT").push_int(offset).push_int(count);
    }
    builder = builder.push_if(options.with_scores, "WITHSCORES");
    Ok(Command::new(RequestType::ZRange, builder.build()))
}

/// `ZRANGESTORE dest key start stop [BYSCORE|BYLEX] [REV] [LIMIT offset count]`.
/// Never emits `WITHSCORES` — the server ignores that distinction for the
/// store form, so the options struct's `with_scores` field is rejected here
/// instead of silently discarded.
pub fn zrangestore(destination: Bytes, key: Bytes, by: RangeBy, options: ZRangeOptions) -> Result<Command> {
    if options.with_scores {
        return Err(Error::validation("ZRANGESTORE does not support WITHSCORES"));
    }
    validate_range_options(&by, &options)?;
    let mut builder = ArgBuilder::new().push_bytes(destination).push_bytes(key);
    builder = encode_range_by(builder, &by)?;
    builder = builder.push_if(options.rev, "REV");
    if let Some((offset, count)) = options.limit {
        builder = builder.push("LIMIT").push_int(offset).push_int(count);
    }
    Ok(Command::new(RequestType::ZRangeStore, builder.build()))
}

#[derive(Debug, Clone, Default)]
pub struct ZScanOptions {
    pub match_pattern: Option<Bytes>,
    pub count: Option<i64>,
}

pub fn zscan(key: Bytes, cursor: u64, options: ZScanOptions) -> Command {
    let mut builder = ArgBuilder::new().push_bytes(key).push_int(cursor as i64);
    if let Some(pattern) = options.match_pattern {
        builder = builder.push("MATCH").push_bytes(pattern);
    }
    if let Some(count) = options.count {
        builder = builder.push("COUNT").push_int(count);
    }
    Command::new(RequestType::ZScan, builder.build())
}

#[cfg(test)]
mod test;
