//! Stream command factories. Stream entry IDs are opaque UTF-8 strings
//! (`ms-seq`) plus the `*` (server-assigned), `$` (last) and `>` (next
//! undelivered) sentinels (§3 "Stream Entry ID") — callers pass whichever
//! literal bytes the command they're calling expects; this module does not
//! re-validate the sentinel's meaning for a given context.

use bytes::Bytes;

use crate::{
    encoding::ArgBuilder,
    error::{Error, Result},
    protocol::{Command, RequestType},
};

/// The id argument to `XADD`: either server-assigned (`*`) or an explicit
/// `ms-seq` id supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamId {
    Auto,
    Explicit(Bytes),
}

impl StreamId {
    fn encode(&self) -> Bytes {
        match self {
            StreamId::Auto => Bytes::from_static(b"*"),
            StreamId::Explicit(id) => id.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exactness {
    /// `=`: trim to exactly the threshold.
    Exact,
    /// `~`: trim approximately, allowing the server to batch eviction.
    Approximate,
}

#[derive(Debug, Clone)]
pub enum TrimStrategy {
    MaxLen(i64),
    MinId(Bytes),
}

#[derive(Debug, Clone)]
pub struct TrimOptions {
    pub strategy: TrimStrategy,
    /// Mandatory whenever trimming is requested — the server grammar has no
    /// default for `=`/`~` (§4.1).
    pub exactness: Exactness,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct XAddOptions {
    pub nomkstream: bool,
    pub trim: Option<TrimOptions>,
}

/// `XADD key [NOMKSTREAM] [MAXLEN|MINID [=|~] threshold [LIMIT n]] (id|*) (field value)+`.
pub fn xadd(
    key: Bytes,
    id: StreamId,
    fields: impl IntoIterator<Item = (Bytes, Bytes)>,
    options: XAddOptions,
) -> Result<Command> {
    let fields: Vec<(Bytes, Bytes)> = fields.into_iter().collect();
    if fields.is_empty() {
        return Err(Error::validation("XADD requires at least one field/value pair"));
    }

    let mut builder = ArgBuilder::new().push_bytes(key);
    builder = builder.push_if(options.nomkstream, "NOMKSTREAM");
    if let Some(trim) = options.trim {
        let (keyword, threshold) = match trim.strategy {
            TrimStrategy::MaxLen(n) => ("MAXLEN", n.to_string()),
            TrimStrategy::MinId(id) => (
                "MINID",
                String::from_utf8_lossy(&id).into_owned(),
            ),
        };
        let exactness = match trim.exactness {
            Exactness::Exact => "=",
            Exactness::Approximate => "~",
        };
        builder = builder.push(keyword).push(exactness).push(threshold);
        if let Some(limit) = trim.limit {
            builder = builder.push("LIMIT").push_int(limit);
        }
    }
    builder = builder.push_bytes(id.encode());
    for (field, value) in fields {
        builder = builder.push_bytes(field).push_bytes(value);
    }
    Ok(Command::new(RequestType::XAdd, builder.build()))
}

/// `-`/`+` denote the smallest and largest possible stream IDs, matching
/// `XRANGE`'s open-ended boundary tokens.
pub const RANGE_MIN: &[u8] = b"-";
pub const RANGE_MAX: &[u8] = b"+";

pub fn xrange(key: Bytes, start: Bytes, end: Bytes, count: Option<i64>) -> Command {
    let mut builder = ArgBuilder::new().push_bytes(key).push_bytes(start).push_bytes(end);
    if let Some(count) = count {
        builder = builder.push("COUNT").push_int(count);
    }
    Command::new(RequestType::XRange, builder.build())
}

pub fn xlen(key: Bytes) -> Command {
    Command::new(RequestType::XLen, ArgBuilder::new().push_bytes(key).build())
}

pub fn xread(
    streams: impl IntoIterator<Item = (Bytes, Bytes)>,
    count: Option<i64>,
    block_millis: Option<i64>,
) -> Command {
    let streams: Vec<(Bytes, Bytes)> = streams.into_iter().collect();
    let mut builder = ArgBuilder::new();
    if let Some(count) = count {
        builder = builder.push("COUNT").push_int(count);
    }
    if let Some(block) = block_millis {
        builder = builder.push("BLOCK").push_int(block);
    }
    builder = builder.push("STREAMS");
    for (key, _) in &streams {
        builder = builder.push_bytes(key.clone());
    }
    for (_, id) in &streams {
        builder = builder.push_bytes(id.clone());
    }
    Command::new(RequestType::XRead, builder.build())
}

pub fn xdel(key: Bytes, ids: impl IntoIterator<Item = Bytes>) -> Command {
    Command::new(RequestType::XDel, ArgBuilder::new().push_bytes(key).extend(ids).build())
}

pub fn xtrim(key: Bytes, trim: TrimOptions) -> Command {
    let mut builder = ArgBuilder::new().push_bytes(key);
    let (keyword, threshold) = match trim.strategy {
        TrimStrategy::MaxLen(n) => ("MAXLEN", n.to_string()),
        TrimStrategy::MinId(id) => ("MINID", String::from_utf8_lossy(&id).into_owned()),
    };
    let exactness = match trim.exactness {
        Exactness::Exact => "=",
        Exactness::Approximate => "~",
    };
    builder = builder.push(keyword).push(exactness).push(threshold);
    if let Some(limit) = trim.limit {
        builder = builder.push("LIMIT").push_int(limit);
    }
    Command::new(RequestType::XTrim, builder.build())
}

pub fn xgroup_create(key: Bytes, group: Bytes, start_id: Bytes, mkstream: bool) -> Command {
    let mut builder = ArgBuilder::new()
        .push_bytes(key)
        .push_bytes(group)
        .push_bytes(start_id);
    builder = builder.push_if(mkstream, "MKSTREAM");
    Command::new(RequestType::XGroupCreate, builder.build())
}

pub fn xreadgroup(
    group: Bytes,
    consumer: Bytes,
    streams: impl IntoIterator<Item = (Bytes, Bytes)>,
    count: Option<i64>,
    block_millis: Option<i64>,
    no_ack: bool,
) -> Command {
    let streams: Vec<(Bytes, Bytes)> = streams.into_iter().collect();
    let mut builder = ArgBuilder::new()
        .push("GROUP")
        .push_bytes(group)
        .push_bytes(consumer);
    if let Some(count) = count {
        builder = builder.push("COUNT").push_int(count);
    }
    if let Some(block) = block_millis {
        builder = builder.push("BLOCK").push_int(block);
    }
    builder = builder.push_if(no_ack, "NOACK");
    builder = builder.push("STREAMS");
    for (key, _) in &streams {
        builder = builder.push_bytes(key.clone());
    }
    for (_, id) in &streams {
        builder = builder.push_bytes(id.clone());
    }
    Command::new(RequestType::XReadGroup, builder.build())
}

pub fn xack(key: Bytes, group: Bytes, ids: impl IntoIterator<Item = Bytes>) -> Command {
    Command::new(
        RequestType::XAck,
        ArgBuilder::new().push_bytes(key).push_bytes(group).extend(ids).build(),
    )
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn xadd_requires_at_least_one_field() {
        let err = xadd(Bytes::from_static(b"s"), StreamId::Auto, [], XAddOptions::default())
            .unwrap_err();
        assert!(matches!(
            err.kind(),
            crate::error::ErrorKind::ValidationError { .. }
        ));
    }

    #[test]
    fn xadd_emits_exactness_token_when_trimming() {
        let cmd = xadd(
            Bytes::from_static(b"s"),
            StreamId::Auto,
            [(Bytes::from_static(b"f"), Bytes::from_static(b"v"))],
            XAddOptions {
                trim: Some(TrimOptions {
                    strategy: TrimStrategy::MaxLen(1000),
                    exactness: Exactness::Approximate,
                    limit: None,
                }),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(
            cmd.args,
            vec![
                Bytes::from_static(b"s"),
                Bytes::from_static(b"MAXLEN"),
                Bytes::from_static(b"~"),
                Bytes::from_static(b"1000"),
                Bytes::from_static(b"*"),
                Bytes::from_static(b"f"),
                Bytes::from_static(b"v"),
            ]
        );
    }

    #[test]
    fn xread_groups_keys_before_ids() {
        let cmd = xread(
            [
                (Bytes::from_static(b"s1"), Bytes::from_static(b"0")),
                (Bytes::from_static(b"s2"), Bytes::from_static(b"$")),
            ],
            None,
            None,
        );
        assert_eq!(
            cmd.args,
            vec![
                Bytes::from_static(b"STREAMS"),
                Bytes::from_static(b"s1"),
                Bytes::from_static(b"s2"),
                Bytes::from_static(b"0"),
                Bytes::from_static(b"$"),
            ]
        );
    }
}
