//! List command factories.

use bytes::Bytes;

use crate::{
    encoding::ArgBuilder,
    protocol::{Command, RequestType},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListEnd {
    Left,
    Right,
}

pub fn push(key: Bytes, end: ListEnd, values: impl IntoIterator<Item = Bytes>) -> Command {
    let request_type = match end {
        ListEnd::Left => RequestType::LPush,
        ListEnd::Right => RequestType::RPush,
    };
    Command::new(request_type, ArgBuilder::new().push_bytes(key).extend(values).build())
}

pub fn pop(key: Bytes, end: ListEnd, count: Option<i64>) -> Command {
    let request_type = match end {
        ListEnd::Left => RequestType::LPop,
        ListEnd::Right => RequestType::RPop,
    };
    let mut builder = ArgBuilder::new().push_bytes(key);
    if let Some(count) = count {
        builder = builder.push_int(count);
    }
    Command::new(request_type, builder.build())
}

pub fn lrange(key: Bytes, start: i64, stop: i64) -> Command {
    Command::new(
        RequestType::LRange,
        ArgBuilder::new()
            .push_bytes(key)
            .push_int(start)
            .push_int(stop)
            .build(),
    )
}

pub fn llen(key: Bytes) -> Command {
    Command::new(RequestType::LLen, ArgBuilder::new().push_bytes(key).build())
}

pub fn lrem(key: Bytes, count: i64, value: Bytes) -> Command {
    Command::new(
        RequestType::LRem,
        ArgBuilder::new()
            .push_bytes(key)
            .push_int(count)
            .push_bytes(value)
            .build(),
    )
}

pub fn lindex(key: Bytes, index: i64) -> Command {
    Command::new(
        RequestType::LIndex,
        ArgBuilder::new().push_bytes(key).push_int(index).build(),
    )
}

pub fn lset(key: Bytes, index: i64, value: Bytes) -> Command {
    Command::new(
        RequestType::LSet,
        ArgBuilder::new()
            .push_bytes(key)
            .push_int(index)
            .push_bytes(value)
            .build(),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    Before,
    After,
}

pub fn linsert(key: Bytes, position: InsertPosition, pivot: Bytes, value: Bytes) -> Command {
    let token = match position {
        InsertPosition::Before => "BEFORE",
        InsertPosition::After => "AFTER",
    };
    Command::new(
        RequestType::LInsert,
        ArgBuilder::new()
            .push_bytes(key)
            .push(token)
            .push_bytes(pivot)
            .push_bytes(value)
            .build(),
    )
}

/// A timeout of `0` is interpreted as "block indefinitely", per §8's
/// boundary behavior for blocking list/sorted-set pops, not "fail
/// immediately".
pub fn blocking_pop(
    keys: impl IntoIterator<Item = Bytes>,
    end: ListEnd,
    timeout_secs: f64,
) -> Command {
    let request_type = match end {
        ListEnd::Left => RequestType::BLPop,
        ListEnd::Right => RequestType::BRPop,
    };
    Command::new(
        request_type,
        ArgBuilder::new()
            .extend(keys)
            .push_float(timeout_secs)
            .build(),
    )
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn lrange_full_list_uses_negative_one() {
        let cmd = lrange(Bytes::from_static(b"l"), 0, -1);
        assert_eq!(
            cmd.args,
            vec![
                Bytes::from_static(b"l"),
                Bytes::from_static(b"0"),
                Bytes::from_static(b"-1"),
            ]
        );
    }

    #[test]
    fn blocking_pop_keeps_timeout_as_last_argument() {
        let cmd = blocking_pop(
            [Bytes::from_static(b"a"), Bytes::from_static(b"b")],
            ListEnd::Left,
            0.0,
        );
        assert_eq!(cmd.args.last().unwrap(), &Bytes::from_static(b"0"));
    }
}
