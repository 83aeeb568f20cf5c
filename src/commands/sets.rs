//! Set command factories.

use bytes::Bytes;

use crate::{
    encoding::ArgBuilder,
    protocol::{Command, RequestType},
};

pub fn sadd(key: Bytes, members: impl IntoIterator<Item = Bytes>) -> Command {
    Command::new(RequestType::SAdd, ArgBuilder::new().push_bytes(key).extend(members).build())
}

pub fn srem(key: Bytes, members: impl IntoIterator<Item = Bytes>) -> Command {
    Command::new(RequestType::SRem, ArgBuilder::new().push_bytes(key).extend(members).build())
}

pub fn smembers(key: Bytes) -> Command {
    Command::new(RequestType::SMembers, ArgBuilder::new().push_bytes(key).build())
}

pub fn scard(key: Bytes) -> Command {
    Command::new(RequestType::SCard, ArgBuilder::new().push_bytes(key).build())
}

pub fn sismember(key: Bytes, member: Bytes) -> Command {
    Command::new(
        RequestType::SIsMember,
        ArgBuilder::new().push_bytes(key).push_bytes(member).build(),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOp {
    Inter,
    Union,
    Diff,
}

pub fn set_op(op: SetOp, keys: impl IntoIterator<Item = Bytes>) -> Command {
    let request_type = match op {
        SetOp::Inter => RequestType::SInter,
        SetOp::Union => RequestType::SUnion,
        SetOp::Diff => RequestType::SDiff,
    };
    Command::new(request_type, ArgBuilder::new().extend(keys).build())
}

pub fn set_op_store(
    op: SetOp,
    destination: Bytes,
    keys: impl IntoIterator<Item = Bytes>,
) -> Command {
    let request_type = match op {
        SetOp::Inter => RequestType::SInterStore,
        SetOp::Union => RequestType::SUnionStore,
        SetOp::Diff => RequestType::SDiffStore,
    };
    Command::new(
        request_type,
        ArgBuilder::new().push_bytes(destination).extend(keys).build(),
    )
}

#[derive(Debug, Clone, Default)]
pub struct SScanOptions {
    pub match_pattern: Option<Bytes>,
    pub count: Option<i64>,
}

pub fn sscan(key: Bytes, cursor: u64, options: SScanOptions) -> Command {
    let mut builder = ArgBuilder::new().push_bytes(key).push_int(cursor as i64);
    if let Some(pattern) = options.match_pattern {
        builder = builder.push("MATCH").push_bytes(pattern);
    }
    if let Some(count) = options.count {
        builder = builder.push("COUNT").push_int(count);
    }
    Command::new(RequestType::SScan, builder.build())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::commands::expects_set_decoding;

    #[test]
    fn sinter_is_flagged_for_set_decoding_but_store_variant_is_not() {
        let inter = set_op(SetOp::Inter, [Bytes::from_static(b"a")]);
        let store = set_op_store(SetOp::Inter, Bytes::from_static(b"d"), [Bytes::from_static(b"a")]);
        assert!(expects_set_decoding(inter.request_type));
        assert!(!expects_set_decoding(store.request_type));
    }
}
