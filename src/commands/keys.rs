//! Generic key-space commands: not itemized in the distilled spec's §4.1
//! encoding rules, but implied by its command catalogue (§4.2, GLOSSARY) and
//! needed by every other category's round-trip tests. See `SPEC_FULL.md` §C.1.

use bytes::Bytes;

use crate::{
    encoding::ArgBuilder,
    protocol::{Command, RequestType},
};

pub fn del(keys: impl IntoIterator<Item = Bytes>) -> Command {
    Command::new(RequestType::Del, ArgBuilder::new().extend(keys).build())
}

pub fn unlink(keys: impl IntoIterator<Item = Bytes>) -> Command {
    Command::new(RequestType::Unlink, ArgBuilder::new().extend(keys).build())
}

pub fn exists(keys: impl IntoIterator<Item = Bytes>) -> Command {
    Command::new(RequestType::Exists, ArgBuilder::new().extend(keys).build())
}

pub fn expire(key: Bytes, seconds: i64) -> Command {
    Command::new(
        RequestType::Expire,
        ArgBuilder::new().push_bytes(key).push_int(seconds).build(),
    )
}

pub fn pexpire(key: Bytes, millis: i64) -> Command {
    Command::new(
        RequestType::PExpire,
        ArgBuilder::new().push_bytes(key).push_int(millis).build(),
    )
}

pub fn expire_at(key: Bytes, unix_seconds: i64) -> Command {
    Command::new(
        RequestType::ExpireAt,
        ArgBuilder::new()
            .push_bytes(key)
            .push_int(unix_seconds)
            .build(),
    )
}

pub fn pexpire_at(key: Bytes, unix_millis: i64) -> Command {
    Command::new(
        RequestType::PExpireAt,
        ArgBuilder::new()
            .push_bytes(key)
            .push_int(unix_millis)
            .build(),
    )
}

pub fn ttl(key: Bytes) -> Command {
    Command::new(RequestType::Ttl, ArgBuilder::new().push_bytes(key).build())
}

pub fn pttl(key: Bytes) -> Command {
    Command::new(RequestType::PTtl, ArgBuilder::new().push_bytes(key).build())
}

pub fn persist(key: Bytes) -> Command {
    Command::new(
        RequestType::Persist,
        ArgBuilder::new().push_bytes(key).build(),
    )
}

pub fn key_type(key: Bytes) -> Command {
    Command::new(RequestType::Type, ArgBuilder::new().push_bytes(key).build())
}

pub fn rename(key: Bytes, new_key: Bytes) -> Command {
    Command::new(
        RequestType::Rename,
        ArgBuilder::new().push_bytes(key).push_bytes(new_key).build(),
    )
}

pub fn rename_nx(key: Bytes, new_key: Bytes) -> Command {
    Command::new(
        RequestType::RenameNx,
        ArgBuilder::new().push_bytes(key).push_bytes(new_key).build(),
    )
}

#[derive(Debug, Clone, Default)]
pub struct CopyOptions {
    pub destination_db: Option<i64>,
    pub replace: bool,
}

pub fn copy(source: Bytes, destination: Bytes, options: CopyOptions) -> Command {
    let mut builder = ArgBuilder::new().push_bytes(source).push_bytes(destination);
    if let Some(db) = options.destination_db {
        builder = builder.push("DB").push_int(db);
    }
    builder = builder.push_if(options.replace, "REPLACE");
    Command::new(RequestType::Copy, builder.build())
}

/// `SCAN cursor [MATCH pattern] [COUNT count] [TYPE type]`.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub match_pattern: Option<Bytes>,
    pub count: Option<i64>,
    pub type_filter: Option<Bytes>,
}

pub fn scan(cursor: u64, options: ScanOptions) -> Command {
    let mut builder = ArgBuilder::new().push_int(cursor as i64);
    if let Some(pattern) = options.match_pattern {
        builder = builder.push("MATCH").push_bytes(pattern);
    }
    if let Some(count) = options.count {
        builder = builder.push("COUNT").push_int(count);
    }
    if let Some(ty) = options.type_filter {
        builder = builder.push("TYPE").push_bytes(ty);
    }
    Command::new(RequestType::Scan, builder.build())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn del_accepts_multiple_keys_in_order() {
        let cmd = del([Bytes::from_static(b"a"), Bytes::from_static(b"b")]);
        assert_eq!(cmd.args, vec![Bytes::from_static(b"a"), Bytes::from_static(b"b")]);
    }

    #[test]
    fn copy_appends_db_and_replace_only_when_set() {
        let cmd = copy(
            Bytes::from_static(b"a"),
            Bytes::from_static(b"b"),
            CopyOptions {
                destination_db: Some(1),
                replace: true,
            },
        );
        assert_eq!(
            cmd.args,
            vec![
                Bytes::from_static(b"a"),
                Bytes::from_static(b"b"),
                Bytes::from_static(b"DB"),
                Bytes::from_static(b"1"),
                Bytes::from_static(b"REPLACE"),
            ]
        );
    }
}
