//! Server/management command factories.

use bytes::Bytes;

use crate::{
    encoding::ArgBuilder,
    protocol::{Command, RequestType},
};

pub fn ping(message: Option<Bytes>) -> Command {
    let mut builder = ArgBuilder::new();
    if let Some(message) = message {
        builder = builder.push_bytes(message);
    }
    Command::new(RequestType::Ping, builder.build())
}

pub fn echo(message: Bytes) -> Command {
    Command::new(RequestType::Echo, ArgBuilder::new().push_bytes(message).build())
}

pub fn dbsize() -> Command {
    Command::new(RequestType::DbSize, Vec::new())
}

/// `SYNC`/`ASYNC` trailing token, matching §4.1's flush-mode rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushMode {
    Sync,
    Async,
}

pub fn flushall(mode: Option<FlushMode>) -> Command {
    Command::new(RequestType::FlushAll, flush_mode_args(mode))
}

pub fn flushdb(mode: Option<FlushMode>) -> Command {
    Command::new(RequestType::FlushDb, flush_mode_args(mode))
}

fn flush_mode_args(mode: Option<FlushMode>) -> Vec<Bytes> {
    match mode {
        Some(FlushMode::Sync) => vec![Bytes::from_static(b"SYNC")],
        Some(FlushMode::Async) => vec![Bytes::from_static(b"ASYNC")],
        None => Vec::new(),
    }
}

/// `INFO [section ...]`: section enumeration, matching §4.1's info-mode rule.
pub fn info(sections: impl IntoIterator<Item = Bytes>) -> Command {
    Command::new(RequestType::Info, ArgBuilder::new().extend(sections).build())
}

pub fn client_getname() -> Command {
    Command::new(RequestType::ClientGetName, Vec::new())
}

pub fn client_setname(name: Bytes) -> Command {
    Command::new(RequestType::ClientSetName, ArgBuilder::new().push_bytes(name).build())
}

pub fn config_get(parameters: impl IntoIterator<Item = Bytes>) -> Command {
    Command::new(RequestType::ConfigGet, ArgBuilder::new().extend(parameters).build())
}

pub fn config_set(pairs: impl IntoIterator<Item = (Bytes, Bytes)>) -> Command {
    let mut builder = ArgBuilder::new();
    for (param, value) in pairs {
        builder = builder.push_bytes(param).push_bytes(value);
    }
    Command::new(RequestType::ConfigSet, builder.build())
}

pub fn cluster_info() -> Command {
    Command::new(RequestType::ClusterInfo, Vec::new())
}

pub fn time() -> Command {
    Command::new(RequestType::Time, Vec::new())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn dbsize_has_no_arguments() {
        assert!(dbsize().args.is_empty());
    }

    #[test]
    fn flushall_emits_mode_token_only_when_given() {
        assert!(flushall(None).args.is_empty());
        assert_eq!(
            flushall(Some(FlushMode::Async)).args,
            vec![Bytes::from_static(b"ASYNC")]
        );
    }
}
