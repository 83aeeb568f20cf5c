//! HyperLogLog command factories.

use bytes::Bytes;

use crate::{
    encoding::ArgBuilder,
    protocol::{Command, RequestType},
};

pub fn pfadd(key: Bytes, elements: impl IntoIterator<Item = Bytes>) -> Command {
    Command::new(RequestType::PfAdd, ArgBuilder::new().push_bytes(key).extend(elements).build())
}

pub fn pfcount(keys: impl IntoIterator<Item = Bytes>) -> Command {
    Command::new(RequestType::PfCount, ArgBuilder::new().extend(keys).build())
}

pub fn pfmerge(destination: Bytes, sources: impl IntoIterator<Item = Bytes>) -> Command {
    Command::new(
        RequestType::PfMerge,
        ArgBuilder::new().push_bytes(destination).extend(sources).build(),
    )
}
