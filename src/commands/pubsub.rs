//! Pub/Sub command factories. These build the wire commands that update
//! subscription state post-connect; the subscription state itself (C8) lives
//! in [`crate::pubsub`].

use bytes::Bytes;

use crate::{
    encoding::ArgBuilder,
    protocol::{Command, RequestType},
};

pub fn subscribe(channels: impl IntoIterator<Item = Bytes>) -> Command {
    Command::new(RequestType::Subscribe, ArgBuilder::new().extend(channels).build())
}

pub fn unsubscribe(channels: impl IntoIterator<Item = Bytes>) -> Command {
    Command::new(RequestType::Unsubscribe, ArgBuilder::new().extend(channels).build())
}

pub fn psubscribe(patterns: impl IntoIterator<Item = Bytes>) -> Command {
    Command::new(RequestType::PSubscribe, ArgBuilder::new().extend(patterns).build())
}

pub fn punsubscribe(patterns: impl IntoIterator<Item = Bytes>) -> Command {
    Command::new(RequestType::PUnsubscribe, ArgBuilder::new().extend(patterns).build())
}

/// Sharded subscribe, cluster-only — the caller (C7) is responsible for
/// rejecting this outside cluster mode per §4.4's "subscriptions must not
/// include sharded channels outside cluster mode".
pub fn ssubscribe(shard_channels: impl IntoIterator<Item = Bytes>) -> Command {
    Command::new(RequestType::SSubscribe, ArgBuilder::new().extend(shard_channels).build())
}

pub fn sunsubscribe(shard_channels: impl IntoIterator<Item = Bytes>) -> Command {
    Command::new(RequestType::SUnsubscribe, ArgBuilder::new().extend(shard_channels).build())
}

pub fn publish(channel: Bytes, message: Bytes) -> Command {
    Command::new(
        RequestType::Publish,
        ArgBuilder::new().push_bytes(channel).push_bytes(message).build(),
    )
}

pub fn spublish(shard_channel: Bytes, message: Bytes) -> Command {
    Command::new(
        RequestType::SPublish,
        ArgBuilder::new().push_bytes(shard_channel).push_bytes(message).build(),
    )
}
