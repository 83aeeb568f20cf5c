//! `WATCH`/`UNWATCH` command factories. `MULTI`/`EXEC`/`DISCARD` are emitted
//! directly by [`crate::batch::Batch`] when an atomic batch is assembled,
//! not by a standalone factory, since a caller never issues them in
//! isolation.

use bytes::Bytes;

use crate::{
    encoding::ArgBuilder,
    protocol::{Command, RequestType},
};

pub fn watch(keys: impl IntoIterator<Item = Bytes>) -> Command {
    Command::new(RequestType::Watch, ArgBuilder::new().extend(keys).build())
}

pub fn unwatch() -> Command {
    Command::new(RequestType::Unwatch, Vec::new())
}
