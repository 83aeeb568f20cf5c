#![warn(missing_docs, rustdoc::missing_crate_level_docs)]
#![allow(clippy::match_like_matches_macro)]

//! Client-side command dispatch and multiplexing core for a Valkey/Redis
//! client library.
//!
//! This crate does not speak RESP, does not route cluster slots, and does
//! not own a socket. It is the part of a client that sits *above* the
//! native transport: it turns typed, option-rich requests into canonical
//! wire-argument vectors ([`encoding`], [`commands`]), assembles them into
//! transactions or pipelines ([`batch`]), and multiplexes concurrently
//! submitted requests over a single channel to that transport
//! ([`multiplexer`]), routing responses back to the right caller.
//!
//! Reading order, leaves first: [`encoding`] and [`protocol`] define the
//! wire-argument and command-record shapes; [`commands`] is the factory
//! family that produces them; [`batch`] assembles factory output into
//! atomic transactions or pipelines; [`options`] resolves connection
//! settings; [`multiplexer`] owns the IPC channel and callback-slot table;
//! [`client`] is the public facade built on top of all of the above.

pub mod batch;
pub mod client;
pub mod commands;
pub mod decoder;
pub mod encoding;
pub mod error;
pub mod multiplexer;
pub mod options;
pub mod protocol;
pub mod pubsub;
pub mod telemetry;

#[cfg(feature = "test-util")]
pub mod testing;

pub use batch::{Batch, RetryStrategy};
pub use client::{ClusterClient, RouteHint, StandaloneClient};
pub use decoder::{BytesDecoder, Decoder, Utf8Decoder, Value};
pub use error::{Error, ErrorKind, Result};
pub use options::{ConnectionConfig, ResolvedConfig};
