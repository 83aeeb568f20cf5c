//! Connection Configuration Resolver (C5): validates and normalizes
//! user-supplied connection settings into a [`ResolvedConfig`] the
//! multiplexer's connection-request frame is built from. Construction is
//! infallible; all validation happens in [`ConnectionConfig::resolve`], so a
//! caller can build incrementally without a partially-validated struct ever
//! escaping (mirrors §3's "validation failure is raised before a record is
//! constructed" discipline applied to connection setup instead of commands).

mod backoff;
mod protocol_version;
mod read_from;
mod subscriptions;
mod telemetry;

pub use backoff::BackoffStrategy;
pub use protocol_version::ProtocolVersion;
pub use read_from::ReadFrom;
pub use subscriptions::{SubscriptionKind, SubscriptionTable};
pub use telemetry::{TelemetryConfig, TelemetryExporter};

use std::time::Duration;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::error::{Error, Result};

/// One server endpoint in the address list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeAddress {
    pub host: String,
    pub port: u16,
}

impl NodeAddress {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        NodeAddress { host: host.into(), port }
    }
}

/// Plaintext or TLS transport to the server(s).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TlsMode {
    #[default]
    NoTls,
    SecureTls,
    /// TLS without certificate verification, for local/test deployments.
    InsecureTls,
}

/// Username/password credential pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: String,
}

/// Builder for connection settings. Every field not marked `default` must be
/// supplied; fields with a `default` take the value a standalone, unencrypted,
/// single-node connection would use. No validation runs here — call
/// [`ConnectionConfig::resolve`] to get a validated [`ResolvedConfig`].
#[derive(Debug, Clone, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct ConnectionConfig {
    pub addresses: Vec<NodeAddress>,

    #[builder(default)]
    pub tls_mode: TlsMode,

    #[builder(default, setter(strip_option))]
    pub credentials: Option<Credentials>,

    #[builder(default)]
    pub read_from: ReadFrom,

    #[builder(default = ProtocolVersion::Resp3)]
    pub protocol_version: ProtocolVersion,

    #[builder(default = Duration::from_millis(250))]
    pub request_timeout: Duration,

    #[builder(default, setter(strip_option))]
    pub client_name: Option<String>,

    #[builder(default)]
    pub lazy_connect: bool,

    #[builder(default)]
    pub cluster_mode: bool,

    #[builder(default, setter(strip_option))]
    pub database_index: Option<i64>,

    #[builder(default)]
    pub backoff: BackoffStrategy,

    #[builder(default)]
    pub subscriptions: SubscriptionTable,

    #[builder(default, setter(strip_option))]
    pub client_az: Option<String>,

    #[builder(default, setter(strip_option))]
    pub telemetry: Option<TelemetryConfig>,

    #[builder(default = 1000)]
    pub inflight_limit: u32,
}

/// The validated, normalized form of a [`ConnectionConfig`], ready to seed
/// the multiplexer's connection-request frame (§6). Every field here has
/// already passed the checks in §4.4; no further validation is needed
/// downstream. `Serialize`/`Deserialize` let an embedder round-trip a
/// resolved configuration through an external representation (a debug dump,
/// a cached connection profile) without re-running `resolve()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedConfig {
    pub addresses: Vec<NodeAddress>,
    pub tls_mode: TlsMode,
    pub credentials: Option<Credentials>,
    pub read_from: ReadFrom,
    pub protocol_version: ProtocolVersion,
    pub request_timeout: Duration,
    pub client_name: Option<String>,
    pub lazy_connect: bool,
    pub cluster_mode: bool,
    pub database_index: Option<i64>,
    pub backoff: BackoffStrategy,
    pub subscriptions: SubscriptionTable,
    pub client_az: Option<String>,
    pub telemetry: Option<TelemetryConfig>,
    pub inflight_limit: u32,
}

impl ConnectionConfig {
    /// Validates the configuration against §4.4's rules, returning a
    /// [`ResolvedConfig`] on success. Checked, in order: the backoff curve,
    /// the telemetry sink (if configured), and the subscription table's
    /// cluster-mode constraint.
    pub fn resolve(self) -> Result<ResolvedConfig> {
        self.backoff.validate()?;
        if let Some(telemetry) = &self.telemetry {
            telemetry.validate()?;
        }
        self.subscriptions.validate(self.cluster_mode)?;
        if self.addresses.is_empty() {
            return Err(Error::validation("at least one address is required"));
        }

        Ok(ResolvedConfig {
            addresses: self.addresses,
            tls_mode: self.tls_mode,
            credentials: self.credentials,
            read_from: self.read_from,
            protocol_version: self.protocol_version,
            request_timeout: self.request_timeout,
            client_name: self.client_name,
            lazy_connect: self.lazy_connect,
            cluster_mode: self.cluster_mode,
            database_index: self.database_index,
            backoff: self.backoff,
            subscriptions: self.subscriptions,
            client_az: self.client_az,
            telemetry: self.telemetry,
            inflight_limit: self.inflight_limit,
        })
    }
}

#[cfg(test)]
mod test;
