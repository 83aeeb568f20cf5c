//! [`ClusterClient`]: the public entry point for a connection to a Valkey/Redis
//! cluster (§4.7). Identical construction and command surface to
//! [`StandaloneClient`](super::StandaloneClient) — both share
//! [`Commands`](super::Commands) — plus a small set of `_routed` methods for
//! the handful of operations (`FLUSHALL`-style fan-out, an explicit slot key
//! or node address) where a caller must pick a [`RouteHint`] by hand rather
//! than let the transport choose.

use std::sync::Arc;

use bytes::Bytes;

use crate::{
    batch::Batch,
    client::{commands::Dispatch, BaseClient},
    commands::{pubsub, server::FlushMode},
    decoder::{Decoder, ExpectedShape, Value},
    error::{Error, Result},
    multiplexer::{TimeoutOverride, Transport},
    options::ResolvedConfig,
    protocol::{Command, RouteHint},
    pubsub::{DeliveryMode, PubSubMessage},
};

/// A connection to a Valkey/Redis cluster.
///
/// Every method [`StandaloneClient`](super::StandaloneClient) has is also
/// available here through [`Commands`](super::Commands) and dispatches with
/// whatever routing the transport picks by default (typically the slot owner
/// for a single-key command). Use the `_routed` methods below, or
/// [`ClusterClient::send_routed`] directly, when the default routing is not
/// what's needed.
#[derive(Clone)]
pub struct ClusterClient {
    base: Arc<BaseClient>,
}

impl ClusterClient {
    /// Builds a cluster client over an already-connected `transport`.
    /// Incoming pub/sub messages are delivered through the pull queue; use
    /// [`ClusterClient::with_pubsub_callback`] to register a push callback
    /// instead.
    pub fn new(transport: Arc<dyn Transport>, decoder: Arc<dyn Decoder>, config: ResolvedConfig) -> Self {
        Self::with_delivery_mode(transport, decoder, config, DeliveryMode::Queue)
    }

    pub fn with_pubsub_callback(
        transport: Arc<dyn Transport>,
        decoder: Arc<dyn Decoder>,
        config: ResolvedConfig,
        callback: Arc<dyn Fn(PubSubMessage) + Send + Sync>,
    ) -> Self {
        Self::with_delivery_mode(transport, decoder, config, DeliveryMode::Callback(callback))
    }

    fn with_delivery_mode(
        transport: Arc<dyn Transport>,
        decoder: Arc<dyn Decoder>,
        config: ResolvedConfig,
        mode: DeliveryMode,
    ) -> Self {
        if !config.cluster_mode {
            tracing::warn!("ConnectionConfig does not have cluster_mode set but ClusterClient was requested; proceeding as cluster");
        }
        ClusterClient {
            base: Arc::new(BaseClient::new(transport, decoder, config, mode)),
        }
    }

    pub(crate) fn base(&self) -> &BaseClient {
        &self.base
    }

    pub fn config(&self) -> &ResolvedConfig {
        self.base.config()
    }

    /// Runs `command` with an explicit [`RouteHint`] instead of the
    /// transport's default routing (§4.7). The general-purpose escape hatch
    /// the named `_routed` convenience methods below are built on.
    pub async fn send_routed(&self, command: Command, expected: ExpectedShape, route: RouteHint) -> Result<Value> {
        self.base.dispatch_routed(command, expected, None, Some(route)).await
    }

    /// Runs a previously assembled [`Batch`] with an explicit routing hint.
    pub async fn exec_batch_routed(&self, batch: Batch, route: RouteHint) -> Result<Vec<Result<Value>>> {
        self.base.dispatch_batch_routed(batch, Some(route)).await
    }

    /// `FLUSHALL`, fanned out to every primary — the cluster-safe default
    /// for an administrative command that must run once per shard rather
    /// than against whichever single node the transport would otherwise
    /// pick (§4.1's "Info/flush modes").
    pub async fn flushall_routed(&self, mode: Option<FlushMode>, route: RouteHint) -> Result<Value> {
        self.send_routed(crate::commands::server::flushall(mode), ExpectedShape::Raw, route).await
    }

    pub async fn flushdb_routed(&self, mode: Option<FlushMode>, route: RouteHint) -> Result<Value> {
        self.send_routed(crate::commands::server::flushdb(mode), ExpectedShape::Raw, route).await
    }

    /// `PING` against an explicit node, e.g. for a health check against a
    /// specific address rather than the slot owner of any key.
    pub async fn ping_routed(&self, message: Option<Bytes>, route: RouteHint) -> Result<Value> {
        self.send_routed(crate::commands::server::ping(message), ExpectedShape::Raw, route).await
    }

    /// `CONFIG GET`, fanned out to every node — per-node config values can
    /// diverge across a cluster in ways a single-node view would hide.
    pub async fn config_get_routed(&self, parameters: impl IntoIterator<Item = Bytes>, route: RouteHint) -> Result<Value> {
        self.send_routed(crate::commands::server::config_get(parameters), ExpectedShape::Raw, route).await
    }

    pub async fn subscribe(&self, channels: impl IntoIterator<Item = Bytes>) -> Result<Value> {
        let channels: Vec<Bytes> = channels.into_iter().collect();
        let result = self.base.dispatch(pubsub::subscribe(channels.clone()), ExpectedShape::Raw, None).await?;
        self.base.pubsub().subscribe_exact(channels);
        Ok(result)
    }

    pub async fn unsubscribe(&self, channels: impl IntoIterator<Item = Bytes>) -> Result<Value> {
        let channels: Vec<Bytes> = channels.into_iter().collect();
        let result = self.base.dispatch(pubsub::unsubscribe(channels.clone()), ExpectedShape::Raw, None).await?;
        self.base.pubsub().unsubscribe_exact(channels);
        Ok(result)
    }

    pub async fn psubscribe(&self, patterns: impl IntoIterator<Item = Bytes>) -> Result<Value> {
        let patterns: Vec<Bytes> = patterns.into_iter().collect();
        let result = self.base.dispatch(pubsub::psubscribe(patterns.clone()), ExpectedShape::Raw, None).await?;
        self.base.pubsub().subscribe_pattern(patterns);
        Ok(result)
    }

    pub async fn punsubscribe(&self, patterns: impl IntoIterator<Item = Bytes>) -> Result<Value> {
        let patterns: Vec<Bytes> = patterns.into_iter().collect();
        let result = self.base.dispatch(pubsub::punsubscribe(patterns.clone()), ExpectedShape::Raw, None).await?;
        self.base.pubsub().unsubscribe_pattern(patterns);
        Ok(result)
    }

    /// Sharded `SSUBSCRIBE` (§4.6), cluster-only. Rejected with a
    /// [`crate::error::ErrorKind::ValidationError`] if this client's config
    /// is not in cluster mode, mirroring the same check the Connection
    /// Configuration Resolver applies to the startup subscription table
    /// (§4.4).
    pub async fn ssubscribe(&self, shard_channels: impl IntoIterator<Item = Bytes>) -> Result<Value> {
        if !self.base.config().cluster_mode {
            return Err(Error::validation("sharded subscriptions require cluster mode"));
        }
        let channels: Vec<Bytes> = shard_channels.into_iter().collect();
        let result = self.base.dispatch(pubsub::ssubscribe(channels.clone()), ExpectedShape::Raw, None).await?;
        self.base.pubsub().subscribe_sharded(channels);
        Ok(result)
    }

    pub async fn sunsubscribe(&self, shard_channels: impl IntoIterator<Item = Bytes>) -> Result<Value> {
        let channels: Vec<Bytes> = shard_channels.into_iter().collect();
        let result = self.base.dispatch(pubsub::sunsubscribe(channels.clone()), ExpectedShape::Raw, None).await?;
        self.base.pubsub().unsubscribe_sharded(channels);
        Ok(result)
    }

    pub async fn get_pubsub_message(&self) -> Option<PubSubMessage> {
        self.base.pubsub().get_pubsub_message().await
    }

    pub fn try_get_pubsub_message(&self) -> Option<PubSubMessage> {
        self.base.pubsub().try_get_pubsub_message()
    }
}

impl Dispatch for ClusterClient {
    fn send(
        &self,
        command: Command,
        expected: ExpectedShape,
        timeout_override: Option<TimeoutOverride>,
    ) -> impl std::future::Future<Output = Result<Value>> + Send {
        self.base.dispatch(command, expected, timeout_override)
    }

    fn send_batch(&self, batch: Batch) -> impl std::future::Future<Output = Result<Vec<Result<Value>>>> + Send {
        self.base.dispatch_batch(batch)
    }
}
