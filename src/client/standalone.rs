//! [`StandaloneClient`]: the public entry point for a connection to a single
//! Valkey/Redis server (§4.7). Construction takes an already-built
//! [`Transport`] and [`Decoder`] — wiring either up to a real socket or byte
//! pipeline is outside this crate's scope (§D Non-goals) — plus a
//! [`ResolvedConfig`] produced by [`ConnectionConfig::resolve`](crate::options::ConnectionConfig::resolve).
//!
//! `StandaloneClient` is cheap to clone: cloning shares the same underlying
//! [`BaseClient`] (multiplexer, pub/sub state, resolved config) the way
//! every other connection handle in this crate shares its `Arc`-backed
//! internals, so a caller can hand a clone to each spawned task without
//! re-dialing.

use std::sync::Arc;

use bytes::Bytes;

use crate::{
    batch::Batch,
    client::{
        action::Set,
        commands::Dispatch,
        BaseClient,
    },
    commands::pubsub,
    decoder::{Decoder, ExpectedShape, Value},
    error::{Error, Result},
    multiplexer::{TimeoutOverride, Transport},
    options::ResolvedConfig,
    protocol::Command,
    pubsub::{DeliveryMode, PubSubMessage},
};

/// A connection to one non-cluster Valkey/Redis server.
///
/// ```no_run
/// # use valkey_glide_core::client::StandaloneClient;
/// # use valkey_glide_core::options::ConnectionConfig;
/// # async fn example(transport: std::sync::Arc<dyn valkey_glide_core::multiplexer::Transport>,
/// #                   decoder: std::sync::Arc<dyn valkey_glide_core::decoder::Decoder>) -> valkey_glide_core::error::Result<()> {
/// use valkey_glide_core::client::Commands;
/// use valkey_glide_core::options::NodeAddress;
///
/// let config = ConnectionConfig::builder()
///     .addresses(vec![NodeAddress::new("127.0.0.1", 6379)])
///     .build()
///     .resolve()?;
/// let client = StandaloneClient::new(transport, decoder, config);
/// client.set("a", "1").await?;
/// client.get(bytes::Bytes::from_static(b"a")).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct StandaloneClient {
    base: Arc<BaseClient>,
}

impl StandaloneClient {
    /// Builds a standalone client over an already-connected `transport`.
    /// Incoming pub/sub messages are delivered through the pull queue
    /// ([`DeliveryMode::Queue`]); use [`StandaloneClient::with_pubsub_callback`]
    /// to register a push callback instead.
    pub fn new(transport: Arc<dyn Transport>, decoder: Arc<dyn Decoder>, config: ResolvedConfig) -> Self {
        Self::with_delivery_mode(transport, decoder, config, DeliveryMode::Queue)
    }

    /// Like [`StandaloneClient::new`], but incoming pub/sub messages are
    /// handed to `callback` inline on the multiplexer's reader task instead
    /// of queued (§4.6, §9's "pick one at connect time").
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
        if config.cluster_mode {
            tracing::warn!("ConnectionConfig has cluster_mode set but StandaloneClient was requested; proceeding as standalone");
        }
        StandaloneClient {
            base: Arc::new(BaseClient::new(transport, decoder, config, mode)),
        }
    }

    pub(crate) fn base(&self) -> &BaseClient {
        &self.base
    }

    /// The resolved configuration this client was built from.
    pub fn config(&self) -> &ResolvedConfig {
        self.base.config()
    }

    /// Starts a deferred `SET` builder (§4.1). Chain option setters on the
    /// returned [`Set`], then `.await` it directly.
    pub fn set(&self, key: impl Into<Bytes>, value: impl Into<Bytes>) -> Set {
        Set::new(self.clone(), key.into(), value.into())
    }

    /// Exact-channel `SUBSCRIBE`, updating the local subscription table on
    /// success (§4.6). Use [`StandaloneClient::psubscribe`] for patterns.
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

    /// Blocks until the next pub/sub message arrives. Only meaningful under
    /// the pull-queue delivery mode; see [`crate::pubsub::PubSubState::get_pubsub_message`].
    pub async fn get_pubsub_message(&self) -> Option<PubSubMessage> {
        self.base.pubsub().get_pubsub_message().await
    }

    /// Non-blocking drain of the next queued pub/sub message, if any.
    pub fn try_get_pubsub_message(&self) -> Option<PubSubMessage> {
        self.base.pubsub().try_get_pubsub_message()
    }

    /// Selects a standalone database index with `SELECT`. Mirrors the
    /// `database_index` connection setting (§3's Connection State) for
    /// callers that need to switch databases mid-connection.
    pub async fn select(&self, index: i64) -> Result<Value> {
        if index < 0 {
            return Err(Error::validation("database index must be non-negative"));
        }
        let command = Command::new(
            crate::protocol::RequestType::Select,
            vec![Bytes::from(index.to_string())],
        );
        self.base.dispatch(command, ExpectedShape::Raw, None).await
    }
}

impl Dispatch for StandaloneClient {
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
