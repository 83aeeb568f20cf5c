//! Client Facade (C7): the two public entry points
//! ([`StandaloneClient`]/[`ClusterClient`]) a caller actually constructs, and
//! the shared internals both are built from (§4.7).
//!
//! Neither facade owns a socket. Construction takes an already-built
//! [`crate::multiplexer::Transport`] — wiring a real one up to a socket is
//! outside this crate's scope (§D Non-goals) — plus a [`ResolvedConfig`] from
//! the Connection Configuration Resolver (C5).

pub mod action;
pub mod cluster;
pub mod commands;
pub mod standalone;

pub use cluster::ClusterClient;
pub use commands::Commands;
pub use standalone::StandaloneClient;

pub use crate::protocol::RouteHint;

use std::sync::Arc;

use crate::{
    batch::Batch,
    decoder::{Decoder, ExpectedShape, Value},
    error::Result,
    multiplexer::{Multiplexer, TimeoutOverride, Transport},
    options::ResolvedConfig,
    protocol::Command,
    pubsub::{DeliveryMode, PubSubState},
};

/// The state both client facades share: one multiplexer connection, one
/// pub/sub subscription table, and the settings that produced them. Kept
/// internal so [`StandaloneClient`] and [`ClusterClient`] stay the only
/// public surfaces (§4.7 names these two and nothing else).
pub(crate) struct BaseClient {
    multiplexer: Arc<Multiplexer>,
    pubsub: Arc<PubSubState>,
    config: ResolvedConfig,
}

impl BaseClient {
    pub(crate) fn new(transport: Arc<dyn Transport>, decoder: Arc<dyn Decoder>, config: ResolvedConfig, mode: DeliveryMode) -> Self {
        let pubsub = Arc::new(PubSubState::new(mode));
        let multiplexer = Multiplexer::new(transport, decoder, config.request_timeout, Arc::clone(&pubsub));
        BaseClient {
            multiplexer,
            pubsub,
            config,
        }
    }

    pub(crate) fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    pub(crate) fn pubsub(&self) -> &PubSubState {
        &self.pubsub
    }

    pub(crate) async fn dispatch(
        &self,
        command: Command,
        expected: ExpectedShape,
        timeout_override: Option<TimeoutOverride>,
    ) -> Result<Value> {
        self.multiplexer.submit(command, expected, timeout_override).await
    }

    pub(crate) async fn dispatch_routed(
        &self,
        command: Command,
        expected: ExpectedShape,
        timeout_override: Option<TimeoutOverride>,
        route: Option<RouteHint>,
    ) -> Result<Value> {
        self.multiplexer.submit_routed(command, expected, timeout_override, route).await
    }

    pub(crate) async fn dispatch_batch(&self, batch: Batch) -> Result<Vec<Result<Value>>> {
        self.multiplexer.submit_batch(batch, None).await
    }

    pub(crate) async fn dispatch_batch_routed(
        &self,
        batch: Batch,
        route: Option<RouteHint>,
    ) -> Result<Vec<Result<Value>>> {
        self.multiplexer.submit_batch_routed(batch, None, route).await
    }
}
