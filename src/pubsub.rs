//! Pub/Sub State (C8): tracks per-channel and per-pattern subscriptions and
//! delivers incoming published messages to whichever delivery mode was
//! chosen at connect time (§4.6, §9's "pick one at connect time and hold it
//! for the connection's lifetime").

use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use bytes::Bytes;
use tokio::sync::mpsc;

/// A published message as delivered to a subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PubSubMessage {
    pub channel: Bytes,
    pub payload: Bytes,
    /// Set when the message arrived through a pattern subscription; carries
    /// the pattern that matched, distinct from `channel`.
    pub pattern: Option<Bytes>,
}

/// How incoming pub/sub messages reach application code, chosen once at
/// connect time and never switched mid-connection (§9).
pub enum DeliveryMode {
    /// Push mode: every message is handed to this callback inline, on the
    /// reader task. The callback must not block.
    Callback(Arc<dyn Fn(PubSubMessage) + Send + Sync>),
    /// Pull mode: messages accumulate in an unbounded queue, drained by
    /// [`PubSubState::get_pubsub_message`]/[`PubSubState::try_get_pubsub_message`].
    Queue,
}

impl std::fmt::Debug for DeliveryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryMode::Callback(_) => f.write_str("DeliveryMode::Callback(..)"),
            DeliveryMode::Queue => f.write_str("DeliveryMode::Queue"),
        }
    }
}

/// The three subscription kinds from §4.6, held together under one lock so
/// a subscribe/unsubscribe update is atomic with respect to a concurrently
/// arriving pub/sub frame.
#[derive(Debug, Default)]
struct Subscriptions {
    exact_channels: HashSet<Bytes>,
    patterns: HashSet<Bytes>,
    sharded_channels: HashSet<Bytes>,
}

/// Queue backlog past which [`PubSubState::deliver`] logs a warning that no
/// drainer appears to be active, per §4.6's "logs a warning but does not
/// back-pressure the transport".
const UNDRAINED_QUEUE_WARN_THRESHOLD: usize = 1_000;

/// Owns one connection's subscription table and inbound message delivery.
pub struct PubSubState {
    subscriptions: Mutex<Subscriptions>,
    mode: DeliveryMode,
    queue_tx: mpsc::UnboundedSender<PubSubMessage>,
    queue_rx: tokio::sync::Mutex<mpsc::UnboundedReceiver<PubSubMessage>>,
    queue_depth: AtomicUsize,
}

impl PubSubState {
    pub fn new(mode: DeliveryMode) -> Self {
        let (queue_tx, queue_rx) = mpsc::unbounded_channel();
        PubSubState {
            subscriptions: Mutex::new(Subscriptions::default()),
            mode,
            queue_tx,
            queue_rx: tokio::sync::Mutex::new(queue_rx),
            queue_depth: AtomicUsize::new(0),
        }
    }

    fn subs(&self) -> std::sync::MutexGuard<'_, Subscriptions> {
        self.subscriptions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn subscribe_exact(&self, channels: impl IntoIterator<Item = Bytes>) {
        self.subs().exact_channels.extend(channels);
    }

    pub fn unsubscribe_exact(&self, channels: impl IntoIterator<Item = Bytes>) {
        let mut subs = self.subs();
        for channel in channels {
            subs.exact_channels.remove(&channel);
        }
    }

    pub fn subscribe_pattern(&self, patterns: impl IntoIterator<Item = Bytes>) {
        self.subs().patterns.extend(patterns);
    }

    pub fn unsubscribe_pattern(&self, patterns: impl IntoIterator<Item = Bytes>) {
        let mut subs = self.subs();
        for pattern in patterns {
            subs.patterns.remove(&pattern);
        }
    }

    pub fn subscribe_sharded(&self, channels: impl IntoIterator<Item = Bytes>) {
        self.subs().sharded_channels.extend(channels);
    }

    pub fn unsubscribe_sharded(&self, channels: impl IntoIterator<Item = Bytes>) {
        let mut subs = self.subs();
        for channel in channels {
            subs.sharded_channels.remove(&channel);
        }
    }

    pub fn exact_channels(&self) -> HashSet<Bytes> {
        self.subs().exact_channels.clone()
    }

    pub fn patterns(&self) -> HashSet<Bytes> {
        self.subs().patterns.clone()
    }

    pub fn sharded_channels(&self) -> HashSet<Bytes> {
        self.subs().sharded_channels.clone()
    }

    /// Delivers one incoming pub/sub message, out-of-band from any command
    /// response, to whichever mode was chosen at construction.
    pub fn deliver(&self, message: PubSubMessage) {
        match &self.mode {
            DeliveryMode::Callback(callback) => callback(message),
            DeliveryMode::Queue => {
                let depth = self.queue_depth.fetch_add(1, Ordering::Relaxed) + 1;
                if depth == UNDRAINED_QUEUE_WARN_THRESHOLD {
                    tracing::warn!(
                        depth,
                        "pub/sub inbound queue has never been drained below its warn threshold; is a drainer registered?"
                    );
                }
                // An unbounded sender only fails once every receiver (and
                // thus this PubSubState) has been dropped.
                let _ = self.queue_tx.send(message);
            }
        }
    }

    /// Awaits the next queued message. Only meaningful in [`DeliveryMode::Queue`];
    /// under [`DeliveryMode::Callback`] the queue is never populated and this
    /// call parks until the connection closes.
    pub async fn get_pubsub_message(&self) -> Option<PubSubMessage> {
        let message = self.queue_rx.lock().await.recv().await;
        if message.is_some() {
            self.queue_depth.fetch_sub(1, Ordering::Relaxed);
        }
        message
    }

    /// Non-blocking drain of the next queued message, if any.
    pub fn try_get_pubsub_message(&self) -> Option<PubSubMessage> {
        let mut rx = self.queue_rx.try_lock().ok()?;
        match rx.try_recv() {
            Ok(message) => {
                self.queue_depth.fetch_sub(1, Ordering::Relaxed);
                Some(message)
            }
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod test;
