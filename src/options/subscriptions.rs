use std::collections::HashSet;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The three subscription kinds C8 tracks: exact channel, glob pattern, and
/// sharded channel (cluster-only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubscriptionKind {
    Exact,
    Pattern,
    Sharded,
}

/// The subscription set carried in the connection-request frame (§4.6):
/// exact channels, glob patterns, and — cluster mode only — sharded channels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionTable {
    pub exact_channels: HashSet<Bytes>,
    pub patterns: HashSet<Bytes>,
    pub sharded_channels: HashSet<Bytes>,
}

impl SubscriptionTable {
    pub fn is_empty(&self) -> bool {
        self.exact_channels.is_empty() && self.patterns.is_empty() && self.sharded_channels.is_empty()
    }

    /// §4.4's "subscriptions must not include sharded channels outside
    /// cluster mode".
    pub fn validate(&self, cluster_mode: bool) -> Result<()> {
        if !cluster_mode && !self.sharded_channels.is_empty() {
            return Err(Error::validation(
                "sharded channel subscriptions require cluster mode",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn sharded_channels_outside_cluster_mode_are_rejected() {
        let mut table = SubscriptionTable::default();
        table.sharded_channels.insert(Bytes::from_static(b"shard-chan"));
        assert!(table.validate(false).is_err());
        assert!(table.validate(true).is_ok());
    }

    #[test]
    fn empty_table_validates_regardless_of_cluster_mode() {
        let table = SubscriptionTable::default();
        assert!(table.validate(false).is_ok());
    }
}
