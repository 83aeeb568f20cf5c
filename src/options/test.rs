use super::*;

fn base_config() -> ConnectionConfig {
    ConnectionConfig::builder()
        .addresses(vec![NodeAddress::new("localhost", 6379)])
        .build()
}

#[test]
fn minimal_config_resolves_with_defaults() {
    let resolved = base_config().resolve().unwrap();
    assert_eq!(resolved.protocol_version, ProtocolVersion::Resp3);
    assert_eq!(resolved.read_from, ReadFrom::Primary);
    assert!(!resolved.cluster_mode);
    assert!(resolved.subscriptions.is_empty());
}

#[test]
fn empty_address_list_is_rejected() {
    let config = ConnectionConfig::builder().addresses(Vec::new()).build();
    assert!(config.resolve().is_err());
}

#[test]
fn sharded_subscription_outside_cluster_mode_fails_resolve() {
    let mut subscriptions = SubscriptionTable::default();
    subscriptions
        .sharded_channels
        .insert(bytes::Bytes::from_static(b"shard-chan"));

    let config = ConnectionConfig::builder()
        .addresses(vec![NodeAddress::new("localhost", 6379)])
        .subscriptions(subscriptions)
        .build();

    assert!(config.resolve().is_err());
}

#[test]
fn invalid_backoff_fails_resolve() {
    let config = ConnectionConfig::builder()
        .addresses(vec![NodeAddress::new("localhost", 6379)])
        .backoff(BackoffStrategy {
            num_retries: 3,
            factor: 100,
            exponent_base: 0,
        })
        .build();

    assert!(config.resolve().is_err());
}
