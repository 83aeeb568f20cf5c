// Telemetry's singleton is process-wide, so tests that drive `init` run
// serialized on a single lock rather than relying on test-harness ordering,
// which `#[test]` alone does not guarantee.
use std::sync::Mutex as StdMutex;

use super::*;
use crate::options::TelemetryExporter;

static SERIAL: StdMutex<()> = StdMutex::new(());

fn sample_config() -> TelemetryConfig {
    TelemetryConfig {
        exporter: TelemetryExporter::Http {
            endpoint: "http://localhost:4317".into(),
        },
        sample_percentage: 10.0,
        flush_interval_ms: 1000,
    }
}

#[test]
fn invalid_config_is_rejected_without_touching_the_singleton() {
    let _guard = SERIAL.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let mut config = sample_config();
    config.sample_percentage = 200.0;
    assert!(init(config).is_err());
}

#[test]
fn second_init_is_ignored_after_the_first_succeeds() {
    let _guard = SERIAL.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    // A prior test in this binary may have already initialized the
    // singleton; either way, a distinguishable second config must never
    // become `current()`.
    let _ = init(sample_config());
    assert!(is_initialized());

    let mut other = sample_config();
    other.flush_interval_ms = 99999;
    let performed = init(other).unwrap();
    assert!(!performed);
    assert_ne!(current().unwrap().flush_interval_ms, 99999);
}
