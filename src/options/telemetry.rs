use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Where trace/metric exporters send data. `File` is typically used for
/// local debugging; `Http`/`Grpc` target a collector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TelemetryExporter {
    Http { endpoint: String },
    Grpc { endpoint: String },
    File { path: String },
}

/// Observability configuration handed to [`crate::telemetry::init`] (C9).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    pub exporter: TelemetryExporter,
    pub sample_percentage: f64,
    pub flush_interval_ms: u64,
}

impl TelemetryConfig {
    /// §4.4's telemetry validation: `samplePercentage` in `[0, 100]`,
    /// `flushIntervalMs` positive, and a `file://` endpoint's parent
    /// directory must already exist (this crate does not create it).
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.sample_percentage) {
            return Err(Error::validation("sample_percentage must be within [0, 100]"));
        }
        if self.flush_interval_ms == 0 {
            return Err(Error::validation("flush_interval_ms must be positive"));
        }
        if let TelemetryExporter::File { path } = &self.exporter {
            let parent_exists = Path::new(path).parent().is_some_and(Path::exists);
            if !parent_exists {
                return Err(Error::validation(format!(
                    "telemetry file endpoint's parent directory does not exist: {path}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn sample_percentage_out_of_range_is_rejected() {
        let config = TelemetryConfig {
            exporter: TelemetryExporter::Http {
                endpoint: "http://localhost:4317".into(),
            },
            sample_percentage: 150.0,
            flush_interval_ms: 1000,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_flush_interval_is_rejected() {
        let config = TelemetryConfig {
            exporter: TelemetryExporter::Http {
                endpoint: "http://localhost:4317".into(),
            },
            sample_percentage: 10.0,
            flush_interval_ms: 0,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file_endpoint_parent_is_rejected() {
        let config = TelemetryConfig {
            exporter: TelemetryExporter::File {
                path: "/definitely/not/a/real/path/trace.log".into(),
            },
            sample_percentage: 10.0,
            flush_interval_ms: 1000,
        };
        assert!(config.validate().is_err());
    }
}
