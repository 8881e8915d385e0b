//! Sink option records consumed by the logger factory

use crate::core::Severity;
use serde::{Deserialize, Serialize};

fn default_region() -> String {
    "ap-northeast-2".to_string()
}

fn default_upload_interval_ms() -> u64 {
    15_000
}

/// Threshold for a single local sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkOptions {
    pub level: Severity,
}

/// Remote aggregation sink options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteOptions {
    pub level: Severity,
    /// Location identifier of the aggregation endpoint.
    #[serde(default = "default_region")]
    pub region: String,
    /// Collector address; derived from the region when absent.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Delivery cadence in milliseconds; must be positive.
    #[serde(default = "default_upload_interval_ms")]
    pub upload_interval_ms: u64,
}

/// Per-sink thresholds and remote addressing, as supplied by whatever
/// configuration mechanism the host application uses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggerOptions {
    /// Reserved for a future local-file sink; carried but currently unused.
    pub file: SinkOptions,
    pub console: SinkOptions,
    pub remote: RemoteOptions,
}

impl Default for LoggerOptions {
    fn default() -> Self {
        Self {
            file: SinkOptions {
                level: Severity::Error,
            },
            console: SinkOptions {
                level: Severity::Info,
            },
            remote: RemoteOptions {
                level: Severity::Error,
                region: default_region(),
                endpoint: None,
                upload_interval_ms: default_upload_interval_ms(),
            },
        }
    }
}
