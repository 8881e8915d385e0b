//! Core logger types and traits

pub mod error;
pub mod logger;
pub mod message;
pub mod metrics;
pub mod record;
pub mod severity;
pub mod sink;

pub use error::{LoggerError, Result};
pub use logger::{ErrorHandler, Logger, LoggerBuilder, DEFAULT_SHUTDOWN_TIMEOUT};
pub use message::{normalize, Message};
pub use metrics::LoggerMetrics;
pub use record::LogRecord;
pub use severity::Severity;
pub use sink::Sink;
