//! # Logfan
//!
//! A structured logging front-end that fans each log call out to multiple
//! heterogeneous sinks, each with its own severity threshold, formatting,
//! and delivery semantics.
//!
//! ## Features
//!
//! - **Multi-sink dispatch**: one call, normalized once, offered to every
//!   sink with per-sink threshold gating
//! - **Console sink**: synchronous, human-readable output
//! - **Remote sink**: batched, rate-limited delivery with error isolation;
//!   a flaky endpoint never crashes or blocks callers
//! - **Console capture**: redirect ambient print-style channels into the
//!   structured pipeline

pub mod capture;
pub mod config;
pub mod core;
pub mod factory;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::capture::{CaptureManager, Channel};
    pub use crate::config::{LoggerOptions, RemoteOptions, SinkOptions};
    pub use crate::core::{
        normalize, ErrorHandler, LogRecord, Logger, LoggerBuilder, LoggerError, LoggerMetrics,
        Message, Result, Severity, Sink, DEFAULT_SHUTDOWN_TIMEOUT,
    };
    pub use crate::factory::{Collaborators, GroupIdentity, LoggerFactory};
    pub use crate::sinks::{
        ConsoleSink, MemoryTransport, RecordBatch, RemoteSink, TcpTransport, Transport,
    };
}

pub use capture::{CaptureManager, Channel, PrintHandler};
pub use config::{LoggerOptions, RemoteOptions, SinkOptions};
pub use core::{
    normalize, ErrorHandler, LogRecord, Logger, LoggerBuilder, LoggerError, LoggerMetrics, Message,
    Result, Severity, Sink, DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use factory::{Collaborators, GroupIdentity, LoggerFactory};
pub use sinks::{
    ConsoleSink, MemoryTransport, RecordBatch, RemoteSink, RemoteSinkBuilder, TcpTransport,
    Transport, DEFAULT_MAX_PENDING, DEFAULT_UPLOAD_INTERVAL,
};
