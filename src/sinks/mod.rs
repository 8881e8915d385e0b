//! Sink implementations

pub mod console;
pub mod remote;

pub use console::ConsoleSink;
pub use remote::{
    MemoryTransport, RecordBatch, RemoteSink, RemoteSinkBuilder, TcpTransport, Transport,
    DEFAULT_MAX_PENDING, DEFAULT_UPLOAD_INTERVAL,
};

// Re-export the trait for convenience
pub use crate::core::Sink;
