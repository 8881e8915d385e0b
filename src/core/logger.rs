//! Fan-out logger implementation

use super::{
    error::{LoggerError, Result},
    message::{normalize, Message},
    metrics::LoggerMetrics,
    severity::Severity,
    sink::Sink,
};
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Default shutdown timeout for logger cleanup (5 seconds)
///
/// This timeout bounds the final best-effort flush when the logger is
/// dropped without explicit shutdown. For custom timeout control, use the
/// `shutdown()` method instead.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Callback invoked when a sink fails to emit or flush a record.
pub type ErrorHandler = Arc<dyn Fn(&LoggerError) + Send + Sync>;

fn default_error_handler() -> ErrorHandler {
    Arc::new(|err| {
        eprintln!("[LOGGER ERROR] {}", err);
    })
}

/// Fans each log call out to an ordered set of sinks.
///
/// One call is normalized exactly once into a canonical record, then
/// offered to every sink in registration order; each sink gates the
/// record against its own threshold. A failing sink is reported through
/// the error handler and never prevents later sinks from receiving the
/// record.
pub struct Logger {
    sinks: Arc<RwLock<Vec<Box<dyn Sink>>>>,
    metrics: Arc<LoggerMetrics>,
    on_sink_error: ErrorHandler,
}

impl Logger {
    #[must_use]
    pub fn new() -> Self {
        Self {
            sinks: Arc::new(RwLock::new(Vec::new())),
            metrics: Arc::new(LoggerMetrics::new()),
            on_sink_error: default_error_handler(),
        }
    }

    pub fn add_sink(&mut self, sink: Box<dyn Sink>) {
        let mut sinks = self.sinks.write();
        sinks.push(sink);
    }

    /// Replace the handler that receives sink emission failures.
    pub fn set_error_handler(&mut self, handler: ErrorHandler) {
        self.on_sink_error = handler;
    }

    /// Normalize one call and offer the record to every sink.
    ///
    /// Never returns an error and never panics on a sink failure; runtime
    /// sink errors go to the error handler.
    pub fn log(&self, level: Severity, message: impl Into<Message>, extra: Vec<Value>) {
        let record = normalize(level, message.into(), extra);
        self.metrics.record_offered();

        let mut sinks = self.sinks.write();
        for sink in sinks.iter_mut() {
            if !sink.accepts(level) {
                continue;
            }
            match sink.emit(&record) {
                Ok(()) => {
                    self.metrics.record_emitted();
                }
                Err(e) => {
                    self.metrics.record_sink_failure();
                    (self.on_sink_error)(&e);
                }
            }
        }
    }

    #[inline]
    pub fn emerg(&self, message: impl Into<Message>) {
        self.log(Severity::Emerg, message, Vec::new());
    }

    #[inline]
    pub fn alert(&self, message: impl Into<Message>) {
        self.log(Severity::Alert, message, Vec::new());
    }

    #[inline]
    pub fn crit(&self, message: impl Into<Message>) {
        self.log(Severity::Crit, message, Vec::new());
    }

    #[inline]
    pub fn error(&self, message: impl Into<Message>) {
        self.log(Severity::Error, message, Vec::new());
    }

    #[inline]
    pub fn warning(&self, message: impl Into<Message>) {
        self.log(Severity::Warning, message, Vec::new());
    }

    #[inline]
    pub fn notice(&self, message: impl Into<Message>) {
        self.log(Severity::Notice, message, Vec::new());
    }

    #[inline]
    pub fn info(&self, message: impl Into<Message>) {
        self.log(Severity::Info, message, Vec::new());
    }

    #[inline]
    pub fn debug(&self, message: impl Into<Message>) {
        self.log(Severity::Debug, message, Vec::new());
    }

    /// Flush every sink, reporting failures through the error handler.
    ///
    /// Returns `Err` with the last failure so callers that care can see
    /// that something went wrong; iteration always covers all sinks.
    pub fn flush(&self) -> Result<()> {
        let mut last_err = None;
        let mut sinks = self.sinks.write();
        for sink in sinks.iter_mut() {
            if let Err(e) = sink.flush() {
                (self.on_sink_error)(&e);
                last_err = Some(e);
            }
        }
        match last_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Get the logger metrics for observability.
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Gracefully shut the logger down within `timeout`.
    ///
    /// Flushes every sink; a sink whose flush involves a background
    /// worker (the remote sink) bounds its own drain by this timeout.
    /// Returns `true` if everything flushed cleanly.
    pub fn shutdown(&mut self, timeout: Duration) -> bool {
        let deadline = std::time::Instant::now() + timeout;
        let mut clean = true;

        let mut sinks = self.sinks.write();
        for sink in sinks.iter_mut() {
            if std::time::Instant::now() >= deadline {
                eprintln!(
                    "[LOGGER WARNING] Shutdown timeout reached before sink '{}' flushed. \
                     Some logs may be lost.",
                    sink.name()
                );
                clean = false;
                break;
            }
            if let Err(e) = sink.flush() {
                (self.on_sink_error)(&e);
                clean = false;
            }
        }

        clean
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        // Best-effort flush; the remote sink bounds its own worker join.
        if self.flush().is_err() {
            eprintln!("[LOGGER WARNING] Logger dropped with unflushed sink errors");
        }
    }
}

/// Builder for constructing a Logger with a fluent API
///
/// # Example
/// ```
/// use logfan::prelude::*;
///
/// let logger = Logger::builder()
///     .sink(ConsoleSink::new(Severity::Info))
///     .build();
/// logger.info("ready");
/// ```
pub struct LoggerBuilder {
    sinks: Vec<Box<dyn Sink>>,
    on_sink_error: Option<ErrorHandler>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            sinks: Vec::new(),
            on_sink_error: None,
        }
    }

    /// Add a sink; registration order is fan-out order.
    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    /// Set the handler for sink emission failures.
    #[must_use = "builder methods return a new value"]
    pub fn on_sink_error(mut self, handler: ErrorHandler) -> Self {
        self.on_sink_error = Some(handler);
        self
    }

    pub fn build(self) -> Logger {
        let mut logger = Logger::new();
        if let Some(handler) = self.on_sink_error {
            logger.set_error_handler(handler);
        }
        for sink in self.sinks {
            logger.add_sink(sink);
        }
        logger
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}
