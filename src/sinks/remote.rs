//! Remote aggregation sink with batched background delivery
//!
//! `emit` only appends to an in-memory pending buffer and returns; a
//! background worker drains the buffer on a fixed interval and hands each
//! batch to a [`Transport`]. Delivery is at-most-once: a failed batch is
//! not re-queued, the failure goes to a configurable error handler so
//! future logging stays available.

use crate::core::{
    ErrorHandler, LogRecord, LoggerError, LoggerMetrics, Result, Severity, Sink,
    DEFAULT_SHUTDOWN_TIMEOUT,
};
use crossbeam_channel::{bounded, Sender};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::io::Write;
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Default delivery cadence, matching the common aggregation upload rate.
pub const DEFAULT_UPLOAD_INTERVAL: Duration = Duration::from_millis(15_000);

/// Bound on the pending buffer. Past this, the oldest record is evicted
/// so the freshest diagnostics survive sustained endpoint failure.
pub const DEFAULT_MAX_PENDING: usize = 10_000;

/// One drained batch, serialized and addressed for delivery.
#[derive(Debug, Clone)]
pub struct RecordBatch {
    pub region: String,
    pub group_name: String,
    pub stream_name: String,
    /// Compact JSON rendition of each canonical record, in buffer order.
    pub events: Vec<String>,
}

/// Seam between the sink's batching loop and the network.
pub trait Transport: Send + Sync {
    fn deliver(&self, batch: &RecordBatch) -> Result<()>;
}

/// Transport double that records every delivered batch in memory.
///
/// Flip `fail_next` (or construct with `failing()`) to simulate an
/// unreachable endpoint.
pub struct MemoryTransport {
    pub batches: Mutex<Vec<RecordBatch>>,
    failing: std::sync::atomic::AtomicBool,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self {
            batches: Mutex::new(Vec::new()),
            failing: std::sync::atomic::AtomicBool::new(false),
        }
    }

    pub fn failing() -> Self {
        let t = Self::new();
        t.failing.store(true, std::sync::atomic::Ordering::SeqCst);
        t
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn delivered(&self) -> Vec<RecordBatch> {
        self.batches.lock().clone()
    }
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for MemoryTransport {
    fn deliver(&self, batch: &RecordBatch) -> Result<()> {
        if self.failing.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(LoggerError::delivery(
                &batch.group_name,
                &batch.stream_name,
                "endpoint unavailable",
            ));
        }
        self.batches.lock().push(batch.clone());
        Ok(())
    }
}

/// TCP transport sending each batch as one newline-delimited JSON envelope.
///
/// Connects lazily on the first delivery so constructing a logger never
/// depends on network availability; reconnects once on a write failure
/// before giving the batch up.
pub struct TcpTransport {
    stream: Mutex<Option<TcpStream>>,
    address: String,
}

impl TcpTransport {
    pub fn new(addr: impl ToSocketAddrs + ToString) -> Self {
        Self {
            stream: Mutex::new(None),
            address: addr.to_string(),
        }
    }

    fn connect(address: &str) -> Result<TcpStream> {
        let stream = TcpStream::connect(address)?;
        stream.set_write_timeout(Some(Duration::from_secs(5)))?;
        stream.set_nodelay(true)?;
        Ok(stream)
    }

    fn encode(batch: &RecordBatch) -> Result<Vec<u8>> {
        let events: Vec<serde_json::Value> = batch
            .events
            .iter()
            .map(|e| serde_json::from_str(e).unwrap_or(serde_json::Value::String(e.clone())))
            .collect();
        let envelope = serde_json::json!({
            "region": batch.region,
            "logGroupName": batch.group_name,
            "logStreamName": batch.stream_name,
            "logEvents": events,
        });
        let mut payload = serde_json::to_vec(&envelope)?;
        payload.push(b'\n');
        Ok(payload)
    }
}

impl Transport for TcpTransport {
    fn deliver(&self, batch: &RecordBatch) -> Result<()> {
        let payload = Self::encode(batch)?;

        let mut guard = self.stream.lock();
        if guard.is_none() {
            match Self::connect(&self.address) {
                Ok(stream) => *guard = Some(stream),
                Err(e) => {
                    return Err(LoggerError::delivery(
                        &batch.group_name,
                        &batch.stream_name,
                        format!("connect to '{}' failed: {}", self.address, e),
                    ))
                }
            }
        }

        let result = match guard.as_mut() {
            Some(stream) => stream.write_all(&payload).and_then(|_| stream.flush()),
            None => Err(std::io::Error::from(std::io::ErrorKind::NotConnected)),
        };

        match result {
            Ok(()) => Ok(()),
            Err(e) => {
                // Connection lost; reconnect once and resend
                *guard = None;
                match Self::connect(&self.address) {
                    Ok(mut stream) => {
                        stream.write_all(&payload)?;
                        stream.flush()?;
                        *guard = Some(stream);
                        Ok(())
                    }
                    Err(reconnect_err) => Err(LoggerError::delivery(
                        &batch.group_name,
                        &batch.stream_name,
                        format!("send failed: {} (reconnect: {})", e, reconnect_err),
                    )),
                }
            }
        }
    }
}

struct Shared {
    pending: Mutex<VecDeque<LogRecord>>,
    max_pending: usize,
    region: String,
    group_name: String,
    stream_name: String,
    transport: Arc<dyn Transport>,
    metrics: Arc<LoggerMetrics>,
    on_delivery_error: ErrorHandler,
}

impl Shared {
    /// Drain the pending buffer atomically and attempt one delivery.
    ///
    /// The batch either fully succeeds or fully fails as one operation;
    /// a failed batch is dropped, not re-queued.
    fn drain_and_deliver(&self) {
        let drained: Vec<LogRecord> = {
            let mut pending = self.pending.lock();
            pending.drain(..).collect()
        };
        if drained.is_empty() {
            return;
        }

        let mut events = Vec::with_capacity(drained.len());
        for record in &drained {
            match record.to_json() {
                Ok(json) => events.push(json),
                Err(e) => (self.on_delivery_error)(&e),
            }
        }
        if events.is_empty() {
            return;
        }

        let batch = RecordBatch {
            region: self.region.clone(),
            group_name: self.group_name.clone(),
            stream_name: self.stream_name.clone(),
            events,
        };

        match self.transport.deliver(&batch) {
            Ok(()) => {
                self.metrics.record_batch_delivered();
            }
            Err(e) => {
                self.metrics.record_batch_failed();
                (self.on_delivery_error)(&e);
            }
        }
    }
}

/// Asynchronous, batched, network-backed sink.
///
/// The group name is immutable after construction; build it with
/// [`RemoteSink::group_name_for`] when namespacing by package and
/// environment tier.
pub struct RemoteSink {
    threshold: Severity,
    shared: Arc<Shared>,
    shutdown_tx: Option<Sender<()>>,
    worker: Option<thread::JoinHandle<()>>,
}

impl RemoteSink {
    pub fn builder(
        group_name: impl Into<String>,
        stream_name: impl Into<String>,
        transport: Arc<dyn Transport>,
    ) -> RemoteSinkBuilder {
        RemoteSinkBuilder {
            threshold: Severity::Error,
            region: String::new(),
            group_name: group_name.into(),
            stream_name: stream_name.into(),
            transport,
            upload_interval: DEFAULT_UPLOAD_INTERVAL,
            max_pending: DEFAULT_MAX_PENDING,
            on_delivery_error: None,
        }
    }

    /// Remote group naming convention: `/{package}/{environment}/{group}`.
    pub fn group_name_for(package_name: &str, environment: &str, group_name: &str) -> String {
        format!("/{}/{}/{}", package_name, environment, group_name)
    }

    pub fn metrics(&self) -> Arc<LoggerMetrics> {
        Arc::clone(&self.shared.metrics)
    }

    /// Number of records currently waiting for the next delivery tick.
    pub fn pending_len(&self) -> usize {
        self.shared.pending.lock().len()
    }

    /// Stop the delivery worker within `timeout`, after a final drain.
    pub fn shutdown(&mut self, timeout: Duration) -> bool {
        drop(self.shutdown_tx.take());

        if let Some(handle) = self.worker.take() {
            let start = std::time::Instant::now();
            loop {
                if handle.is_finished() {
                    if handle.join().is_err() {
                        eprintln!("[LOGGER ERROR] Remote delivery worker panicked during shutdown");
                        return false;
                    }
                    break;
                }
                if start.elapsed() >= timeout {
                    eprintln!(
                        "[LOGGER WARNING] Remote delivery worker did not finish within {:?}. \
                         Some logs may be lost.",
                        timeout
                    );
                    return false;
                }
                thread::sleep(Duration::from_millis(10));
            }
        }
        true
    }
}

impl Sink for RemoteSink {
    fn threshold(&self) -> Severity {
        self.threshold
    }

    /// Copy the record into the pending buffer. Never blocks on I/O and
    /// never errors the caller; past `max_pending` the oldest pending
    /// record is evicted and counted in metrics.
    fn emit(&mut self, record: &LogRecord) -> Result<()> {
        let mut pending = self.shared.pending.lock();
        pending.push_back(record.clone());
        if pending.len() > self.shared.max_pending {
            pending.pop_front();
            self.shared.metrics.record_dropped();
        }
        Ok(())
    }

    /// Synchronous best-effort drain, used by logger flush/shutdown.
    fn flush(&mut self) -> Result<()> {
        self.shared.drain_and_deliver();
        Ok(())
    }

    fn name(&self) -> &str {
        "remote"
    }
}

impl Drop for RemoteSink {
    fn drop(&mut self) {
        self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
    }
}

pub struct RemoteSinkBuilder {
    threshold: Severity,
    region: String,
    group_name: String,
    stream_name: String,
    transport: Arc<dyn Transport>,
    upload_interval: Duration,
    max_pending: usize,
    on_delivery_error: Option<ErrorHandler>,
}

impl RemoteSinkBuilder {
    #[must_use = "builder methods return a new value"]
    pub fn threshold(mut self, threshold: Severity) -> Self {
        self.threshold = threshold;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn upload_interval(mut self, interval: Duration) -> Self {
        self.upload_interval = interval;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn max_pending(mut self, max_pending: usize) -> Self {
        self.max_pending = max_pending.max(1);
        self
    }

    /// Handler for delivery failures. Defaults to a stderr report so
    /// operators are not silently blind.
    #[must_use = "builder methods return a new value"]
    pub fn on_delivery_error(mut self, handler: ErrorHandler) -> Self {
        self.on_delivery_error = Some(handler);
        self
    }

    pub fn build(self) -> RemoteSink {
        let on_delivery_error = self.on_delivery_error.unwrap_or_else(|| {
            Arc::new(|err: &LoggerError| {
                eprintln!("[LOGGER ERROR] {}", err);
            })
        });

        let shared = Arc::new(Shared {
            pending: Mutex::new(VecDeque::new()),
            max_pending: self.max_pending,
            region: self.region,
            group_name: self.group_name,
            stream_name: self.stream_name,
            transport: self.transport,
            metrics: Arc::new(LoggerMetrics::new()),
            on_delivery_error,
        });

        let (shutdown_tx, shutdown_rx) = bounded::<()>(0);
        let worker_shared = Arc::clone(&shared);
        let interval = self.upload_interval;

        let worker = thread::spawn(move || loop {
            match shutdown_rx.recv_timeout(interval) {
                // Interval tick: drain whatever accumulated
                Err(crossbeam_channel::RecvTimeoutError::Timeout) => {
                    worker_shared.drain_and_deliver();
                }
                // Shutdown: final best-effort drain, then exit
                Ok(()) | Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                    worker_shared.drain_and_deliver();
                    break;
                }
            }
        });

        RemoteSink {
            threshold: self.threshold,
            shared,
            shutdown_tx: Some(shutdown_tx),
            worker: Some(worker),
        }
    }
}
