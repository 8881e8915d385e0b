//! Sink trait for log record destinations

use super::{error::Result, record::LogRecord, severity::Severity};

/// An independent consumer of canonical log records.
///
/// Each sink carries its own severity threshold and delivery mechanism.
/// `emit` returning `Err` is reportable, never fatal: the logger routes it
/// to its error hook and continues with the remaining sinks.
pub trait Sink: Send + Sync {
    /// Least-severe level this sink still accepts.
    fn threshold(&self) -> Severity;

    /// Gate a record level against this sink's threshold.
    fn accepts(&self, level: Severity) -> bool {
        level.passes(self.threshold())
    }

    fn emit(&mut self, record: &LogRecord) -> Result<()>;

    fn flush(&mut self) -> Result<()>;

    fn name(&self) -> &str;
}
