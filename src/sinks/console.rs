//! Console sink implementation

use crate::core::{LogRecord, LoggerError, Result, Severity, Sink};
#[cfg(feature = "console")]
use colored::Colorize;

/// Synchronous, human-oriented sink writing to standard output.
///
/// Fire-and-forget: no batching, no retry. A formatting failure degrades
/// to a fallback line carrying the record's level and timestamp and is
/// reported through the returned error; it never panics.
pub struct ConsoleSink {
    threshold: Severity,
    #[cfg(feature = "console")]
    use_colors: bool,
}

impl ConsoleSink {
    pub fn new(threshold: Severity) -> Self {
        Self {
            threshold,
            #[cfg(feature = "console")]
            use_colors: true,
        }
    }

    #[cfg(feature = "console")]
    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    fn level_tag(&self, level: Severity) -> String {
        #[cfg(feature = "console")]
        if self.use_colors {
            return level.to_str().color(level.color_code()).to_string();
        }
        level.to_str().to_string()
    }

    /// Render the full line set for one record.
    fn format_record(&self, record: &LogRecord) -> Result<String> {
        let mut out = format!("[{}] {}", self.level_tag(record.level), record.message);

        if let Some(ref stack) = record.stack {
            out.push_str("\nerror detail :");
            for line in stack {
                out.push_str("\n  ");
                out.push_str(line);
            }
        }

        if let Some(ref extra) = record.extra {
            let dump = serde_json::to_string_pretty(extra)
                .map_err(|e| LoggerError::format("console", e.to_string()))?;
            out.push_str("\nextra : ");
            out.push_str(&dump);
        }

        Ok(out)
    }
}

impl Sink for ConsoleSink {
    fn threshold(&self) -> Severity {
        self.threshold
    }

    fn emit(&mut self, record: &LogRecord) -> Result<()> {
        match self.format_record(record) {
            Ok(output) => {
                println!("{}", output);
                Ok(())
            }
            Err(e) => {
                // Keep the level/timestamp context even when formatting fails
                println!(
                    "[{}] {} <unformattable record: {}>",
                    record.level, record.timestamp, e
                );
                Err(e)
            }
        }
    }

    fn flush(&mut self) -> Result<()> {
        use std::io::Write;
        std::io::stdout().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
