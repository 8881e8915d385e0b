//! Caller-intent message shapes and normalization into the canonical record

use super::record::LogRecord;
use super::severity::Severity;
use serde_json::Value;
use std::error::Error;

/// The three shapes a caller's primary argument can take.
///
/// The dynamic shape is resolved once, here, at the normalizer boundary;
/// every sink downstream consumes only the canonical [`LogRecord`].
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// A display-ready scalar message, used as-is.
    Text(String),
    /// A non-error structured value, dumped as compact JSON.
    Structured(Value),
    /// An error-like value carrying a stack trace.
    Failure { stack: String },
}

impl Message {
    /// Build a failure message from an error and its `source()` chain.
    ///
    /// The rendered text stands in for a stack trace: the error's display
    /// line followed by one `caused by:` line per source.
    pub fn from_error(err: &(dyn Error + 'static)) -> Self {
        let mut stack = format!("Error: {}", err);
        let mut source = err.source();
        while let Some(cause) = source {
            stack.push_str(&format!("\n    caused by: {}", cause));
            source = cause.source();
        }
        Message::Failure { stack }
    }

    /// Build a failure message from pre-rendered stack text, for callers
    /// that captured a real backtrace themselves.
    pub fn failure(stack: impl Into<String>) -> Self {
        Message::Failure { stack: stack.into() }
    }
}

impl From<&str> for Message {
    fn from(s: &str) -> Self {
        Message::Text(s.to_string())
    }
}

impl From<String> for Message {
    fn from(s: String) -> Self {
        Message::Text(s)
    }
}

impl From<Value> for Message {
    fn from(value: Value) -> Self {
        Message::Structured(value)
    }
}

/// Convert one heterogeneous log call into the canonical record.
///
/// Classification, in order:
/// 1. error-like → message is the stack text, `stack` the trimmed lines;
/// 2. structured value → message is a compact JSON dump of the value
///    (an error nested inside a structured value is serialized as part of
///    the dump, it does not promote the call to rule 1);
/// 3. scalar text → used as-is.
///
/// `extra` attaches only when non-empty; runs exactly once per log call
/// regardless of how many sinks the logger owns.
pub fn normalize(level: Severity, message: Message, extra: Vec<Value>) -> LogRecord {
    let mut record = match message {
        Message::Failure { stack } => {
            let lines: Vec<String> = stack.lines().map(|l| l.trim().to_string()).collect();
            LogRecord::new(level, stack).with_stack(lines)
        }
        Message::Structured(value) => {
            let dump = serde_json::to_string(&value)
                .unwrap_or_else(|_| format!("{:?}", value));
            LogRecord::new(level, dump)
        }
        Message::Text(text) => LogRecord::new(level, text),
    };

    if !extra.is_empty() {
        record = record.with_extra(extra);
    }

    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_text_no_extras() {
        let record = normalize(Severity::Info, "disk low".into(), vec![]);
        assert_eq!(record.message, "disk low");
        assert!(record.stack.is_none());
        assert!(record.extra.is_none());
    }

    #[test]
    fn test_failure_splits_trimmed_lines() {
        let msg = Message::failure("Error: disk full\n    at mount\n    at sync  ");
        let record = normalize(Severity::Error, msg, vec![]);
        let stack = record.stack.unwrap();
        assert_eq!(stack, vec!["Error: disk full", "at mount", "at sync"]);
        assert!(record.message.starts_with("Error: disk full"));
    }

    #[test]
    fn test_from_error_walks_source_chain() {
        #[derive(Debug, thiserror::Error)]
        #[error("outer failed")]
        struct Outer {
            #[source]
            inner: std::io::Error,
        }

        let err = Outer {
            inner: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        };
        let record = normalize(Severity::Crit, Message::from_error(&err), vec![]);
        let stack = record.stack.unwrap();
        assert_eq!(stack[0], "Error: outer failed");
        assert_eq!(stack[1], "caused by: disk full");
    }

    #[test]
    fn test_structured_value_is_dumped() {
        let record = normalize(
            Severity::Warning,
            json!({"err": "broken pipe", "target": {"id": 7}}).into(),
            vec![],
        );
        // Structured dump, not rule 1: no stack even though a field smells like an error
        assert!(record.stack.is_none());
        let parsed: Value = serde_json::from_str(&record.message).unwrap();
        assert_eq!(parsed["err"], "broken pipe");
        assert_eq!(parsed["target"]["id"], 7);
    }

    #[test]
    fn test_extras_preserved_in_call_order() {
        let record = normalize(
            Severity::Error,
            "disk full".into(),
            vec![json!("wang"), json!(3565), json!({"detail": {"name": "wang"}})],
        );
        let extra = record.extra.unwrap();
        assert_eq!(extra.len(), 3);
        assert_eq!(extra[0], json!("wang"));
        assert_eq!(extra[1], json!(3565));
        assert_eq!(extra[2]["detail"]["name"], "wang");
    }

    #[test]
    fn test_empty_extras_stay_absent() {
        let record = normalize(Severity::Debug, "quiet".into(), vec![]);
        assert!(record.extra.is_none());
        let json = record.to_json().unwrap();
        assert!(!json.contains("extra"));
    }
}
