//! Redirects ambient print-style channels into a logger

use crate::core::{Logger, LoggerError, Message, Result, Severity};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;

/// The ambient print-style channels a capture can redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Debug,
    Log,
    Info,
    Warning,
    Error,
}

impl Channel {
    /// Logger severity each channel maps to while capturing.
    pub fn severity(&self) -> Severity {
        match self {
            Channel::Debug => Severity::Debug,
            Channel::Log | Channel::Info => Severity::Info,
            Channel::Warning => Severity::Warning,
            Channel::Error => Severity::Error,
        }
    }
}

/// Handler behind one print channel.
pub type PrintHandler = Arc<dyn Fn(Message, Vec<Value>) + Send + Sync>;

#[derive(Clone)]
struct ChannelTable {
    debug: PrintHandler,
    log: PrintHandler,
    info: PrintHandler,
    warning: PrintHandler,
    error: PrintHandler,
}

fn render(message: &Message) -> String {
    match message {
        Message::Text(text) => text.clone(),
        Message::Structured(value) => value.to_string(),
        Message::Failure { stack } => stack.clone(),
    }
}

fn stdout_handler() -> PrintHandler {
    Arc::new(|message, extra| {
        if extra.is_empty() {
            println!("{}", render(&message));
        } else {
            println!("{} {:?}", render(&message), extra);
        }
    })
}

fn stderr_handler() -> PrintHandler {
    Arc::new(|message, extra| {
        if extra.is_empty() {
            eprintln!("{}", render(&message));
        } else {
            eprintln!("{} {:?}", render(&message), extra);
        }
    })
}

impl ChannelTable {
    fn ambient() -> Self {
        Self {
            debug: stdout_handler(),
            log: stdout_handler(),
            info: stdout_handler(),
            warning: stderr_handler(),
            error: stderr_handler(),
        }
    }

    fn get(&self, channel: Channel) -> &PrintHandler {
        match channel {
            Channel::Debug => &self.debug,
            Channel::Log => &self.log,
            Channel::Info => &self.info,
            Channel::Warning => &self.warning,
            Channel::Error => &self.error,
        }
    }
}

struct CaptureState {
    handlers: ChannelTable,
    /// The only path back to pre-capture behavior; `Some` means capturing.
    saved: Option<ChannelTable>,
}

/// Owns the process's print-style entry points and can redirect them
/// into a [`Logger`].
///
/// At most one capture may be active per manager; a second `activate`
/// fails with a state error and leaves the existing capture untouched.
/// Own one of these at the composition root instead of reaching for
/// global state.
pub struct CaptureManager {
    state: Mutex<CaptureState>,
}

impl CaptureManager {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(CaptureState {
                handlers: ChannelTable::ambient(),
                saved: None,
            }),
        }
    }

    pub fn is_capturing(&self) -> bool {
        self.state.lock().saved.is_some()
    }

    /// Route one print call through the currently-installed handler.
    pub fn print(&self, channel: Channel, message: impl Into<Message>, extra: Vec<Value>) {
        let handler = Arc::clone(self.state.lock().handlers.get(channel));
        handler(message.into(), extra);
    }

    #[inline]
    pub fn debug(&self, message: impl Into<Message>, extra: Vec<Value>) {
        self.print(Channel::Debug, message, extra);
    }

    #[inline]
    pub fn log(&self, message: impl Into<Message>, extra: Vec<Value>) {
        self.print(Channel::Log, message, extra);
    }

    #[inline]
    pub fn info(&self, message: impl Into<Message>, extra: Vec<Value>) {
        self.print(Channel::Info, message, extra);
    }

    #[inline]
    pub fn warning(&self, message: impl Into<Message>, extra: Vec<Value>) {
        self.print(Channel::Warning, message, extra);
    }

    #[inline]
    pub fn error(&self, message: impl Into<Message>, extra: Vec<Value>) {
        self.print(Channel::Error, message, extra);
    }

    /// Replace every channel with a shim that forwards into `logger`,
    /// saving the current handlers for restoration.
    pub fn activate(&self, logger: Arc<Logger>) -> Result<()> {
        let mut state = self.state.lock();
        if state.saved.is_some() {
            return Err(LoggerError::capture("Already being captured"));
        }

        state.saved = Some(state.handlers.clone());

        let shim = |logger: &Arc<Logger>, channel: Channel| -> PrintHandler {
            let logger = Arc::clone(logger);
            Arc::new(move |message, extra| {
                logger.log(channel.severity(), message, extra);
            })
        };

        state.handlers = ChannelTable {
            debug: shim(&logger, Channel::Debug),
            log: shim(&logger, Channel::Log),
            info: shim(&logger, Channel::Info),
            warning: shim(&logger, Channel::Warning),
            error: shim(&logger, Channel::Error),
        };

        Ok(())
    }

    /// Restore the saved handlers and return to the idle state.
    pub fn deactivate(&self) -> Result<()> {
        let mut state = self.state.lock();
        match state.saved.take() {
            Some(original) => {
                state.handlers = original;
                Ok(())
            }
            None => Err(LoggerError::capture("Not currently capturing")),
        }
    }
}

impl Default for CaptureManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LogRecord, Sink};
    use serde_json::json;

    struct ProbeSink {
        seen: Arc<Mutex<Vec<LogRecord>>>,
    }

    impl Sink for ProbeSink {
        fn threshold(&self) -> Severity {
            Severity::Debug
        }

        fn emit(&mut self, record: &LogRecord) -> crate::core::Result<()> {
            self.seen.lock().push(record.clone());
            Ok(())
        }

        fn flush(&mut self) -> crate::core::Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "probe"
        }
    }

    fn probed_logger() -> (Arc<Logger>, Arc<Mutex<Vec<LogRecord>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let logger = Logger::builder()
            .sink(ProbeSink {
                seen: Arc::clone(&seen),
            })
            .build();
        (Arc::new(logger), seen)
    }

    #[test]
    fn test_channels_map_to_severities() {
        assert_eq!(Channel::Debug.severity(), Severity::Debug);
        assert_eq!(Channel::Log.severity(), Severity::Info);
        assert_eq!(Channel::Info.severity(), Severity::Info);
        assert_eq!(Channel::Warning.severity(), Severity::Warning);
        assert_eq!(Channel::Error.severity(), Severity::Error);
    }

    #[test]
    fn test_activate_redirects_channels() {
        let (logger, seen) = probed_logger();
        let capture = CaptureManager::new();
        capture.activate(logger).unwrap();

        capture.error("plain message", vec![]);
        capture.log("with extras", vec![json!("wang"), json!(3565)]);

        let seen = seen.lock();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].level, Severity::Error);
        assert_eq!(seen[0].message, "plain message");
        assert_eq!(seen[1].level, Severity::Info);
        assert_eq!(
            seen[1].extra.as_ref().unwrap(),
            &vec![json!("wang"), json!(3565)]
        );
    }

    #[test]
    fn test_double_activate_fails_and_keeps_first_capture() {
        let (first, seen) = probed_logger();
        let (second, _) = probed_logger();

        let capture = CaptureManager::new();
        capture.activate(first).unwrap();

        let err = capture.activate(second).unwrap_err();
        assert!(matches!(err, LoggerError::CaptureState(_)));

        // First activation's redirection is intact
        capture.warning("still captured", vec![]);
        assert_eq!(seen.lock().len(), 1);
        assert_eq!(seen.lock()[0].level, Severity::Warning);
    }

    #[test]
    fn test_deactivate_restores_and_idles() {
        let (logger, seen) = probed_logger();
        let capture = CaptureManager::new();

        assert!(capture.deactivate().is_err());

        capture.activate(logger).unwrap();
        assert!(capture.is_capturing());

        capture.deactivate().unwrap();
        assert!(!capture.is_capturing());

        // Restored handlers no longer reach the logger
        capture.error("back to ambient", vec![]);
        assert_eq!(seen.lock().len(), 0);

        // Capture can be activated again after a clean deactivate
        let (again, _) = probed_logger();
        assert!(capture.activate(again).is_ok());
    }
}
