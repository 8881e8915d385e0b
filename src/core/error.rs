//! Error types for the logging front-end

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration with details; fatal to the construction call
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Console capture state violation (double activate, idle deactivate)
    #[error("Capture state error: {0}")]
    CaptureState(String),

    /// Batch delivery to the remote endpoint failed
    #[error("Delivery to '{group_name}/{stream_name}' failed: {message}")]
    Delivery {
        group_name: String,
        stream_name: String,
        message: String,
    },

    /// Sink-side formatting failure; reported, never propagated to callers
    #[error("Formatter error ({sink}): {message}")]
    Format { sink: String, message: String },

    /// Sink emission failure (generic)
    #[error("Sink error: {0}")]
    SinkError(String),
}

impl LoggerError {
    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a capture state error
    pub fn capture(message: impl Into<String>) -> Self {
        LoggerError::CaptureState(message.into())
    }

    /// Create a delivery error
    pub fn delivery(
        group_name: impl Into<String>,
        stream_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        LoggerError::Delivery {
            group_name: group_name.into(),
            stream_name: stream_name.into(),
            message: message.into(),
        }
    }

    /// Create a formatter error
    pub fn format(sink: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::Format {
            sink: sink.into(),
            message: message.into(),
        }
    }

    /// Create a sink error (generic)
    pub fn sink<S: Into<String>>(msg: S) -> Self {
        LoggerError::SinkError(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::config("LoggerFactory", "group identity missing");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = LoggerError::capture("already being captured");
        assert!(matches!(err, LoggerError::CaptureState(_)));

        let err = LoggerError::delivery("/svc/prod/jobs", "host-1", "connection refused");
        assert!(matches!(err, LoggerError::Delivery { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::config("LoggerFactory", "group identity missing");
        assert_eq!(
            err.to_string(),
            "Invalid configuration for LoggerFactory: group identity missing"
        );

        let err = LoggerError::delivery("/svc/prod/jobs", "host-1", "connection refused");
        assert_eq!(
            err.to_string(),
            "Delivery to '/svc/prod/jobs/host-1' failed: connection refused"
        );

        let err = LoggerError::format("console", "bad payload");
        assert_eq!(err.to_string(), "Formatter error (console): bad payload");
    }
}
