//! Logger factory: resolves naming inputs and wires the sinks

use crate::config::LoggerOptions;
use crate::core::{Logger, LoggerError, Result};
use crate::sinks::{ConsoleSink, RemoteSink, TcpTransport, Transport};
use std::sync::Arc;
use std::time::Duration;

/// External collaborator lookups consumed at construction time.
///
/// Each is an opaque function; the defaults resolve from the process
/// environment. Swap them out to integrate package metadata discovery,
/// real hostname resolution, or a deployment-tier registry.
pub struct Collaborators {
    /// Source package name used to namespace the remote log group.
    pub package_name: Box<dyn Fn() -> Result<String> + Send + Sync>,
    /// Host identity used as the default stream name.
    pub hostname: Box<dyn Fn() -> String + Send + Sync>,
    /// Environment tier (prod, staging, ...) in the group namespace.
    pub environment: Box<dyn Fn() -> String + Send + Sync>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            package_name: Box::new(|| {
                std::env::var("LOGFAN_PACKAGE_NAME").map_err(|_| {
                    LoggerError::config(
                        "Collaborators",
                        "Cannot find LOGFAN_PACKAGE_NAME in the environment",
                    )
                })
            }),
            hostname: Box::new(|| {
                std::env::var("HOSTNAME").unwrap_or_else(|_| "localhost".to_string())
            }),
            environment: Box::new(|| {
                std::env::var("LOGFAN_ENV").unwrap_or_else(|_| "development".to_string())
            }),
        }
    }
}

/// Destination naming inputs for one logger.
///
/// Either `group_name` or `group_path` must be supplied; everything else
/// falls back to a collaborator lookup.
#[derive(Debug, Clone, Default)]
pub struct GroupIdentity {
    pub package_name: Option<String>,
    pub group_name: Option<String>,
    /// Hierarchical name, joined with `/` into a flat group name.
    pub group_path: Option<Vec<String>>,
    pub stream_name: Option<String>,
    /// Overrides the configured remote region for this logger.
    pub region: Option<String>,
}

/// Builds loggers wired with a console sink and a remote sink.
///
/// Stateless beyond its construction inputs; `create` may be called any
/// number of times.
pub struct LoggerFactory {
    options: LoggerOptions,
    collaborators: Collaborators,
    transport: Option<Arc<dyn Transport>>,
}

impl LoggerFactory {
    pub fn new(options: LoggerOptions) -> Self {
        Self {
            options,
            collaborators: Collaborators::default(),
            transport: None,
        }
    }

    #[must_use]
    pub fn with_collaborators(mut self, collaborators: Collaborators) -> Self {
        self.collaborators = collaborators;
        self
    }

    /// Inject the remote transport, replacing the default TCP collector.
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Assemble a logger for the given destination identity.
    ///
    /// Fails with a configuration error when the resolved group name is
    /// empty (neither `group_name` nor `group_path` supplied, or both
    /// blank): a logger cannot be constructed without a destination group
    /// identity for its remote sink.
    pub fn create(&self, identity: GroupIdentity) -> Result<Logger> {
        let package_name = match identity.package_name {
            Some(name) => name,
            None => (self.collaborators.package_name)()?,
        };

        let stream_name = identity
            .stream_name
            .unwrap_or_else(|| (self.collaborators.hostname)());

        let group_name = match (identity.group_name, identity.group_path) {
            (_, Some(path)) => path.join("/"),
            (Some(name), None) => name,
            (None, None) => String::new(),
        };
        // An empty name (nothing supplied, empty path, or "") leaves the
        // remote sink without a destination group identity
        if group_name.is_empty() {
            return Err(LoggerError::config(
                "LoggerFactory",
                "Either group_name or group_path must be specified",
            ));
        }

        let environment = (self.collaborators.environment)();
        let full_group_name = RemoteSink::group_name_for(&package_name, &environment, &group_name);

        let region = identity
            .region
            .unwrap_or_else(|| self.options.remote.region.clone());

        let transport = match &self.transport {
            Some(transport) => Arc::clone(transport),
            None => Arc::new(TcpTransport::new(self.collector_address(&region))),
        };

        let remote = RemoteSink::builder(full_group_name, stream_name, transport)
            .threshold(self.options.remote.level)
            .region(region)
            .upload_interval(Duration::from_millis(
                self.options.remote.upload_interval_ms.max(1),
            ))
            .build();

        Ok(Logger::builder()
            .sink(ConsoleSink::new(self.options.console.level))
            .sink(remote)
            .build())
    }

    fn collector_address(&self, region: &str) -> String {
        match &self.options.remote.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => format!("logs.{}.internal:6514", region),
        }
    }
}

impl Default for LoggerFactory {
    fn default() -> Self {
        Self::new(LoggerOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_collaborators() -> Collaborators {
        Collaborators {
            package_name: Box::new(|| Ok("svc".to_string())),
            hostname: Box::new(|| "host-1".to_string()),
            environment: Box::new(|| "prod".to_string()),
        }
    }

    #[test]
    fn test_missing_group_identity_is_config_error() {
        let factory = LoggerFactory::default().with_collaborators(fixed_collaborators());
        assert!(matches!(
            factory.create(GroupIdentity::default()).err(),
            Some(LoggerError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_empty_group_identity_is_config_error() {
        let factory = LoggerFactory::default().with_collaborators(fixed_collaborators());

        // An empty hierarchical name joins to "" and is no identity at all
        assert!(matches!(
            factory
                .create(GroupIdentity {
                    group_path: Some(vec![]),
                    ..Default::default()
                })
                .err(),
            Some(LoggerError::InvalidConfiguration { .. })
        ));

        assert!(matches!(
            factory
                .create(GroupIdentity {
                    group_name: Some(String::new()),
                    ..Default::default()
                })
                .err(),
            Some(LoggerError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_group_path_joined_into_group_name() {
        assert_eq!(
            RemoteSink::group_name_for("svc", "prod", &["jobs", "sync"].join("/")),
            "/svc/prod/jobs/sync"
        );
    }

    #[test]
    fn test_create_wires_both_sinks() {
        use crate::sinks::MemoryTransport;

        let transport = Arc::new(MemoryTransport::new());
        let factory = LoggerFactory::default()
            .with_collaborators(fixed_collaborators())
            .with_transport(transport.clone());

        let logger = factory
            .create(GroupIdentity {
                group_path: Some(vec!["jobs".to_string(), "sync".to_string()]),
                ..Default::default()
            })
            .unwrap();

        // Console (info) accepts, remote (error) accepts; both emit
        logger.error("disk full");
        logger.flush().unwrap();

        let batches = transport.delivered();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].group_name, "/svc/prod/jobs/sync");
        assert_eq!(batches[0].stream_name, "host-1");
        assert_eq!(batches[0].region, "ap-northeast-2");
    }

    #[test]
    fn test_package_name_failure_propagates() {
        let collaborators = Collaborators {
            package_name: Box::new(|| {
                Err(LoggerError::config("Collaborators", "no package metadata"))
            }),
            ..fixed_collaborators()
        };
        let factory = LoggerFactory::default().with_collaborators(collaborators);
        assert!(matches!(
            factory
                .create(GroupIdentity {
                    group_name: Some("jobs".to_string()),
                    ..Default::default()
                })
                .err(),
            Some(LoggerError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_explicit_inputs_win_over_collaborators() {
        use crate::sinks::MemoryTransport;

        let transport = Arc::new(MemoryTransport::new());
        let factory = LoggerFactory::default()
            .with_collaborators(fixed_collaborators())
            .with_transport(transport.clone());

        let logger = factory
            .create(GroupIdentity {
                package_name: Some("other".to_string()),
                group_name: Some("batch".to_string()),
                stream_name: Some("stream-9".to_string()),
                region: Some("us-east-1".to_string()),
                ..Default::default()
            })
            .unwrap();

        logger.crit("halted");
        logger.flush().unwrap();

        let batches = transport.delivered();
        assert_eq!(batches[0].group_name, "/other/prod/batch");
        assert_eq!(batches[0].stream_name, "stream-9");
        assert_eq!(batches[0].region, "us-east-1");
    }
}
