//! Configuration module for the stream monitor
//!
//! This module handles the job-level configuration a sampler resolves on its
//! first input:
//! - Whether summaries go to the local `observation` log or to a remote
//!   document store (`distributed_logging`)
//! - Connection parameters for the remote document store
//! - Logging setup for the demo binary
//!
//! Job configuration can be built directly, parsed from the job-wide
//! parameter map the pipeline engine hands to its operators, or loaded from a
//! TOML file.
//!
//! # Example
//!
//! ```ignore
//! use stream_monitor::config::{JobConfig, MonitorConfig};
//!
//! // From the engine's parameter map
//! let job = JobConfig::from_parameters(&params)?;
//!
//! // Or from a file
//! let config = MonitorConfig::load("monitor.toml")?;
//! let mode = config.job.resolve_sink_mode()?;
//! ```

use crate::error::{MonitorError, Result};
use crate::sink::SinkMode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Job parameter enabling remote (document store) emission
pub const PARAM_DISTRIBUTED_LOGGING: &str = "-distributedLogging";
/// Job parameter carrying the document store user name
pub const PARAM_USERNAME: &str = "-storeUsername";
/// Job parameter carrying the document store password
pub const PARAM_PASSWORD: &str = "-storePassword";
/// Job parameter naming the target database
pub const PARAM_DATABASE: &str = "-storeDatabase";
/// Job parameter carrying the document store host
pub const PARAM_ADDRESS: &str = "-storeAddress";
/// Job parameter carrying the document store port
pub const PARAM_PORT: &str = "-storePort";
/// Job parameter naming the target collection
pub const PARAM_COLLECTION: &str = "-storeCollectionObservations";

/// Default tracing filter used when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "info,stream_monitor=debug";

// ==================== Job Config ====================

/// Job-level configuration consumed by a sampler on its first input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobConfig {
    /// Send summaries to the remote document store instead of the local log
    #[serde(default)]
    pub distributed_logging: bool,

    /// Remote document store parameters, required when `distributed_logging`
    #[serde(default)]
    pub remote: Option<RemoteSinkConfig>,
}

impl JobConfig {
    /// Configuration for local (log based) emission.
    pub fn local() -> Self {
        Self::default()
    }

    /// Configuration for remote emission to the given document store.
    pub fn distributed(remote: RemoteSinkConfig) -> Self {
        Self {
            distributed_logging: true,
            remote: Some(remote),
        }
    }

    /// Build a job configuration from the engine's job-wide parameter map.
    ///
    /// A missing `-distributedLogging` flag means local emission. When the
    /// flag is `true` every remote parameter must be present.
    pub fn from_parameters(params: &HashMap<String, String>) -> Result<Self> {
        let distributed_logging = match params.get(PARAM_DISTRIBUTED_LOGGING) {
            None => false,
            Some(v) => v
                .trim()
                .parse::<bool>()
                .map_err(|_| MonitorError::InvalidParameter {
                    key: PARAM_DISTRIBUTED_LOGGING,
                    value: v.clone(),
                })?,
        };

        if !distributed_logging {
            return Ok(Self::local());
        }

        let required = |key: &'static str| -> Result<String> {
            params
                .get(key)
                .cloned()
                .ok_or(MonitorError::MissingParameter { key })
        };

        let port_raw = required(PARAM_PORT)?;
        let port = port_raw
            .trim()
            .parse::<u16>()
            .map_err(|_| MonitorError::InvalidParameter {
                key: PARAM_PORT,
                value: port_raw.clone(),
            })?;

        let remote = RemoteSinkConfig {
            username: required(PARAM_USERNAME)?,
            password: required(PARAM_PASSWORD)?,
            database: required(PARAM_DATABASE)?,
            collection: required(PARAM_COLLECTION)?,
            address: required(PARAM_ADDRESS)?,
            port,
        };

        Ok(Self::distributed(remote))
    }

    /// Validate the configuration and decide where summaries go.
    pub fn resolve_sink_mode(&self) -> Result<SinkMode> {
        if !self.distributed_logging {
            return Ok(SinkMode::Local);
        }

        let remote = self.remote.as_ref().ok_or_else(|| {
            MonitorError::Config(
                "distributed logging requested without remote sink parameters".to_string(),
            )
        })?;
        remote.validate()?;

        Ok(SinkMode::Remote)
    }
}

// ==================== Remote Sink Config ====================

/// Connection parameters for the remote document store.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSinkConfig {
    pub username: String,
    pub password: String,
    /// Target database name
    pub database: String,
    /// Target collection inside `database`
    pub collection: String,
    /// Host name or IP address
    pub address: String,
    pub port: u16,
}

impl RemoteSinkConfig {
    /// Check that every connection parameter is filled in.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            (PARAM_USERNAME, &self.username),
            (PARAM_PASSWORD, &self.password),
            (PARAM_DATABASE, &self.database),
            (PARAM_COLLECTION, &self.collection),
            (PARAM_ADDRESS, &self.address),
        ];
        for (key, value) in fields {
            if value.trim().is_empty() {
                return Err(MonitorError::MissingParameter { key });
            }
        }
        if self.port == 0 {
            return Err(MonitorError::InvalidParameter {
                key: PARAM_PORT,
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    /// Document insert endpoint: `http://{address}:{port}/{database}/{collection}`.
    pub fn endpoint(&self) -> String {
        format!(
            "http://{}:{}/{}/{}",
            self.address, self.port, self.database, self.collection
        )
    }
}

impl std::fmt::Debug for RemoteSinkConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteSinkConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("collection", &self.collection)
            .field("address", &self.address)
            .field("port", &self.port)
            .finish()
    }
}

// ==================== Logging Config ====================

/// Logging setup for processes hosting samplers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    #[serde(default)]
    pub filter: Option<String>,

    /// Directory for the daily rolling `observation` log file.
    /// When unset, observations only go to stdout.
    #[serde(default)]
    pub observation_dir: Option<PathBuf>,
}

impl LoggingConfig {
    /// The filter directive to fall back on.
    pub fn filter_or_default(&self) -> &str {
        self.filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }
}

// ==================== Monitor Config File ====================

/// Top-level configuration file for a process hosting samplers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    #[serde(default)]
    pub job: JobConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl MonitorConfig {
    /// Load a TOML configuration file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            MonitorError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        Self::from_toml(&content)
    }

    /// Parse a TOML configuration document
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn remote() -> RemoteSinkConfig {
        RemoteSinkConfig {
            username: "monitor".to_string(),
            password: "secret".to_string(),
            database: "observations".to_string(),
            collection: "nodes".to_string(),
            address: "127.0.0.1".to_string(),
            port: 8080,
        }
    }

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_default_is_local() {
        let config = JobConfig::default();
        assert!(!config.distributed_logging);
        assert_eq!(config.resolve_sink_mode().unwrap(), SinkMode::Local);
    }

    #[test]
    fn test_distributed_resolves_remote() {
        let config = JobConfig::distributed(remote());
        assert_eq!(config.resolve_sink_mode().unwrap(), SinkMode::Remote);
    }

    #[test]
    fn test_distributed_without_remote_is_config_error() {
        let config = JobConfig {
            distributed_logging: true,
            remote: None,
        };
        let err = config.resolve_sink_mode().unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_empty_remote_field_is_missing() {
        let mut r = remote();
        r.password.clear();
        let err = JobConfig::distributed(r).resolve_sink_mode().unwrap_err();
        assert!(matches!(
            err,
            MonitorError::MissingParameter {
                key: PARAM_PASSWORD
            }
        ));
    }

    #[test]
    fn test_from_parameters_local() {
        let config =
            JobConfig::from_parameters(&params(&[("-distributedLogging", "false")])).unwrap();
        assert_eq!(config, JobConfig::local());

        let config = JobConfig::from_parameters(&HashMap::new()).unwrap();
        assert_eq!(config, JobConfig::local());
    }

    #[test]
    fn test_from_parameters_distributed() {
        let config = JobConfig::from_parameters(&params(&[
            ("-distributedLogging", "true"),
            ("-storeUsername", "monitor"),
            ("-storePassword", "secret"),
            ("-storeDatabase", "observations"),
            ("-storeAddress", "127.0.0.1"),
            ("-storePort", "8080"),
            ("-storeCollectionObservations", "nodes"),
        ]))
        .unwrap();
        assert_eq!(config, JobConfig::distributed(remote()));
    }

    #[test]
    fn test_from_parameters_missing_remote_field() {
        let err = JobConfig::from_parameters(&params(&[
            ("-distributedLogging", "true"),
            ("-storePort", "8080"),
        ]))
        .unwrap_err();
        assert!(matches!(err, MonitorError::MissingParameter { .. }));
    }

    #[test]
    fn test_from_parameters_bad_port() {
        let err = JobConfig::from_parameters(&params(&[
            ("-distributedLogging", "true"),
            ("-storePort", "not-a-port"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            MonitorError::InvalidParameter {
                key: PARAM_PORT,
                ..
            }
        ));
    }

    #[test]
    fn test_from_parameters_bad_flag() {
        let err =
            JobConfig::from_parameters(&params(&[("-distributedLogging", "yes")])).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_endpoint() {
        assert_eq!(
            remote().endpoint(),
            "http://127.0.0.1:8080/observations/nodes"
        );
    }

    #[test]
    fn test_debug_redacts_password() {
        let debug = format!("{:?}", remote());
        assert!(!debug.contains("secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_load_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[job]
distributed_logging = true

[job.remote]
username = "monitor"
password = "secret"
database = "observations"
collection = "nodes"
address = "127.0.0.1"
port = 8080

[logging]
filter = "debug"
observation_dir = "/var/log/monitor"
"#
        )
        .unwrap();

        let config = MonitorConfig::load(file.path()).unwrap();
        assert_eq!(config.job, JobConfig::distributed(remote()));
        assert_eq!(config.logging.filter_or_default(), "debug");
        assert_eq!(
            config.logging.observation_dir,
            Some(PathBuf::from("/var/log/monitor"))
        );
    }

    #[test]
    fn test_load_empty_toml_uses_defaults() {
        let config = MonitorConfig::from_toml("").unwrap();
        assert_eq!(config, MonitorConfig::default());
        assert_eq!(config.logging.filter_or_default(), DEFAULT_LOG_FILTER);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = MonitorConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_incomplete_remote_table_is_parse_error() {
        let err = MonitorConfig::from_toml(
            r#"
[job]
distributed_logging = true

[job.remote]
username = "monitor"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, MonitorError::TomlParse(_)));
    }
}
