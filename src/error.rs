//! Error handling for the stream monitor
//!
//! This module defines the crate error type and a Result alias for use
//! throughout the sampler, its configuration and its sinks.

use thiserror::Error;

/// Main error type for stream monitor operations
#[derive(Error, Debug)]
pub enum MonitorError {
    /// Errors related to job configuration loading or validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// A parameter required by the selected sink mode was not supplied
    #[error("Missing job parameter: {key}")]
    MissingParameter { key: &'static str },

    /// A job parameter was present but could not be interpreted
    #[error("Invalid job parameter {key}: {value:?}")]
    InvalidParameter { key: &'static str, value: String },

    /// A window state was neither a scalar nor a materialized collection
    #[error("Illegal window state: {0}")]
    InvalidWindowState(String),

    /// The sink rejected the summary document
    #[error("Sink error: {0}")]
    Sink(String),

    /// Transport errors from the remote document sink
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A shared sampler's lock was poisoned by a panicking holder
    #[error("Sampler lock poisoned")]
    Poisoned,

    /// An error annotated with what the sampler was doing
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<MonitorError>,
    },
}

impl MonitorError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        MonitorError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Whether this error (or the error it wraps) is a configuration error.
    pub fn is_config(&self) -> bool {
        match self {
            MonitorError::Config(_)
            | MonitorError::MissingParameter { .. }
            | MonitorError::InvalidParameter { .. }
            | MonitorError::TomlParse(_) => true,
            MonitorError::WithContext { source, .. } => source.is_config(),
            _ => false,
        }
    }
}

/// Result type alias for stream monitor operations
pub type Result<T> = std::result::Result<T, MonitorError>;
