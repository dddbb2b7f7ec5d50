//! Tracing setup for processes hosting samplers.
//!
//! Diagnostics go to stdout through an `EnvFilter`-gated fmt layer. When an
//! observation directory is configured, summaries written on the
//! `observation` target are additionally appended to a daily rolling file,
//! one JSON document per line.

use crate::config::LoggingConfig;
use crate::error::{MonitorError, Result};
use crate::sink::OBSERVATION_TARGET;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::{filter_fn, EnvFilter};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// File name prefix of the rolling observation log
pub const OBSERVATION_FILE_PREFIX: &str = "observations.log";

/// `RUST_LOG` if set, otherwise the configured (or default) directive.
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.filter_or_default()))
}

/// Install the global subscriber.
///
/// The returned guard flushes the observation file on drop and must be held
/// for as long as samplers may emit.
pub fn init(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let stdout_layer = fmt::layer().with_filter(env_filter(config));

    let (file_layer, guard) = match &config.observation_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|e| {
                MonitorError::Config(format!(
                    "Failed to create observation log directory {:?}: {}",
                    dir, e
                ))
            })?;
            let appender = tracing_appender::rolling::daily(dir, OBSERVATION_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false)
                .with_level(false)
                .with_filter(filter_fn(|meta| meta.target() == OBSERVATION_TARGET));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| {
            MonitorError::Config(format!("Failed to install tracing subscriber: {}", e))
        })?;

    Ok(guard)
}
