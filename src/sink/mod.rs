//! Emission sinks for observation summaries.
//!
//! A sink accepts exactly the summaries a sampler decides to emit, which is
//! at most one per sampler. Two implementations ship with the crate:
//!
//! - [`LocalLogSink`]: one info line on the `observation` tracing target
//! - [`RemoteDocumentSink`]: one JSON document inserted into a remote
//!   collection over HTTP

pub mod local;
pub mod remote;

pub use local::{LocalLogSink, OBSERVATION_TARGET};
pub use remote::RemoteDocumentSink;

use crate::config::JobConfig;
use crate::error::{MonitorError, Result};
use crate::monitor::ObservationSummary;
use serde::{Deserialize, Serialize};

/// Where a sampler's summary goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SinkMode {
    Local,
    Remote,
}

impl std::fmt::Display for SinkMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SinkMode::Local => write!(f, "local"),
            SinkMode::Remote => write!(f, "remote"),
        }
    }
}

/// Sink that consumes emitted observation summaries.
#[cfg_attr(test, mockall::automock)]
pub trait ObservationSink: Send {
    /// Returns the sink's name for logging.
    fn name(&self) -> &'static str;

    /// Write one summary. Called synchronously and never retried.
    fn emit(&mut self, summary: &ObservationSummary) -> Result<()>;
}

impl<S: ObservationSink + ?Sized> ObservationSink for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn emit(&mut self, summary: &ObservationSummary) -> Result<()> {
        (**self).emit(summary)
    }
}

/// Build the sink a job configuration asks for.
///
/// The configuration is validated first; a distributed job with incomplete
/// remote parameters is an error, never a silent fallback to local logging.
pub fn open_sink(config: &JobConfig) -> Result<Box<dyn ObservationSink>> {
    match config.resolve_sink_mode()? {
        SinkMode::Local => Ok(Box::new(LocalLogSink::new())),
        SinkMode::Remote => {
            let remote = config.remote.clone().ok_or_else(|| {
                MonitorError::Config("remote sink parameters missing".to_string())
            })?;
            Ok(Box::new(RemoteDocumentSink::new(remote)))
        }
    }
}
