//! Local sink: the summary as one JSON line on the `observation` target.

use crate::error::Result;
use crate::monitor::ObservationSummary;
use crate::sink::ObservationSink;

/// Tracing target that carries observation summaries.
pub const OBSERVATION_TARGET: &str = "observation";

/// Writes each summary at info level to the process-local logger.
#[derive(Debug, Default)]
pub struct LocalLogSink {
    emitted: u64,
}

impl LocalLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of summaries written so far.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }
}

impl ObservationSink for LocalLogSink {
    fn name(&self) -> &'static str {
        "local"
    }

    fn emit(&mut self, summary: &ObservationSummary) -> Result<()> {
        let line = serde_json::to_string(summary)?;
        tracing::info!(target: OBSERVATION_TARGET, "{}", line);
        self.emitted += 1;
        Ok(())
    }
}
