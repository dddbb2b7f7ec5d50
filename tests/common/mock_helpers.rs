//! Recording sink and channel helpers

use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::{Arc, Mutex};
use stream_monitor::monitor::ObservationSummary;
use stream_monitor::{JobConfig, ObservationSink, Result};

/// Sink that keeps every summary it is handed.
///
/// Clones share the same record, so one copy can be moved into a sampler's
/// sink opener while the test keeps the other.
#[derive(Clone, Default)]
pub struct RecordingSink {
    emitted: Arc<Mutex<Vec<ObservationSummary>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emitted(&self) -> Vec<ObservationSummary> {
        self.emitted.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.emitted.lock().unwrap().len()
    }

    /// Opener handing a clone of this sink to a sampler.
    pub fn opener(
        &self,
    ) -> impl FnMut(&JobConfig) -> Result<Box<dyn ObservationSink>> + Send + 'static {
        let sink = self.clone();
        move |_config: &JobConfig| Ok(Box::new(sink.clone()) as Box<dyn ObservationSink>)
    }
}

impl ObservationSink for RecordingSink {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn emit(&mut self, summary: &ObservationSummary) -> Result<()> {
        self.emitted.lock().unwrap().push(summary.clone());
        Ok(())
    }
}

/// Create test channels with default size
pub fn create_test_channels<T, U>() -> (Sender<T>, Receiver<T>, Sender<U>, Receiver<U>) {
    let (tx1, rx1) = bounded(16);
    let (tx2, rx2) = bounded(16);
    (tx1, rx1, tx2, rx2)
}
