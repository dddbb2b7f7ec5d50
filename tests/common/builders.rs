//! Test data builders for creating samplers

use super::mock_helpers::RecordingSink;
use std::sync::Arc;
use stream_monitor::pipeline::NodeCapabilities;
use stream_monitor::{ManualClock, Sampler, ScalarValue};

/// Builder for a sampler on a manual clock that records into a
/// [`RecordingSink`]
pub struct SamplerBuilder {
    capabilities: NodeCapabilities,
    description: Vec<(String, ScalarValue)>,
    clock: ManualClock,
    sink: RecordingSink,
}

impl SamplerBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            capabilities: NodeCapabilities::NONE,
            description: vec![("id".to_string(), ScalarValue::from(id))],
            clock: ManualClock::new(),
            sink: RecordingSink::new(),
        }
    }

    /// Builder whose description has no `id`.
    pub fn anonymous() -> Self {
        let mut builder = Self::new("");
        builder.description.clear();
        builder
    }

    pub fn capabilities(mut self, capabilities: NodeCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn describe(mut self, key: &str, value: impl Into<ScalarValue>) -> Self {
        self.description.push((key.to_string(), value.into()));
        self
    }

    pub fn clock(&self) -> ManualClock {
        self.clock.clone()
    }

    pub fn sink(&self) -> RecordingSink {
        self.sink.clone()
    }

    pub fn build(self) -> Sampler {
        Sampler::with_description(&self.capabilities, self.description)
            .with_clock(Arc::new(self.clock))
            .with_sink_opener(self.sink.opener())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stream_monitor::NodeKind;

    #[test]
    fn test_sampler_builder() {
        let sampler = SamplerBuilder::new("test")
            .capabilities(NodeCapabilities::filter())
            .build();

        assert_eq!(sampler.node_kind(), NodeKind::Filter);
        assert_eq!(sampler.summary().id(), Some(&ScalarValue::from("test")));
    }
}
