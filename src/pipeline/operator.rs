//! Minimal operator abstraction for hosting samplers.
//!
//! [`MonitoredOperator`] owns an operator and the sampler created for it,
//! and makes the `report_*` calls a real engine would make around each
//! invocation: one input report per tuple in, one output report per tuple
//! out. Operators with auxiliary observations (window sizes, join
//! cardinalities) report those themselves through the sampler they are
//! handed.

use crate::config::JobConfig;
use crate::error::Result;
use crate::monitor::Sampler;
use crate::pipeline::node::MonitoredNode;
use crate::pipeline::value::{ScalarValue, TupleShape};

/// A single-input pipeline operator.
pub trait Operator: MonitoredNode {
    type In: TupleShape;
    type Out: TupleShape;

    /// Human-readable name of this operator.
    fn name(&self) -> &str;

    /// Process one tuple, appending any results to `out`.
    fn process(
        &mut self,
        input: Self::In,
        sampler: &mut Sampler,
        out: &mut Vec<Self::Out>,
    ) -> Result<()>;
}

/// An operator together with its sampler.
pub struct MonitoredOperator<O> {
    op: O,
    sampler: Sampler,
    config: JobConfig,
}

impl<O: Operator> MonitoredOperator<O> {
    /// Wrap `op`, identifying its sampler by `id`.
    pub fn new(op: O, id: impl Into<String>, config: JobConfig) -> Self {
        let description = [
            ("id", ScalarValue::String(id.into())),
            ("operator", ScalarValue::String(op.name().to_string())),
        ];
        let sampler = Sampler::with_description(&op, description);
        Self::with_sampler(op, sampler, config)
    }

    /// Wrap `op` with a sampler built by the caller.
    pub fn with_sampler(op: O, sampler: Sampler, config: JobConfig) -> Self {
        Self {
            op,
            sampler,
            config,
        }
    }

    /// Feed one tuple through the operator.
    ///
    /// The tuple is processed even when observing it fails; the first
    /// observation error is returned after its outputs are in `out`. Errors
    /// from the operator itself take precedence.
    pub fn push(&mut self, input: O::In, out: &mut Vec<O::Out>) -> Result<()> {
        let mut observed = self.sampler.report_input(&input, &self.config);
        let start = out.len();
        self.op.process(input, &mut self.sampler, out)?;
        for produced in &out[start..] {
            let reported = self.sampler.report_output(produced);
            if observed.is_ok() {
                observed = reported;
            }
        }
        observed
    }

    pub fn operator(&self) -> &O {
        &self.op
    }

    pub fn sampler(&self) -> &Sampler {
        &self.sampler
    }

    pub fn sampler_mut(&mut self) -> &mut Sampler {
        &mut self.sampler
    }
}
