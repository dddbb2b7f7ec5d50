//! TumblingWindowNode: count-based tumbling window.
//!
//! Buffers `size` tuples, reports the materialized window to the sampler,
//! then emits one aggregate per window.

use crate::error::Result;
use crate::monitor::Sampler;
use crate::pipeline::node::MonitoredNode;
use crate::pipeline::operator::Operator;
use crate::pipeline::value::TupleShape;

/// Aggregates every `size` tuples into one.
pub struct TumblingWindowNode<T, A> {
    name: String,
    size: usize,
    buffer: Vec<T>,
    aggregate: Box<dyn Fn(&[T]) -> A + Send>,
    windows_fired: u64,
}

impl<T, A> TumblingWindowNode<T, A> {
    /// `size` is clamped to at least one tuple per window.
    pub fn new(
        name: impl Into<String>,
        size: usize,
        aggregate: impl Fn(&[T]) -> A + Send + 'static,
    ) -> Self {
        let size = size.max(1);
        Self {
            name: name.into(),
            size,
            buffer: Vec::with_capacity(size),
            aggregate: Box::new(aggregate),
            windows_fired: 0,
        }
    }

    pub fn windows_fired(&self) -> u64 {
        self.windows_fired
    }

    /// Tuples waiting for the current window to fill.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}

impl<T, A> MonitoredNode for TumblingWindowNode<T, A> {
    fn is_windowing(&self) -> bool {
        true
    }
}

impl<T: TupleShape, A: TupleShape> Operator for TumblingWindowNode<T, A> {
    type In = T;
    type Out = A;

    fn name(&self) -> &str {
        &self.name
    }

    fn process(&mut self, input: T, sampler: &mut Sampler, out: &mut Vec<A>) -> Result<()> {
        self.buffer.push(input);
        if self.buffer.len() < self.size {
            return Ok(());
        }
        sampler.report_window_length(&self.buffer)?;
        out.push((self.aggregate)(&self.buffer));
        self.buffer.clear();
        self.windows_fired += 1;
        Ok(())
    }
}
