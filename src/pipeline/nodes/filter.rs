//! FilterNode: predicate filtering node.
//!
//! Passes through tuples for which the predicate holds and drops the rest.
//! Its sampler derives selectivity as outputs over inputs.

use crate::error::Result;
use crate::monitor::Sampler;
use crate::pipeline::node::MonitoredNode;
use crate::pipeline::operator::Operator;
use crate::pipeline::value::TupleShape;

/// Keeps tuples matching a predicate.
pub struct FilterNode<T> {
    name: String,
    predicate: Box<dyn Fn(&T) -> bool + Send>,
    passed: u64,
    dropped: u64,
}

impl<T> FilterNode<T> {
    pub fn new(name: impl Into<String>, predicate: impl Fn(&T) -> bool + Send + 'static) -> Self {
        Self {
            name: name.into(),
            predicate: Box::new(predicate),
            passed: 0,
            dropped: 0,
        }
    }

    /// Number of tuples that passed.
    pub fn passed(&self) -> u64 {
        self.passed
    }

    /// Number of tuples that were dropped.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl<T> MonitoredNode for FilterNode<T> {
    fn is_filter(&self) -> bool {
        true
    }
}

impl<T: TupleShape> Operator for FilterNode<T> {
    type In = T;
    type Out = T;

    fn name(&self) -> &str {
        &self.name
    }

    fn process(&mut self, input: T, _sampler: &mut Sampler, out: &mut Vec<T>) -> Result<()> {
        if (self.predicate)(&input) {
            self.passed += 1;
            out.push(input);
        } else {
            self.dropped += 1;
        }
        Ok(())
    }
}
