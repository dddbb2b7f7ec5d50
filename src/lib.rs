//! # stream-monitor: per-node runtime sampling for data pipelines
//!
//! A [`Sampler`] is attached to one node of a data-processing pipeline. It
//! watches the tuples flowing through that node for a fixed 30 second window
//! starting at the first input, then emits a single summary with tuple
//! widths, input/output rates and a node-kind-specific selectivity.
//!
//! ## Architecture
//!
//! - **Monitor**: the sampler state machine, selectivity strategies and the
//!   summary record
//! - **Pipeline**: what the sampler needs from a node (capabilities, tuple
//!   shape, window contents) plus two reference operators
//! - **Sink**: where the summary goes, either the local `observation` log
//!   target or a remote document collection
//! - **Config**: typed job configuration resolved on the first input
//!
//! ## Example
//!
//! ```ignore
//! use stream_monitor::{config::JobConfig, pipeline::{FilterNode, MonitoredOperator}};
//!
//! let filter = FilterNode::new("positive", |t: &(i64, f64)| t.1 > 0.0);
//! let mut op = MonitoredOperator::new(filter, "filter-1", JobConfig::local());
//!
//! let mut out = Vec::new();
//! for tuple in source {
//!     op.push(tuple, &mut out)?;
//! }
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod monitor;
pub mod pipeline;
pub mod sink;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::{JobConfig, MonitorConfig, RemoteSinkConfig};
pub use error::{MonitorError, Result};
pub use monitor::{ObservationSummary, Sampler, SamplerState, SharedSampler, OBSERVATION_WINDOW};
pub use pipeline::{MonitoredNode, NodeKind, ScalarValue, TupleShape, WindowState};
pub use sink::{ObservationSink, SinkMode};
