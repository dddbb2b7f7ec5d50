//! Pipeline-facing interfaces of the sampler.
//!
//! Everything a sampler needs from the node it is attached to lives here:
//! capability queries, the node kind they collapse to, and the traits used
//! to measure the values that flow through the node.
//!
//! # Layout
//!
//! ```text
//! [Operator] ──implements──► MonitoredNode ──capabilities()──► NodeKind
//!     │
//!     └── MonitoredOperator ──report_input / report_output──► Sampler
//! ```

pub mod node;
pub mod node_kind;
pub mod nodes;
pub mod operator;
pub mod value;

pub use node::{MonitoredNode, NodeCapabilities};
pub use node_kind::NodeKind;
pub use nodes::{FilterNode, TumblingWindowNode};
pub use operator::{MonitoredOperator, Operator};
pub use value::{shape_of, ScalarValue, TupleShape, WindowState};
