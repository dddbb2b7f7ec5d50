//! Built-in monitored operators.

pub mod filter;
pub mod window;

pub use filter::FilterNode;
pub use window::TumblingWindowNode;
