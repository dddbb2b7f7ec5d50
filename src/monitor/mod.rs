//! Runtime sampling of a single pipeline node.
//!
//! A [`Sampler`] is created alongside each node instance, fed every input and
//! output event by the node, and emits one [`ObservationSummary`] after its
//! observation window closes.
//!
//! # Design
//!
//! - **Kind resolved once**: the node's capabilities are collapsed into a
//!   [`Selectivity`] variant at construction; no per-event type checks.
//! - **Typed summary**: computed fields are struct fields, seeded metadata
//!   is a flat scalar map, merged only at serialization.
//! - **Single emission**: the close step runs once and moves the sampler to
//!   a terminal state before touching the sink.

pub mod sampler;
pub mod selectivity;
pub mod shared;
pub mod summary;

pub use sampler::{Sampler, SamplerState, SinkOpener, OBSERVATION_WINDOW};
pub use selectivity::Selectivity;
pub use shared::SharedSampler;
pub use summary::{
    ObservationSummary, KEY_ID, KEY_INPUT_RATE, KEY_OUTPUT_RATE, KEY_REAL_SELECTIVITY,
    KEY_TUPLE_WIDTH_IN, KEY_TUPLE_WIDTH_OUT, RESERVED_KEYS,
};
