//! The summary record a sampler emits when its window closes.
//!
//! Computed fields are typed; caller-seeded metadata (node `id`, operator
//! name, parallelism, ...) is kept as a flat scalar map. Both are merged into
//! one flat document only when the summary is serialized.

use crate::pipeline::{NodeKind, ScalarValue};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;

pub const KEY_ID: &str = "id";
pub const KEY_TUPLE_WIDTH_IN: &str = "tupleWidthIn";
pub const KEY_TUPLE_WIDTH_OUT: &str = "tupleWidthOut";
pub const KEY_INPUT_RATE: &str = "inputRate";
pub const KEY_OUTPUT_RATE: &str = "outputRate";
pub const KEY_REAL_SELECTIVITY: &str = "realSelectivity";

/// Keys owned by the sampler; seeded values under these keys are dropped.
pub const RESERVED_KEYS: &[&str] = &[
    KEY_TUPLE_WIDTH_IN,
    KEY_TUPLE_WIDTH_OUT,
    KEY_INPUT_RATE,
    KEY_OUTPUT_RATE,
    KEY_REAL_SELECTIVITY,
];

/// Description of one node's observation window.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationSummary {
    /// Caller-seeded metadata.
    pub description: BTreeMap<String, ScalarValue>,
    /// Arity of the first input, `-1` if unknown.
    pub tuple_width_in: i64,
    /// Arity of the most recent output, `-1` if unknown or none yet.
    pub tuple_width_out: i64,
    /// Inputs per second over the window.
    pub input_rate: Option<f64>,
    /// Outputs per second over the window.
    pub output_rate: Option<f64>,
    /// Present for selectivity-bearing node kinds only.
    pub real_selectivity: Option<f64>,
}

impl ObservationSummary {
    pub fn new<I, K>(seed: I, kind: NodeKind) -> Self
    where
        I: IntoIterator<Item = (K, ScalarValue)>,
        K: Into<String>,
    {
        let description = seed
            .into_iter()
            .map(|(k, v)| (k.into(), v))
            .filter(|(k, _)| !RESERVED_KEYS.contains(&k.as_str()))
            .collect();

        Self {
            description,
            tuple_width_in: -1,
            tuple_width_out: -1,
            input_rate: None,
            output_rate: None,
            real_selectivity: kind.has_selectivity().then_some(0.0),
        }
    }

    /// The node identifier, if seeded and not null.
    pub fn id(&self) -> Option<&ScalarValue> {
        self.description.get(KEY_ID).filter(|v| !v.is_null())
    }

    /// Look up any field of the flat document by key.
    pub fn get(&self, key: &str) -> Option<ScalarValue> {
        match key {
            KEY_TUPLE_WIDTH_IN => Some(ScalarValue::Int(self.tuple_width_in)),
            KEY_TUPLE_WIDTH_OUT => Some(ScalarValue::Int(self.tuple_width_out)),
            KEY_INPUT_RATE => self.input_rate.map(ScalarValue::Float),
            KEY_OUTPUT_RATE => self.output_rate.map(ScalarValue::Float),
            KEY_REAL_SELECTIVITY => self.real_selectivity.map(ScalarValue::Float),
            other => self.description.get(other).cloned(),
        }
    }

    fn computed_fields(&self) -> impl Iterator<Item = (&'static str, ScalarValue)> + '_ {
        [
            (KEY_TUPLE_WIDTH_IN, Some(ScalarValue::Int(self.tuple_width_in))),
            (KEY_TUPLE_WIDTH_OUT, Some(ScalarValue::Int(self.tuple_width_out))),
            (KEY_INPUT_RATE, self.input_rate.map(ScalarValue::Float)),
            (KEY_OUTPUT_RATE, self.output_rate.map(ScalarValue::Float)),
            (KEY_REAL_SELECTIVITY, self.real_selectivity.map(ScalarValue::Float)),
        ]
        .into_iter()
        .filter_map(|(k, v)| v.map(|v| (k, v)))
    }

    /// The flat document written by sinks.
    pub fn to_document(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut doc = serde_json::Map::with_capacity(self.description.len() + 5);
        for (k, v) in &self.description {
            doc.insert(k.clone(), v.clone().into());
        }
        for (k, v) in self.computed_fields() {
            doc.insert(k.to_string(), v.into());
        }
        doc
    }
}

impl Serialize for ObservationSummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let computed: Vec<_> = self.computed_fields().collect();
        let mut map = serializer.serialize_map(Some(self.description.len() + computed.len()))?;
        for (k, v) in &self.description {
            map.serialize_entry(k, v)?;
        }
        for (k, v) in &computed {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
