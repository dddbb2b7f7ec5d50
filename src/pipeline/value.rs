//! Values flowing through monitored nodes.
//!
//! - [`ScalarValue`]: entries of a sampler's description document.
//! - [`TupleShape`]: how the sampler measures tuple width.
//! - [`WindowState`]: how the sampler measures a materialized window.

use crate::error::{MonitorError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, VecDeque};

/// Scalar stored in a sampler description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl ScalarValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ScalarValue::Null)
    }
}

impl std::fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScalarValue::Null => write!(f, "null"),
            ScalarValue::Bool(v) => write!(f, "{}", v),
            ScalarValue::Int(v) => write!(f, "{}", v),
            ScalarValue::Float(v) => write!(f, "{}", v),
            ScalarValue::String(v) => write!(f, "{}", v),
        }
    }
}

impl From<bool> for ScalarValue {
    fn from(v: bool) -> Self {
        ScalarValue::Bool(v)
    }
}

impl From<i32> for ScalarValue {
    fn from(v: i32) -> Self {
        ScalarValue::Int(v as i64)
    }
}

impl From<i64> for ScalarValue {
    fn from(v: i64) -> Self {
        ScalarValue::Int(v)
    }
}

impl From<u32> for ScalarValue {
    fn from(v: u32) -> Self {
        ScalarValue::Int(v as i64)
    }
}

impl From<f64> for ScalarValue {
    fn from(v: f64) -> Self {
        ScalarValue::Float(v)
    }
}

impl From<&str> for ScalarValue {
    fn from(v: &str) -> Self {
        ScalarValue::String(v.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(v: String) -> Self {
        ScalarValue::String(v)
    }
}

impl<T: Into<ScalarValue>> From<Option<T>> for ScalarValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(ScalarValue::Null, Into::into)
    }
}

impl From<ScalarValue> for serde_json::Value {
    fn from(v: ScalarValue) -> Self {
        match v {
            ScalarValue::Null => serde_json::Value::Null,
            ScalarValue::Bool(b) => serde_json::Value::Bool(b),
            ScalarValue::Int(i) => serde_json::Value::from(i),
            ScalarValue::Float(f) => serde_json::Value::from(f),
            ScalarValue::String(s) => serde_json::Value::String(s),
        }
    }
}

// ==================== Tuple Shape ====================

/// Fixed-arity structure of a value.
///
/// Only values with a fixed number of fields report a width; everything
/// else keeps the default of `None`.
pub trait TupleShape {
    fn tuple_width(&self) -> Option<usize> {
        None
    }
}

/// Tuple width as recorded in a summary: the arity, or `-1` if unknown.
pub fn shape_of<T: TupleShape + ?Sized>(value: &T) -> i64 {
    value.tuple_width().map_or(-1, |w| w as i64)
}

impl<T: TupleShape + ?Sized> TupleShape for &T {
    fn tuple_width(&self) -> Option<usize> {
        (**self).tuple_width()
    }
}

impl<T: TupleShape + ?Sized> TupleShape for Box<T> {
    fn tuple_width(&self) -> Option<usize> {
        (**self).tuple_width()
    }
}

impl TupleShape for () {
    fn tuple_width(&self) -> Option<usize> {
        Some(0)
    }
}

impl<T, const N: usize> TupleShape for [T; N] {
    fn tuple_width(&self) -> Option<usize> {
        Some(N)
    }
}

macro_rules! tuple_shape {
    ($($len:expr => ($($name:ident),+);)+) => {
        $(
            impl<$($name),+> TupleShape for ($($name,)+) {
                fn tuple_width(&self) -> Option<usize> {
                    Some($len)
                }
            }
        )+
    };
}

tuple_shape! {
    1 => (A);
    2 => (A, B);
    3 => (A, B, C);
    4 => (A, B, C, D);
    5 => (A, B, C, D, E);
    6 => (A, B, C, D, E, F);
    7 => (A, B, C, D, E, F, G);
    8 => (A, B, C, D, E, F, G, H);
    9 => (A, B, C, D, E, F, G, H, I);
    10 => (A, B, C, D, E, F, G, H, I, J);
    11 => (A, B, C, D, E, F, G, H, I, J, K);
    12 => (A, B, C, D, E, F, G, H, I, J, K, L);
}

macro_rules! shapeless {
    ($($ty:ty),+ $(,)?) => {
        $(impl TupleShape for $ty {})+
    };
}

shapeless!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, str,
    String, ScalarValue, serde_json::Value,
);

impl<T> TupleShape for [T] {}
impl<T> TupleShape for Vec<T> {}
impl<T> TupleShape for Option<T> {}

// ==================== Window State ====================

/// Materialized contents of a window, as seen by `report_window_length`.
pub trait WindowState {
    /// Number of elements in the window. Scalar (pre-aggregated) state
    /// counts as one element; any other shape is a contract violation.
    fn materialized_len(&self) -> Result<usize>;
}

fn illegal_state<T: ?Sized>(what: &str) -> MonitorError {
    MonitorError::InvalidWindowState(format!(
        "{} ({}) is neither a scalar nor a collection",
        what,
        std::any::type_name::<T>()
    ))
}

impl<T: WindowState + ?Sized> WindowState for &T {
    fn materialized_len(&self) -> Result<usize> {
        (**self).materialized_len()
    }
}

macro_rules! scalar_window_state {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl WindowState for $ty {
                fn materialized_len(&self) -> Result<usize> {
                    Ok(1)
                }
            }
        )+
    };
}

scalar_window_state!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl<T> WindowState for [T] {
    fn materialized_len(&self) -> Result<usize> {
        Ok(self.len())
    }
}

impl<T, const N: usize> WindowState for [T; N] {
    fn materialized_len(&self) -> Result<usize> {
        Ok(N)
    }
}

impl<T> WindowState for Vec<T> {
    fn materialized_len(&self) -> Result<usize> {
        Ok(self.len())
    }
}

impl<T> WindowState for VecDeque<T> {
    fn materialized_len(&self) -> Result<usize> {
        Ok(self.len())
    }
}

impl<K, V, S> WindowState for HashMap<K, V, S> {
    fn materialized_len(&self) -> Result<usize> {
        Err(illegal_state::<Self>("mapping"))
    }
}

impl<K, V> WindowState for BTreeMap<K, V> {
    fn materialized_len(&self) -> Result<usize> {
        Err(illegal_state::<Self>("mapping"))
    }
}

impl WindowState for ScalarValue {
    fn materialized_len(&self) -> Result<usize> {
        match self {
            ScalarValue::Int(_) | ScalarValue::Float(_) => Ok(1),
            ScalarValue::Null => Err(illegal_state::<Self>("null")),
            ScalarValue::Bool(_) => Err(illegal_state::<Self>("boolean")),
            ScalarValue::String(_) => Err(illegal_state::<Self>("string")),
        }
    }
}

impl WindowState for serde_json::Value {
    fn materialized_len(&self) -> Result<usize> {
        use serde_json::Value;
        match self {
            Value::Number(_) => Ok(1),
            Value::Array(items) => Ok(items.len()),
            Value::Object(_) => Err(illegal_state::<Self>("object")),
            Value::Null => Err(illegal_state::<Self>("null")),
            Value::Bool(_) => Err(illegal_state::<Self>("boolean")),
            Value::String(_) => Err(illegal_state::<Self>("string")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tuple_widths() {
        assert_eq!(shape_of(&(1, "a")), 2);
        assert_eq!(shape_of(&(1, 2.0, "x", 'c')), 4);
        assert_eq!(shape_of(&[0u8; 5]), 5);
        assert_eq!(shape_of(&()), 0);
    }

    #[test]
    fn test_unknown_shape_is_minus_one() {
        assert_eq!(shape_of(&42i64), -1);
        assert_eq!(shape_of("text"), -1);
        assert_eq!(shape_of(&vec![1, 2, 3]), -1);
        assert_eq!(shape_of(&json!([1, 2])), -1);
    }

    #[test]
    fn test_shape_through_references() {
        let t = (1, 2, 3);
        let r = &&t;
        assert_eq!(shape_of(r), 3);
        let boxed: Box<(i32, i32)> = Box::new((1, 2));
        assert_eq!(shape_of(&boxed), 2);
    }

    #[test]
    fn test_scalar_window_state_counts_one() {
        assert_eq!(7i64.materialized_len().unwrap(), 1);
        assert_eq!(2.5f64.materialized_len().unwrap(), 1);
        assert_eq!(ScalarValue::Int(3).materialized_len().unwrap(), 1);
        assert_eq!(json!(9).materialized_len().unwrap(), 1);
    }

    #[test]
    fn test_collection_window_state_counts_elements() {
        assert_eq!(vec![(1, 2); 4].materialized_len().unwrap(), 4);
        assert_eq!(VecDeque::from(vec![1, 2]).materialized_len().unwrap(), 2);
        assert_eq!(json!([1, 2, 3]).materialized_len().unwrap(), 3);
        let empty: Vec<i32> = Vec::new();
        assert_eq!(empty.materialized_len().unwrap(), 0);
    }

    #[test]
    fn test_mapping_window_state_is_illegal() {
        let map: HashMap<String, i32> = HashMap::new();
        let err = map.materialized_len().unwrap_err();
        assert!(matches!(err, MonitorError::InvalidWindowState(_)));
        assert!(json!({"a": 1}).materialized_len().is_err());
        assert!(ScalarValue::from("x").materialized_len().is_err());
    }

    #[test]
    fn test_scalar_value_conversions() {
        assert_eq!(ScalarValue::from(Some(3)), ScalarValue::Int(3));
        assert_eq!(ScalarValue::from(None::<i64>), ScalarValue::Null);
        assert!(ScalarValue::Null.is_null());
        assert_eq!(ScalarValue::from("node-1").to_string(), "node-1");
        assert_eq!(ScalarValue::Int(2).to_string(), "2");
    }

    #[test]
    fn test_scalar_value_serializes_flat() {
        assert_eq!(serde_json::to_string(&ScalarValue::Int(5)).unwrap(), "5");
        assert_eq!(
            serde_json::to_string(&ScalarValue::from("a")).unwrap(),
            "\"a\""
        );
        assert_eq!(serde_json::to_string(&ScalarValue::Null).unwrap(), "null");
    }
}
