//! # Primitive Field Types
//!
//! [`Number`], [`Str`], [`Bool`] and the opaque [`Any`] passthrough.
//!
//! Numbers follow JSON semantics: every number is an `f64`. Whole numbers
//! inside the exactly-representable integer range encode as JSON integers
//! so that `42` survives a round trip as `42` rather than `42.0`.
//! Non-finite numbers have no JSON form and encode as `null`.

use serde_json::Value;

use crate::error::{DecodeError, DecodeReason};
use crate::field::FieldType;
use crate::path::Path;

/// Largest integer an `f64` represents exactly (2^53 - 1).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// A JSON number.
#[derive(Debug, Clone, Copy, Default)]
pub struct Number;

impl FieldType for Number {
    type Value = f64;

    fn decode(&self, raw: &Value, path: &Path<'_>) -> Result<f64, DecodeError> {
        raw.as_f64()
            .ok_or_else(|| path.error(DecodeReason::type_mismatch("number", raw)))
    }

    fn encode(&self, value: &f64) -> Value {
        number_value(*value)
    }

    fn equals(&self, a: &f64, b: &f64) -> bool {
        a == b
    }

    fn describe(&self) -> String {
        "number".into()
    }
}

/// Render an `f64` as a JSON number, preferring the integer form.
pub fn number_value(n: f64) -> Value {
    if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

/// A JSON string.
#[derive(Debug, Clone, Copy, Default)]
pub struct Str;

impl FieldType for Str {
    type Value = String;

    fn decode(&self, raw: &Value, path: &Path<'_>) -> Result<String, DecodeError> {
        raw.as_str()
            .map(str::to_owned)
            .ok_or_else(|| path.error(DecodeReason::type_mismatch("string", raw)))
    }

    fn encode(&self, value: &String) -> Value {
        Value::String(value.clone())
    }

    fn equals(&self, a: &String, b: &String) -> bool {
        a == b
    }

    fn describe(&self) -> String {
        "string".into()
    }
}

/// A JSON boolean.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bool;

impl FieldType for Bool {
    type Value = bool;

    fn decode(&self, raw: &Value, path: &Path<'_>) -> Result<bool, DecodeError> {
        raw.as_bool()
            .ok_or_else(|| path.error(DecodeReason::type_mismatch("boolean", raw)))
    }

    fn encode(&self, value: &bool) -> Value {
        Value::Bool(*value)
    }

    fn equals(&self, a: &bool, b: &bool) -> bool {
        a == b
    }

    fn describe(&self) -> String {
        "boolean".into()
    }
}

/// An untyped payload, kept as raw JSON.
///
/// Decoding performs no validation. Only structural round-trip equality is
/// guaranteed for such fields; nothing about their shape is type-checked.
#[derive(Debug, Clone, Copy, Default)]
pub struct Any;

impl FieldType for Any {
    type Value = Value;

    fn decode(&self, raw: &Value, _path: &Path<'_>) -> Result<Value, DecodeError> {
        Ok(raw.clone())
    }

    fn encode(&self, value: &Value) -> Value {
        value.clone()
    }

    fn equals(&self, a: &Value, b: &Value) -> bool {
        json_equals(a, b)
    }

    fn describe(&self) -> String {
        "any".into()
    }
}

/// Deep structural equality over raw JSON.
///
/// Numbers compare by numeric value, so `1` equals `1.0`. Arrays compare
/// element-wise in order; objects compare by key set regardless of order.
pub fn json_equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            x == y || matches!((x.as_f64(), y.as_f64()), (Some(p), Some(q)) if p == q)
        }
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| json_equals(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(key, x)| ys.get(key).is_some_and(|y| json_equals(x, y)))
        }
        _ => a == b,
    }
}
