//! # Container Field Types
//!
//! [`Optional`], [`ArrayOf`] and [`MapOf`], each wrapping an inner field
//! type and delegating element work to it.
//!
//! | Type | Value | Equality |
//! |------|-------|----------|
//! | `Optional<F>` | `Option<F::Value>` | variants match, inner equal when both present |
//! | `ArrayOf<F>` | `Vec<F::Value>` | same length, pairwise equal **in order** |
//! | `MapOf<F>` | `BTreeMap<String, F::Value>` | same key set, equal per key, order irrelevant |

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::error::{DecodeError, DecodeReason};
use crate::field::FieldType;
use crate::path::Path;

// ─── Optional ────────────────────────────────────────────────────────

/// Present-or-absent wrapper.
///
/// A missing key and an explicit `null` both decode to `None` without
/// invoking the inner decode. `None` is omitted from encoded objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct Optional<F>(pub F);

/// Shorthand for [`Optional`].
pub fn optional<F: FieldType>(inner: F) -> Optional<F> {
    Optional(inner)
}

impl<F: FieldType> FieldType for Optional<F> {
    type Value = Option<F::Value>;

    fn decode(&self, raw: &Value, path: &Path<'_>) -> Result<Self::Value, DecodeError> {
        if raw.is_null() {
            return Ok(None);
        }
        self.0.decode(raw, path).map(Some)
    }

    fn encode(&self, value: &Self::Value) -> Value {
        match value {
            Some(inner) => self.0.encode(inner),
            None => Value::Null,
        }
    }

    fn equals(&self, a: &Self::Value, b: &Self::Value) -> bool {
        match (a, b) {
            (None, None) => true,
            (Some(x), Some(y)) => self.0.equals(x, y),
            _ => false,
        }
    }

    fn optional(&self) -> bool {
        true
    }

    fn absent(&self) -> Option<Self::Value> {
        Some(None)
    }

    fn is_absent(&self, value: &Self::Value) -> bool {
        value.is_none()
    }

    fn describe(&self) -> String {
        format!("optional {}", self.0.describe())
    }
}

// ─── Array ───────────────────────────────────────────────────────────

/// Homogeneous sequence. Element order is semantically significant.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayOf<F>(pub F);

/// Shorthand for [`ArrayOf`].
pub fn array_of<F: FieldType>(inner: F) -> ArrayOf<F> {
    ArrayOf(inner)
}

impl<F: FieldType> FieldType for ArrayOf<F> {
    type Value = Vec<F::Value>;

    fn decode(&self, raw: &Value, path: &Path<'_>) -> Result<Self::Value, DecodeError> {
        let items = raw
            .as_array()
            .ok_or_else(|| path.error(DecodeReason::type_mismatch(self.describe(), raw)))?;
        items
            .iter()
            .enumerate()
            .map(|(i, item)| self.0.decode(item, &path.index(i)))
            .collect()
    }

    fn encode(&self, value: &Self::Value) -> Value {
        Value::Array(value.iter().map(|item| self.0.encode(item)).collect())
    }

    fn equals(&self, a: &Self::Value, b: &Self::Value) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| self.0.equals(x, y))
    }

    fn describe(&self) -> String {
        format!("array of {}", self.0.describe())
    }
}

// ─── Map ─────────────────────────────────────────────────────────────

/// String-keyed map. Key order is irrelevant to equality.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapOf<F>(pub F);

/// Shorthand for [`MapOf`].
pub fn map_of<F: FieldType>(inner: F) -> MapOf<F> {
    MapOf(inner)
}

impl<F: FieldType> FieldType for MapOf<F> {
    type Value = BTreeMap<String, F::Value>;

    fn decode(&self, raw: &Value, path: &Path<'_>) -> Result<Self::Value, DecodeError> {
        let entries = raw
            .as_object()
            .ok_or_else(|| path.error(DecodeReason::type_mismatch(self.describe(), raw)))?;
        let mut out = BTreeMap::new();
        for (key, item) in entries {
            let value = self.0.decode(item, &path.key(key))?;
            out.insert(key.clone(), value);
        }
        Ok(out)
    }

    fn encode(&self, value: &Self::Value) -> Value {
        let entries: Map<String, Value> = value
            .iter()
            .map(|(key, item)| (key.clone(), self.0.encode(item)))
            .collect();
        Value::Object(entries)
    }

    fn equals(&self, a: &Self::Value, b: &Self::Value) -> bool {
        a.len() == b.len()
            && a
                .iter()
                .all(|(key, x)| b.get(key).is_some_and(|y| self.0.equals(x, y)))
    }

    fn describe(&self) -> String {
        format!("map of {}", self.0.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::{Number, Str};
    use serde_json::json;

    fn root() -> Path<'static> {
        Path::root()
    }

    #[test]
    fn optional_null_is_absent_without_inner_decode() {
        let field = optional(Number);
        assert_eq!(field.decode(&json!(null), &root()).unwrap(), None);
        assert_eq!(field.decode(&json!(3), &root()).unwrap(), Some(3.0));
        assert!(field.decode(&json!("3"), &root()).is_err());
    }

    #[test]
    fn optional_equality_requires_matching_variants() {
        let field = optional(Str);
        assert!(field.equals(&None, &None));
        assert!(field.equals(&Some("a".into()), &Some("a".into())));
        assert!(!field.equals(&Some("a".into()), &Some("b".into())));
        assert!(!field.equals(&Some("a".into()), &None));
        assert!(!field.equals(&None, &Some("a".into())));
    }

    #[test]
    fn optional_reports_absence() {
        let field = optional(Str);
        assert!(field.optional());
        assert_eq!(field.absent(), Some(None));
        assert!(field.is_absent(&None));
        assert_eq!(field.encode(&None), Value::Null);
    }

    #[test]
    fn array_error_path_includes_index() {
        let field = array_of(Number);
        let root = Path::root();
        let values = root.field("values");
        let err = field.decode(&json!([1, 2, "three"]), &values).unwrap_err();
        assert_eq!(err.path.to_string(), "$.values[2]");
    }

    #[test]
    fn array_rejects_non_sequences() {
        let err = array_of(Number).decode(&json!({"0": 1}), &root()).unwrap_err();
        assert_eq!(
            err.reason,
            DecodeReason::TypeMismatch {
                expected: "array of number".into(),
                found: "object"
            }
        );
    }

    #[test]
    fn array_equality_is_order_sensitive() {
        let field = array_of(Number);
        let a = field.decode(&json!([1, 2]), &root()).unwrap();
        let b = field.decode(&json!([2, 1]), &root()).unwrap();
        let c = field.decode(&json!([1, 2, 3]), &root()).unwrap();
        assert!(field.equals(&a, &a.clone()));
        assert!(!field.equals(&a, &b));
        assert!(!field.equals(&a, &c));
    }

    #[test]
    fn map_equality_ignores_key_order() {
        let field = map_of(Number);
        let a = field.decode(&json!({"a": 1, "b": 2}), &root()).unwrap();
        let b = field.decode(&json!({"b": 2, "a": 1}), &root()).unwrap();
        let c = field.decode(&json!({"a": 1, "c": 2}), &root()).unwrap();
        assert!(field.equals(&a, &b));
        assert!(!field.equals(&a, &c));
    }

    #[test]
    fn map_error_path_includes_key() {
        let err = map_of(Str)
            .decode(&json!({"env": "prod", "region": 7}), &root())
            .unwrap_err();
        assert_eq!(err.path.to_string(), r#"$["region"]"#);
    }

    #[test]
    fn nested_containers_compose() {
        let field = map_of(array_of(optional(Number)));
        let raw = json!({"cpu": [1, null, 3]});
        let decoded = field.decode(&raw, &root()).unwrap();
        assert_eq!(decoded["cpu"], vec![Some(1.0), None, Some(3.0)]);
        assert_eq!(field.encode(&decoded), raw);
    }
}
