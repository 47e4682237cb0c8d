//! # Enumerated Field Types
//!
//! - [`Const`] maps a string tag to one of a fixed list of singleton domain
//!   values. Decoding only ever yields a reference into that list, so
//!   equality is pointer identity.
//! - [`OneOf`] restricts a primitive field type to a literal set.
//!
//! Both check their declarations when built: duplicate tags and empty
//! allowed sets are [`SchemaError`]s, raised before any document is seen.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::{DecodeError, DecodeReason, SchemaError};
use crate::field::FieldType;
use crate::path::Path;

/// A singleton domain value identified by a string tag.
pub trait Tagged: Send + Sync + 'static {
    /// The identifying tag written to documents.
    fn tag(&self) -> &'static str;
}

// ─── Const ───────────────────────────────────────────────────────────

/// Closed enumeration of `'static` singletons.
#[derive(Debug)]
pub struct Const<V: 'static> {
    name: &'static str,
    values: &'static [&'static V],
    index: HashMap<&'static str, usize>,
}

impl<V: Tagged> Const<V> {
    /// Build the enumeration from its singletons.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateConst`] if two singletons share a tag.
    pub fn new(name: &'static str, values: &'static [&'static V]) -> Result<Self, SchemaError> {
        let mut index = HashMap::with_capacity(values.len());
        for (i, value) in values.iter().enumerate() {
            if index.insert(value.tag(), i).is_some() {
                return Err(SchemaError::DuplicateConst {
                    name,
                    tag: value.tag(),
                });
            }
        }
        Ok(Self {
            name,
            values,
            index,
        })
    }

    /// Build the enumeration from a static declaration.
    ///
    /// # Panics
    ///
    /// Panics if two singletons share a tag, as [`declared`](crate::declared) does.
    pub fn declare(name: &'static str, values: &'static [&'static V]) -> Self {
        match Self::new(name, values) {
            Ok(field) => field,
            Err(err) => panic!("invalid schema declaration: {err}"),
        }
    }

    /// Look up a singleton by tag.
    pub fn get(&self, tag: &str) -> Option<&'static V> {
        self.index.get(tag).map(|&i| self.values[i])
    }

    /// Every registered tag, in declaration order.
    pub fn tags(&self) -> Vec<&'static str> {
        self.values.iter().map(|v| v.tag()).collect()
    }

    /// The registered singletons, in declaration order.
    pub fn values(&self) -> &'static [&'static V] {
        self.values
    }
}

impl<V: Tagged> FieldType for Const<V> {
    type Value = &'static V;

    fn decode(&self, raw: &Value, path: &Path<'_>) -> Result<&'static V, DecodeError> {
        let tag = raw
            .as_str()
            .ok_or_else(|| path.error(DecodeReason::type_mismatch(self.describe(), raw)))?;
        self.get(tag).ok_or_else(|| {
            path.error(DecodeReason::UnknownConst {
                tag: tag.to_owned(),
                valid: self.tags().into_iter().map(str::to_owned).collect(),
            })
        })
    }

    fn encode(&self, value: &&'static V) -> Value {
        Value::String(value.tag().to_owned())
    }

    fn equals(&self, a: &&'static V, b: &&'static V) -> bool {
        std::ptr::eq(*a, *b)
    }

    fn describe(&self) -> String {
        self.name.to_owned()
    }
}

// ─── OneOf ───────────────────────────────────────────────────────────

/// A primitive restricted to a literal set.
pub struct OneOf<F: FieldType> {
    inner: F,
    allowed: Vec<F::Value>,
}

impl<F: FieldType> OneOf<F> {
    /// Restrict `inner` to `allowed`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::EmptyAllowedSet`] if `allowed` is empty.
    pub fn new(inner: F, allowed: impl IntoIterator<Item = F::Value>) -> Result<Self, SchemaError> {
        let allowed: Vec<F::Value> = allowed.into_iter().collect();
        if allowed.is_empty() {
            return Err(SchemaError::EmptyAllowedSet {
                describe: inner.describe(),
            });
        }
        Ok(Self { inner, allowed })
    }

    /// Restrict `inner` to a static literal list.
    ///
    /// # Panics
    ///
    /// Panics if `allowed` is empty, as [`declared`](crate::declared) does.
    pub fn declare(inner: F, allowed: impl IntoIterator<Item = F::Value>) -> Self {
        match Self::new(inner, allowed) {
            Ok(field) => field,
            Err(err) => panic!("invalid schema declaration: {err}"),
        }
    }

    /// The allowed literals.
    pub fn allowed(&self) -> &[F::Value] {
        &self.allowed
    }

    /// Whether `value` is one of the allowed literals.
    pub fn contains(&self, value: &F::Value) -> bool {
        self.allowed.iter().any(|a| self.inner.equals(a, value))
    }
}

impl<F: FieldType> FieldType for OneOf<F> {
    type Value = F::Value;

    fn decode(&self, raw: &Value, path: &Path<'_>) -> Result<F::Value, DecodeError> {
        let value = self.inner.decode(raw, path)?;
        if self.contains(&value) {
            return Ok(value);
        }
        Err(path.error(DecodeReason::NotAllowed {
            value: self.inner.encode(&value).to_string(),
            allowed: self
                .allowed
                .iter()
                .map(|a| self.inner.encode(a).to_string())
                .collect(),
        }))
    }

    fn encode(&self, value: &F::Value) -> Value {
        self.inner.encode(value)
    }

    fn equals(&self, a: &F::Value, b: &F::Value) -> bool {
        self.inner.equals(a, b)
    }

    fn describe(&self) -> String {
        format!("one of {} literals", self.inner.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::{Number, Str};
    use serde_json::json;

    #[derive(Debug)]
    struct Color {
        tag: &'static str,
    }

    impl Tagged for Color {
        fn tag(&self) -> &'static str {
            self.tag
        }
    }

    static RED: Color = Color { tag: "red" };
    static GREEN: Color = Color { tag: "green" };
    static ALSO_RED: Color = Color { tag: "red" };
    static COLORS: [&Color; 2] = [&RED, &GREEN];
    static CLASHING: [&Color; 2] = [&RED, &ALSO_RED];

    fn colors() -> Const<Color> {
        Const::new("color", &COLORS).unwrap()
    }

    #[test]
    fn const_decodes_to_the_registered_singleton() {
        let decoded = colors().decode(&json!("green"), &Path::root()).unwrap();
        assert!(std::ptr::eq(decoded, &GREEN));
        assert_eq!(colors().encode(&decoded), json!("green"));
    }

    #[test]
    fn const_unknown_tag_lists_valid_tags() {
        let err = colors().decode(&json!("blue"), &Path::root()).unwrap_err();
        assert_eq!(
            err.reason,
            DecodeReason::UnknownConst {
                tag: "blue".into(),
                valid: vec!["red".into(), "green".into()]
            }
        );
    }

    #[test]
    fn const_equality_is_identity() {
        let field = colors();
        let red: &'static Color = &RED;
        let same_tag_other_value: &'static Color = &ALSO_RED;
        assert!(field.equals(&red, &red));
        assert!(!field.equals(&red, &same_tag_other_value));
    }

    #[test]
    fn const_rejects_duplicate_tags_at_construction() {
        let err = Const::new("color", &CLASHING).unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateConst {
                name: "color",
                tag: "red"
            }
        );
    }

    #[test]
    fn one_of_restricts_decoded_values() {
        let field = OneOf::new(Number, [5.0, 10.0, 30.0]).unwrap();
        assert_eq!(field.decode(&json!(10), &Path::root()).unwrap(), 10.0);
        let err = field.decode(&json!(15), &Path::root()).unwrap_err();
        assert_eq!(
            err.reason,
            DecodeReason::NotAllowed {
                value: "15".into(),
                allowed: vec!["5".into(), "10".into(), "30".into()]
            }
        );
    }

    #[test]
    fn one_of_delegates_kind_checks() {
        let field = OneOf::new(Str, ["csv".to_string()]).unwrap();
        let err = field.decode(&json!(1), &Path::root()).unwrap_err();
        assert!(matches!(err.reason, DecodeReason::TypeMismatch { .. }));
    }

    #[test]
    fn one_of_requires_allowed_values() {
        assert!(OneOf::new(Str, Vec::<String>::new()).is_err());
    }
}
