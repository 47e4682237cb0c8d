//! # Codec Engine — Top-Level Operations
//!
//! The functions callers use on whole documents. Each one resolves the
//! process-wide schema of `T` and delegates to it.
//!
//! | Operation | Fails with |
//! |-----------|------------|
//! | [`decode`] | [`DecodeError`] naming the first offending location |
//! | [`encode`] | never |
//! | [`clone`], [`mutate`] | [`CodecError`] for unknown or mistyped overrides |
//! | [`equals`], [`diff`] | never |
//! | [`from_str`], [`to_string`] | [`CodecError::Json`] at the text boundary |

use serde_json::Value;

use crate::error::{CodecError, DecodeError};
use crate::path::Path;
use crate::schema::{Overrides, Schematic};

/// Decode a raw document into `T`.
///
/// Extra keys are ignored. Missing optional fields become absent. The
/// first malformed field aborts the decode with its full path.
pub fn decode<T: Schematic>(raw: &Value) -> Result<T, DecodeError> {
    let schema = T::schema();
    match schema.decode(raw, &Path::root()) {
        Ok(value) => {
            tracing::debug!(schema = schema.name(), "decoded document");
            Ok(value)
        }
        Err(err) => {
            tracing::debug!(schema = schema.name(), path = %err.path, "decode rejected: {}", err.reason);
            Err(err)
        }
    }
}

/// Encode `value` to its canonical JSON shape.
pub fn encode<T: Schematic>(value: &T) -> Value {
    let schema = T::schema();
    tracing::debug!(schema = schema.name(), "encoding document");
    schema.encode(value)
}

/// Schema-aware copy of `value` with `overrides` substituted.
///
/// Override values are taken verbatim. An empty [`Overrides`] yields an
/// instance equal to `value` under [`equals`].
pub fn clone<T: Schematic>(value: &T, overrides: Overrides) -> Result<T, CodecError> {
    T::schema().clone_with(value, overrides)
}

/// Produce an updated copy of `value`. Same contract as [`clone`].
pub fn mutate<T: Schematic>(value: &T, partial: Overrides) -> Result<T, CodecError> {
    value.mutate(partial)
}

/// Structural equality over possibly-absent instances.
///
/// Two absent instances are equal; absent never equals present.
pub fn equals<T: Schematic>(a: Option<&T>, b: Option<&T>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(x), Some(y)) => T::schema().equals(x, y),
        _ => false,
    }
}

/// Top-level field names whose values differ between `a` and `b`.
pub fn diff<T: Schematic>(a: &T, b: &T) -> Vec<&'static str> {
    T::schema().diff(a, b)
}

/// Parse JSON text and decode it into `T`.
pub fn from_str<T: Schematic>(text: &str) -> Result<T, CodecError> {
    let raw: Value = serde_json::from_str(text)?;
    Ok(decode(&raw)?)
}

/// Encode `value` as compact JSON text.
pub fn to_string<T: Schematic>(value: &T) -> Result<String, CodecError> {
    Ok(serde_json::to_string(&encode(value))?)
}

/// Encode `value` as indented JSON text.
pub fn to_string_pretty<T: Schematic>(value: &T) -> Result<String, CodecError> {
    Ok(serde_json::to_string_pretty(&encode(value))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{map_of, optional};
    use crate::primitive::{Bool, Number, Str};
    use crate::schema::{declared, Schema};
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::sync::OnceLock;

    #[derive(Debug, Clone, PartialEq)]
    struct Threshold {
        name: String,
        value: f64,
        enabled: bool,
        note: Option<String>,
        tags: BTreeMap<String, String>,
    }

    impl Schematic for Threshold {
        fn schema() -> &'static Schema<Self> {
            static SCHEMA: OnceLock<Schema<Threshold>> = OnceLock::new();
            SCHEMA.get_or_init(|| {
                declared(
                    Schema::record("Threshold")
                        .field("name", Str, |t: &Threshold| &t.name)
                        .field("value", Number, |t: &Threshold| &t.value)
                        .field("enabled", Bool, |t: &Threshold| &t.enabled)
                        .field("note", optional(Str), |t: &Threshold| &t.note)
                        .field("tags", map_of(Str), |t: &Threshold| &t.tags)
                        .build(|bag| {
                            Ok(Threshold {
                                name: bag.take("name")?,
                                value: bag.take("value")?,
                                enabled: bag.take("enabled")?,
                                note: bag.take("note")?,
                                tags: bag.take("tags")?,
                            })
                        })
                        .map(Schema::Record),
                )
            })
        }
    }

    fn sample() -> Value {
        json!({"name": "p99", "value": 250, "enabled": true, "tags": {"team": "core"}})
    }

    #[test]
    fn decode_then_encode_is_stable() {
        let threshold: Threshold = decode(&sample()).unwrap();
        assert_eq!(threshold.value, 250.0);
        assert_eq!(threshold.note, None);
        assert_eq!(encode(&threshold), sample());
    }

    #[test]
    fn extra_keys_are_ignored() {
        let mut raw = sample();
        raw["legacy"] = json!("dropped");
        let threshold: Threshold = decode(&raw).unwrap();
        assert_eq!(encode(&threshold), sample());
    }

    #[test]
    fn clone_without_overrides_is_equal_but_independent() {
        let original: Threshold = decode(&sample()).unwrap();
        let mut copy = clone(&original, Overrides::new()).unwrap();
        assert!(equals(Some(&original), Some(&copy)));
        copy.tags.insert("team".into(), "edge".into());
        assert_eq!(original.tags["team"], "core");
        assert!(!equals(Some(&original), Some(&copy)));
    }

    #[test]
    fn mutate_leaves_the_original_untouched() {
        let original: Threshold = decode(&sample()).unwrap();
        let disabled = mutate(&original, Overrides::new().set("enabled", false)).unwrap();
        assert!(original.enabled);
        assert!(!disabled.enabled);
        assert_eq!(diff(&original, &disabled), vec!["enabled"]);
    }

    #[test]
    fn equals_handles_absence() {
        let t: Threshold = decode(&sample()).unwrap();
        assert!(equals::<Threshold>(None, None));
        assert!(!equals(Some(&t), None));
        assert!(!equals(None, Some(&t)));
    }

    #[test]
    fn text_boundary_reports_json_and_decode_errors() {
        assert!(matches!(from_str::<Threshold>("{"), Err(CodecError::Json(_))));
        assert!(matches!(
            from_str::<Threshold>(r#"{"name": "x"}"#),
            Err(CodecError::Decode(_))
        ));
        let text = to_string(&decode::<Threshold>(&sample()).unwrap()).unwrap();
        let back: Threshold = from_str(&text).unwrap();
        assert_eq!(back.name, "p99");
        let pretty = to_string_pretty(&back).unwrap();
        assert!(pretty.contains('\n'));
    }
}
