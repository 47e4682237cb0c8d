//! # SubTypes — Discriminated Unions
//!
//! Polymorphic documents carry their concrete type in a reserved string
//! key, `type`. A [`SubTypes`] registry maps each tag to one member record
//! type and dispatches decode, encode, equality and copy through it.
//!
//! ```json
//! { "type": "sum", "sampling": { "size": 42, "unit": "seconds" } }
//! ```
//!
//! ## Registry Discipline
//!
//! - Tags are unique within one union. A duplicate is a [`SchemaError`]
//!   raised when the registry is built, never a silent overwrite.
//! - Each member's own [`Discriminated::TAG`] is the key it registers
//!   under, so the tag written on encode is always the tag read on decode.
//! - Decoding a tag outside the registry fails with the full list of valid
//!   tags. There is no fallback member.

use std::collections::HashMap;
use std::fmt;

use serde_json::{Map, Value};

use crate::error::{CodecError, DecodeError, DecodeReason, SchemaError};
use crate::field::FieldType;
use crate::path::Path;
use crate::schema::{Overrides, Schematic};

/// The reserved discriminant key.
pub const TAG_KEY: &str = "type";

/// A record type that is a member of some union.
pub trait Discriminated: Schematic {
    /// The discriminant this type is written and read under.
    const TAG: &'static str;
}

// ─── Members ─────────────────────────────────────────────────────────

/// One registered member, erased over its concrete record type.
///
/// Every method taking a union value returns `None` when the value is not
/// this member's variant.
trait Member<U>: Send + Sync {
    fn tag(&self) -> &'static str;
    fn type_name(&self) -> &'static str;
    fn decode(&self, object: &Map<String, Value>, path: &Path<'_>) -> Result<U, DecodeError>;
    fn encode(&self, value: &U) -> Option<Map<String, Value>>;
    fn equals(&self, a: &U, b: &U) -> Option<bool>;
    fn clone_with(&self, value: &U, overrides: Overrides) -> Option<Result<U, CodecError>>;
    fn diff(&self, a: &U, b: &U) -> Option<Vec<&'static str>>;
}

struct Variant<T, U> {
    wrap: fn(T) -> U,
    project: fn(&U) -> Option<&T>,
}

impl<T: Discriminated, U: 'static> Member<U> for Variant<T, U> {
    fn tag(&self) -> &'static str {
        T::TAG
    }

    fn type_name(&self) -> &'static str {
        T::schema().name()
    }

    fn decode(&self, object: &Map<String, Value>, path: &Path<'_>) -> Result<U, DecodeError> {
        T::schema().decode_object(object, path).map(self.wrap)
    }

    fn encode(&self, value: &U) -> Option<Map<String, Value>> {
        (self.project)(value).map(|inner| T::schema().encode_object(inner))
    }

    fn equals(&self, a: &U, b: &U) -> Option<bool> {
        Some(T::schema().equals((self.project)(a)?, (self.project)(b)?))
    }

    fn clone_with(&self, value: &U, overrides: Overrides) -> Option<Result<U, CodecError>> {
        let inner = (self.project)(value)?;
        Some(T::schema().clone_with(inner, overrides).map(self.wrap))
    }

    fn diff(&self, a: &U, b: &U) -> Option<Vec<&'static str>> {
        Some(T::schema().diff((self.project)(a)?, (self.project)(b)?))
    }
}

// ─── Registry ────────────────────────────────────────────────────────

/// Tag → member registry for the union type `U`.
pub struct SubTypes<U: 'static> {
    name: &'static str,
    tag_of: fn(&U) -> &'static str,
    members: Vec<Box<dyn Member<U>>>,
    index: HashMap<&'static str, usize>,
}

/// Accumulates the members of a union.
pub struct SubTypesBuilder<U: 'static> {
    name: &'static str,
    tag_of: fn(&U) -> &'static str,
    members: Vec<Box<dyn Member<U>>>,
}

impl<U: Send + Sync + 'static> SubTypesBuilder<U> {
    /// Register `T` under its own tag.
    ///
    /// `wrap` lifts a decoded member into the union; `project` recovers it,
    /// returning `None` for every other variant.
    pub fn variant<T: Discriminated>(mut self, wrap: fn(T) -> U, project: fn(&U) -> Option<&T>) -> Self {
        self.members.push(Box::new(Variant { wrap, project }));
        self
    }

    /// Seal the registry.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::EmptyUnion`] when no member was registered and
    /// [`SchemaError::DuplicateTag`] when two members share a tag.
    pub fn build(self) -> Result<SubTypes<U>, SchemaError> {
        if self.members.is_empty() {
            return Err(SchemaError::EmptyUnion { union: self.name });
        }
        let mut index = HashMap::with_capacity(self.members.len());
        for (i, member) in self.members.iter().enumerate() {
            if index.insert(member.tag(), i).is_some() {
                return Err(SchemaError::DuplicateTag {
                    union: self.name,
                    tag: member.tag(),
                });
            }
        }
        Ok(SubTypes {
            name: self.name,
            tag_of: self.tag_of,
            members: self.members,
            index,
        })
    }
}

impl<U: Send + Sync + 'static> SubTypes<U> {
    /// Start declaring the union `name`. `tag_of` reports the runtime tag
    /// of a union value.
    pub fn builder(name: &'static str, tag_of: fn(&U) -> &'static str) -> SubTypesBuilder<U> {
        SubTypesBuilder {
            name,
            tag_of,
            members: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Registered tags, in declaration order.
    pub fn tags(&self) -> Vec<&'static str> {
        self.members.iter().map(|m| m.tag()).collect()
    }

    /// The record type name registered under `tag`.
    pub fn member_type(&self, tag: &str) -> Option<&'static str> {
        self.lookup(tag).map(|m| m.type_name())
    }

    /// The runtime tag of `value`.
    pub fn tag_of(&self, value: &U) -> &'static str {
        (self.tag_of)(value)
    }

    fn lookup(&self, tag: &str) -> Option<&dyn Member<U>> {
        self.index.get(tag).map(|&i| self.members[i].as_ref())
    }

    fn valid_tags(&self) -> Vec<String> {
        self.members.iter().map(|m| m.tag().to_owned()).collect()
    }

    /// Read the discriminant and decode the same object with the member's
    /// schema.
    pub fn decode_object(&self, object: &Map<String, Value>, path: &Path<'_>) -> Result<U, DecodeError> {
        let tag = match object.get(TAG_KEY) {
            None | Some(Value::Null) => {
                return Err(path.field(TAG_KEY).error(DecodeReason::MissingTag {
                    valid: self.valid_tags(),
                }))
            }
            Some(Value::String(tag)) => tag.as_str(),
            Some(other) => {
                return Err(path
                    .field(TAG_KEY)
                    .error(DecodeReason::type_mismatch("discriminant string", other)))
            }
        };
        let member = self.lookup(tag).ok_or_else(|| {
            path.field(TAG_KEY).error(DecodeReason::UnknownTag {
                tag: tag.to_owned(),
                valid: self.valid_tags(),
            })
        })?;
        member.decode(object, path)
    }

    /// Encode `value` with its member's fields plus the discriminant.
    pub fn encode_object(&self, value: &U) -> Map<String, Value> {
        let declared = self.tag_of(value);
        let encoded = self
            .lookup(declared)
            .and_then(|m| m.encode(value).map(|fields| (m.tag(), fields)))
            .or_else(|| {
                let found = self
                    .members
                    .iter()
                    .find_map(|m| m.encode(value).map(|fields| (m.tag(), fields)));
                if let Some((actual, _)) = &found {
                    tracing::warn!(
                        union = self.name,
                        declared,
                        actual,
                        "runtime tag disagrees with registered member"
                    );
                }
                found
            });
        match encoded {
            Some((tag, mut fields)) => {
                fields.insert(TAG_KEY.to_owned(), Value::String(tag.to_owned()));
                fields
            }
            None => {
                tracing::warn!(union = self.name, tag = declared, "value matches no registered member");
                let mut fields = Map::new();
                fields.insert(TAG_KEY.to_owned(), Value::String(declared.to_owned()));
                fields
            }
        }
    }

    /// Values of different variants are never equal.
    pub fn equals(&self, a: &U, b: &U) -> bool {
        let tag = self.tag_of(a);
        if tag != self.tag_of(b) {
            return false;
        }
        self.lookup(tag)
            .and_then(|m| m.equals(a, b))
            .unwrap_or(false)
    }

    /// Copy `value` through its member's schema with `overrides` applied.
    pub fn clone_with(&self, value: &U, overrides: Overrides) -> Result<U, CodecError> {
        let tag = self.tag_of(value);
        let unknown = || CodecError::UnknownVariant {
            union: self.name,
            tag,
        };
        let member = self.lookup(tag).ok_or_else(unknown)?;
        member
            .clone_with(value, overrides)
            .unwrap_or_else(|| Err(unknown()))
    }

    /// Differing field names; a variant change reports only `type`.
    pub fn diff(&self, a: &U, b: &U) -> Vec<&'static str> {
        let tag = self.tag_of(a);
        if tag != self.tag_of(b) {
            return vec![TAG_KEY];
        }
        self.lookup(tag)
            .and_then(|m| m.diff(a, b))
            .unwrap_or_else(|| vec![TAG_KEY])
    }
}

impl<U: 'static> fmt::Debug for SubTypes<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubTypes")
            .field("name", &self.name)
            .field(
                "tags",
                &self.members.iter().map(|m| m.tag()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<U: Clone + Send + Sync + 'static> FieldType for SubTypes<U> {
    type Value = U;

    fn decode(&self, raw: &Value, path: &Path<'_>) -> Result<U, DecodeError> {
        let object = raw
            .as_object()
            .ok_or_else(|| path.error(DecodeReason::type_mismatch(self.describe(), raw)))?;
        self.decode_object(object, path)
    }

    fn encode(&self, value: &U) -> Value {
        Value::Object(self.encode_object(value))
    }

    fn equals(&self, a: &U, b: &U) -> bool {
        SubTypes::equals(self, a, b)
    }

    fn describe(&self) -> String {
        format!("{} object", self.name)
    }
}
