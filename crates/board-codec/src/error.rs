//! # Error Types — Structured Codec Errors
//!
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - Decode errors are fail-fast and always carry the full [`JsonPath`]
//!   from the document root plus a structured [`DecodeReason`].
//! - Schema errors are raised while a schema is being declared, never
//!   while a document is being decoded.
//! - Encoding and equality never fail. Only override-driven construction
//!   (`clone`/`mutate`) and JSON text parsing surface a [`CodecError`].

use thiserror::Error;

use crate::path::JsonPath;

/// A structural decode failure at a specific document location.
///
/// `path` points at the offending value. A missing field has no value, so
/// [`DecodeReason::MissingField`] is reported at the enclosing object and
/// names the field in the reason. [`DecodeReason::Construction`] is also
/// reported at the object whose constructor failed.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{path}: {reason}")]
pub struct DecodeError {
    /// Location of the offending value, from the document root.
    pub path: JsonPath,
    /// What was wrong with it.
    pub reason: DecodeReason,
}

/// Why a decode failed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeReason {
    /// A required field was not present in the object. Reported at the
    /// object's own path, not at the missing field's.
    #[error("missing required field '{field}'")]
    MissingField {
        /// The schema field name.
        field: String,
    },

    /// The raw value had the wrong JSON kind.
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        /// Human-readable description of the expected field type.
        expected: String,
        /// The JSON kind actually found.
        found: &'static str,
    },

    /// A polymorphic document carried no `type` discriminant.
    #[error("missing discriminant 'type' (expected one of: {})", .valid.join(", "))]
    MissingTag {
        /// Every tag registered for the union.
        valid: Vec<String>,
    },

    /// A polymorphic document carried a `type` no member is registered under.
    #[error("unknown discriminant '{tag}' (expected one of: {})", .valid.join(", "))]
    UnknownTag {
        /// The offending tag.
        tag: String,
        /// Every tag registered for the union.
        valid: Vec<String>,
    },

    /// An enumerated value did not match any registered singleton.
    #[error("unknown value '{tag}' (expected one of: {})", .valid.join(", "))]
    UnknownConst {
        /// The offending tag.
        tag: String,
        /// Every registered tag.
        valid: Vec<String>,
    },

    /// A restricted primitive decoded to a value outside its literal set.
    #[error("value {value} is not allowed (expected one of: {})", .allowed.join(", "))]
    NotAllowed {
        /// The offending value, rendered as JSON.
        value: String,
        /// The allowed literals, rendered as JSON.
        allowed: Vec<String>,
    },

    /// The raw value had the right kind but could not be interpreted.
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// Every field decoded but the type's constructor rejected the bag.
    #[error("could not construct {type_name}: {message}")]
    Construction {
        /// The schema type name.
        type_name: &'static str,
        /// The constructor's error.
        message: String,
    },
}

impl DecodeReason {
    /// A kind mismatch between `expected` and the raw `found` value.
    pub fn type_mismatch(expected: impl Into<String>, found: &serde_json::Value) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: json_kind(found),
        }
    }
}

/// The JSON kind name of a raw value, for diagnostics.
pub fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// A fault in a schema declaration, detected when the schema is built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Two members of one union share a discriminant tag.
    #[error("union {union} registers discriminant '{tag}' more than once")]
    DuplicateTag {
        /// The union type name.
        union: &'static str,
        /// The repeated tag.
        tag: &'static str,
    },

    /// A union was declared without members.
    #[error("union {union} has no members")]
    EmptyUnion {
        /// The union type name.
        union: &'static str,
    },

    /// Two singletons of one enumeration share a tag.
    #[error("enumeration {name} registers value '{tag}' more than once")]
    DuplicateConst {
        /// The enumeration name.
        name: &'static str,
        /// The repeated tag.
        tag: &'static str,
    },

    /// A record declares the same field name twice.
    #[error("type {type_name} declares field '{field}' more than once")]
    DuplicateField {
        /// The record type name.
        type_name: &'static str,
        /// The repeated field.
        field: &'static str,
    },

    /// A record declares a field named like the union discriminant.
    #[error("type {type_name} declares reserved field 'type'")]
    ReservedField {
        /// The record type name.
        type_name: &'static str,
    },

    /// A restricted primitive was declared with no allowed literals.
    #[error("restricted {describe} declares no allowed values")]
    EmptyAllowedSet {
        /// Description of the wrapped primitive.
        describe: String,
    },
}

/// Errors from override-driven construction and JSON text boundaries.
#[derive(Error, Debug)]
pub enum CodecError {
    /// The document failed structural decoding.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// The text was not valid JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// An override names a field the schema does not declare.
    #[error("type {type_name} has no field '{field}'")]
    UnknownField {
        /// The schema type name.
        type_name: &'static str,
        /// The unknown field.
        field: String,
    },

    /// An override value has a different Rust type than its field.
    #[error("field '{field}' of {type_name} expects a value of type {expected}")]
    FieldType {
        /// The schema type name.
        type_name: &'static str,
        /// The field whose value was rejected.
        field: String,
        /// The Rust type the field holds.
        expected: &'static str,
    },

    /// A constructor asked for a field the bag does not hold.
    #[error("type {type_name} has no value for field '{field}'")]
    MissingValue {
        /// The schema type name.
        type_name: &'static str,
        /// The requested field.
        field: &'static str,
    },

    /// A union value matched none of its registered members.
    #[error("union {union} has no member for discriminant '{tag}'")]
    UnknownVariant {
        /// The union type name.
        union: &'static str,
        /// The runtime tag of the value.
        tag: &'static str,
    },
}
