//! # Field Type Abstraction
//!
//! The capability contract every field type implements. A schema is an
//! ordered table of `(name → FieldType)`; the codec engine never looks at a
//! raw value itself, it always asks the field type.
//!
//! ## Contract
//!
//! - `decode` fails with a located [`DecodeError`] when the raw value is
//!   malformed. Missing keys are handled by the engine before `decode` is
//!   reached: optional fields fall back to [`FieldType::absent`], required
//!   fields fail with `MissingField`.
//! - `encode` is total over well-formed values and performs no validation.
//! - `equals` is the structural comparison specific to the field type and
//!   never fails.

use serde_json::Value;

use crate::error::DecodeError;
use crate::path::Path;

/// Decode/encode/equals for one kind of value.
pub trait FieldType: Send + Sync + 'static {
    /// The typed value this field holds on a domain instance.
    type Value: Clone + Send + Sync + 'static;

    /// Decode a present raw value.
    fn decode(&self, raw: &Value, path: &Path<'_>) -> Result<Self::Value, DecodeError>;

    /// Encode a value back to its JSON shape.
    fn encode(&self, value: &Self::Value) -> Value;

    /// Structural equality for this field type.
    fn equals(&self, a: &Self::Value, b: &Self::Value) -> bool;

    /// Whether a missing key is tolerated.
    fn optional(&self) -> bool {
        false
    }

    /// The value used for a missing key when [`FieldType::optional`] is true.
    fn absent(&self) -> Option<Self::Value> {
        None
    }

    /// Whether `value` is the absent value, in which case the key is
    /// omitted from encoded objects.
    fn is_absent(&self, _value: &Self::Value) -> bool {
        false
    }

    /// Short human-readable name, used in mismatch diagnostics.
    fn describe(&self) -> String;
}
