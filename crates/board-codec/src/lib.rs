//! # board-codec — Declarative JSON Codec Engine
//!
//! Turns raw JSON documents into strongly-typed domain values and back,
//! driven entirely by per-type field schemas. Every domain crate in the
//! workspace declares its types through this crate; it depends on nothing
//! internal.
//!
//! ## Key Design Principles
//!
//! 1. **One schema per type.** Each [`Schematic`] type exposes a single
//!    process-wide [`Schema`], built once on first use and read-only after.
//!
//! 2. **Field types own their semantics.** The engine never inspects a raw
//!    value; decode, encode and equality are delegated to the [`FieldType`]
//!    of each field.
//!
//! 3. **Located errors.** A failed decode names the exact location of the
//!    fault (`$.panels[2].query.aggregation.type`) via [`DecodeError`].
//!
//! 4. **Closed unions.** Polymorphic documents dispatch on a `type`
//!    discriminant through [`SubTypes`]. Duplicate tags are rejected when
//!    the registry is built; unknown tags are rejected on decode.
//!
//! 5. **No partial instances.** Constructors only ever see a complete
//!    [`FieldBag`].
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `.unwrap()` outside tests. Invalid schema declarations panic via
//!   [`declared`] on first use of the schema.

pub mod codec;
pub mod container;
pub mod enumerated;
pub mod error;
pub mod field;
pub mod path;
pub mod primitive;
pub mod schema;
pub mod subtypes;
pub mod timestamp;

// Re-export primary types for ergonomic imports.
pub use codec::{clone, decode, diff, encode, equals, from_str, mutate, to_string, to_string_pretty};
pub use container::{array_of, map_of, optional, ArrayOf, MapOf, Optional};
pub use enumerated::{Const, OneOf, Tagged};
pub use error::{json_kind, CodecError, DecodeError, DecodeReason, SchemaError};
pub use field::FieldType;
pub use path::{JsonPath, Path, PathSegment};
pub use primitive::{json_equals, number_value, Any, Bool, Number, Str};
pub use schema::{
    declared, nested, Constructor, FieldBag, FieldInfo, Nested, Overrides, Record, RecordBuilder,
    Schema, SchemaKind, Schematic,
};
pub use subtypes::{Discriminated, SubTypes, SubTypesBuilder, TAG_KEY};
pub use timestamp::{same_instant, Timestamp};
