//! # Field Schema Registry
//!
//! A [`Schema`] is the ordered table of `(field name → field type)` for one
//! domain type, built exactly once by an explicit builder call and shared
//! read-only by every instance for the life of the process.
//!
//! ## Declaring a Type
//!
//! ```
//! use std::sync::OnceLock;
//! use board_codec::{declared, optional, Number, Schema, Schematic, Str};
//!
//! #[derive(Debug, Clone)]
//! struct Layout {
//!     width: f64,
//!     label: Option<String>,
//! }
//!
//! impl Schematic for Layout {
//!     fn schema() -> &'static Schema<Self> {
//!         static SCHEMA: OnceLock<Schema<Layout>> = OnceLock::new();
//!         SCHEMA.get_or_init(|| {
//!             declared(
//!                 Schema::record("Layout")
//!                     .field("width", Number, |l: &Layout| &l.width)
//!                     .field("label", optional(Str), |l: &Layout| &l.label)
//!                     .build(|bag| {
//!                         Ok(Layout {
//!                             width: bag.take("width")?,
//!                             label: bag.take("label")?,
//!                         })
//!                     })
//!                     .map(Schema::Record),
//!             )
//!         })
//!     }
//! }
//! ```
//!
//! ## Construction Discipline
//!
//! Every path that produces an instance (decode, clone, mutate) first fills
//! a [`FieldBag`] with one value per schema field, and only then calls the
//! type's constructor. A decode that fails on any field never reaches the
//! constructor, so partially-built instances cannot escape.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

use serde_json::{Map, Value};

use crate::error::{CodecError, DecodeError, DecodeReason, SchemaError};
use crate::field::FieldType;
use crate::path::Path;
use crate::subtypes::{SubTypes, TAG_KEY};

/// A type whose shape is described by a [`Schema`].
pub trait Schematic: Clone + Send + Sync + 'static {
    /// The process-wide schema for this type.
    fn schema() -> &'static Schema<Self>;

    /// Copy this instance with `partial` substituted, dispatching on the
    /// runtime variant when `Self` is a union.
    fn mutate(&self, partial: Overrides) -> Result<Self, CodecError> {
        Self::schema().clone_with(self, partial)
    }
}

/// Unwrap a schema declaration result.
///
/// Schema declarations are static program text, so a fault in one (a
/// duplicate discriminant, a repeated field) is a programming error in
/// this crate's callers rather than a runtime condition.
///
/// # Panics
///
/// Panics with the [`SchemaError`] message when the declaration is invalid.
pub fn declared<T>(result: Result<Schema<T>, SchemaError>) -> Schema<T> {
    match result {
        Ok(schema) => schema,
        Err(err) => panic!("invalid schema declaration: {err}"),
    }
}

// ─── Schema ──────────────────────────────────────────────────────────

/// Whether a schema describes a plain record or a discriminated union.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    Record,
    Union,
}

/// Introspection view of one declared field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    pub name: &'static str,
    pub optional: bool,
    pub describe: String,
}

/// The schema of one domain type.
pub enum Schema<T: 'static> {
    /// A fixed set of named fields.
    Record(Record<T>),
    /// A `type`-discriminated choice among record types.
    Union(SubTypes<T>),
}

impl<T: Send + Sync + 'static> Schema<T> {
    /// Start declaring a record type.
    pub fn record(name: &'static str) -> RecordBuilder<T> {
        RecordBuilder {
            name,
            fields: Vec::new(),
            error: None,
        }
    }

    /// The declared type name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Record(record) => record.name,
            Self::Union(union) => union.name(),
        }
    }

    pub fn kind(&self) -> SchemaKind {
        match self {
            Self::Record(_) => SchemaKind::Record,
            Self::Union(_) => SchemaKind::Union,
        }
    }

    /// Declared fields in order. A union reports only its discriminant.
    pub fn fields(&self) -> Vec<FieldInfo> {
        match self {
            Self::Record(record) => record.fields().collect(),
            Self::Union(union) => vec![FieldInfo {
                name: TAG_KEY,
                optional: false,
                describe: format!("one of: {}", union.tags().join(", ")),
            }],
        }
    }

    /// Registered discriminant tags; empty for records.
    pub fn tags(&self) -> Vec<&'static str> {
        match self {
            Self::Record(_) => Vec::new(),
            Self::Union(union) => union.tags(),
        }
    }

    /// Decode a raw value located at `path`.
    pub fn decode(&self, raw: &Value, path: &Path<'_>) -> Result<T, DecodeError> {
        let object = raw.as_object().ok_or_else(|| {
            path.error(DecodeReason::type_mismatch(
                format!("{} object", self.name()),
                raw,
            ))
        })?;
        self.decode_object(object, path)
    }

    /// Decode the fields of an already-unwrapped JSON object.
    pub fn decode_object(&self, object: &Map<String, Value>, path: &Path<'_>) -> Result<T, DecodeError> {
        match self {
            Self::Record(record) => record.decode_object(object, path),
            Self::Union(union) => union.decode_object(object, path),
        }
    }

    pub fn encode(&self, value: &T) -> Value {
        Value::Object(self.encode_object(value))
    }

    /// Encode into an object map, omitting absent optional fields.
    pub fn encode_object(&self, value: &T) -> Map<String, Value> {
        match self {
            Self::Record(record) => record.encode_object(value),
            Self::Union(union) => union.encode_object(value),
        }
    }

    /// Short-circuit field-by-field structural equality.
    pub fn equals(&self, a: &T, b: &T) -> bool {
        match self {
            Self::Record(record) => record.equals(a, b),
            Self::Union(union) => union.equals(a, b),
        }
    }

    /// Schema-aware copy with `overrides` substituted verbatim.
    pub fn clone_with(&self, value: &T, overrides: Overrides) -> Result<T, CodecError> {
        match self {
            Self::Record(record) => record.clone_with(value, overrides),
            Self::Union(union) => union.clone_with(value, overrides),
        }
    }

    /// Names of the top-level fields whose values differ.
    pub fn diff(&self, a: &T, b: &T) -> Vec<&'static str> {
        match self {
            Self::Record(record) => record.diff(a, b),
            Self::Union(union) => union.diff(a, b),
        }
    }
}

impl<T: 'static> fmt::Debug for Schema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Record(record) => f
                .debug_struct("Record")
                .field("name", &record.name)
                .field(
                    "fields",
                    &record.fields.iter().map(|d| d.name).collect::<Vec<_>>(),
                )
                .finish(),
            Self::Union(union) => f.debug_tuple("Union").field(union).finish(),
        }
    }
}

// ─── Record ──────────────────────────────────────────────────────────

/// Builds a value from a fully populated [`FieldBag`].
pub type Constructor<T> = fn(&mut FieldBag) -> Result<T, CodecError>;

/// The ordered field table of a record type.
pub struct Record<T: 'static> {
    name: &'static str,
    fields: Vec<FieldDescriptor<T>>,
    construct: Constructor<T>,
}

struct FieldDescriptor<T: 'static> {
    name: &'static str,
    optional: bool,
    binding: Box<dyn BoundField<T>>,
}

impl<T: Send + Sync + 'static> Record<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Introspection views of the declared fields, in order.
    pub fn fields(&self) -> impl Iterator<Item = FieldInfo> + '_ {
        self.fields.iter().map(|d| FieldInfo {
            name: d.name,
            optional: d.optional,
            describe: d.binding.describe(),
        })
    }

    fn descriptor(&self, name: &str) -> Option<&FieldDescriptor<T>> {
        self.fields.iter().find(|d| d.name == name)
    }

    fn decode_object(&self, object: &Map<String, Value>, path: &Path<'_>) -> Result<T, DecodeError> {
        let mut bag = FieldBag::new(self.name);
        for field in &self.fields {
            let value = match object.get(field.name) {
                Some(raw) => field.binding.decode(raw, &path.field(field.name))?,
                None if field.optional => field.binding.absent().ok_or_else(|| {
                    path.error(DecodeReason::MissingField {
                        field: field.name.to_owned(),
                    })
                })?,
                None => {
                    return Err(path.error(DecodeReason::MissingField {
                        field: field.name.to_owned(),
                    }))
                }
            };
            bag.insert(field.name, value);
        }
        (self.construct)(&mut bag).map_err(|err| {
            path.error(DecodeReason::Construction {
                type_name: self.name,
                message: err.to_string(),
            })
        })
    }

    fn encode_object(&self, value: &T) -> Map<String, Value> {
        let mut out = Map::new();
        for field in &self.fields {
            if let Some(encoded) = field.binding.encode(value) {
                out.insert(field.name.to_owned(), encoded);
            }
        }
        out
    }

    fn equals(&self, a: &T, b: &T) -> bool {
        self.fields.iter().all(|field| field.binding.equals(a, b))
    }

    fn clone_with(&self, value: &T, mut overrides: Overrides) -> Result<T, CodecError> {
        if let Some(unknown) = overrides.names().find(|name| self.descriptor(name).is_none()) {
            return Err(CodecError::UnknownField {
                type_name: self.name,
                field: unknown.to_owned(),
            });
        }
        let mut bag = FieldBag::new(self.name);
        for field in &self.fields {
            let current = match overrides.take(field.name) {
                Some(replacement) if field.binding.accepts(&*replacement) => replacement,
                Some(_) => {
                    return Err(CodecError::FieldType {
                        type_name: self.name,
                        field: field.name.to_owned(),
                        expected: field.binding.value_type(),
                    })
                }
                None => field.binding.current(value),
            };
            bag.insert(field.name, current);
        }
        (self.construct)(&mut bag)
    }

    fn diff(&self, a: &T, b: &T) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|field| !field.binding.equals(a, b))
            .map(|field| field.name)
            .collect()
    }
}

/// Accumulates the field table of a record type.
pub struct RecordBuilder<T: 'static> {
    name: &'static str,
    fields: Vec<FieldDescriptor<T>>,
    error: Option<SchemaError>,
}

impl<T: Send + Sync + 'static> RecordBuilder<T> {
    /// Declare the next field: its document key, its field type, and how
    /// to read its current value off an instance.
    pub fn field<F: FieldType>(
        mut self,
        name: &'static str,
        field: F,
        get: fn(&T) -> &F::Value,
    ) -> Self {
        if self.error.is_none() {
            if name == TAG_KEY {
                self.error = Some(SchemaError::ReservedField {
                    type_name: self.name,
                });
            } else if self.fields.iter().any(|d| d.name == name) {
                self.error = Some(SchemaError::DuplicateField {
                    type_name: self.name,
                    field: name,
                });
            }
        }
        self.fields.push(FieldDescriptor {
            name,
            optional: field.optional(),
            binding: Box::new(Binding { field, get }),
        });
        self
    }

    /// Finish the declaration with the type's constructor.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError`] recorded while declaring fields.
    pub fn build(self, construct: Constructor<T>) -> Result<Record<T>, SchemaError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        Ok(Record {
            name: self.name,
            fields: self.fields,
            construct,
        })
    }
}

// ─── Type-Erased Field Bindings ──────────────────────────────────────

type Boxed = Box<dyn Any + Send>;

/// A field type bound to the accessor that reads it off a `T`.
trait BoundField<T>: Send + Sync {
    fn decode(&self, raw: &Value, path: &Path<'_>) -> Result<Boxed, DecodeError>;
    fn absent(&self) -> Option<Boxed>;
    fn encode(&self, instance: &T) -> Option<Value>;
    fn equals(&self, a: &T, b: &T) -> bool;
    fn current(&self, instance: &T) -> Boxed;
    fn accepts(&self, value: &(dyn Any + Send)) -> bool;
    fn value_type(&self) -> &'static str;
    fn describe(&self) -> String;
}

struct Binding<T, F: FieldType> {
    field: F,
    get: fn(&T) -> &F::Value,
}

impl<T: 'static, F: FieldType> BoundField<T> for Binding<T, F> {
    fn decode(&self, raw: &Value, path: &Path<'_>) -> Result<Boxed, DecodeError> {
        let value = self.field.decode(raw, path)?;
        Ok(Box::new(value))
    }

    fn absent(&self) -> Option<Boxed> {
        self.field.absent().map(|value| Box::new(value) as Boxed)
    }

    fn encode(&self, instance: &T) -> Option<Value> {
        let value = (self.get)(instance);
        if self.field.is_absent(value) {
            None
        } else {
            Some(self.field.encode(value))
        }
    }

    fn equals(&self, a: &T, b: &T) -> bool {
        self.field.equals((self.get)(a), (self.get)(b))
    }

    fn current(&self, instance: &T) -> Boxed {
        Box::new((self.get)(instance).clone())
    }

    fn accepts(&self, value: &(dyn Any + Send)) -> bool {
        value.is::<F::Value>()
    }

    fn value_type(&self) -> &'static str {
        std::any::type_name::<F::Value>()
    }

    fn describe(&self) -> String {
        self.field.describe()
    }
}

// ─── Field Bag ───────────────────────────────────────────────────────

/// The fully decoded (or copied) field values handed to a constructor.
pub struct FieldBag {
    type_name: &'static str,
    values: HashMap<&'static str, Boxed>,
}

impl FieldBag {
    fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            values: HashMap::new(),
        }
    }

    fn insert(&mut self, field: &'static str, value: Boxed) {
        self.values.insert(field, value);
    }

    /// The type being constructed.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Move a field's value out of the bag.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MissingValue`] if the field is not in the bag
    /// and [`CodecError::FieldType`] if it holds a different type than `V`.
    pub fn take<V: 'static>(&mut self, field: &'static str) -> Result<V, CodecError> {
        let boxed = self.values.remove(field).ok_or(CodecError::MissingValue {
            type_name: self.type_name,
            field,
        })?;
        boxed
            .downcast::<V>()
            .map(|value| *value)
            .map_err(|_| CodecError::FieldType {
                type_name: self.type_name,
                field: field.to_owned(),
                expected: std::any::type_name::<V>(),
            })
    }
}

impl fmt::Debug for FieldBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldBag")
            .field("type_name", &self.type_name)
            .field("fields", &self.values.keys().collect::<Vec<_>>())
            .finish()
    }
}

// ─── Overrides ───────────────────────────────────────────────────────

/// Replacement field values for `clone` and `mutate`.
///
/// Values are substituted verbatim without re-validation; only their Rust
/// type is checked against the field they replace. String fields take a
/// `String`, not a `&str`.
#[derive(Default)]
pub struct Overrides {
    values: HashMap<String, Boxed>,
}

impl Overrides {
    /// No overrides: a plain schema-aware copy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace `field` with `value`.
    pub fn set<V: Any + Send>(mut self, field: impl Into<String>, value: V) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert<V: Any + Send>(&mut self, field: impl Into<String>, value: V) {
        self.values.insert(field.into(), Box::new(value));
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    fn take(&mut self, field: &str) -> Option<Boxed> {
        self.values.remove(field)
    }
}

impl fmt::Debug for Overrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.values.keys()).finish()
    }
}

// ─── Nested ──────────────────────────────────────────────────────────

/// A field holding another schema-declared type, record or union.
pub struct Nested<T>(PhantomData<fn() -> T>);

/// Shorthand for [`Nested`].
pub fn nested<T: Schematic>() -> Nested<T> {
    Nested(PhantomData)
}

impl<T> Clone for Nested<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Nested<T> {}

impl<T> fmt::Debug for Nested<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Nested<{}>", std::any::type_name::<T>())
    }
}

impl<T: Schematic> FieldType for Nested<T> {
    type Value = T;

    fn decode(&self, raw: &Value, path: &Path<'_>) -> Result<T, DecodeError> {
        T::schema().decode(raw, path)
    }

    fn encode(&self, value: &T) -> Value {
        T::schema().encode(value)
    }

    fn equals(&self, a: &T, b: &T) -> bool {
        T::schema().equals(a, b)
    }

    fn describe(&self) -> String {
        T::schema().name().to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{array_of, optional};
    use crate::primitive::{Number, Str};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::OnceLock;

    #[derive(Debug, Clone, PartialEq)]
    struct Point {
        x: f64,
        y: f64,
        label: Option<String>,
    }

    impl Schematic for Point {
        fn schema() -> &'static Schema<Self> {
            static SCHEMA: OnceLock<Schema<Point>> = OnceLock::new();
            SCHEMA.get_or_init(|| {
                declared(
                    Schema::record("Point")
                        .field("x", Number, |p: &Point| &p.x)
                        .field("y", Number, |p: &Point| &p.y)
                        .field("label", optional(Str), |p: &Point| &p.label)
                        .build(|bag| {
                            Ok(Point {
                                x: bag.take("x")?,
                                y: bag.take("y")?,
                                label: bag.take("label")?,
                            })
                        })
                        .map(Schema::Record),
                )
            })
        }
    }

    #[derive(Debug, Clone)]
    struct Path2 {
        points: Vec<Point>,
    }

    impl Schematic for Path2 {
        fn schema() -> &'static Schema<Self> {
            static SCHEMA: OnceLock<Schema<Path2>> = OnceLock::new();
            SCHEMA.get_or_init(|| {
                declared(
                    Schema::record("Path2")
                        .field("points", array_of(nested::<Point>()), |p: &Path2| &p.points)
                        .build(|bag| {
                            Ok(Path2 {
                                points: bag.take("points")?,
                            })
                        })
                        .map(Schema::Record),
                )
            })
        }
    }

    static BUILT: AtomicUsize = AtomicUsize::new(0);

    #[derive(Debug, Clone)]
    struct Counted {
        name: String,
        weight: f64,
    }

    impl Schematic for Counted {
        fn schema() -> &'static Schema<Self> {
            static SCHEMA: OnceLock<Schema<Counted>> = OnceLock::new();
            SCHEMA.get_or_init(|| {
                declared(
                    Schema::record("Counted")
                        .field("name", Str, |c: &Counted| &c.name)
                        .field("weight", Number, |c: &Counted| &c.weight)
                        .build(|bag| {
                            BUILT.fetch_add(1, Ordering::SeqCst);
                            Ok(Counted {
                                name: bag.take("name")?,
                                weight: bag.take("weight")?,
                            })
                        })
                        .map(Schema::Record),
                )
            })
        }
    }

    /// Its constructor reads a field the schema never declares.
    #[derive(Debug, Clone)]
    struct Misdeclared {
        lo: f64,
    }

    impl Schematic for Misdeclared {
        fn schema() -> &'static Schema<Self> {
            static SCHEMA: OnceLock<Schema<Misdeclared>> = OnceLock::new();
            SCHEMA.get_or_init(|| {
                declared(
                    Schema::record("Misdeclared")
                        .field("lo", Number, |m: &Misdeclared| &m.lo)
                        .build(|bag| {
                            let lo = bag.take("lo")?;
                            let _hi: f64 = bag.take("hi")?;
                            Ok(Misdeclared { lo })
                        })
                        .map(Schema::Record),
                )
            })
        }
    }

    #[derive(Debug, Clone)]
    struct Holder {
        inner: Misdeclared,
    }

    impl Schematic for Holder {
        fn schema() -> &'static Schema<Self> {
            static SCHEMA: OnceLock<Schema<Holder>> = OnceLock::new();
            SCHEMA.get_or_init(|| {
                declared(
                    Schema::record("Holder")
                        .field("inner", nested::<Misdeclared>(), |h: &Holder| &h.inner)
                        .build(|bag| {
                            Ok(Holder {
                                inner: bag.take("inner")?,
                            })
                        })
                        .map(Schema::Record),
                )
            })
        }
    }

    fn point(x: f64, y: f64) -> Point {
        Point { x, y, label: None }
    }

    #[test]
    fn introspection_reports_declared_fields() {
        let schema = Point::schema();
        assert_eq!(schema.name(), "Point");
        assert_eq!(schema.kind(), SchemaKind::Record);
        let fields = schema.fields();
        let names: Vec<_> = fields.iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["x", "y", "label"]);
        assert!(!fields[0].optional);
        assert!(fields[2].optional);
        assert_eq!(fields[2].describe, "optional string");
        assert!(schema.tags().is_empty());
    }

    #[test]
    fn decode_reports_first_missing_field_at_parent_path() {
        let err = Point::schema()
            .decode(&json!({"x": 1}), &Path::root())
            .unwrap_err();
        assert_eq!(err.path.to_string(), "$");
        assert_eq!(
            err.reason,
            DecodeReason::MissingField {
                field: "y".into()
            }
        );
    }

    #[test]
    fn nested_missing_field_is_reported_at_its_object() {
        let raw = json!({"points": [{"x": 0, "y": 0}, {"x": 1}]});
        let err = Path2::schema().decode(&raw, &Path::root()).unwrap_err();
        assert_eq!(err.path.to_string(), "$.points[1]");
        assert_eq!(err.to_string(), "$.points[1]: missing required field 'y'");
    }

    #[test]
    fn constructor_never_runs_when_a_field_fails() {
        let err = Counted::schema()
            .decode(&json!({"name": "disk", "weight": "heavy"}), &Path::root())
            .unwrap_err();
        assert_eq!(err.path.to_string(), "$.weight");
        assert_eq!(BUILT.load(Ordering::SeqCst), 0);

        let counted = Counted::schema()
            .decode(&json!({"name": "disk", "weight": 2}), &Path::root())
            .unwrap();
        assert_eq!((counted.name.as_str(), counted.weight), ("disk", 2.0));
        assert_eq!(BUILT.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn constructor_failure_is_reported_at_the_record_path() {
        let err = Holder::schema()
            .decode(&json!({"inner": {"lo": 1}}), &Path::root())
            .unwrap_err();
        assert_eq!(err.path.to_string(), "$.inner");
        match err.reason {
            DecodeReason::Construction { type_name, message } => {
                assert_eq!(type_name, "Misdeclared");
                assert!(message.contains("no value for field 'hi'"));
            }
            other => panic!("unexpected reason: {other:?}"),
        }
    }

    #[test]
    fn decode_rejects_non_objects() {
        let err = Point::schema().decode(&json!([1, 2]), &Path::root()).unwrap_err();
        assert_eq!(
            err.reason,
            DecodeReason::TypeMismatch {
                expected: "Point object".into(),
                found: "array"
            }
        );
    }

    #[test]
    fn nested_errors_carry_full_path() {
        let raw = json!({"points": [{"x": 0, "y": 0}, {"x": 1, "y": "up"}]});
        let err = Path2::schema().decode(&raw, &Path::root()).unwrap_err();
        assert_eq!(err.path.to_string(), "$.points[1].y");
    }

    #[test]
    fn encode_omits_absent_optionals() {
        let encoded = Point::schema().encode(&point(1.0, 2.0));
        assert_eq!(encoded, json!({"x": 1, "y": 2}));
    }

    #[test]
    fn clone_with_substitutes_overrides() {
        let p = point(1.0, 2.0);
        let moved = Point::schema()
            .clone_with(&p, Overrides::new().set("y", 5.0))
            .unwrap();
        assert_eq!(moved, Point { x: 1.0, y: 5.0, label: None });
        assert_eq!(Point::schema().diff(&p, &moved), vec!["y"]);
    }

    #[test]
    fn clone_with_rejects_unknown_fields() {
        let err = Point::schema()
            .clone_with(&point(0.0, 0.0), Overrides::new().set("z", 1.0))
            .unwrap_err();
        assert!(matches!(err, CodecError::UnknownField { field, .. } if field == "z"));
    }

    #[test]
    fn clone_with_rejects_wrong_rust_type() {
        let err = Point::schema()
            .clone_with(&point(0.0, 0.0), Overrides::new().set("label", "a"))
            .unwrap_err();
        assert!(matches!(err, CodecError::FieldType { field, .. } if field == "label"));
    }

    #[test]
    fn mutate_matches_clone_with() {
        let p = point(1.0, 2.0);
        let labelled = p
            .mutate(Overrides::new().set("label", Some("origin".to_string())))
            .unwrap();
        assert_eq!(labelled.label.as_deref(), Some("origin"));
        assert_eq!(p.label, None);
    }

    #[test]
    fn duplicate_fields_fail_at_build() {
        let result = Schema::<Point>::record("Point")
            .field("x", Number, |p: &Point| &p.x)
            .field("x", Number, |p: &Point| &p.y)
            .build(|_| unreachable!());
        assert_eq!(
            result.err(),
            Some(SchemaError::DuplicateField {
                type_name: "Point",
                field: "x"
            })
        );
    }

    #[test]
    fn discriminant_key_is_reserved() {
        let result = Schema::<Point>::record("Point")
            .field("type", Number, |p: &Point| &p.x)
            .build(|_| unreachable!());
        assert!(matches!(result, Err(SchemaError::ReservedField { .. })));
    }

    #[test]
    fn bag_take_reports_missing_and_mistyped_values() {
        let mut bag = FieldBag::new("Point");
        bag.insert("x", Box::new(1.0_f64));
        assert!(matches!(
            bag.take::<String>("x"),
            Err(CodecError::FieldType { .. })
        ));
        assert!(matches!(
            bag.take::<f64>("y"),
            Err(CodecError::MissingValue { field: "y", .. })
        ));
    }

    #[test]
    fn overrides_debug_lists_field_names() {
        let overrides = Overrides::new().set("title", String::from("t"));
        assert_eq!(format!("{overrides:?}"), r#"{"title"}"#);
        assert_eq!(overrides.len(), 1);
        assert!(overrides.contains("title"));
    }
}
