//! Type descriptors for form state derivation.
//!
//! A [`Descriptor`] tells the deriver how to interpret a position in the
//! domain value: as a scalar, a record with a fixed field set, an ordered
//! sequence, or a tagged union whose concrete variant is resolved from a
//! discriminant field in the value itself.
//!
//! Descriptors are built once, at registration time, rather than discovered
//! by walking arbitrary keys at runtime. The [`Schema`] trait lets a type
//! publish its own descriptor.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Scalar value classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    /// UTF-8 string.
    String,
    /// Integer number.
    Integer,
    /// Floating-point number.
    Float,
    /// Boolean.
    Boolean,
    /// Instant carried as an RFC 3339 string; equality is string equality,
    /// so producers must emit a canonical form.
    DateTime,
}

impl PrimitiveKind {
    /// The JSON value kind this primitive expects.
    #[inline]
    pub fn expects(&self) -> &'static str {
        match self {
            PrimitiveKind::String | PrimitiveKind::DateTime => "string",
            PrimitiveKind::Integer | PrimitiveKind::Float => "number",
            PrimitiveKind::Boolean => "boolean",
        }
    }

    /// Check whether a JSON value is acceptable for this kind.
    ///
    /// Null is accepted everywhere; optional fields carry null.
    #[inline]
    pub fn accepts(&self, value: &Value) -> bool {
        value.is_null()
            || match self {
                PrimitiveKind::String | PrimitiveKind::DateTime => value.is_string(),
                PrimitiveKind::Integer | PrimitiveKind::Float => value.is_number(),
                PrimitiveKind::Boolean => value.is_boolean(),
            }
    }
}

/// One declared field of a record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name as it appears in the domain value.
    pub name: String,
    /// Declared type of the field.
    pub descriptor: Descriptor,
    /// Whether the field is required (surfaced on the derived state node).
    pub required: bool,
}

/// A record type: a named, fixed set of typed fields.
///
/// Field declaration order is preserved; it does not constrain the domain
/// value's own key order, which the deriver follows instead.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordDescriptor {
    name: String,
    fields: Vec<FieldDescriptor>,
}

impl RecordDescriptor {
    /// Create an empty record descriptor with a type name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Declare an optional field (builder pattern).
    pub fn field(mut self, name: impl Into<String>, descriptor: Descriptor) -> Self {
        self.fields.push(FieldDescriptor {
            name: name.into(),
            descriptor,
            required: false,
        });
        self
    }

    /// Declare a required field (builder pattern).
    pub fn required_field(mut self, name: impl Into<String>, descriptor: Descriptor) -> Self {
        self.fields.push(FieldDescriptor {
            name: name.into(),
            descriptor,
            required: true,
        });
        self
    }

    /// The record type's name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared fields, in declaration order.
    #[inline]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Look up a declared field by name.
    pub fn field_named(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether a field is declared required.
    pub fn is_required(&self, name: &str) -> bool {
        self.field_named(name).is_some_and(|f| f.required)
    }
}

/// A sequence type with a single element type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SequenceDescriptor {
    element: Box<Descriptor>,
}

impl SequenceDescriptor {
    /// Create a sequence descriptor.
    pub fn new(element: Descriptor) -> Self {
        Self {
            element: Box::new(element),
        }
    }

    /// The declared element type.
    #[inline]
    pub fn element(&self) -> &Descriptor {
        &self.element
    }
}

/// A tagged union over record variants.
///
/// The concrete variant of a value is resolved at derivation time from the
/// string value of `tag_field` in the value itself, so the runtime shape
/// wins over the statically declared union. Each variant record must declare
/// the tag field among its own fields or the discriminant would be lost on
/// projection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnionDescriptor {
    tag_field: String,
    variants: Vec<(String, RecordDescriptor)>,
}

impl UnionDescriptor {
    /// Create a union descriptor keyed by a discriminant field.
    pub fn new(tag_field: impl Into<String>) -> Self {
        Self {
            tag_field: tag_field.into(),
            variants: Vec::new(),
        }
    }

    /// Register a variant (builder pattern).
    pub fn variant(mut self, tag: impl Into<String>, record: RecordDescriptor) -> Self {
        self.variants.push((tag.into(), record));
        self
    }

    /// The discriminant field name.
    #[inline]
    pub fn tag_field(&self) -> &str {
        &self.tag_field
    }

    /// Look up a variant record by tag.
    pub fn variant_named(&self, tag: &str) -> Option<&RecordDescriptor> {
        self.variants
            .iter()
            .find(|(t, _)| t == tag)
            .map(|(_, r)| r)
    }

    /// Resolve the concrete variant for a value by reading its discriminant.
    pub fn resolve(&self, value: &Value) -> Option<&RecordDescriptor> {
        let tag = value.get(&self.tag_field)?.as_str()?;
        self.variant_named(tag)
    }
}

/// Declared type of a position in the domain value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Descriptor {
    /// A scalar value.
    Primitive(PrimitiveKind),
    /// A record with a fixed field set.
    Record(RecordDescriptor),
    /// An ordered sequence.
    Sequence(SequenceDescriptor),
    /// A tagged union of record variants.
    Union(UnionDescriptor),
}

impl Descriptor {
    /// String primitive shortcut.
    #[inline]
    pub fn string() -> Self {
        Descriptor::Primitive(PrimitiveKind::String)
    }

    /// Integer primitive shortcut.
    #[inline]
    pub fn integer() -> Self {
        Descriptor::Primitive(PrimitiveKind::Integer)
    }

    /// Float primitive shortcut.
    #[inline]
    pub fn float() -> Self {
        Descriptor::Primitive(PrimitiveKind::Float)
    }

    /// Boolean primitive shortcut.
    #[inline]
    pub fn boolean() -> Self {
        Descriptor::Primitive(PrimitiveKind::Boolean)
    }

    /// Date-time primitive shortcut.
    #[inline]
    pub fn datetime() -> Self {
        Descriptor::Primitive(PrimitiveKind::DateTime)
    }

    /// Wrap a record descriptor.
    #[inline]
    pub fn record(record: RecordDescriptor) -> Self {
        Descriptor::Record(record)
    }

    /// Build a sequence descriptor around an element type.
    #[inline]
    pub fn sequence(element: Descriptor) -> Self {
        Descriptor::Sequence(SequenceDescriptor::new(element))
    }

    /// Wrap a union descriptor.
    #[inline]
    pub fn union(union: UnionDescriptor) -> Self {
        Descriptor::Union(union)
    }

    /// Returns true for primitive descriptors.
    #[inline]
    pub fn is_primitive(&self) -> bool {
        matches!(self, Descriptor::Primitive(_))
    }

    /// A short name of the descriptor's kind, for diagnostics.
    #[inline]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Descriptor::Primitive(k) => k.expects(),
            Descriptor::Record(_) => "object",
            Descriptor::Sequence(_) => "array",
            Descriptor::Union(_) => "object",
        }
    }
}

/// Types that can publish their own [`Descriptor`].
///
/// Implemented for the scalar standard types, `Option<T>` (same descriptor
/// as `T`; null is always an accepted value) and `Vec<T>` (sequence of `T`).
/// Record and union types register descriptors with the builder APIs.
pub trait Schema {
    /// The descriptor for this type.
    fn describe() -> Descriptor;
}

macro_rules! impl_schema_primitive {
    ($kind:expr => $($ty:ty),+ $(,)?) => {
        $(
            impl Schema for $ty {
                fn describe() -> Descriptor {
                    Descriptor::Primitive($kind)
                }
            }
        )+
    };
}

impl_schema_primitive!(PrimitiveKind::String => String, &str);
impl_schema_primitive!(PrimitiveKind::Integer => i8, i16, i32, i64, u8, u16, u32, u64);
impl_schema_primitive!(PrimitiveKind::Float => f32, f64);
impl_schema_primitive!(PrimitiveKind::Boolean => bool);

impl<T: Schema> Schema for Option<T> {
    fn describe() -> Descriptor {
        T::describe()
    }
}

impl<T: Schema> Schema for Vec<T> {
    fn describe() -> Descriptor {
        Descriptor::sequence(T::describe())
    }
}
