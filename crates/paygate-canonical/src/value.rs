use std::fmt;

use crate::timestamp::Timestamp;

/// Coercion-relevant category of a field, independent of its Rust type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SemanticType {
    /// UTF-8 text, emitted verbatim.
    String,
    /// Signed 32-bit integer.
    Int32,
    /// Signed 64-bit integer.
    Int64,
    /// Unsigned 32-bit integer.
    Uint32,
    /// Unsigned 64-bit integer.
    Uint64,
    /// Structured instant, emitted as RFC 3339 UTC.
    Timestamp,
    /// Anything else; rendered through its `Display` text.
    Fallback,
    /// Application-defined type with its own registered renderer.
    Custom(&'static str),
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticType::String => f.write_str("string"),
            SemanticType::Int32 => f.write_str("int32"),
            SemanticType::Int64 => f.write_str("int64"),
            SemanticType::Uint32 => f.write_str("uint32"),
            SemanticType::Uint64 => f.write_str("uint64"),
            SemanticType::Timestamp => f.write_str("timestamp"),
            SemanticType::Fallback => f.write_str("fallback"),
            SemanticType::Custom(name) => write!(f, "custom:{}", name),
        }
    }
}

/// Runtime value projected out of a record by a field accessor.
///
/// Values borrow from the record, so reading a field never allocates.
#[derive(Clone, Copy)]
pub enum FieldValue<'a> {
    /// Nil reference or unset optional.
    Absent,
    /// Borrowed text.
    Str(&'a str),
    /// Signed 32-bit integer.
    I32(i32),
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 32-bit integer.
    U32(u32),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// Structured instant.
    Timestamp(&'a Timestamp),
    /// Any displayable value, for fallback and custom renderers.
    Display(&'a dyn fmt::Display),
}

impl<'a> FieldValue<'a> {
    /// Whether the value is the zero value of its type or absent.
    ///
    /// Numeric zero counts as empty: under an empty-skipping policy a
    /// legitimate zero amount is indistinguishable from an unset field.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Absent => true,
            FieldValue::Str(s) => s.is_empty(),
            FieldValue::I32(v) => *v == 0,
            FieldValue::I64(v) => *v == 0,
            FieldValue::U32(v) => *v == 0,
            FieldValue::U64(v) => *v == 0,
            FieldValue::Timestamp(_) | FieldValue::Display(_) => false,
        }
    }

    /// Short name of the runtime kind, used in mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Absent => "absent",
            FieldValue::Str(_) => "string",
            FieldValue::I32(_) => "int32",
            FieldValue::I64(_) => "int64",
            FieldValue::U32(_) => "uint32",
            FieldValue::U64(_) => "uint64",
            FieldValue::Timestamp(_) => "timestamp",
            FieldValue::Display(_) => "display",
        }
    }
}

impl fmt::Debug for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Absent => f.write_str("Absent"),
            FieldValue::Str(s) => f.debug_tuple("Str").field(s).finish(),
            FieldValue::I32(v) => f.debug_tuple("I32").field(v).finish(),
            FieldValue::I64(v) => f.debug_tuple("I64").field(v).finish(),
            FieldValue::U32(v) => f.debug_tuple("U32").field(v).finish(),
            FieldValue::U64(v) => f.debug_tuple("U64").field(v).finish(),
            FieldValue::Timestamp(ts) => f.debug_tuple("Timestamp").field(ts).finish(),
            FieldValue::Display(d) => f.debug_tuple("Display").field(&d.to_string()).finish(),
        }
    }
}

impl<'a> From<&'a str> for FieldValue<'a> {
    fn from(value: &'a str) -> Self {
        FieldValue::Str(value)
    }
}

impl<'a> From<&'a String> for FieldValue<'a> {
    fn from(value: &'a String) -> Self {
        FieldValue::Str(value)
    }
}

impl<'a> From<&'a Option<String>> for FieldValue<'a> {
    fn from(value: &'a Option<String>) -> Self {
        value.as_deref().map_or(FieldValue::Absent, FieldValue::Str)
    }
}

impl<'a> From<&'a Timestamp> for FieldValue<'a> {
    fn from(value: &'a Timestamp) -> Self {
        FieldValue::Timestamp(value)
    }
}

impl<'a> From<&'a Option<Timestamp>> for FieldValue<'a> {
    fn from(value: &'a Option<Timestamp>) -> Self {
        value.as_ref().map_or(FieldValue::Absent, FieldValue::Timestamp)
    }
}

macro_rules! integer_value {
    ($ty:ty, $variant:ident) => {
        impl From<$ty> for FieldValue<'_> {
            fn from(value: $ty) -> Self {
                FieldValue::$variant(value)
            }
        }

        impl From<&$ty> for FieldValue<'_> {
            fn from(value: &$ty) -> Self {
                FieldValue::$variant(*value)
            }
        }
    };
}

integer_value!(i32, I32);
integer_value!(i64, I64);
integer_value!(u32, U32);
integer_value!(u64, U64);
