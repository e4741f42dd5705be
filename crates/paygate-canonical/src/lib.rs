//! Canonical signing-string primitives for gateway requests and responses.
//!
//! A record is reduced to `key=value&key=value` text that callers sign and
//! the gateway re-derives for verification. Every byte of that string is
//! fixed by the record's [`Record`] shape, the [`CoercionRegistry`] and the
//! [`CompactionPolicy`]; any drift in ordering or formatting breaks every
//! signature, so all of it lives in this crate.
//!
#![deny(missing_docs)]

/// Renderers from semantic type to signing text.
pub mod coercion;
/// Compactor and engine that produce canonical strings.
pub mod compactor;
/// Error types for shape resolution and rendering.
pub mod errors;
/// Exclusion, empty-skip, ordering and delimiter policy.
pub mod policy;
/// Record shapes, field descriptors and the shape cache.
pub mod shape;
/// Structured instant type.
pub mod timestamp;
/// Semantic types and runtime field values.
pub mod value;

pub use coercion::{CoercionRegistry, Renderer};
pub use compactor::{CanonicalEngine, Compactor};
pub use errors::{CanonicalError, CoercionError, CompactError};
pub use policy::{CompactionPolicy, Escaper};
pub use shape::{
    Accessor, FieldDescriptor, Record, ResolvedShape, ShapeDescription, ShapeResolver,
};
pub use timestamp::Timestamp;
pub use value::{FieldValue, SemanticType};
