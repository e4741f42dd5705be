use thiserror::Error;

use crate::value::SemanticType;

/// Errors raised while resolving a shape or building a compactor.
///
/// Variants describe schema mistakes, so they surface at registration
/// time and are never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CanonicalError {
    /// Two fields of one shape resolve to the same wire name.
    #[error("duplicate wire name '{wire_name}' in shape {shape}")]
    DuplicateWireName {
        /// Shape that declares the clash.
        shape: &'static str,
        /// Wire name claimed twice.
        wire_name: String,
    },
    /// A field's semantic type has no renderer and the registry has no fallback.
    #[error("no renderer for {semantic_type} (field '{wire_name}' of shape {shape})")]
    UnsupportedType {
        /// Shape owning the field.
        shape: &'static str,
        /// Wire name of the field.
        wire_name: String,
        /// Declared semantic type.
        semantic_type: SemanticType,
    },
}

/// A single value failed to render.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionError {
    /// The accessor produced a value of the wrong kind for the declared type.
    #[error("expected a {expected} value, found {found}")]
    TypeMismatch {
        /// Declared semantic type.
        expected: SemanticType,
        /// Kind of the runtime value.
        found: &'static str,
    },
    /// Timestamp outside `0001-01-01T00:00:00Z..=9999-12-31T23:59:59.999999999Z`
    /// or with nanos outside `0..1_000_000_000`.
    #[error("timestamp out of range (seconds={seconds}, nanos={nanos})")]
    InvalidTimestamp {
        /// Seconds since the Unix epoch.
        seconds: i64,
        /// Sub-second nanoseconds.
        nanos: i32,
    },
    /// Timestamp text that is not RFC 3339.
    #[error("malformed timestamp '{input}': {reason}")]
    MalformedTimestamp {
        /// Rejected text.
        input: String,
        /// Parser message.
        reason: String,
    },
    /// No renderer is registered for the type.
    #[error("no renderer registered for {0}")]
    Unsupported(SemanticType),
    /// Failure reported by a custom renderer.
    #[error("{0}")]
    Custom(String),
}

/// Error returned by [`crate::Compactor::compact`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompactError {
    /// Shape resolution or renderer lookup failed.
    #[error(transparent)]
    Canonical(#[from] CanonicalError),
    /// A field value could not be rendered.
    #[error("failed to render field '{field}': {source}")]
    Coercion {
        /// Wire name of the failing field.
        field: String,
        /// Underlying rendering failure.
        #[source]
        source: CoercionError,
    },
}
