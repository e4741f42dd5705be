//! Declarative record shapes and their resolution into wire-named fields.
//!
//! A record type describes its fields once through [`Record::shape`]. The
//! description names each field, lists its tag aliases, and provides a plain
//! function accessor. [`ShapeResolver`] turns a description plus a naming tag
//! into an ordered [`ResolvedShape`] and memoizes it per (type, tag).

use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::errors::CanonicalError;
use crate::value::{FieldValue, SemanticType};

/// Alias that removes a field from a shape under a tag.
const SKIP_ALIAS: &str = "-";

/// Read-only projection from a record to one field value.
pub type Accessor<R> = for<'r> fn(&'r R) -> FieldValue<'r>;

/// A record type that can be reduced to a canonical string.
pub trait Record: Sized + 'static {
    /// Declares the record's fields in declaration order.
    fn shape() -> ShapeDescription<Self>;
}

/// One declared field before a naming tag is applied.
pub struct FieldSpec<R> {
    ident: &'static str,
    aliases: &'static [(&'static str, &'static str)],
    semantic_type: SemanticType,
    accessor: Accessor<R>,
}

impl<R> FieldSpec<R> {
    /// Wire name under `tag`: the alias if declared, otherwise the identifier.
    /// `None` when the alias is `-`.
    fn wire_name(&self, tag: &str) -> Option<&'static str> {
        let name = self
            .aliases
            .iter()
            .find(|(t, _)| *t == tag)
            .map_or(self.ident, |(_, alias)| *alias);
        (name != SKIP_ALIAS).then_some(name)
    }
}

/// Ordered field declarations for a record type.
pub struct ShapeDescription<R> {
    name: &'static str,
    fields: Vec<FieldSpec<R>>,
}

impl<R> ShapeDescription<R> {
    /// Starts an empty description; `name` appears in errors and logs.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
        }
    }

    /// Appends a field.
    ///
    /// `aliases` pairs a tag with the wire name used under it, in the spirit
    /// of `json:"out_trade_no"` struct tags.
    pub fn field(
        mut self,
        ident: &'static str,
        aliases: &'static [(&'static str, &'static str)],
        semantic_type: SemanticType,
        accessor: Accessor<R>,
    ) -> Self {
        self.fields.push(FieldSpec {
            ident,
            aliases,
            semantic_type,
            accessor,
        });
        self
    }

    /// Shape name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no field is declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Applies `tag` and checks wire-name uniqueness.
    pub fn resolve(&self, tag: &str) -> Result<ResolvedShape<R>, CanonicalError> {
        let mut seen = HashSet::with_capacity(self.fields.len());
        let mut fields = Vec::with_capacity(self.fields.len());
        for spec in &self.fields {
            let Some(wire_name) = spec.wire_name(tag) else {
                continue;
            };
            if !seen.insert(wire_name) {
                return Err(CanonicalError::DuplicateWireName {
                    shape: self.name,
                    wire_name: wire_name.to_string(),
                });
            }
            fields.push(FieldDescriptor {
                wire_name,
                semantic_type: spec.semantic_type,
                accessor: spec.accessor,
            });
        }
        Ok(ResolvedShape {
            name: self.name,
            tag: tag.to_string(),
            fields,
        })
    }
}

/// A field after tag resolution.
pub struct FieldDescriptor<R> {
    wire_name: &'static str,
    semantic_type: SemanticType,
    accessor: Accessor<R>,
}

impl<R> FieldDescriptor<R> {
    /// Key used in the canonical string.
    pub fn wire_name(&self) -> &'static str {
        self.wire_name
    }

    /// Declared semantic type.
    pub fn semantic_type(&self) -> SemanticType {
        self.semantic_type
    }

    /// Accessor function.
    pub fn accessor(&self) -> Accessor<R> {
        self.accessor
    }

    /// Reads the field from a record.
    pub fn read<'r>(&self, record: &'r R) -> FieldValue<'r> {
        (self.accessor)(record)
    }
}

/// Wire-named fields of one shape in declaration order. Immutable once built.
pub struct ResolvedShape<R> {
    name: &'static str,
    tag: String,
    fields: Vec<FieldDescriptor<R>>,
}

impl<R> ResolvedShape<R> {
    /// Shape name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Tag the wire names were taken from.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Descriptors in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor<R>] {
        &self.fields
    }
}

type CacheKey = (TypeId, String);
type CacheEntry = Arc<dyn Any + Send + Sync>;

/// Memoizing resolver shared by every compactor built at startup.
///
/// Resolution runs under the write lock, so concurrent first access to the
/// same (type, tag) resolves it exactly once.
#[derive(Debug, Default)]
pub struct ShapeResolver {
    cache: RwLock<HashMap<CacheKey, CacheEntry>>,
}

impl ShapeResolver {
    /// Creates an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the resolved shape of `R` under `tag`, resolving on first use.
    pub fn resolve<R: Record>(&self, tag: &str) -> Result<Arc<ResolvedShape<R>>, CanonicalError> {
        let key = (TypeId::of::<R>(), tag.to_string());
        {
            let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(shape) = lookup::<R>(&cache, &key) {
                return Ok(shape);
            }
        }

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(shape) = lookup::<R>(&cache, &key) {
            return Ok(shape);
        }
        let shape = Arc::new(R::shape().resolve(tag)?);
        debug!(
            shape = shape.name(),
            tag,
            fields = shape.fields().len(),
            "resolved record shape"
        );
        cache.insert(key, shape.clone());
        Ok(shape)
    }

    /// Number of cached (type, tag) entries.
    pub fn cached(&self) -> usize {
        self.cache.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

fn lookup<R: Record>(
    cache: &HashMap<CacheKey, CacheEntry>,
    key: &CacheKey,
) -> Option<Arc<ResolvedShape<R>>> {
    cache
        .get(key)
        .cloned()
        .and_then(|entry| entry.downcast::<ResolvedShape<R>>().ok())
}
