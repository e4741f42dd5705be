//! Renderers that turn field values into signing-safe text.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::errors::CoercionError;
use crate::value::{FieldValue, SemanticType};

/// Renders one value. `Ok(None)` means nil/absent.
pub type Renderer =
    Arc<dyn Fn(&FieldValue<'_>) -> Result<Option<String>, CoercionError> + Send + Sync>;

/// Lookup from semantic type to renderer, with an optional fallback.
///
/// Built once at startup and handed by reference to whatever constructs
/// compactors; it is never mutated afterwards.
#[derive(Clone, Default)]
pub struct CoercionRegistry {
    renderers: HashMap<SemanticType, Renderer>,
    fallback: Option<Renderer>,
}

impl CoercionRegistry {
    /// Registry with no renderers and no fallback.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry with every built-in type plus the `Display` fallback.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry
            .register(SemanticType::String, render_string)
            .register(SemanticType::Int32, render_int32)
            .register(SemanticType::Int64, render_int64)
            .register(SemanticType::Uint32, render_uint32)
            .register(SemanticType::Uint64, render_uint64)
            .register(SemanticType::Timestamp, render_timestamp)
            .register(SemanticType::Fallback, render_fallback);
        let fallback: Renderer = Arc::new(render_fallback);
        registry.fallback = Some(fallback);
        registry
    }

    /// Adds or replaces the renderer for `semantic_type`.
    pub fn register<F>(&mut self, semantic_type: SemanticType, renderer: F) -> &mut Self
    where
        F: Fn(&FieldValue<'_>) -> Result<Option<String>, CoercionError> + Send + Sync + 'static,
    {
        self.renderers.insert(semantic_type, Arc::new(renderer));
        self
    }

    /// Sets the renderer used for types with no entry of their own.
    pub fn set_fallback<F>(&mut self, renderer: F) -> &mut Self
    where
        F: Fn(&FieldValue<'_>) -> Result<Option<String>, CoercionError> + Send + Sync + 'static,
    {
        let fallback: Renderer = Arc::new(renderer);
        self.fallback = Some(fallback);
        self
    }

    /// Removes the fallback so unregistered types are rejected.
    pub fn clear_fallback(&mut self) -> &mut Self {
        self.fallback = None;
        self
    }

    /// Renderer for `semantic_type`, or the fallback.
    pub fn lookup(&self, semantic_type: SemanticType) -> Option<Renderer> {
        self.renderers
            .get(&semantic_type)
            .or(self.fallback.as_ref())
            .cloned()
    }

    /// Renders a single value.
    pub fn render(
        &self,
        semantic_type: SemanticType,
        value: &FieldValue<'_>,
    ) -> Result<Option<String>, CoercionError> {
        let renderer = self
            .lookup(semantic_type)
            .ok_or(CoercionError::Unsupported(semantic_type))?;
        renderer(value)
    }
}

impl fmt::Debug for CoercionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<_> = self.renderers.keys().collect();
        types.sort();
        f.debug_struct("CoercionRegistry")
            .field("types", &types)
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

fn mismatch(expected: SemanticType, value: &FieldValue<'_>) -> CoercionError {
    CoercionError::TypeMismatch {
        expected,
        found: value.kind(),
    }
}

fn render_string(value: &FieldValue<'_>) -> Result<Option<String>, CoercionError> {
    match value {
        FieldValue::Str(s) => Ok(Some((*s).to_string())),
        FieldValue::Absent => Ok(None),
        other => Err(mismatch(SemanticType::String, other)),
    }
}

macro_rules! integer_renderer {
    ($name:ident, $semantic:ident, [$($variant:ident),+]) => {
        fn $name(value: &FieldValue<'_>) -> Result<Option<String>, CoercionError> {
            match value {
                $(FieldValue::$variant(v) => Ok(Some(v.to_string())),)+
                FieldValue::Absent => Ok(None),
                other => Err(mismatch(SemanticType::$semantic, other)),
            }
        }
    };
}

integer_renderer!(render_int32, Int32, [I32]);
integer_renderer!(render_int64, Int64, [I32, I64]);
integer_renderer!(render_uint32, Uint32, [U32]);
integer_renderer!(render_uint64, Uint64, [U32, U64]);

fn render_timestamp(value: &FieldValue<'_>) -> Result<Option<String>, CoercionError> {
    match value {
        FieldValue::Timestamp(ts) => ts.to_rfc3339().map(Some),
        FieldValue::Absent => Ok(None),
        other => Err(mismatch(SemanticType::Timestamp, other)),
    }
}

fn render_fallback(value: &FieldValue<'_>) -> Result<Option<String>, CoercionError> {
    Ok(match value {
        FieldValue::Absent => None,
        FieldValue::Str(s) => Some((*s).to_string()),
        FieldValue::I32(v) => Some(v.to_string()),
        FieldValue::I64(v) => Some(v.to_string()),
        FieldValue::U32(v) => Some(v.to_string()),
        FieldValue::U64(v) => Some(v.to_string()),
        FieldValue::Timestamp(ts) => Some(ts.to_rfc3339()?),
        FieldValue::Display(d) => Some(d.to_string()),
    })
}
