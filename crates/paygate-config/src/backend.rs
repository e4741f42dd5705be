//! Pluggable configuration backends.
//!
//! A backend owns a tree of configuration values and answers lookups by key
//! path. Backends are chosen by the scheme of the config URL through an
//! explicit [`BackendRegistry`].

use std::collections::BTreeMap;

use url::Url;

use crate::error::ConfigError;
use crate::file::FileBackend;

/// Source of configuration values.
pub trait Backend: Send + Sync {
    /// Checks the settings taken from the URL before the backend starts.
    fn validate(&self) -> Result<(), String>;

    /// Loads or connects; called once before any lookup.
    fn start(&mut self) -> Result<(), ConfigError>;

    /// Returns the value at `keys`, walking the tree one key per level.
    fn get_value(&self, keys: &[&str]) -> Result<serde_json::Value, ConfigError>;
}

/// Builds a backend from its config URL.
pub type InitFn = fn(&Url) -> Result<Box<dyn Backend>, String>;

/// Constructor and usage hint for one backend kind.
#[derive(Clone, Copy)]
pub struct BackendFactory {
    /// Constructor.
    pub init: InitFn,
    /// Example URL reported when initialization fails.
    pub demo_url: &'static str,
}

impl std::fmt::Debug for BackendFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendFactory")
            .field("demo_url", &self.demo_url)
            .finish_non_exhaustive()
    }
}

/// Backends by URL scheme.
#[derive(Debug, Clone, Default)]
pub struct BackendRegistry {
    factories: BTreeMap<String, BackendFactory>,
}

impl BackendRegistry {
    /// Registry with no backends.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in `file` backend.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(FileBackend::SCHEME, FileBackend::factory());
        registry
    }

    /// Adds or replaces the backend for `scheme`.
    pub fn register(&mut self, scheme: impl Into<String>, factory: BackendFactory) -> &mut Self {
        self.factories.insert(scheme.into(), factory);
        self
    }

    /// Factory registered for `scheme`.
    pub fn get(&self, scheme: &str) -> Result<&BackendFactory, ConfigError> {
        self.factories
            .get(scheme)
            .ok_or_else(|| ConfigError::UnknownBackend {
                scheme: scheme.to_string(),
                registered: self.schemes().map(str::to_string).collect(),
            })
    }

    /// Registered schemes in sorted order.
    pub fn schemes(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

/// Walks `keys` through nested JSON objects.
pub fn lookup<'v>(
    tree: &'v serde_json::Value,
    keys: &[&str],
) -> Result<&'v serde_json::Value, ConfigError> {
    keys.iter().try_fold(tree, |node, key| {
        node.get(key)
            .ok_or_else(|| ConfigError::NotFound(keys.join(".")))
    })
}
