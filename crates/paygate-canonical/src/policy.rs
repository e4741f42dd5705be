use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Escape hook applied to each rendered value before it is joined.
#[derive(Clone)]
pub struct Escaper(Arc<dyn Fn(&str) -> String + Send + Sync>);

impl Escaper {
    /// Wraps an arbitrary escape function.
    pub fn new<F>(escape: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self(Arc::new(escape))
    }

    /// `application/x-www-form-urlencoded` escaping (space becomes `+`).
    pub fn form_urlencoded() -> Self {
        Self::new(|value| url::form_urlencoded::byte_serialize(value.as_bytes()).collect())
    }

    /// Escapes one value.
    pub fn apply(&self, value: &str) -> String {
        (self.0)(value)
    }
}

impl fmt::Debug for Escaper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Escaper(..)")
    }
}

/// How a shape is reduced to a canonical string.
///
/// Built once per use case and shared read-only; it carries no per-call
/// state. The default policy keeps every field in declaration order, joined
/// with `=` and `&`, without escaping.
#[derive(Debug, Clone)]
pub struct CompactionPolicy {
    excluded: BTreeSet<String>,
    skip_empty: bool,
    sort_keys: bool,
    pair_delimiter: String,
    group_delimiter: String,
    escape: Option<Escaper>,
}

impl Default for CompactionPolicy {
    fn default() -> Self {
        Self {
            excluded: BTreeSet::new(),
            skip_empty: false,
            sort_keys: false,
            pair_delimiter: "=".to_string(),
            group_delimiter: "&".to_string(),
            escape: None,
        }
    }
}

impl CompactionPolicy {
    /// Same as [`CompactionPolicy::default`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Gateway signing preset: excludes `sign_field`, drops empty values,
    /// sorts keys, joins with `=` and `&`.
    pub fn signing(sign_field: impl Into<String>) -> Self {
        Self::default()
            .exclude(sign_field)
            .skip_empty(true)
            .sort_keys(true)
    }

    /// Adds a wire name that is never emitted.
    pub fn exclude(mut self, wire_name: impl Into<String>) -> Self {
        self.excluded.insert(wire_name.into());
        self
    }

    /// Omits zero/empty/nil values entirely instead of emitting `key=`.
    pub fn skip_empty(mut self, skip: bool) -> Self {
        self.skip_empty = skip;
        self
    }

    /// Orders pairs by byte-wise ascending wire name.
    pub fn sort_keys(mut self, sort: bool) -> Self {
        self.sort_keys = sort;
        self
    }

    /// Separator between a key and its value.
    pub fn pair_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.pair_delimiter = delimiter.into();
        self
    }

    /// Separator between successive pairs.
    pub fn group_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.group_delimiter = delimiter.into();
        self
    }

    /// Escapes rendered values with `escaper`.
    pub fn escape(mut self, escaper: Escaper) -> Self {
        self.escape = Some(escaper);
        self
    }

    /// Whether `wire_name` is excluded.
    pub fn is_excluded(&self, wire_name: &str) -> bool {
        self.excluded.contains(wire_name)
    }

    /// Excluded wire names in ascending order.
    pub fn excluded(&self) -> impl Iterator<Item = &str> {
        self.excluded.iter().map(String::as_str)
    }

    /// Whether empty values are dropped.
    pub fn skips_empty(&self) -> bool {
        self.skip_empty
    }

    /// Whether pairs are sorted by wire name.
    pub fn sorts_keys(&self) -> bool {
        self.sort_keys
    }

    /// Key/value separator.
    pub fn pair_delimiter_str(&self) -> &str {
        &self.pair_delimiter
    }

    /// Pair separator.
    pub fn group_delimiter_str(&self) -> &str {
        &self.group_delimiter
    }

    /// Configured escape hook.
    pub fn escaper(&self) -> Option<&Escaper> {
        self.escape.as_ref()
    }
}
