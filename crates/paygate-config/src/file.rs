//! Local file backend: `file:///etc/paygate/config.yaml`.

use std::path::{Path, PathBuf};

use tracing::debug;
use url::Url;

use crate::backend::{lookup, Backend, BackendFactory};
use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Json,
}

impl Format {
    fn of(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "yaml" | "yml" => Some(Format::Yaml),
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

/// Configuration tree loaded from a YAML or JSON file.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    tree: Option<serde_json::Value>,
}

impl FileBackend {
    /// URL scheme served by this backend.
    pub const SCHEME: &'static str = "file";
    /// Example URL shown on init failure.
    pub const DEMO_URL: &'static str = "file:///etc/paygate/config.yaml";

    /// Factory for [`crate::BackendRegistry`].
    pub fn factory() -> BackendFactory {
        BackendFactory {
            init: |url| Self::from_url(url).map(|b| Box::new(b) as Box<dyn Backend>),
            demo_url: Self::DEMO_URL,
        }
    }

    /// Backend reading the file named by `url`.
    pub fn from_url(url: &Url) -> Result<Self, String> {
        let path = url
            .to_file_path()
            .map_err(|_| format!("'{}' does not name a local file", url))?;
        Ok(Self::new(path))
    }

    /// Backend reading `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            tree: None,
        }
    }

    /// File this backend reads.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parse(&self, content: &str) -> Result<serde_json::Value, ConfigError> {
        let parse_error = |reason: String| ConfigError::Parse {
            source_name: self.path.display().to_string(),
            reason,
        };
        match Format::of(&self.path) {
            Some(Format::Yaml) => serde_yaml::from_str(content).map_err(|e| parse_error(e.to_string())),
            Some(Format::Json) => serde_json::from_str(content).map_err(|e| parse_error(e.to_string())),
            None => Err(parse_error("unsupported file extension".into())),
        }
    }
}

impl Backend for FileBackend {
    fn validate(&self) -> Result<(), String> {
        if Format::of(&self.path).is_none() {
            return Err(format!(
                "'{}' must end in .yaml, .yml or .json",
                self.path.display()
            ));
        }
        Ok(())
    }

    fn start(&mut self) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(&self.path)?;
        let tree = self.parse(&content)?;
        debug!(path = %self.path.display(), "loaded config file");
        self.tree = Some(tree);
        Ok(())
    }

    fn get_value(&self, keys: &[&str]) -> Result<serde_json::Value, ConfigError> {
        let tree = self.tree.as_ref().ok_or(ConfigError::NotStarted)?;
        lookup(tree, keys).cloned()
    }
}
