use serde::de::DeserializeOwned;
use tracing::{debug, error, info};
use url::Url;

use crate::backend::{Backend, BackendRegistry};
use crate::error::ConfigError;

/// Started configuration backend selected from a config URL.
pub struct ConfigServer {
    url: Url,
    backend: Box<dyn Backend>,
}

impl ConfigServer {
    /// Parses `url`, builds the backend registered for its scheme, validates
    /// and starts it.
    pub fn init(url: &str, registry: &BackendRegistry) -> Result<Self, ConfigError> {
        let url = Url::parse(url)?;
        let factory = registry.get(url.scheme())?;
        let mut backend = (factory.init)(&url).map_err(|reason| ConfigError::BackendInit {
            reason,
            demo_url: factory.demo_url,
        })?;
        backend
            .validate()
            .map_err(|reason| ConfigError::BackendInit {
                reason: format!("invalid backend config: {}", reason),
                demo_url: factory.demo_url,
            })?;
        backend.start()?;
        info!(scheme = url.scheme(), "config server started");
        Ok(Self { url, backend })
    }

    /// Wraps an already started backend.
    pub fn from_backend(url: Url, backend: Box<dyn Backend>) -> Self {
        Self { url, backend }
    }

    /// Deserializes the config stored at `keys`.
    pub fn unmarshal_get_config<T: DeserializeOwned>(&self, keys: &[&str]) -> Result<T, ConfigError> {
        let result = self.backend.get_value(keys).and_then(|value| {
            debug!(keys = %keys.join("."), config = %value, "get config");
            serde_json::from_value(value).map_err(|source| ConfigError::Invalid {
                keys: keys.join("."),
                source,
            })
        });
        if let Err(e) = &result {
            error!(keys = %keys.join("."), error = %e, "failed to get config");
        }
        result
    }

    /// URL the server was initialized from.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl std::fmt::Debug for ConfigServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigServer")
            .field("url", &self.url.as_str())
            .finish_non_exhaustive()
    }
}
