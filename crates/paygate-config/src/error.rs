//! Error types for config operations.

use thiserror::Error;

/// Errors that can occur while initializing or reading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config URL does not parse.
    #[error("invalid config url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// No backend is registered for the URL scheme.
    #[error("unknown config backend '{scheme}', registered: {}", .registered.join(", "))]
    UnknownBackend {
        /// Scheme of the URL.
        scheme: String,
        /// Schemes the registry knows.
        registered: Vec<String>,
    },
    /// The backend rejected the URL.
    #[error("failed to init backend: {reason}, a demo config url: {demo_url}")]
    BackendInit {
        /// Backend message.
        reason: String,
        /// Example of a well-formed URL for the backend.
        demo_url: &'static str,
    },
    /// I/O error while loading configuration.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration source could not be parsed.
    #[error("failed to parse {source_name}: {reason}")]
    Parse {
        /// File or endpoint that was parsed.
        source_name: String,
        /// Parser message.
        reason: String,
    },
    /// The backend was read before `start`.
    #[error("backend not started")]
    NotStarted,
    /// No value exists at the key path.
    #[error("no config at '{0}'")]
    NotFound(String),
    /// The value at the key path does not fit the requested type.
    #[error("config at '{keys}' is invalid: {source}")]
    Invalid {
        /// Dotted key path.
        keys: String,
        /// Deserialization error.
        #[source]
        source: serde_json::Error,
    },
}
