//! Error type for CLI commands.

use thiserror::Error;

/// Errors reported by `paygate` commands.
#[derive(Error, Debug)]
pub enum CliError {
    /// Input file or stdin could not be read.
    #[error("Failed to read {source_name}: {source}")]
    Read {
        /// File path or `stdin`.
        source_name: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Input is not a valid order document.
    #[error("Invalid order JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    /// Key material does not fit the sign type.
    #[error("Invalid key: {0}")]
    InvalidKey(paygate_core::SignError),
    /// Configuration could not be loaded.
    #[error("Failed to load config: {0}")]
    Config(#[from] paygate_config::ConfigError),
    /// Shape or policy rejected at construction.
    #[error("Canonicalization failed: {0}")]
    Canonical(#[from] paygate_canonical::CanonicalError),
    /// The order could not be compacted.
    #[error("Canonicalization failed: {0}")]
    Compact(#[from] paygate_canonical::CompactError),
    /// Signing failed.
    #[error("Signing failed: {0}")]
    Sign(#[from] paygate_core::SignError),
    /// The order did not authenticate.
    #[error("Verification failed: {0}")]
    Verification(#[from] paygate_core::AuthError),
}
