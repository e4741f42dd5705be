//! Configuration for the payment gateway.
//!
//! This crate provides:
//! - `ConfigServer`, initialized from a URL whose scheme selects the backend
//! - An explicit `BackendRegistry` and the built-in `file` backend (YAML/JSON)
//! - Typed merchant and compaction-policy configuration
//!
#![deny(missing_docs)]

/// Backend trait and registry.
pub mod backend;
/// Error types for config operations.
pub mod error;
/// Local file backend.
pub mod file;
/// Merchant directory over the config server.
pub mod merchant;
/// Compaction policy configuration.
pub mod policy;
/// Config server.
pub mod server;

pub use backend::{Backend, BackendFactory, BackendRegistry};
pub use error::ConfigError;
pub use file::FileBackend;
pub use merchant::{ConfigMerchantDirectory, MERCHANTS_KEY};
pub use policy::{EscapeMode, PolicyConfig};
pub use server::ConfigServer;
