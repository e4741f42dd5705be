//! Signing and verification of gateway requests.
//!
//! This crate provides:
//! - The `PayOrder` request record and its canonical shape
//! - Signature schemes (MD5, SHA-256, Ed25519) over canonical strings
//! - `Signer` / `SignatureVerifier` bound to a shared compactor
//! - Request authentication against a merchant directory
//!
//! A record that cannot be canonicalized is never signed and never verifies.
//!
#![deny(missing_docs)]

/// Request authentication against merchant keys.
pub mod authenticator;
/// Error types for signing and authentication.
pub mod errors;
/// Merchant identifiers, configuration and directories.
pub mod merchant;
/// The order request record.
pub mod order;
/// Signature schemes and keys.
pub mod signature;
/// Record-level signer and verifier.
pub mod signer;

pub use authenticator::RequestAuthenticator;
pub use errors::{AuthError, SignError};
pub use merchant::{AppId, MerchantConfig, MerchantDirectory};
pub use order::{PayOrder, JSON_TAG, PROTOBUF_TAG, SIGN_FIELD};
pub use signature::{SignType, SigningKey, VerifyingKey};
pub use signer::{SignatureVerifier, Signer};
