use paygate_canonical::CompactError;
use thiserror::Error;

use crate::signature::SignType;

/// Errors raised while producing or checking a signature.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignError {
    /// The record could not be reduced to its signing string.
    #[error("canonicalization failed: {0}")]
    Compact(#[from] CompactError),
    /// `sign_type` names a scheme the gateway does not know.
    #[error("unknown sign type '{0}'")]
    UnknownSignType(String),
    /// Signature text could not be decoded.
    #[error("malformed signature: {0}")]
    MalformedSignature(String),
    /// Key material is unusable for the scheme.
    #[error("invalid key: {0}")]
    InvalidKey(String),
    /// No key is configured for the requested scheme.
    #[error("no {0} key configured")]
    MissingKey(SignType),
}

/// Errors raised while authenticating an inbound request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// A field required for authentication is empty.
    #[error("missing required field '{0}'")]
    MissingField(&'static str),
    /// `app_id` is malformed or unknown to the directory.
    #[error("unknown merchant '{0}'")]
    UnknownMerchant(String),
    /// The signature is well formed but does not match the request.
    #[error("signature mismatch for merchant '{app_id}'")]
    SignatureMismatch {
        /// Merchant whose key was used.
        app_id: String,
    },
    /// Signing machinery failed.
    #[error(transparent)]
    Sign(#[from] SignError),
    /// The merchant directory could not be consulted.
    #[error("merchant directory error: {0}")]
    Directory(String),
}
