use std::sync::Arc;

use paygate_canonical::{Compactor, Record};
use tracing::debug;

use crate::errors::SignError;
use crate::signature::{SigningKey, VerifyingKey};

/// Produces signatures for records of one shape.
///
/// The compactor is shared so a signer and a verifier built from the same
/// policy always agree on the signing string.
#[derive(Debug)]
pub struct Signer<R> {
    compactor: Arc<Compactor<R>>,
    key: SigningKey,
}

impl<R: Record> Signer<R> {
    /// Creates a signer over `compactor` using `key`.
    pub fn new(compactor: Arc<Compactor<R>>, key: SigningKey) -> Self {
        Self { compactor, key }
    }

    /// Canonicalizes `record` and signs the result.
    pub fn sign(&self, record: &R) -> Result<String, SignError> {
        let canonical = self.compactor.compact(record)?;
        debug!(
            shape = self.compactor.shape().name(),
            sign_type = %self.key.sign_type(),
            "signing canonical string"
        );
        Ok(self.key.sign(&canonical))
    }

    /// Key used for signing.
    pub fn key(&self) -> &SigningKey {
        &self.key
    }
}

/// Checks signatures carried by records of one shape.
#[derive(Debug)]
pub struct SignatureVerifier<R> {
    compactor: Arc<Compactor<R>>,
}

impl<R: Record> SignatureVerifier<R> {
    /// Creates a verifier over `compactor`.
    pub fn new(compactor: Arc<Compactor<R>>) -> Self {
        Self { compactor }
    }

    /// Re-derives the signing string of `record` and checks `signature`
    /// against it with `key`.
    ///
    /// A record that cannot be canonicalized is an error, never a mismatch.
    pub fn verify(
        &self,
        record: &R,
        signature: &str,
        key: &VerifyingKey,
    ) -> Result<bool, SignError> {
        let canonical = self.compactor.compact(record)?;
        key.verify(&canonical, signature)
    }

    /// Compactor shared with signers.
    pub fn compactor(&self) -> &Compactor<R> {
        &self.compactor
    }
}

impl<R> Clone for SignatureVerifier<R> {
    fn clone(&self) -> Self {
        Self {
            compactor: Arc::clone(&self.compactor),
        }
    }
}
