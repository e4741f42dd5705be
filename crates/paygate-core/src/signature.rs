//! Signature schemes applied to canonical strings.
//!
//! Digest schemes sign `canonical + "&key=" + secret`:
//! - `MD5`: lowercase hex of the MD5 digest.
//! - `SHA256`: base64url (no padding) of the SHA-256 digest.
//!
//! `ED25519` signs the canonical bytes directly and encodes the 64-byte
//! signature as base64url (no padding).

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use ed25519_dalek::{Signer as _, Verifier as _};
use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};
use subtle::ConstantTimeEq;

use crate::errors::SignError;

/// Supported signature schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SignType {
    /// Keyed MD5 digest.
    #[serde(rename = "MD5")]
    Md5,
    /// Keyed SHA-256 digest.
    #[serde(rename = "SHA256")]
    Sha256,
    /// Ed25519 public-key signature (the default).
    #[default]
    #[serde(rename = "ED25519")]
    Ed25519,
}

impl SignType {
    /// Wire spelling used in `sign_type`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SignType::Md5 => "MD5",
            SignType::Sha256 => "SHA256",
            SignType::Ed25519 => "ED25519",
        }
    }
}

impl fmt::Display for SignType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignType {
    type Err = SignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "MD5" => Ok(SignType::Md5),
            "SHA256" | "SHA-256" => Ok(SignType::Sha256),
            "ED25519" => Ok(SignType::Ed25519),
            _ => Err(SignError::UnknownSignType(s.to_string())),
        }
    }
}

fn keyed_payload(canonical: &str, secret: &str) -> String {
    format!("{}&key={}", canonical, secret)
}

fn md5_hex(canonical: &str, secret: &str) -> String {
    format!("{:x}", md5::compute(keyed_payload(canonical, secret)))
}

fn sha256_b64(canonical: &str, secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(keyed_payload(canonical, secret).as_bytes());
    URL_SAFE_NO_PAD.encode(hasher.finalize())
}

/// Key used by the producer of a signature.
pub enum SigningKey {
    /// Shared MD5 secret.
    Md5(String),
    /// Shared SHA-256 secret.
    Sha256(String),
    /// Ed25519 private key.
    Ed25519(ed25519_dalek::SigningKey),
}

impl SigningKey {
    /// Parses key material for `sign_type`: the secret itself for digest
    /// schemes, a 64-char hex seed for Ed25519.
    pub fn parse(sign_type: SignType, material: &str) -> Result<Self, SignError> {
        match sign_type {
            SignType::Md5 => Ok(SigningKey::Md5(non_empty_secret(material)?)),
            SignType::Sha256 => Ok(SigningKey::Sha256(non_empty_secret(material)?)),
            SignType::Ed25519 => {
                let seed = decode_hex32(material)?;
                Ok(SigningKey::Ed25519(ed25519_dalek::SigningKey::from_bytes(&seed)))
            }
        }
    }

    /// Scheme of this key.
    pub fn sign_type(&self) -> SignType {
        match self {
            SigningKey::Md5(_) => SignType::Md5,
            SigningKey::Sha256(_) => SignType::Sha256,
            SigningKey::Ed25519(_) => SignType::Ed25519,
        }
    }

    /// Counterpart used for verification.
    pub fn verifying_key(&self) -> VerifyingKey {
        match self {
            SigningKey::Md5(secret) => VerifyingKey::Md5(secret.clone()),
            SigningKey::Sha256(secret) => VerifyingKey::Sha256(secret.clone()),
            SigningKey::Ed25519(key) => VerifyingKey::Ed25519(key.verifying_key()),
        }
    }

    /// Signs a canonical string.
    pub fn sign(&self, canonical: &str) -> String {
        match self {
            SigningKey::Md5(secret) => md5_hex(canonical, secret),
            SigningKey::Sha256(secret) => sha256_b64(canonical, secret),
            SigningKey::Ed25519(key) => {
                URL_SAFE_NO_PAD.encode(key.sign(canonical.as_bytes()).to_bytes())
            }
        }
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SigningKey({}, ..)", self.sign_type())
    }
}

/// Key used to check a signature.
#[derive(Clone, PartialEq, Eq)]
pub enum VerifyingKey {
    /// Shared MD5 secret.
    Md5(String),
    /// Shared SHA-256 secret.
    Sha256(String),
    /// Ed25519 public key.
    Ed25519(ed25519_dalek::VerifyingKey),
}

impl VerifyingKey {
    /// Parses key material for `sign_type`: the secret for digest schemes,
    /// a 64-char hex public key for Ed25519.
    pub fn parse(sign_type: SignType, material: &str) -> Result<Self, SignError> {
        match sign_type {
            SignType::Md5 => Ok(VerifyingKey::Md5(non_empty_secret(material)?)),
            SignType::Sha256 => Ok(VerifyingKey::Sha256(non_empty_secret(material)?)),
            SignType::Ed25519 => {
                let bytes = decode_hex32(material)?;
                ed25519_dalek::VerifyingKey::from_bytes(&bytes)
                    .map(VerifyingKey::Ed25519)
                    .map_err(|e| SignError::InvalidKey(e.to_string()))
            }
        }
    }

    /// Scheme of this key.
    pub fn sign_type(&self) -> SignType {
        match self {
            VerifyingKey::Md5(_) => SignType::Md5,
            VerifyingKey::Sha256(_) => SignType::Sha256,
            VerifyingKey::Ed25519(_) => SignType::Ed25519,
        }
    }

    /// Checks `signature` against a canonical string.
    ///
    /// `Ok(false)` means a well-formed signature that does not match; a
    /// signature that cannot be decoded is an error.
    pub fn verify(&self, canonical: &str, signature: &str) -> Result<bool, SignError> {
        match self {
            VerifyingKey::Md5(secret) => {
                let received = signature.to_ascii_lowercase();
                Ok(constant_time_eq(md5_hex(canonical, secret).as_bytes(), received.as_bytes()))
            }
            VerifyingKey::Sha256(secret) => Ok(constant_time_eq(
                sha256_b64(canonical, secret).as_bytes(),
                signature.as_bytes(),
            )),
            VerifyingKey::Ed25519(key) => {
                let bytes = URL_SAFE_NO_PAD
                    .decode(signature)
                    .map_err(|e| SignError::MalformedSignature(e.to_string()))?;
                let bytes: [u8; 64] = bytes.try_into().map_err(|b: Vec<u8>| {
                    SignError::MalformedSignature(format!("expected 64 bytes, got {}", b.len()))
                })?;
                let signature = ed25519_dalek::Signature::from_bytes(&bytes);
                Ok(key.verify(canonical.as_bytes(), &signature).is_ok())
            }
        }
    }
}

impl fmt::Debug for VerifyingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerifyingKey::Ed25519(key) => {
                write!(f, "VerifyingKey(ED25519, {})", hex::encode(key.as_bytes()))
            }
            other => write!(f, "VerifyingKey({}, ..)", other.sign_type()),
        }
    }
}

/// Digest comparison that does not stop at the first differing byte.
fn constant_time_eq(expected: &[u8], received: &[u8]) -> bool {
    expected.ct_eq(received).into()
}

fn non_empty_secret(material: &str) -> Result<String, SignError> {
    if material.is_empty() {
        return Err(SignError::InvalidKey("secret must not be empty".into()));
    }
    Ok(material.to_string())
}

fn decode_hex32(material: &str) -> Result<[u8; 32], SignError> {
    let bytes = hex::decode(material.trim()).map_err(|e| SignError::InvalidKey(e.to_string()))?;
    bytes
        .try_into()
        .map_err(|b: Vec<u8>| SignError::InvalidKey(format!("expected 32 bytes, got {}", b.len())))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";

    #[test]
    fn md5_matches_known_digest() {
        let key = SigningKey::parse(SignType::Md5, "secret").unwrap();
        // md5("a=1&key=secret")
        let expected = format!("{:x}", md5::compute("a=1&key=secret"));
        assert_eq!(key.sign("a=1"), expected);
        assert!(key
            .verifying_key()
            .verify("a=1", &expected.to_uppercase())
            .unwrap());
    }

    #[test]
    fn sha256_is_base64url_without_padding() {
        let key = SigningKey::parse(SignType::Sha256, "secret").unwrap();
        let sig = key.sign("a=1");
        assert_eq!(sig.len(), 43);
        assert!(!sig.contains('='));
        assert!(key.verifying_key().verify("a=1", &sig).unwrap());
        assert!(!key.verifying_key().verify("a=2", &sig).unwrap());
    }

    #[test]
    fn digest_verdicts_survive_case_and_single_byte_changes() {
        let md5 = SigningKey::parse(SignType::Md5, "secret").unwrap();
        let sig = md5.sign("a=1&b=2");
        let public = md5.verifying_key();
        assert!(public.verify("a=1&b=2", &sig.to_uppercase()).unwrap());
        let mut flipped = sig.clone().into_bytes();
        flipped[31] = if flipped[31] == b'0' { b'1' } else { b'0' };
        assert!(!public
            .verify("a=1&b=2", &String::from_utf8(flipped).unwrap())
            .unwrap());
        assert!(!public.verify("a=1&b=2", &sig[..31]).unwrap());

        let sha = SigningKey::parse(SignType::Sha256, "secret").unwrap();
        let sig = sha.sign("a=1&b=2");
        let public = sha.verifying_key();
        assert!(public.verify("a=1&b=2", &sig).unwrap());
        let mut flipped = sig.clone().into_bytes();
        flipped[0] = if flipped[0] == b'A' { b'B' } else { b'A' };
        assert!(!public
            .verify("a=1&b=2", &String::from_utf8(flipped).unwrap())
            .unwrap());
    }

    #[test]
    fn ed25519_round_trip_and_tamper() {
        let key = SigningKey::parse(SignType::Ed25519, SEED).unwrap();
        let public = key.verifying_key();
        let sig = key.sign("pay_amount=23&version=hello");
        assert!(public.verify("pay_amount=23&version=hello", &sig).unwrap());
        assert!(!public.verify("pay_amount=24&version=hello", &sig).unwrap());

        let hex_public = match &public {
            VerifyingKey::Ed25519(k) => hex::encode(k.as_bytes()),
            _ => unreachable!(),
        };
        assert_eq!(VerifyingKey::parse(SignType::Ed25519, &hex_public).unwrap(), public);
    }

    #[test]
    fn malformed_ed25519_signature_is_an_error() {
        let key = SigningKey::parse(SignType::Ed25519, SEED).unwrap();
        let err = key.verifying_key().verify("x", "not base64!").unwrap_err();
        assert!(matches!(err, SignError::MalformedSignature(_)));
        let err = key.verifying_key().verify("x", "AAAA").unwrap_err();
        assert!(matches!(err, SignError::MalformedSignature(_)));
    }

    #[test]
    fn sign_type_parsing() {
        assert_eq!("md5".parse::<SignType>().unwrap(), SignType::Md5);
        assert_eq!("SHA-256".parse::<SignType>().unwrap(), SignType::Sha256);
        assert_eq!(SignType::default(), SignType::Ed25519);
        assert!(matches!(
            "RSA".parse::<SignType>(),
            Err(SignError::UnknownSignType(_))
        ));
        assert_eq!(serde_json::to_string(&SignType::Md5).unwrap(), r#""MD5""#);
    }

    #[test]
    fn bad_key_material_is_rejected() {
        assert!(SigningKey::parse(SignType::Md5, "").is_err());
        assert!(SigningKey::parse(SignType::Ed25519, "abcd").is_err());
        assert!(VerifyingKey::parse(SignType::Ed25519, "zz").is_err());
    }
}
