use std::collections::HashMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{AuthError, SignError};
use crate::signature::{SignType, VerifyingKey};

const APP_ID_PATTERN: &str = r"^[A-Za-z0-9_-]{1,64}$";

/// Merchant application id assigned by the gateway (`[A-Za-z0-9_-]{1,64}`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppId(String);

impl AppId {
    /// Parses a validated app id.
    pub fn parse(value: impl Into<String>) -> Result<Self, AuthError> {
        let s = value.into();
        let valid = Regex::new(APP_ID_PATTERN)
            .map(|re| re.is_match(&s))
            .unwrap_or(false);
        if !valid {
            return Err(AuthError::UnknownMerchant(s));
        }
        Ok(Self(s))
    }
}

impl AsRef<str> for AppId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AppId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Keys and defaults the gateway holds for one merchant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MerchantConfig {
    /// Application id.
    pub app_id: String,
    /// Scheme used when a request leaves `sign_type` empty.
    pub sign_type: SignType,
    /// Shared MD5 secret.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub md5_key: Option<String>,
    /// Shared SHA-256 secret.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256_key: Option<String>,
    /// Hex-encoded Ed25519 public key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ed25519_public_key: Option<String>,
}

impl MerchantConfig {
    /// Key this merchant registered for `sign_type`.
    pub fn verifying_key(&self, sign_type: SignType) -> Result<VerifyingKey, SignError> {
        let material = match sign_type {
            SignType::Md5 => self.md5_key.as_deref(),
            SignType::Sha256 => self.sha256_key.as_deref(),
            SignType::Ed25519 => self.ed25519_public_key.as_deref(),
        };
        match material {
            Some(m) if !m.is_empty() => VerifyingKey::parse(sign_type, m),
            _ => Err(SignError::MissingKey(sign_type)),
        }
    }
}

/// Source of merchant configuration.
pub trait MerchantDirectory {
    /// Looks up the merchant registered under `app_id`.
    fn merchant(&self, app_id: &AppId) -> Result<MerchantConfig, AuthError>;
}

impl MerchantDirectory for HashMap<String, MerchantConfig> {
    fn merchant(&self, app_id: &AppId) -> Result<MerchantConfig, AuthError> {
        self.get(app_id.as_ref())
            .cloned()
            .ok_or_else(|| AuthError::UnknownMerchant(app_id.to_string()))
    }
}
