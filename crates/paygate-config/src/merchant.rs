use paygate_core::{AppId, AuthError, MerchantConfig, MerchantDirectory};

use crate::error::ConfigError;
use crate::server::ConfigServer;

/// Root key of merchant entries.
pub const MERCHANTS_KEY: &str = "merchants";

/// Merchant directory backed by `merchants.<app_id>` entries.
#[derive(Debug)]
pub struct ConfigMerchantDirectory {
    server: ConfigServer,
}

impl ConfigMerchantDirectory {
    /// Directory reading from `server`.
    pub fn new(server: ConfigServer) -> Self {
        Self { server }
    }
}

impl MerchantDirectory for ConfigMerchantDirectory {
    fn merchant(&self, app_id: &AppId) -> Result<MerchantConfig, AuthError> {
        let mut merchant: MerchantConfig = self
            .server
            .unmarshal_get_config(&[MERCHANTS_KEY, app_id.as_ref()])
            .map_err(|e| match e {
                ConfigError::NotFound(_) => AuthError::UnknownMerchant(app_id.to_string()),
                other => AuthError::Directory(other.to_string()),
            })?;
        // Entries are keyed by app id and may omit it.
        if merchant.app_id.is_empty() {
            merchant.app_id = app_id.to_string();
        }
        Ok(merchant)
    }
}
