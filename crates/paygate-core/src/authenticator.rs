use paygate_canonical::{CanonicalEngine, CanonicalError};
use tracing::{debug, warn};

use crate::errors::AuthError;
use crate::merchant::{AppId, MerchantConfig, MerchantDirectory};
use crate::order::PayOrder;
use crate::signature::SignType;
use crate::signer::SignatureVerifier;

/// Checks inbound orders against the key of the merchant that sent them.
#[derive(Debug)]
pub struct RequestAuthenticator<D> {
    directory: D,
    verifier: SignatureVerifier<PayOrder>,
}

impl<D: MerchantDirectory> RequestAuthenticator<D> {
    /// Builds an authenticator using the order signing compactor of `engine`.
    pub fn new(directory: D, engine: &CanonicalEngine) -> Result<Self, CanonicalError> {
        let compactor = PayOrder::signing_compactor(engine)?;
        Ok(Self {
            directory,
            verifier: SignatureVerifier::new(compactor),
        })
    }

    /// Authenticates `order` and returns the merchant it belongs to.
    ///
    /// The scheme is the order's `sign_type`, or the merchant default when
    /// that is empty.
    pub fn authenticate(&self, order: &PayOrder) -> Result<MerchantConfig, AuthError> {
        if order.app_id.is_empty() {
            return Err(AuthError::MissingField("app_id"));
        }
        if order.sign.is_empty() {
            return Err(AuthError::MissingField("sign"));
        }
        let app_id = AppId::parse(order.app_id.as_str())?;
        let merchant = self.directory.merchant(&app_id)?;

        let sign_type = if order.sign_type.is_empty() {
            merchant.sign_type
        } else {
            order.sign_type.parse::<SignType>()?
        };
        let key = merchant.verifying_key(sign_type)?;

        if !self.verifier.verify(order, &order.sign, &key)? {
            warn!(app_id = %app_id, %sign_type, out_trade_no = %order.out_trade_no, "signature mismatch");
            return Err(AuthError::SignatureMismatch {
                app_id: app_id.to_string(),
            });
        }
        debug!(app_id = %app_id, %sign_type, "request authenticated");
        Ok(merchant)
    }

    /// Directory consulted for merchant keys.
    pub fn directory(&self) -> &D {
        &self.directory
    }
}
