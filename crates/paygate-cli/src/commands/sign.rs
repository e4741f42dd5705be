//! Sign command implementation.

use paygate_canonical::CanonicalEngine;
use paygate_core::{PayOrder, SignType, Signer, SigningKey};
use tracing::info;

use crate::error::CliError;
use crate::input::read_order;
use crate::output::format_json;

pub fn run(input: Option<String>, sign_type: SignType, key: String, attach: bool) -> Result<(), CliError> {
    let mut order = read_order(input)?;
    let key = SigningKey::parse(sign_type, &key).map_err(CliError::InvalidKey)?;

    let engine = CanonicalEngine::standard();
    let signer = Signer::new(PayOrder::signing_compactor(&engine)?, key);
    let signature = signer.sign(&order)?;
    info!(%sign_type, out_trade_no = %order.out_trade_no, "order signed");

    if attach {
        order.sign = signature;
        println!("{}", format_json(&serde_json::to_value(&order)?));
    } else {
        println!("{}", signature);
    }
    Ok(())
}
