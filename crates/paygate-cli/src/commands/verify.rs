//! Verify command implementation.

use paygate_canonical::CanonicalEngine;
use paygate_config::{BackendRegistry, ConfigMerchantDirectory, ConfigServer};
use paygate_core::RequestAuthenticator;
use serde_json::json;
use tracing::info;

use crate::error::CliError;
use crate::input::read_order;
use crate::output::{format_json, format_verdict_row, print_verdict_header};

pub fn run(input: Option<String>, config_url: String, json_output: bool) -> Result<(), CliError> {
    let order = read_order(input)?;

    let server = ConfigServer::init(&config_url, &BackendRegistry::with_defaults())?;
    let authenticator =
        RequestAuthenticator::new(ConfigMerchantDirectory::new(server), &CanonicalEngine::standard())?;

    let result = authenticator.authenticate(&order);
    let verdict = match &result {
        Ok(_) => "ok".to_string(),
        Err(e) => e.to_string(),
    };
    info!(app_id = %order.app_id, ok = result.is_ok(), "verification finished");

    if json_output {
        let value = json!({
            "app_id": order.app_id,
            "out_trade_no": order.out_trade_no,
            "ok": result.is_ok(),
            "verdict": verdict,
        });
        println!("{}", format_json(&value));
    } else {
        print_verdict_header();
        println!("{}", format_verdict_row(&order.app_id, &order.out_trade_no, &verdict));
    }

    result?;
    Ok(())
}
