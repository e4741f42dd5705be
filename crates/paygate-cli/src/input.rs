//! Reading orders from a file or stdin.

use paygate_core::PayOrder;
use std::io::{self, Read};
use tracing::debug;

use crate::error::CliError;

pub fn read_order(input: Option<String>) -> Result<PayOrder, CliError> {
    let json_str = if let Some(path) = input {
        std::fs::read_to_string(&path).map_err(|source| CliError::Read {
            source_name: path.clone(),
            source,
        })?
    } else {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|source| CliError::Read {
                source_name: "stdin".into(),
                source,
            })?;
        buffer
    };

    let order: PayOrder = serde_json::from_str(&json_str)?;
    debug!(app_id = %order.app_id, out_trade_no = %order.out_trade_no, "read order");
    Ok(order)
}
