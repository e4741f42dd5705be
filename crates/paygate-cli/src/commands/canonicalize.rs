//! Canonicalize command implementation.

use paygate_canonical::{CanonicalEngine, CompactionPolicy};
use paygate_config::{BackendRegistry, ConfigServer, PolicyConfig};
use paygate_core::{PayOrder, JSON_TAG};
use tracing::debug;

use crate::error::CliError;
use crate::input::read_order;

/// Key of the compaction policy in configuration.
const POLICY_KEY: &str = "policy";

pub fn run(input: Option<String>, config_url: Option<String>) -> Result<(), CliError> {
    let order = read_order(input)?;

    let policy = match config_url {
        Some(url) => {
            let server = ConfigServer::init(&url, &BackendRegistry::with_defaults())?;
            let config: PolicyConfig = server.unmarshal_get_config(&[POLICY_KEY])?;
            debug!(%url, "using configured compaction policy");
            CompactionPolicy::from(config)
        }
        None => PolicyConfig::default().into(),
    };

    let canonical = CanonicalEngine::standard().canonicalize::<PayOrder>(&order, JSON_TAG, policy)?;

    println!("{}", canonical);
    Ok(())
}
