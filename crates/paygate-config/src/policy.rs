use paygate_canonical::{CompactionPolicy, Escaper};
use serde::{Deserialize, Serialize};

/// Value escaping applied during compaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscapeMode {
    /// Values are emitted verbatim.
    #[default]
    None,
    /// `application/x-www-form-urlencoded` escaping.
    FormUrlencoded,
}

/// Compaction policy as stored in configuration.
///
/// Defaults describe the signing string: `sign` excluded, empties skipped,
/// keys sorted, `=` and `&`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Wire name of the signature field; excluded when non-empty.
    pub sign_field: String,
    /// Further excluded wire names.
    pub exclude: Vec<String>,
    /// Drop empty values.
    pub skip_empty: bool,
    /// Order pairs by wire name.
    pub sort_keys: bool,
    /// Separator between key and value.
    pub pair_delimiter: String,
    /// Separator between pairs.
    pub group_delimiter: String,
    /// Value escaping.
    pub escape: EscapeMode,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            sign_field: "sign".into(),
            exclude: Vec::new(),
            skip_empty: true,
            sort_keys: true,
            pair_delimiter: "=".into(),
            group_delimiter: "&".into(),
            escape: EscapeMode::None,
        }
    }
}

impl From<PolicyConfig> for CompactionPolicy {
    fn from(config: PolicyConfig) -> Self {
        let mut policy = CompactionPolicy::new()
            .skip_empty(config.skip_empty)
            .sort_keys(config.sort_keys)
            .pair_delimiter(config.pair_delimiter)
            .group_delimiter(config.group_delimiter);
        if !config.sign_field.is_empty() {
            policy = policy.exclude(config.sign_field);
        }
        for name in config.exclude {
            policy = policy.exclude(name);
        }
        if config.escape == EscapeMode::FormUrlencoded {
            policy = policy.escape(Escaper::form_urlencoded());
        }
        policy
    }
}
