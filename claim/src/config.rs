//! Faucet client configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;

use faucet_types::{Address, ChainId, TokenAmount};
use faucet_utils::LogFormat;

use crate::error::ConfigError;
use crate::messages::Locale;

/// Address of the deployed WYC faucet on Sepolia.
pub const DEFAULT_CONTRACT: Address = Address::new([
    0x2b, 0x13, 0xab, 0x56, 0x22, 0x30, 0x86, 0x4e, 0xf1, 0x6c, 0xd6, 0x52, 0x37, 0x12, 0x9e,
    0xfd, 0x4f, 0xde, 0xfc, 0xd4,
]);

/// Configuration for the faucet client.
///
/// Can be loaded from a TOML file via [`FaucetConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FaucetConfig {
    /// The faucet contract that receives `requestTokens()`.
    #[serde(default = "default_contract")]
    pub contract_address: Address,

    /// The single supported network.
    #[serde(default = "default_chain_id")]
    pub chain_id: ChainId,

    /// Whole tokens granted per successful claim.
    #[serde(default = "default_grant")]
    pub grant_amount: TokenAmount,

    /// Starting value of the remaining-supply estimate.
    #[serde(default = "default_initial_supply")]
    pub initial_supply: TokenAmount,

    /// Seconds the claim control stays disabled after a success.
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,

    #[serde(default = "default_token_symbol")]
    pub token_symbol: String,

    #[serde(default)]
    pub locale: Locale,

    /// JSON-RPC wallet endpoint. Without one, no provider is present.
    #[serde(default)]
    pub wallet_rpc_url: Option<String>,

    /// Interval between receipt polls while a claim is submitting.
    #[serde(default = "default_confirmation_poll_ms")]
    pub confirmation_poll_ms: u64,

    /// Stop waiting for a receipt after this many seconds.
    #[serde(default = "default_confirmation_timeout_secs")]
    pub confirmation_timeout_secs: u64,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_contract() -> Address {
    DEFAULT_CONTRACT
}

fn default_chain_id() -> ChainId {
    ChainId::SEPOLIA
}

fn default_grant() -> TokenAmount {
    TokenAmount::new(50)
}

fn default_initial_supply() -> TokenAmount {
    TokenAmount::new(30_000_000)
}

fn default_cooldown_secs() -> u64 {
    60
}

fn default_token_symbol() -> String {
    "WYC".to_string()
}

fn default_confirmation_poll_ms() -> u64 {
    1_000
}

fn default_confirmation_timeout_secs() -> u64 {
    300
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl FaucetConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grant_amount.is_zero() {
            return Err(ConfigError::Invalid("grant_amount must be positive".into()));
        }
        if self.cooldown_secs == 0 {
            return Err(ConfigError::Invalid("cooldown_secs must be positive".into()));
        }
        if self.confirmation_poll_ms == 0 {
            return Err(ConfigError::Invalid(
                "confirmation_poll_ms must be positive".into(),
            ));
        }
        Ok(())
    }
}

impl Default for FaucetConfig {
    fn default() -> Self {
        Self {
            contract_address: default_contract(),
            chain_id: default_chain_id(),
            grant_amount: default_grant(),
            initial_supply: default_initial_supply(),
            cooldown_secs: default_cooldown_secs(),
            token_symbol: default_token_symbol(),
            locale: Locale::default(),
            wallet_rpc_url: None,
            confirmation_poll_ms: default_confirmation_poll_ms(),
            confirmation_timeout_secs: default_confirmation_timeout_secs(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}
