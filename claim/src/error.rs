use faucet_wallet::{ErrorCode, ProviderError, SessionError};
use thiserror::Error;

use crate::messages::{self, Locale};

/// Revert reason the contract uses while an account is rate limited.
const RATE_LIMIT_REASON: &str = "You must wait";

/// Revert reason of an ERC-20 transfer from an empty faucet.
const DEPLETED_REASON: &str = "ERC20: transfer amount exceeds balance";

/// User-facing failure kinds. Every wallet or network failure ends up as
/// exactly one of these; nothing else reaches the rendering layer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClaimError {
    #[error("no wallet provider detected")]
    ProviderUnavailable,

    #[error("wallet connection rejected: {0}")]
    ConnectionRejected(String),

    #[error("no wallet connected")]
    NoSignerConnected,

    #[error("claim rate limited by the contract")]
    RateLimited,

    #[error("gas estimation failed; address already claimed")]
    AlreadyClaimed,

    #[error("faucet token balance too low")]
    InsufficientFaucetBalance,

    #[error("transaction failed: {0}")]
    UnknownTransactionError(String),
}

impl ClaimError {
    /// Map a provider failure on the claim path to a user-facing kind.
    ///
    /// Contract revert reasons are matched before the generic gas-estimation
    /// code, since an estimate fails for every revert.
    pub fn classify(err: &ProviderError) -> Self {
        if err.message.contains(RATE_LIMIT_REASON) {
            Self::RateLimited
        } else if err.message.contains(DEPLETED_REASON) {
            Self::InsufficientFaucetBalance
        } else if err.code == ErrorCode::UnpredictableGasLimit {
            Self::AlreadyClaimed
        } else {
            Self::UnknownTransactionError(err.message.clone())
        }
    }

    /// Localized text shown to the user.
    pub fn message(&self, locale: Locale, cooldown_secs: u64) -> String {
        messages::error_text(self, locale, cooldown_secs)
    }
}

impl From<SessionError> for ClaimError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::ProviderUnavailable => Self::ProviderUnavailable,
            SessionError::ConnectionRejected(reason) => Self::ConnectionRejected(reason),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(String),

    #[error("config value out of range: {0}")]
    Invalid(String),
}
