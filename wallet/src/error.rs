use thiserror::Error;

/// Classification of a provider failure, following EIP-1193 and the JSON-RPC
/// codes wallets return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// The user declined the request in the wallet UI (4001).
    UserRejected,
    /// The requested account has not been authorized (4100).
    Unauthorized,
    /// Gas estimation failed, which means the call would revert.
    UnpredictableGasLimit,
    /// The transaction was mined but reverted.
    Reverted,
    /// No receipt arrived within the confirmation window.
    Timeout,
    /// The endpoint could not be reached or returned garbage.
    Transport,
    /// Any other JSON-RPC error code.
    Rpc(i64),
}

impl ErrorCode {
    pub fn from_rpc_code(code: i64) -> Self {
        match code {
            4001 => Self::UserRejected,
            4100 => Self::Unauthorized,
            other => Self::Rpc(other),
        }
    }
}

/// A failure reported by the wallet provider or the network behind it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ProviderError {
    pub code: ErrorCode,
    pub message: String,
}

impl ProviderError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Transport, message)
    }

    pub fn user_rejected() -> Self {
        Self::new(ErrorCode::UserRejected, "user rejected the request")
    }
}

/// Why a wallet session could not be established.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("no wallet provider detected")]
    ProviderUnavailable,

    #[error("wallet connection rejected: {0}")]
    ConnectionRejected(String),
}
