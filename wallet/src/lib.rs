//! Wallet side of the faucet client.
//!
//! Provides:
//! - The capability traits an injected wallet provider must satisfy
//!   (account discovery, signer derivation, account-change events)
//! - [`WalletSession`], the single owner of the connected account and signer
//! - [`FaucetContract`], which encodes the `requestTokens()` call
//! - [`JsonRpcWallet`], a provider speaking EIP-1193 methods over HTTP

pub mod contract;
pub mod error;
pub mod provider;
pub mod rpc;
pub mod session;

pub use contract::{decode_revert_reason, FaucetContract, REQUEST_TOKENS_SELECTOR};
pub use error::{ErrorCode, ProviderError, SessionError};
pub use provider::{
    PendingTransaction, Receipt, TransactionRequest, TransactionSigner, WalletProvider,
};
pub use rpc::{JsonRpcWallet, RpcOptions};
pub use session::WalletSession;
