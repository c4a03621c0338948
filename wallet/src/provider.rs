//! Capability traits for the injected wallet provider.
//!
//! The provider is an external collaborator: it discovers accounts, hands out
//! signers, and notifies about out-of-band account changes. All waiting is
//! done through futures so the caller's event loop is never blocked.

use std::future::Future;

use faucet_types::{Address, TxHash};
use serde::Serialize;
use tokio::sync::broadcast;

use crate::error::ProviderError;

/// A wallet provider (browser extension, desktop wallet, or test double).
pub trait WalletProvider: Send + Sync + 'static {
    type Signer: TransactionSigner;

    /// Ask the user to authorize accounts. May show a wallet prompt.
    fn request_accounts(&self) -> impl Future<Output = Result<Vec<Address>, ProviderError>> + Send;

    /// Accounts that are already authorized. Never prompts.
    fn list_accounts(&self) -> impl Future<Output = Result<Vec<Address>, ProviderError>> + Send;

    /// Bind a signer to an authorized account.
    fn signer_for(&self, account: Address) -> Result<Self::Signer, ProviderError>;

    /// Subscribe to account-set changes. An empty list means disconnected.
    fn account_events(&self) -> broadcast::Receiver<Vec<Address>>;
}

/// A capability bound to one account that can submit transactions.
pub trait TransactionSigner: Clone + Send + Sync + 'static {
    type Pending: PendingTransaction;

    fn account(&self) -> Address;

    /// Sign and broadcast. Resolves once the network has accepted the
    /// transaction, not when it is confirmed.
    fn send_transaction(
        &self,
        request: TransactionRequest,
    ) -> impl Future<Output = Result<Self::Pending, ProviderError>> + Send;
}

/// Handle to a broadcast transaction whose confirmation can be awaited.
pub trait PendingTransaction: Send + 'static {
    fn hash(&self) -> TxHash;

    fn wait(self) -> impl Future<Output = Result<Receipt, ProviderError>> + Send;
}

/// A contract call without value transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionRequest {
    pub from: Address,
    pub to: Address,
    /// `0x`-prefixed calldata.
    pub data: String,
}

/// Proof that a transaction was mined successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
}
