//! Wallet session: the connected account and the signer bound to it.

use faucet_types::Address;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};

use crate::error::{ProviderError, SessionError};
use crate::provider::{TransactionSigner, WalletProvider};

/// An established connection: the signer is always bound to `account`.
struct Connected<S> {
    account: Address,
    signer: S,
}

/// Owns the connection to the wallet provider.
///
/// The account and signer are stored together, so a signer exists exactly
/// when an account does.
pub struct WalletSession<P: WalletProvider> {
    provider: Option<P>,
    state: RwLock<Option<Connected<P::Signer>>>,
}

impl<P: WalletProvider> WalletSession<P> {
    /// Create a cleared session. `provider` is `None` when the environment
    /// has no wallet installed.
    pub fn new(provider: Option<P>) -> Self {
        Self {
            provider,
            state: RwLock::new(None),
        }
    }

    pub async fn account(&self) -> Option<Address> {
        self.state.read().await.as_ref().map(|c| c.account)
    }

    pub async fn signer(&self) -> Option<P::Signer> {
        self.state.read().await.as_ref().map(|c| c.signer.clone())
    }

    /// Request account authorization from the provider (may prompt).
    pub async fn connect(&self) -> Result<Address, SessionError> {
        let provider = self
            .provider
            .as_ref()
            .ok_or(SessionError::ProviderUnavailable)?;

        let result = match provider.request_accounts().await {
            Ok(accounts) => Self::derive(provider, &accounts),
            Err(e) => Err(e),
        };

        let mut state = self.state.write().await;
        match result {
            Ok(Some(connected)) => {
                let account = connected.account;
                info!(%account, "wallet connected");
                *state = Some(connected);
                Ok(account)
            }
            Ok(None) => {
                *state = None;
                Err(SessionError::ConnectionRejected(
                    "provider authorized no accounts".into(),
                ))
            }
            Err(e) => {
                warn!(error = %e, "wallet connection failed");
                *state = None;
                Err(SessionError::ConnectionRejected(e.message))
            }
        }
    }

    /// Silently pick up an account the user authorized earlier.
    ///
    /// Provider errors are logged and treated as "no session".
    pub async fn restore_if_authorized(&self) -> Option<Address> {
        let provider = self.provider.as_ref()?;

        let accounts = match provider.list_accounts().await {
            Ok(accounts) => accounts,
            Err(e) => {
                warn!(error = %e, "could not list authorized accounts");
                return None;
            }
        };

        match Self::derive(provider, &accounts) {
            Ok(Some(connected)) => {
                let account = connected.account;
                debug!(%account, "restored authorized wallet session");
                *self.state.write().await = Some(connected);
                Some(account)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "could not derive signer for restored account");
                None
            }
        }
    }

    /// Apply an account-change notification from the provider.
    ///
    /// A non-empty list switches to its first account and re-derives the
    /// signer; an empty list (or a failed derivation) clears the session.
    pub async fn on_accounts_changed(&self, accounts: &[Address]) -> Option<Address> {
        let mut state = self.state.write().await;
        let Some(provider) = self.provider.as_ref() else {
            *state = None;
            return None;
        };

        match Self::derive(provider, accounts) {
            Ok(Some(connected)) => {
                let account = connected.account;
                debug!(%account, "wallet account changed");
                *state = Some(connected);
                Some(account)
            }
            Ok(None) => {
                if state.take().is_some() {
                    info!("wallet disconnected");
                }
                None
            }
            Err(e) => {
                warn!(error = %e, "could not derive signer after account change");
                *state = None;
                None
            }
        }
    }

    /// Subscribe to the provider's account-change events.
    pub fn account_events(&self) -> Option<broadcast::Receiver<Vec<Address>>> {
        self.provider.as_ref().map(WalletProvider::account_events)
    }

    fn derive(
        provider: &P,
        accounts: &[Address],
    ) -> Result<Option<Connected<P::Signer>>, ProviderError> {
        let Some(&account) = accounts.first() else {
            return Ok(None);
        };
        let signer = provider.signer_for(account)?;
        debug_assert_eq!(signer.account(), account);
        Ok(Some(Connected { account, signer }))
    }
}
