//! Claim controller: the claim lifecycle state machine.
//!
//! `Idle -> Submitting -> {Succeeded | Failed}`, then `Succeeded ->
//! CooldownActive -> Idle` as the cooldown ticks down. Connecting passes
//! through `AwaitingWallet`.
//!
//! All mutation happens under one async mutex that is never held across a
//! wallet or network await, so overlapping intents observe `busy` and are
//! ignored instead of racing.

use std::sync::Arc;

use faucet_types::{Address, TokenAmount, TxHash};
use faucet_wallet::{
    FaucetContract, PendingTransaction, ProviderError, Receipt, WalletProvider, WalletSession,
};
use tokio::sync::{broadcast, watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::FaucetConfig;
use crate::cooldown::CooldownTimer;
use crate::error::ClaimError;
use crate::messages::{self, Locale};
use crate::supply::RemainingSupplyTracker;
use crate::ticker::TickerHandle;
use crate::view::{ClaimStatus, FaucetView};

/// Why an intent was dropped without doing anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// A connect or claim is already in flight.
    Busy,
    /// The cooldown from the previous claim has not run out.
    CoolingDown,
}

/// Result of a user intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Done(T),
    Failed(ClaimError),
    Ignored(IgnoreReason),
}

impl<T> Outcome<T> {
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }
}

struct ControllerState {
    status: ClaimStatus,
    message: Option<String>,
    busy: bool,
    cooldown: CooldownTimer,
    supply: RemainingSupplyTracker,
}

/// Orchestrates wallet connection and claim attempts.
pub struct ClaimController<P: WalletProvider> {
    session: WalletSession<P>,
    contract: FaucetContract,
    grant: TokenAmount,
    cooldown_secs: u64,
    locale: Locale,
    state: Mutex<ControllerState>,
    view_tx: watch::Sender<FaucetView>,
}

impl<P: WalletProvider> ClaimController<P> {
    /// `provider` is `None` when no wallet is installed.
    pub fn new(provider: Option<P>, config: &FaucetConfig) -> Self {
        let supply = RemainingSupplyTracker::new(config.initial_supply);
        let (view_tx, _) = watch::channel(FaucetView {
            remaining: supply.remaining(),
            ..Default::default()
        });
        Self {
            session: WalletSession::new(provider),
            contract: FaucetContract::new(config.contract_address),
            grant: config.grant_amount,
            cooldown_secs: config.cooldown_secs,
            locale: config.locale,
            state: Mutex::new(ControllerState {
                status: ClaimStatus::Idle,
                message: None,
                busy: false,
                cooldown: CooldownTimer::new(),
                supply,
            }),
            view_tx,
        }
    }

    /// Receive a [`FaucetView`] after every transition.
    pub fn subscribe(&self) -> watch::Receiver<FaucetView> {
        self.view_tx.subscribe()
    }

    /// The latest published view.
    pub fn view(&self) -> FaucetView {
        self.view_tx.borrow().clone()
    }

    pub fn session(&self) -> &WalletSession<P> {
        &self.session
    }

    /// Silently restore a previously authorized account on startup.
    pub async fn restore(&self) -> Option<Address> {
        let account = self.session.restore_if_authorized().await;
        let state = self.state.lock().await;
        self.publish(&state).await;
        account
    }

    /// Prompt the wallet for account authorization.
    pub async fn connect(&self) -> Outcome<Address> {
        {
            let mut state = self.state.lock().await;
            if state.busy {
                return Outcome::Ignored(IgnoreReason::Busy);
            }
            state.message = None;
            state.busy = true;
            state.status = ClaimStatus::AwaitingWallet;
            self.publish(&state).await;
        }

        let result = self.session.connect().await;

        let mut state = self.state.lock().await;
        state.busy = false;
        let outcome = match result {
            Ok(account) => {
                state.status = if state.cooldown.is_ready() {
                    ClaimStatus::Idle
                } else {
                    ClaimStatus::CooldownActive
                };
                Outcome::Done(account)
            }
            Err(e) => {
                let err = ClaimError::from(e);
                state.status = ClaimStatus::Failed;
                state.message = Some(err.message(self.locale, self.cooldown_secs));
                Outcome::Failed(err)
            }
        };
        self.publish(&state).await;
        outcome
    }

    /// Request one grant from the faucet.
    ///
    /// Ignored while another attempt is in flight or while the cooldown is
    /// running; neither case touches the network.
    pub async fn attempt_claim(&self) -> Outcome<Receipt> {
        let signer = {
            let mut state = self.state.lock().await;
            if state.busy {
                debug!(status = %state.status, "claim ignored: operation in flight");
                return Outcome::Ignored(IgnoreReason::Busy);
            }
            if !state.cooldown.is_ready() {
                debug!(
                    seconds_remaining = state.cooldown.seconds_remaining(),
                    "claim ignored: cooling down"
                );
                return Outcome::Ignored(IgnoreReason::CoolingDown);
            }

            state.message = None;
            let Some(signer) = self.session.signer().await else {
                let err = ClaimError::NoSignerConnected;
                state.status = ClaimStatus::Failed;
                state.message = Some(err.message(self.locale, self.cooldown_secs));
                self.publish(&state).await;
                return Outcome::Failed(err);
            };

            state.status = ClaimStatus::Submitting;
            state.busy = true;
            self.publish(&state).await;
            signer
        };

        let result = self.submit(&signer).await;

        let mut state = self.state.lock().await;
        state.busy = false;
        let outcome = match result {
            Ok(receipt) => {
                info!(tx = %receipt.tx_hash, "claim confirmed");
                state.status = ClaimStatus::Succeeded;
                state.message = Some(messages::success_text(self.locale).to_string());
                state.cooldown.start(self.cooldown_secs);
                state.supply.decrement(self.grant);
                Outcome::Done(receipt)
            }
            Err(e) => {
                let err = ClaimError::classify(&e);
                warn!(error = %e, kind = %err, "claim failed");
                if err == ClaimError::InsufficientFaucetBalance {
                    state.supply.decrement(TokenAmount::ZERO);
                }
                state.status = ClaimStatus::Failed;
                state.message = Some(err.message(self.locale, self.cooldown_secs));
                Outcome::Failed(err)
            }
        };
        self.publish(&state).await;
        outcome
    }

    /// Advance the cooldown by one second. Returns the seconds remaining.
    pub async fn tick(&self) -> u64 {
        let mut state = self.state.lock().await;
        if state.cooldown.is_ready() {
            return 0;
        }
        let left = state.cooldown.tick();
        state.status = match (state.status, left) {
            (ClaimStatus::Succeeded | ClaimStatus::CooldownActive, 0) => ClaimStatus::Idle,
            (ClaimStatus::Succeeded, _) => ClaimStatus::CooldownActive,
            (status, _) => status,
        };
        self.publish(&state).await;
        left
    }

    /// Apply an account-change notification from the provider.
    pub async fn handle_accounts_changed(&self, accounts: &[Address]) -> Option<Address> {
        let account = self.session.on_accounts_changed(accounts).await;
        let state = self.state.lock().await;
        self.publish(&state).await;
        account
    }

    async fn submit(&self, signer: &P::Signer) -> Result<Receipt, ProviderError> {
        let pending = self.contract.request_tokens(signer).await?;
        let hash: TxHash = pending.hash();
        debug!(tx = %hash, "claim submitted, awaiting confirmation");
        pending.wait().await
    }

    async fn publish(&self, state: &ControllerState) {
        let view = FaucetView {
            account: self.session.account().await,
            status: state.status,
            message: state.message.clone(),
            busy: state.busy,
            seconds_remaining: state.cooldown.seconds_remaining(),
            remaining: state.supply.remaining(),
        };
        self.view_tx.send_replace(view);
    }
}

impl<P: WalletProvider> ClaimController<P> {
    /// Start the once-per-second cooldown driver. Dropping the handle stops it.
    pub fn spawn_ticker(self: &Arc<Self>) -> TickerHandle {
        TickerHandle::spawn(Arc::clone(self))
    }

    /// Forward the provider's account-change events into the session.
    ///
    /// Returns `None` when no provider is present.
    pub fn spawn_account_listener(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        let mut rx = self.session.account_events()?;
        let this = Arc::clone(self);
        Some(tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(accounts) => {
                        this.handle_accounts_changed(&accounts).await;
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "account events lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }))
    }
}
