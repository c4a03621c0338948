//! Nullable wallet provider — scripted accounts and transaction outcomes.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use faucet_types::{Address, TxHash};
use faucet_wallet::{
    PendingTransaction, ProviderError, Receipt, TransactionRequest, TransactionSigner,
    WalletProvider,
};
use tokio::sync::{broadcast, Semaphore};

/// How the next submitted transaction should play out.
#[derive(Debug, Clone)]
pub enum ClaimScript {
    /// Broadcast succeeds and the transaction confirms.
    Confirm,
    /// The provider refuses to broadcast (e.g. gas estimation fails).
    RejectSubmit(ProviderError),
    /// Broadcast succeeds but confirmation reports a failure.
    FailConfirmation(ProviderError),
}

struct State {
    connect_result: Result<Vec<Address>, ProviderError>,
    list_result: Result<Vec<Address>, ProviderError>,
    scripts: VecDeque<ClaimScript>,
    submitted: Vec<TransactionRequest>,
    prompts: usize,
}

/// A test wallet provider. Clones share state.
#[derive(Clone)]
pub struct NullWallet {
    state: Arc<Mutex<State>>,
    events: broadcast::Sender<Vec<Address>>,
    gate: Arc<Semaphore>,
    hold: Arc<Mutex<bool>>,
}

impl NullWallet {
    /// A wallet with no authorized accounts that approves nothing.
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            state: Arc::new(Mutex::new(State {
                connect_result: Ok(Vec::new()),
                list_result: Ok(Vec::new()),
                scripts: VecDeque::new(),
                submitted: Vec::new(),
                prompts: 0,
            })),
            events,
            gate: Arc::new(Semaphore::new(0)),
            hold: Arc::new(Mutex::new(false)),
        }
    }

    /// The user will approve the connection prompt with `accounts`.
    pub fn approve_with(&self, accounts: Vec<Address>) {
        self.state.lock().unwrap().connect_result = Ok(accounts);
    }

    /// The user will decline the connection prompt.
    pub fn reject_connect(&self) {
        self.state.lock().unwrap().connect_result = Err(ProviderError::user_rejected());
    }

    /// Accounts already authorized before the page loaded.
    pub fn set_authorized(&self, accounts: Vec<Address>) {
        self.state.lock().unwrap().list_result = Ok(accounts);
    }

    /// Make the silent account listing fail.
    pub fn fail_list_accounts(&self, message: &str) {
        self.state.lock().unwrap().list_result = Err(ProviderError::transport(message));
    }

    /// Queue the outcome of the next submission. Unscripted submissions confirm.
    pub fn script(&self, script: ClaimScript) {
        self.state.lock().unwrap().scripts.push_back(script);
    }

    /// Keep confirmations pending until [`NullWallet::release_confirmation`].
    pub fn hold_confirmations(&self) {
        *self.hold.lock().unwrap() = true;
    }

    /// Let one held confirmation complete.
    pub fn release_confirmation(&self) {
        self.gate.add_permits(1);
    }

    /// Simulate the user switching or disconnecting accounts in the wallet UI.
    pub fn emit_accounts(&self, accounts: Vec<Address>) -> usize {
        self.events.send(accounts).unwrap_or(0)
    }

    /// Number of connection prompts shown.
    pub fn prompts(&self) -> usize {
        self.state.lock().unwrap().prompts
    }

    /// Transactions handed to a signer, in order.
    pub fn submitted(&self) -> Vec<TransactionRequest> {
        self.state.lock().unwrap().submitted.clone()
    }
}

impl Default for NullWallet {
    fn default() -> Self {
        Self::new()
    }
}

impl WalletProvider for NullWallet {
    type Signer = NullSigner;

    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        let mut state = self.state.lock().unwrap();
        state.prompts += 1;
        let result = state.connect_result.clone();
        if let Ok(accounts) = &result {
            state.list_result = Ok(accounts.clone());
        }
        result
    }

    async fn list_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        self.state.lock().unwrap().list_result.clone()
    }

    fn signer_for(&self, account: Address) -> Result<NullSigner, ProviderError> {
        Ok(NullSigner {
            wallet: self.clone(),
            account,
        })
    }

    fn account_events(&self) -> broadcast::Receiver<Vec<Address>> {
        self.events.subscribe()
    }
}

/// Signer handed out by [`NullWallet`].
#[derive(Clone)]
pub struct NullSigner {
    wallet: NullWallet,
    account: Address,
}

impl TransactionSigner for NullSigner {
    type Pending = NullPending;

    fn account(&self) -> Address {
        self.account
    }

    async fn send_transaction(
        &self,
        request: TransactionRequest,
    ) -> Result<NullPending, ProviderError> {
        let (script, nonce) = {
            let mut state = self.wallet.state.lock().unwrap();
            state.submitted.push(request);
            let script = state.scripts.pop_front().unwrap_or(ClaimScript::Confirm);
            (script, state.submitted.len())
        };

        let outcome = match script {
            ClaimScript::RejectSubmit(err) => return Err(err),
            ClaimScript::FailConfirmation(err) => Err(err),
            ClaimScript::Confirm => Ok(()),
        };

        let mut hash = [0u8; 32];
        hash[24..].copy_from_slice(&(nonce as u64).to_be_bytes());
        let gated = *self.wallet.hold.lock().unwrap();
        Ok(NullPending {
            hash: TxHash::new(hash),
            outcome,
            gate: gated.then(|| Arc::clone(&self.wallet.gate)),
        })
    }
}

/// Pending transaction handed out by [`NullSigner`].
pub struct NullPending {
    hash: TxHash,
    outcome: Result<(), ProviderError>,
    gate: Option<Arc<Semaphore>>,
}

impl PendingTransaction for NullPending {
    fn hash(&self) -> TxHash {
        self.hash
    }

    async fn wait(self) -> Result<Receipt, ProviderError> {
        if let Some(gate) = &self.gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }
        self.outcome.map(|()| Receipt {
            tx_hash: self.hash,
            block_number: Some(1),
        })
    }
}
