//! Wallet provider speaking EIP-1193 methods over HTTP JSON-RPC.
//!
//! Desktop wallets and local signers (Frame, a node with unlocked accounts,
//! a dev chain) expose the same request surface a browser extension injects:
//! `eth_requestAccounts`, `eth_accounts`, `eth_sendTransaction`. The wallet
//! signs; this client only forwards requests and polls for receipts.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use faucet_types::{Address, ChainId, TxHash};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::contract::decode_revert_reason;
use crate::error::{ErrorCode, ProviderError};
use crate::provider::{
    PendingTransaction, Receipt, TransactionRequest, TransactionSigner, WalletProvider,
};

/// Default timeout for a single JSON-RPC request.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Capacity of the account-change broadcast channel.
const ACCOUNT_EVENT_CAPACITY: usize = 16;

/// Tunables for [`JsonRpcWallet`].
#[derive(Debug, Clone)]
pub struct RpcOptions {
    /// Interval between `eth_getTransactionReceipt` polls.
    pub receipt_poll: Duration,
    /// Give up waiting for a receipt after this long.
    pub confirmation_timeout: Duration,
}

impl Default for RpcOptions {
    fn default() -> Self {
        Self {
            receipt_poll: Duration::from_secs(1),
            confirmation_timeout: Duration::from_secs(300),
        }
    }
}

struct RpcInner {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
    options: RpcOptions,
    account_tx: broadcast::Sender<Vec<Address>>,
}

/// HTTP JSON-RPC wallet provider.
#[derive(Clone)]
pub struct JsonRpcWallet {
    inner: Arc<RpcInner>,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

impl RpcErrorObject {
    /// Fold a revert payload in `data` into the message so callers can match
    /// on the contract's reason string.
    fn into_provider_error(self) -> ProviderError {
        let reason = self
            .data
            .as_ref()
            .and_then(Value::as_str)
            .and_then(decode_revert_reason);
        let message = match reason {
            Some(reason) if !self.message.contains(&reason) => {
                format!("{}: {reason}", self.message)
            }
            _ => self.message,
        };
        ProviderError::new(ErrorCode::from_rpc_code(self.code), message)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReceipt {
    transaction_hash: String,
    #[serde(default)]
    block_number: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

impl JsonRpcWallet {
    pub fn new(url: impl Into<String>, options: RpcOptions) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .map_err(|e| ProviderError::transport(format!("failed to create HTTP client: {e}")))?;
        let (account_tx, _) = broadcast::channel(ACCOUNT_EVENT_CAPACITY);
        Ok(Self {
            inner: Arc::new(RpcInner {
                http,
                url: url.into(),
                next_id: AtomicU64::new(1),
                options,
                account_tx,
            }),
        })
    }

    /// Probe `url` for a wallet. Returns `None` when nothing answers, which
    /// the session reports as "no provider installed".
    pub async fn detect(url: &str, options: RpcOptions) -> Option<(Self, ChainId)> {
        let wallet = match Self::new(url, options) {
            Ok(wallet) => wallet,
            Err(e) => {
                warn!(error = %e, "wallet client setup failed");
                return None;
            }
        };
        match wallet.chain_id().await {
            Ok(chain) => Some((wallet, chain)),
            Err(e) => {
                debug!(url, error = %e, "no wallet provider answered");
                None
            }
        }
    }

    pub async fn chain_id(&self) -> Result<ChainId, ProviderError> {
        let value = self.inner.call("eth_chainId", json!([])).await?;
        value
            .as_str()
            .and_then(ChainId::from_hex_quantity)
            .ok_or_else(|| ProviderError::transport(format!("invalid eth_chainId result: {value}")))
    }

    /// Poll `eth_accounts` and publish changes on the account-event channel.
    ///
    /// HTTP has no push channel, so this stands in for the provider's
    /// `accountsChanged` event. Abort the handle to stop watching.
    pub fn watch_accounts(&self, every: Duration) -> JoinHandle<()> {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut last: Option<Vec<Address>> = None;
            loop {
                interval.tick().await;
                let accounts = match inner.accounts("eth_accounts").await {
                    Ok(accounts) => accounts,
                    Err(e) => {
                        debug!(error = %e, "account poll failed");
                        continue;
                    }
                };
                if last.as_ref() != Some(&accounts) {
                    if last.is_some() {
                        let _ = inner.account_tx.send(accounts.clone());
                    }
                    last = Some(accounts);
                }
            }
        })
    }
}

impl RpcInner {
    async fn call(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        let response = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::transport(format!("{method} request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(ProviderError::transport(format!(
                "{method}: wallet returned HTTP {}",
                response.status()
            )));
        }

        let parsed: RpcResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::transport(format!("{method}: invalid JSON response: {e}")))?;

        if let Some(err) = parsed.error {
            return Err(err.into_provider_error());
        }
        Ok(parsed.result.unwrap_or(Value::Null))
    }

    async fn accounts(&self, method: &str) -> Result<Vec<Address>, ProviderError> {
        let value = self.call(method, json!([])).await?;
        serde_json::from_value(value)
            .map_err(|e| ProviderError::transport(format!("{method}: invalid account list: {e}")))
    }
}

impl WalletProvider for JsonRpcWallet {
    type Signer = RpcSigner;

    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        self.inner.accounts("eth_requestAccounts").await
    }

    async fn list_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        self.inner.accounts("eth_accounts").await
    }

    fn signer_for(&self, account: Address) -> Result<RpcSigner, ProviderError> {
        Ok(RpcSigner {
            inner: Arc::clone(&self.inner),
            account,
        })
    }

    fn account_events(&self) -> broadcast::Receiver<Vec<Address>> {
        self.inner.account_tx.subscribe()
    }
}

/// Signer that delegates signing to the wallet behind the endpoint.
#[derive(Clone)]
pub struct RpcSigner {
    inner: Arc<RpcInner>,
    account: Address,
}

impl TransactionSigner for RpcSigner {
    type Pending = RpcPendingTransaction;

    fn account(&self) -> Address {
        self.account
    }

    async fn send_transaction(
        &self,
        request: TransactionRequest,
    ) -> Result<RpcPendingTransaction, ProviderError> {
        let tx = serde_json::to_value(&request)
            .map_err(|e| ProviderError::transport(format!("unencodable transaction: {e}")))?;

        // A failed estimate means the call would revert; surface it before
        // the wallet prompts for a signature.
        let gas = self
            .inner
            .call("eth_estimateGas", json!([tx]))
            .await
            .map_err(|e| match e.code {
                ErrorCode::Transport => e,
                _ => ProviderError::new(
                    ErrorCode::UnpredictableGasLimit,
                    format!("cannot estimate gas; transaction may fail: {}", e.message),
                ),
            })?;

        let mut tx = tx;
        if let Some(obj) = tx.as_object_mut() {
            obj.insert("gas".into(), gas);
        }

        let value = self.inner.call("eth_sendTransaction", json!([tx])).await?;
        let hash = value
            .as_str()
            .and_then(|s| TxHash::parse(s).ok())
            .ok_or_else(|| {
                ProviderError::transport(format!("invalid eth_sendTransaction result: {value}"))
            })?;
        debug!(%hash, from = %self.account, "transaction broadcast");

        Ok(RpcPendingTransaction {
            inner: Arc::clone(&self.inner),
            hash,
        })
    }
}

/// A broadcast transaction awaiting its receipt.
pub struct RpcPendingTransaction {
    inner: Arc<RpcInner>,
    hash: TxHash,
}

impl RpcPendingTransaction {
    async fn poll_receipt(&self) -> Result<Receipt, ProviderError> {
        let mut interval = tokio::time::interval(self.inner.options.receipt_poll);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            let value = self
                .inner
                .call("eth_getTransactionReceipt", json!([self.hash.to_string()]))
                .await?;
            if value.is_null() {
                continue;
            }
            let raw: RawReceipt = serde_json::from_value(value)
                .map_err(|e| ProviderError::transport(format!("invalid receipt: {e}")))?;
            return raw.into_receipt();
        }
    }
}

impl RawReceipt {
    fn into_receipt(self) -> Result<Receipt, ProviderError> {
        if self.status.as_deref() == Some("0x0") {
            return Err(ProviderError::new(
                ErrorCode::Reverted,
                format!("transaction {} reverted", self.transaction_hash),
            ));
        }
        let tx_hash = TxHash::parse(&self.transaction_hash)
            .map_err(|e| ProviderError::transport(format!("invalid receipt hash: {e}")))?;
        let block_number = self
            .block_number
            .as_deref()
            .and_then(|b| b.strip_prefix("0x"))
            .and_then(|b| u64::from_str_radix(b, 16).ok());
        Ok(Receipt {
            tx_hash,
            block_number,
        })
    }
}

impl PendingTransaction for RpcPendingTransaction {
    fn hash(&self) -> TxHash {
        self.hash
    }

    async fn wait(self) -> Result<Receipt, ProviderError> {
        let timeout = self.inner.options.confirmation_timeout;
        match tokio::time::timeout(timeout, self.poll_receipt()).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::new(
                ErrorCode::Timeout,
                format!(
                    "transaction {} not confirmed after {}s",
                    self.hash,
                    timeout.as_secs()
                ),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    use axum::extract::State;
    use axum::routing::post;
    use axum::{Json, Router};

    // Error("You must wait")
    const YOU_MUST_WAIT: &str = "0x08c379a0\
        0000000000000000000000000000000000000000000000000000000000000020\
        000000000000000000000000000000000000000000000000000000000000000d\
        596f75206d757374207761697400000000000000000000000000000000000000";

    type Reply = Result<Value, Value>;

    /// In-process JSON-RPC endpoint answering through a handler closure.
    #[derive(Clone)]
    struct FakeEndpoint {
        handler: Arc<dyn Fn(&str, &Value) -> Reply + Send + Sync>,
        calls: Arc<Mutex<Vec<(String, Value)>>>,
    }

    impl FakeEndpoint {
        fn params_of(&self, method: &str) -> Vec<Value> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|(m, _)| m == method)
                .map(|(_, params)| params.clone())
                .collect()
        }
    }

    async fn handle(State(endpoint): State<FakeEndpoint>, Json(req): Json<Value>) -> Json<Value> {
        let method = req["method"].as_str().unwrap_or_default().to_owned();
        let params = req["params"].clone();
        let reply = (endpoint.handler)(&method, &params);
        endpoint.calls.lock().unwrap().push((method, params));
        let mut body = json!({ "jsonrpc": "2.0", "id": req["id"] });
        match reply {
            Ok(result) => body["result"] = result,
            Err(error) => body["error"] = error,
        }
        Json(body)
    }

    async fn serve(
        handler: impl Fn(&str, &Value) -> Reply + Send + Sync + 'static,
    ) -> (String, FakeEndpoint) {
        let endpoint = FakeEndpoint {
            handler: Arc::new(handler),
            calls: Arc::default(),
        };
        let app = Router::new()
            .route("/", post(handle))
            .with_state(endpoint.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/", listener.local_addr().unwrap());
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        (url, endpoint)
    }

    fn fast_options() -> RpcOptions {
        RpcOptions {
            receipt_poll: Duration::from_millis(10),
            confirmation_timeout: Duration::from_secs(5),
        }
    }

    fn signer_at(url: &str) -> RpcSigner {
        JsonRpcWallet::new(url, fast_options())
            .unwrap()
            .signer_for(Address::new([0x11; 20]))
            .unwrap()
    }

    fn faucet_call() -> TransactionRequest {
        TransactionRequest {
            from: Address::new([0x11; 20]),
            to: Address::new([0x2b; 20]),
            data: "0x359cf2b7".into(),
        }
    }

    async fn send(signer: &RpcSigner) -> Result<RpcPendingTransaction, ProviderError> {
        signer.send_transaction(faucet_call()).await
    }

    fn tx_hash_hex() -> String {
        format!("0x{}", "cd".repeat(32))
    }

    #[test]
    fn rpc_error_codes_map_to_eip1193() {
        assert_eq!(ErrorCode::from_rpc_code(4001), ErrorCode::UserRejected);
        assert_eq!(ErrorCode::from_rpc_code(4100), ErrorCode::Unauthorized);
        assert_eq!(ErrorCode::from_rpc_code(-32000), ErrorCode::Rpc(-32000));
    }

    #[test]
    fn revert_data_is_folded_into_message() {
        let err = RpcErrorObject {
            code: 3,
            message: "execution reverted".into(),
            data: Some(Value::String(YOU_MUST_WAIT.into())),
        }
        .into_provider_error();
        assert_eq!(err.message, "execution reverted: You must wait");
        assert_eq!(err.code, ErrorCode::Rpc(3));
    }

    #[test]
    fn reason_already_in_message_is_not_repeated() {
        let err = RpcErrorObject {
            code: -32000,
            message: "execution reverted: You must wait".into(),
            data: None,
        }
        .into_provider_error();
        assert_eq!(err.message, "execution reverted: You must wait");
    }

    #[test]
    fn reverted_receipt_is_an_error() {
        let raw = RawReceipt {
            transaction_hash: format!("0x{}", "ab".repeat(32)),
            block_number: Some("0x10".into()),
            status: Some("0x0".into()),
        };
        assert_eq!(raw.into_receipt().unwrap_err().code, ErrorCode::Reverted);
    }

    #[test]
    fn successful_receipt_parses_block_number() {
        let raw = RawReceipt {
            transaction_hash: format!("0x{}", "ab".repeat(32)),
            block_number: Some("0x10".into()),
            status: Some("0x1".into()),
        };
        let receipt = raw.into_receipt().unwrap();
        assert_eq!(receipt.block_number, Some(16));
        assert_eq!(receipt.tx_hash, TxHash::new([0xab; 32]));
    }

    #[tokio::test]
    async fn failed_estimate_becomes_unpredictable_gas_limit() {
        let (url, endpoint) = serve(|method, _| match method {
            "eth_estimateGas" => Err(json!({
                "code": 3,
                "message": "execution reverted",
                "data": YOU_MUST_WAIT,
            })),
            _ => Ok(Value::Null),
        })
        .await;

        let Err(err) = send(&signer_at(&url)).await else {
            panic!("estimate failure must not broadcast");
        };
        assert_eq!(err.code, ErrorCode::UnpredictableGasLimit);
        assert!(err.message.starts_with("cannot estimate gas"));
        assert!(err.message.contains("You must wait"));
        assert!(endpoint.params_of("eth_sendTransaction").is_empty());
    }

    #[tokio::test]
    async fn unreachable_endpoint_stays_a_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/", listener.local_addr().unwrap());
        drop(listener);

        let Err(err) = send(&signer_at(&url)).await else {
            panic!("nothing is listening");
        };
        assert_eq!(err.code, ErrorCode::Transport);
        assert!(!err.message.contains("cannot estimate gas"));
    }

    #[tokio::test]
    async fn send_attaches_gas_and_parses_hash() {
        let hash = tx_hash_hex();
        let reply = hash.clone();
        let (url, endpoint) = serve(move |method, _| match method {
            "eth_estimateGas" => Ok(json!("0x5208")),
            "eth_sendTransaction" => Ok(Value::String(reply.clone())),
            _ => Ok(Value::Null),
        })
        .await;

        let Ok(pending) = send(&signer_at(&url)).await else {
            panic!("send should succeed");
        };
        assert_eq!(pending.hash(), TxHash::parse(&hash).unwrap());

        let sent = endpoint.params_of("eth_sendTransaction");
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0][0]["gas"], "0x5208");
        assert_eq!(sent[0][0]["data"], "0x359cf2b7");
        assert_eq!(sent[0][0]["from"], Address::new([0x11; 20]).to_string());
    }

    #[tokio::test]
    async fn malformed_send_result_is_rejected() {
        let (url, _endpoint) = serve(|method, _| match method {
            "eth_estimateGas" => Ok(json!("0x5208")),
            "eth_sendTransaction" => Ok(json!(42)),
            _ => Ok(Value::Null),
        })
        .await;

        let Err(err) = send(&signer_at(&url)).await else {
            panic!("42 is not a transaction hash");
        };
        assert_eq!(err.code, ErrorCode::Transport);
        assert!(err.message.contains("eth_sendTransaction"));
    }

    #[tokio::test]
    async fn receipt_polling_waits_through_null() {
        let polls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&polls);
        let hash = tx_hash_hex();
        let (url, _endpoint) = serve(move |method, _| match method {
            "eth_estimateGas" => Ok(json!("0x5208")),
            "eth_sendTransaction" => Ok(Value::String(hash.clone())),
            "eth_getTransactionReceipt" if seen.fetch_add(1, Ordering::SeqCst) < 2 => {
                Ok(Value::Null)
            }
            "eth_getTransactionReceipt" => Ok(json!({
                "transactionHash": hash.clone(),
                "blockNumber": "0x2a",
                "status": "0x1",
            })),
            _ => Ok(Value::Null),
        })
        .await;

        let Ok(pending) = send(&signer_at(&url)).await else {
            panic!("send should succeed");
        };
        let receipt = pending.wait().await.unwrap();
        assert_eq!(receipt.tx_hash, TxHash::new([0xcd; 32]));
        assert_eq!(receipt.block_number, Some(42));
        assert_eq!(polls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn unconfirmed_transaction_times_out() {
        let (url, endpoint) = serve(|_, _| Ok(Value::Null)).await;
        let wallet = JsonRpcWallet::new(
            &url,
            RpcOptions {
                receipt_poll: Duration::from_secs(1),
                confirmation_timeout: Duration::from_secs(5),
            },
        )
        .unwrap();
        let pending = RpcPendingTransaction {
            inner: Arc::clone(&wallet.inner),
            hash: TxHash::new([0xcd; 32]),
        };

        let err = pending.wait().await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Timeout);
        assert!(err.message.contains("not confirmed after 5s"));
        assert!(endpoint.params_of("eth_sendTransaction").is_empty());
    }

    #[tokio::test]
    async fn account_watcher_publishes_changes_only() {
        let a = Address::new([0xa1; 20]);
        let b = Address::new([0xb2; 20]);
        let queue = Mutex::new(VecDeque::from(vec![
            vec![a],
            vec![a],
            vec![b],
            vec![b],
            vec![],
        ]));
        let (url, _endpoint) = serve(move |method, _| {
            if method != "eth_accounts" {
                return Ok(Value::Null);
            }
            let mut queue = queue.lock().unwrap();
            let accounts = if queue.len() > 1 {
                queue.pop_front().unwrap()
            } else {
                queue[0].clone()
            };
            Ok(json!(accounts))
        })
        .await;

        let wallet = JsonRpcWallet::new(&url, fast_options()).unwrap();
        let mut events = wallet.account_events();
        let watcher = wallet.watch_accounts(Duration::from_millis(10));

        let within = Duration::from_secs(5);
        let switched = tokio::time::timeout(within, events.recv()).await.unwrap().unwrap();
        assert_eq!(switched, vec![b]);
        let cleared = tokio::time::timeout(within, events.recv()).await.unwrap().unwrap();
        assert!(cleared.is_empty());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(matches!(
            events.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
        watcher.abort();
    }
}
