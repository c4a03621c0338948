//! The faucet contract binding.

use faucet_types::Address;

use crate::error::ProviderError;
use crate::provider::{TransactionRequest, TransactionSigner};

/// First four bytes of `keccak256("requestTokens()")`.
pub const REQUEST_TOKENS_SELECTOR: [u8; 4] = [0x35, 0x9c, 0xf2, 0xb7];

/// Selector of the standard `Error(string)` revert payload.
const ERROR_STRING_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];

/// The deployed faucet contract. It exposes one state-mutating call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaucetContract {
    address: Address,
}

impl FaucetContract {
    pub fn new(address: Address) -> Self {
        Self { address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Build the `requestTokens()` call for `from`.
    pub fn request_tokens_tx(&self, from: Address) -> TransactionRequest {
        TransactionRequest {
            from,
            to: self.address,
            data: format!("0x{}", hex::encode(REQUEST_TOKENS_SELECTOR)),
        }
    }

    /// Submit `requestTokens()` through `signer`.
    pub async fn request_tokens<S: TransactionSigner>(
        &self,
        signer: &S,
    ) -> Result<S::Pending, ProviderError> {
        signer
            .send_transaction(self.request_tokens_tx(signer.account()))
            .await
    }
}

/// Decode an ABI `Error(string)` revert payload into its reason text.
pub fn decode_revert_reason(data: &str) -> Option<String> {
    let bytes = hex::decode(data.strip_prefix("0x").unwrap_or(data)).ok()?;
    if bytes.len() < 4 + 64 || bytes[..4] != ERROR_STRING_SELECTOR {
        return None;
    }
    let body = &bytes[4..];
    // offset word, then length word, then the utf-8 payload
    if body[32..56].iter().any(|&b| b != 0) {
        return None;
    }
    let len = usize::try_from(u64::from_be_bytes(body[56..64].try_into().ok()?)).ok()?;
    let text = body.get(64..64usize.checked_add(len)?)?;
    String::from_utf8(text.to_vec()).ok()
}
