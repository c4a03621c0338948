//! Remaining-supply estimate.

use faucet_types::TokenAmount;
use tracing::debug;

/// Locally estimated count of tokens left in the faucet.
///
/// Never reads the contract balance, so it can drift from the real value.
/// Monotonically non-increasing, floored at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemainingSupplyTracker {
    remaining: TokenAmount,
}

impl RemainingSupplyTracker {
    pub fn new(initial: TokenAmount) -> Self {
        Self { remaining: initial }
    }

    pub fn remaining(&self) -> TokenAmount {
        self.remaining
    }

    /// Subtract `amount`, saturating at zero. A zero amount marks a depleted
    /// faucet without changing the estimate.
    pub fn decrement(&mut self, amount: TokenAmount) -> TokenAmount {
        let before = self.remaining;
        self.remaining = before.saturating_sub(amount);
        debug!(
            amount = amount.tokens(),
            before = before.tokens(),
            after = self.remaining.tokens(),
            "remaining supply estimate updated"
        );
        self.remaining
    }
}
