//! Read-only state snapshot for the rendering layer.

use faucet_types::{Address, TokenAmount};
use serde::Serialize;
use std::fmt;

use crate::messages::{self, Locale};

/// Where the claim lifecycle currently stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    #[default]
    Idle,
    /// A connection prompt is open in the wallet.
    AwaitingWallet,
    /// `requestTokens()` has been sent and awaits confirmation.
    Submitting,
    /// A claim confirmed and the cooldown is counting down.
    CooldownActive,
    Failed,
    /// A claim just confirmed.
    Succeeded,
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::AwaitingWallet => "awaiting wallet",
            Self::Submitting => "submitting",
            Self::CooldownActive => "cooldown",
            Self::Failed => "failed",
            Self::Succeeded => "succeeded",
        };
        f.write_str(s)
    }
}

/// Everything the rendering layer needs, published after every transition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FaucetView {
    pub account: Option<Address>,
    pub status: ClaimStatus,
    pub message: Option<String>,
    /// A wallet or network operation is pending; show a busy indicator.
    pub busy: bool,
    pub seconds_remaining: u64,
    pub remaining: TokenAmount,
}

impl FaucetView {
    /// Whether the claim control should be offered and enabled.
    pub fn can_claim(&self) -> bool {
        self.account.is_some() && self.seconds_remaining == 0 && !self.busy
    }

    /// Whether `message` reports a failure rather than a success.
    pub fn is_error(&self) -> bool {
        self.status == ClaimStatus::Failed
    }

    /// Text of the claim button.
    pub fn claim_label(&self, locale: Locale, grant: TokenAmount, symbol: &str) -> String {
        if self.busy {
            messages::busy_label(locale).to_string()
        } else if self.seconds_remaining > 0 {
            messages::wait_label(locale, self.seconds_remaining)
        } else {
            messages::claim_label(locale, grant.tokens(), symbol)
        }
    }

    /// Text of the connect button.
    pub fn connect_label(&self, locale: Locale) -> String {
        match &self.account {
            Some(account) => messages::connected_label(locale, &account.short()),
            None => messages::connect_label(locale).to_string(),
        }
    }
}
