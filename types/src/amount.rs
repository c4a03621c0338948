//! Whole-token amounts.
//!
//! The faucet reasons about tokens in whole units (a grant is 50 WYC), not in
//! the 18-decimal base units the ERC-20 contract uses internally.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A non-negative count of whole tokens.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TokenAmount(u64);

impl TokenAmount {
    pub const ZERO: Self = Self(0);

    pub const fn new(tokens: u64) -> Self {
        Self(tokens)
    }

    pub fn tokens(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TokenAmount {
    fn from(tokens: u64) -> Self {
        Self(tokens)
    }
}
