//! Chain identifier.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An EIP-155 chain id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(u64);

impl ChainId {
    /// The Sepolia test network, where the faucet contract is deployed.
    pub const SEPOLIA: Self = Self(11_155_111);

    /// Parse the `0x`-prefixed quantity returned by `eth_chainId`.
    pub fn from_hex_quantity(raw: &str) -> Option<Self> {
        let digits = raw.strip_prefix("0x")?;
        u64::from_str_radix(digits, 16).ok().map(Self)
    }

    /// Human-readable name for the networks we know about.
    pub fn name(&self) -> &'static str {
        match self.0 {
            1 => "mainnet",
            11_155_111 => "sepolia",
            17_000 => "holesky",
            31_337 => "anvil",
            _ => "unknown",
        }
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0, self.name())
    }
}
