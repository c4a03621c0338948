//! Fundamental types for the WYC faucet client.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! account addresses, transaction hashes, token amounts and the chain identifier.

pub mod address;
pub mod amount;
pub mod error;
pub mod hash;
pub mod network;

pub use address::Address;
pub use amount::TokenAmount;
pub use error::TypesError;
pub use hash::TxHash;
pub use network::ChainId;
