//! Nullable infrastructure for deterministic testing.
//!
//! The wallet provider and the chain behind it are abstracted behind the
//! `faucet-wallet` traits. This crate provides a test-friendly provider that:
//! - Returns scripted accounts and transaction outcomes
//! - Records every prompt and submitted transaction for assertions
//! - Can hold confirmations until the test releases them
//! - Never touches the network
//!
//! Usage: hand a `NullWallet` to the session or controller instead of a real
//! provider, keep a clone to script and inspect it.

pub mod wallet;

pub use wallet::{ClaimScript, NullPending, NullSigner, NullWallet};
