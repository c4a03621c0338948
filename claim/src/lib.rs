//! Claim lifecycle for the WYC faucet.
//!
//! The controller is the only stateful part of the client:
//! - Acquires a wallet session (prompted connect or silent restore)
//! - Gates claims on the local cooldown and on at-most-one in flight
//! - Submits `requestTokens()` and awaits confirmation
//! - Classifies failures into user-facing [`ClaimError`] kinds
//! - Keeps a local estimate of the tokens left in the faucet
//!
//! Rendering layers read [`FaucetView`] snapshots from a watch channel and
//! send intents back through the controller's methods.

pub mod config;
pub mod controller;
pub mod cooldown;
pub mod error;
pub mod messages;
pub mod supply;
pub mod ticker;
pub mod view;

pub use config::FaucetConfig;
pub use controller::{ClaimController, IgnoreReason, Outcome};
pub use cooldown::CooldownTimer;
pub use error::{ClaimError, ConfigError};
pub use messages::Locale;
pub use supply::RemainingSupplyTracker;
pub use ticker::TickerHandle;
pub use view::{ClaimStatus, FaucetView};
