//! Shared utilities for the WYC faucet client.

pub mod format;
pub mod logging;

pub use format::format_thousands;
pub use logging::{init_logging, LogFormat};
