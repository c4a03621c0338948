//! Local claim cooldown in whole seconds.
//!
//! This is a client-side estimate only. A page reload starts from zero even
//! if the contract still considers the account rate limited.

/// Countdown that gates claim eligibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CooldownTimer {
    seconds_remaining: u64,
}

impl CooldownTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a cooldown window. Claims are disabled until it runs out.
    pub fn start(&mut self, window_secs: u64) {
        self.seconds_remaining = window_secs;
    }

    /// Advance by one second. Returns the seconds still remaining.
    pub fn tick(&mut self) -> u64 {
        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        self.seconds_remaining
    }

    pub fn seconds_remaining(&self) -> u64 {
        self.seconds_remaining
    }

    /// Whether a claim is currently permitted.
    pub fn is_ready(&self) -> bool {
        self.seconds_remaining == 0
    }
}
