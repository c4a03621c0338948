//! Once-per-second cooldown driver.
//!
//! The task parks on the view channel while no cooldown is running and only
//! ticks while `seconds_remaining > 0`. Dropping the [`TickerHandle`] aborts
//! it, so tearing down the controller never leaves a recurring timer behind.

use std::sync::Arc;
use std::time::Duration;

use faucet_wallet::WalletProvider;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

use crate::controller::ClaimController;

const TICK: Duration = Duration::from_secs(1);

/// Owns the running ticker task.
pub struct TickerHandle {
    task: JoinHandle<()>,
}

impl TickerHandle {
    pub(crate) fn spawn<P: WalletProvider>(controller: Arc<ClaimController<P>>) -> Self {
        let mut views = controller.subscribe();
        let task = tokio::spawn(async move {
            loop {
                let cooling = views.borrow_and_update().seconds_remaining > 0;
                if !cooling {
                    if views.changed().await.is_err() {
                        break;
                    }
                    continue;
                }
                let mut interval = interval_at(Instant::now() + TICK, TICK);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    interval.tick().await;
                    if controller.tick().await == 0 {
                        break;
                    }
                }
                debug!("cooldown finished");
            }
        });
        Self { task }
    }

    /// Stop ticking now.
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
