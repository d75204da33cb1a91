use dashlet_application::services::{CheckOutcome, ConfigWatcher};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Drives [`ConfigWatcher::check`] on a fixed interval.
///
/// The first check runs immediately. A check still running when the next
/// tick fires makes that tick a no-op. Cancelling the token drops any
/// in-flight check and stops the watcher.
pub struct ConfigWatchJob {
    watcher: Arc<ConfigWatcher>,
    interval_ms: u64,
    shutdown: CancellationToken,
}

impl ConfigWatchJob {
    pub fn new(watcher: Arc<ConfigWatcher>) -> Self {
        Self {
            watcher,
            interval_ms: 5000,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_interval_ms(mut self, interval_ms: u64) -> Self {
        self.interval_ms = interval_ms.max(1);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub async fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        info!(
            interval_ms = self.interval_ms,
            source = %self.watcher.source_description(),
            "Starting config watch job"
        );
        self.watcher.start();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_millis(self.interval_ms));
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => break,
                    _ = interval.tick() => {
                        tokio::select! {
                            _ = self.shutdown.cancelled() => break,
                            outcome = self.watcher.check() => {
                                if outcome == CheckOutcome::Applied {
                                    info!("ConfigWatchJob: external config change applied");
                                } else {
                                    debug!(outcome = ?outcome, "ConfigWatchJob: check finished");
                                }
                            }
                        }
                    }
                }
            }

            self.watcher.stop();
            info!("ConfigWatchJob: shutting down");
        })
    }
}
