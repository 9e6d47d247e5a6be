//! Cancellable repeating fetch
//!
//! Admin live views re-run the same fetch on a fixed interval. A [`Poller`]
//! owns the background task and its [`CancellationToken`].

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Shortest accepted polling interval
pub const MIN_INTERVAL: Duration = Duration::from_millis(100);

/// Background task re-running a fetch until cancelled
#[derive(Debug)]
pub struct Poller {
    name: &'static str,
    shutdown: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl Poller {
    /// Spawn a poller. The first run happens immediately; errors are logged
    /// and polling continues. Intervals below [`MIN_INTERVAL`] are raised to it.
    pub fn spawn<F, Fut, E>(name: &'static str, interval: Duration, mut task: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        if interval < MIN_INTERVAL {
            tracing::warn!(
                poller = name,
                ?interval,
                min = ?MIN_INTERVAL,
                "Poll interval too short, clamping"
            );
        }
        let interval = interval.max(MIN_INTERVAL);
        let shutdown = CancellationToken::new();
        let token = shutdown.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::debug!(poller = name, ?interval, "Poller started");

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        if let Err(e) = task().await {
                            tracing::warn!(poller = name, error = %e, "Poll failed");
                        }
                    }
                }
            }

            tracing::debug!(poller = name, "Poller stopped");
        });

        Self {
            name,
            shutdown,
            handle: Some(handle),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Token that stops this poller when cancelled
    pub fn token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Cancel and wait for the task to finish
    pub async fn stop(mut self) {
        self.shutdown.cancel();
        let Some(handle) = self.handle.take() else {
            return;
        };
        if let Err(e) = handle.await {
            tracing::error!(poller = self.name, error = %e, "Poller task panicked");
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
