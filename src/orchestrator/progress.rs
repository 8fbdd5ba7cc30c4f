//! Rotating status message shown while a transformation runs.

use crate::error::{Result, StudioError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Default time between message changes.
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_millis(2500);

/// Messages cycled through while waiting on the model.
pub const LOADING_MESSAGES: &[&str] = &[
    "Moving your photo into the studio...",
    "Adjusting the lighting...",
    "Styling the background...",
    "Enhancing image quality...",
    "Arranging the props...",
];

/// Background task advancing a message index once per period.
///
/// The task is aborted on [`ProgressTicker::cancel`] or drop.
#[derive(Debug)]
pub struct ProgressTicker {
    index: watch::Receiver<usize>,
    handle: JoinHandle<()>,
}

impl ProgressTicker {
    /// Starts ticking over `len` messages.
    ///
    /// Fails when called outside a tokio runtime.
    pub fn start(len: usize, period: Duration) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|e| StudioError::Runtime(e.to_string()))?;
        let (tx, rx) = watch::channel(0usize);
        let len = len.max(1);
        let handle = runtime.spawn(async move {
            let mut ticks = tokio::time::interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut index = 0;
            loop {
                ticks.tick().await;
                index = (index + 1) % len;
                if tx.send(index).is_err() {
                    break;
                }
            }
        });
        Ok(Self { index: rx, handle })
    }

    /// Current index.
    pub fn index(&self) -> usize {
        *self.index.borrow()
    }

    /// A receiver that sees every index change until the ticker stops.
    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.index.clone()
    }

    /// Stops the ticker.
    pub fn cancel(self) {
        self.handle.abort();
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD: Duration = DEFAULT_PROGRESS_INTERVAL;
    const SLACK: Duration = Duration::from_millis(10);

    #[tokio::test(start_paused = true)]
    async fn test_advances_once_per_period() {
        let ticker = ProgressTicker::start(LOADING_MESSAGES.len(), PERIOD).unwrap();
        assert_eq!(ticker.index(), 0);

        tokio::time::sleep(PERIOD - SLACK).await;
        assert_eq!(ticker.index(), 0);

        tokio::time::sleep(SLACK * 2).await;
        assert_eq!(ticker.index(), 1);

        tokio::time::sleep(PERIOD * 2).await;
        assert_eq!(ticker.index(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wraps_around() {
        let ticker = ProgressTicker::start(LOADING_MESSAGES.len(), PERIOD).unwrap();
        tokio::time::sleep(PERIOD * 5 + SLACK).await;
        assert_eq!(ticker.index(), 0);
        tokio::time::sleep(PERIOD).await;
        assert_eq!(ticker.index(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_advancing() {
        let ticker = ProgressTicker::start(LOADING_MESSAGES.len(), PERIOD).unwrap();
        let mut updates = ticker.subscribe();
        tokio::time::sleep(PERIOD + SLACK).await;
        assert_eq!(*updates.borrow_and_update(), 1);

        ticker.cancel();
        tokio::time::sleep(PERIOD * 10).await;
        assert_eq!(*updates.borrow(), 1);
        // The sender is gone once the task is aborted.
        assert!(updates.changed().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_task() {
        let ticker = ProgressTicker::start(3, PERIOD).unwrap();
        let mut updates = ticker.subscribe();
        drop(ticker);
        assert!(updates.changed().await.is_err());
        assert_eq!(*updates.borrow(), 0);
    }

    #[test]
    fn test_start_outside_runtime_fails() {
        let err = ProgressTicker::start(3, PERIOD).unwrap_err();
        assert!(matches!(err, StudioError::Runtime(_)));
    }
}
