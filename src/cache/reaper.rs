//! Background removal of expired cache entries
//!
//! The reaper is a tokio task that sweeps the shared entry map on a fixed
//! interval. It stops when its handle is dropped or shut down.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use super::manager::Store;

/// Shortest sweep period accepted, so a zero TTL cannot spin the task
const MIN_REAP_INTERVAL: Duration = Duration::from_millis(1);

/// Handle owning the reaper task
///
/// Dropping the handle closes the shutdown channel, which ends the task on its
/// next poll.
#[derive(Debug)]
pub(super) struct ReaperHandle {
    /// Closing or sending on this channel stops the task
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl ReaperHandle {
    /// Spawns a reaper sweeping `store` every `period`
    pub(super) fn spawn(store: Arc<Store>, period: Duration) -> Self {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        let period = period.max(MIN_REAP_INTERVAL);

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // Skip the first tick (immediate)
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        let removed = store.reap();
                        if removed > 0 {
                            debug!(removed, "reaped expired cache entries");
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        break;
                    }
                }
            }
        });

        Self { shutdown_tx, task }
    }

    /// Signals the task to stop and waits for it to finish
    pub(super) async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        let _ = self.task.await;
    }
}
