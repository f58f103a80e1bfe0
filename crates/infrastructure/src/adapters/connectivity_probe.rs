//! Connectivity probe - Feeds the network monitor from backend reachability
//!
//! A terminal has no `online`/`offline` events, so the probe asks the blog
//! backend at a fixed interval and reports the answer to a
//! [`NetworkMonitor`]. The monitor only notifies subscribers on transitions.

use std::{sync::Arc, time::Duration};

use application::{ApplicationError, NetworkMonitor};
use integration_blog::BlogClient;
use tokio::{runtime::Handle, task::JoinHandle, time::MissedTickBehavior};
use tracing::{debug, info, warn};

/// Running probe task
///
/// Stopped when [`ConnectivityProbe::stop`] is called or the handle is
/// dropped.
pub struct ConnectivityProbe {
    task: JoinHandle<()>,
    period: Duration,
}

impl std::fmt::Debug for ConnectivityProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectivityProbe")
            .field("period", &self.period)
            .field("running", &!self.task.is_finished())
            .finish()
    }
}

impl ConnectivityProbe {
    /// Spawn the probe on the current runtime
    ///
    /// The first check runs immediately.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::Internal`] outside a Tokio runtime.
    pub fn spawn(
        client: Arc<dyn BlogClient>,
        monitor: Arc<NetworkMonitor>,
        period: Duration,
    ) -> Result<Self, ApplicationError> {
        let runtime = Handle::try_current()
            .map_err(|e| ApplicationError::Internal(format!("No async runtime: {e}")))?;
        let period = period.max(Duration::from_millis(100));
        let task = runtime.spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let reachable = client.is_reachable().await;
                if monitor.set_online(reachable) {
                    if reachable {
                        info!("Blog backend reachable again");
                    } else {
                        warn!("Blog backend unreachable, switching to offline mode");
                    }
                } else {
                    debug!(reachable, "Connectivity unchanged");
                }
            }
        });

        Ok(Self { task, period })
    }

    /// Probe period
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// Stop probing
    pub fn stop(self) {
        self.task.abort();
    }
}

impl Drop for ConnectivityProbe {
    fn drop(&mut self) {
        self.task.abort();
    }
}
