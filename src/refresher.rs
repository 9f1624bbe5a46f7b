//! Periodic refresh of the proxy pool.

use crate::error::{Error, Result};
use crate::logger::Logger;
use crate::pool::ProxyPool;
use crate::source::ProxySource;

use log::{debug, info};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

/// Everything a single refresh needs, cloned into the background task.
#[derive(Clone)]
struct RefreshJob {
    source: Arc<dyn ProxySource>,
    pool: Arc<ProxyPool>,
    logger: Arc<dyn Logger>,
}

impl RefreshJob {
    async fn run(&self) -> bool {
        match self.source.fetch().await {
            Ok(proxies) => {
                let usable = proxies.iter().filter(|p| p.is_usable()).count();
                info!(
                    "Fetched {} proxies ({} usable) from {}",
                    proxies.len(),
                    usable,
                    self.source.describe()
                );
                self.pool.replace(proxies);
                true
            }
            Err(e) => {
                self.logger.error(&e);
                false
            }
        }
    }
}

/// Keeps a [`ProxyPool`] in sync with a [`ProxySource`].
///
/// The recurring task belongs to the refresher alone, so any number of
/// refreshers can live in one process without affecting each other.
pub struct Refresher {
    job: RefreshJob,
    interval: Duration,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Refresher {
    pub fn new(
        source: Arc<dyn ProxySource>,
        pool: Arc<ProxyPool>,
        logger: Arc<dyn Logger>,
        interval: Duration,
    ) -> Self {
        Self {
            job: RefreshJob {
                source,
                pool,
                logger,
            },
            interval,
            task: Mutex::new(None),
        }
    }

    /// Refresh once right away, then every `interval` in the background.
    ///
    /// A failed fetch is logged and does not fail the call; only the
    /// absence of a tokio runtime to schedule on does. Starting again
    /// replaces the previous schedule.
    pub async fn start(&self) -> Result<()> {
        let handle = Handle::try_current().map_err(|e| Error::Schedule(e.to_string()))?;

        self.refresh_once().await;

        let job = self.job.clone();
        let interval = self.interval;
        let task = handle.spawn(async move {
            let mut ticker = time::interval_at(time::Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                debug!("Scheduled proxy refresh from {}", job.source.describe());
                job.run().await;
            }
        });

        if let Some(previous) = self.task.lock().replace(task) {
            previous.abort();
        }
        Ok(())
    }

    /// Fetch the list once and replace the pool on success.
    ///
    /// Any failure is reported to the logger and leaves the pool as it was.
    /// Returns whether the pool was replaced.
    pub async fn refresh_once(&self) -> bool {
        self.job.run().await
    }

    /// Cancel the recurring refresh. Refreshes already running are aborted
    /// at their next suspension point; the pool keeps its last contents.
    pub fn stop(&self) {
        if let Some(task) = self.task.lock().take() {
            task.abort();
            info!("Stopped proxy refresh from {}", self.job.source.describe());
        }
    }

    /// Whether a recurring refresh is scheduled.
    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }
}

impl Drop for Refresher {
    fn drop(&mut self) {
        if let Some(task) = self.task.get_mut().take() {
            task.abort();
        }
    }
}
