// Recurring expiry check
use super::check_and_store;
use crate::error::{DeskError, Result};
use crate::store::{KeyValueStore, Repository};
use chrono::{DateTime, Local, TimeZone};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Alert thresholds are whole calendar days, so the check runs once a day
pub const CHECK_PERIOD: Duration = Duration::from_secs(24 * 60 * 60);

/// Owns the running check task; dropping it cancels the task
pub struct SchedulerHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl SchedulerHandle {
    /// Stop the task and wait for an in-flight check to finish
    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }

        match self.task.take() {
            Some(task) => task
                .await
                .map_err(|e| DeskError::Scheduler(format!("expiry check task failed: {}", e))),
            None => Ok(()),
        }
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            tracing::debug!("Expiry scheduler dropped, cancelling task");
            task.abort();
        }
    }
}

/// Run an expiry check now and then once a day, on the local clock
pub fn spawn<S>(repo: Arc<Repository<S>>) -> SchedulerHandle
where
    S: KeyValueStore + 'static,
{
    spawn_with_clock(repo, CHECK_PERIOD, Local::now)
}

/// Same as `spawn` with an injected period and clock
pub fn spawn_with_clock<S, Tz, C>(repo: Arc<Repository<S>>, period: Duration, clock: C) -> SchedulerHandle
where
    S: KeyValueStore + 'static,
    Tz: TimeZone + Send + 'static,
    Tz::Offset: Send,
    C: Fn() -> DateTime<Tz> + Send + 'static,
{
    let (tx, mut rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        // First tick completes immediately, which gives the check on start
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = &mut rx => {
                    tracing::debug!("Expiry scheduler stopping");
                    break;
                }
                _ = ticker.tick() => {
                    let now = clock();
                    match check_and_store(&*repo, &now) {
                        Ok(added) => {
                            tracing::debug!("Expiry check at {} added {}", now.naive_local(), added)
                        }
                        Err(e) => tracing::warn!("Expiry check failed: {}", e),
                    }
                }
            }
        }
    });

    tracing::info!("Expiry scheduler started (every {:?})", period);

    SchedulerHandle {
        shutdown: Some(tx),
        task: Some(task),
    }
}
