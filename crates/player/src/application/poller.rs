//! Cancellable periodic tasks.
//!
//! A poller ticks on a fixed period and spawns each tick. If the previous
//! tick has not resolved when the next one fires, the new tick is skipped
//! and counted rather than queued, so renders never pile up on stale data.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Default)]
struct PollStats {
    completed: AtomicU64,
    skipped: AtomicU64,
}

/// Owner of a running poller; stopping or dropping it cancels the task and
/// any tick still in flight.
pub struct PollHandle {
    name: &'static str,
    cancel: CancellationToken,
    stats: Arc<PollStats>,
    task: Option<JoinHandle<()>>,
}

impl PollHandle {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn stop(&self) {
        if !self.cancel.is_cancelled() {
            tracing::debug!(poller = self.name, "Stopping poller");
            self.cancel.cancel();
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Ticks that ran to completion
    pub fn completed_ticks(&self) -> u64 {
        self.stats.completed.load(Ordering::SeqCst)
    }

    /// Ticks dropped because the previous one was still running
    pub fn skipped_ticks(&self) -> u64 {
        self.stats.skipped.load(Ordering::SeqCst)
    }

    /// Stop and wait for the loop to exit
    pub async fn shutdown(mut self) {
        self.stop();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!("Poller task ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Start polling. The first tick fires one `period` after the call.
pub fn spawn_poller<F, Fut>(name: &'static str, period: Duration, tick: F) -> PollHandle
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let cancel = CancellationToken::new();
    let stats = Arc::new(PollStats::default());

    let task = {
        let cancel = cancel.clone();
        let stats = stats.clone();
        tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let in_flight = Arc::new(AtomicBool::new(false));
            tracing::debug!(poller = name, period_ms = period.as_millis() as u64, "Poller started");

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        tracing::debug!(poller = name, "Poller shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        if in_flight.swap(true, Ordering::SeqCst) {
                            stats.skipped.fetch_add(1, Ordering::SeqCst);
                            tracing::trace!(poller = name, "Previous tick still running; skipped");
                            continue;
                        }

                        let work = tick();
                        let cancel = cancel.clone();
                        let stats = stats.clone();
                        let in_flight = in_flight.clone();
                        tokio::spawn(async move {
                            tokio::select! {
                                _ = cancel.cancelled() => {}
                                _ = work => {
                                    stats.completed.fetch_add(1, Ordering::SeqCst);
                                }
                            }
                            in_flight.store(false, Ordering::SeqCst);
                        });
                    }
                }
            }
        })
    };

    PollHandle {
        name,
        cancel,
        stats,
        task: Some(task),
    }
}
