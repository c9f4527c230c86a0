//! Fixed-period scheduling with a non-overlap guarantee.
//!
//! One timer drives the sync engine: once immediately at startup, then on
//! a fixed interval. If a cycle is still running when the next tick
//! fires, the tick is skipped - never queued and never run in parallel.
//! That single-flight rule is the only concurrency control the design
//! needs, since the engine is the sole mutator of the marker cache.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use crate::sync::SyncEngine;

/// Non-blocking gate that lets at most one task run at a time.
///
/// `run` returns `None` without executing the future when a previous run
/// still holds the gate.
#[derive(Debug, Default)]
pub struct SingleFlight {
    lock: tokio::sync::Mutex<()>,
}

impl SingleFlight {
    /// Create a new gate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `future` unless another run is in flight.
    pub async fn run<F, T>(&self, future: F) -> Option<T>
    where
        F: Future<Output = T>,
    {
        match self.lock.try_lock() {
            Ok(_guard) => Some(future.await),
            Err(_) => None,
        }
    }
}

/// Spawn the background sync loop.
///
/// The task runs until the process exits; cycle failures are logged and
/// retried on the next tick.
pub fn spawn(engine: Arc<SyncEngine>, period: Duration) -> JoinHandle<()> {
    info!(period_secs = period.as_secs(), "starting sync scheduler");
    tokio::spawn(run_loop(engine, period))
}

async fn run_loop(engine: Arc<SyncEngine>, period: Duration) {
    let gate = SingleFlight::new();

    let mut interval = tokio::time::interval(period);
    // A late cycle must not cause a burst of catch-up ticks afterwards.
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;

        let ran = gate
            .run(async {
                match engine.run_cycle().await {
                    Ok(outcome) => {
                        if outcome.skipped {
                            return;
                        }
                        info!(
                            fetched = outcome.fetched,
                            notified = outcome.notified,
                            bootstrapped = outcome.bootstrapped,
                            "sync tick finished"
                        );
                    }
                    Err(e) => {
                        error!(error = %e, "sync cycle failed, will retry on next tick");
                    }
                }
            })
            .await;

        if ran.is_none() {
            warn!("previous sync cycle still running, skipping tick");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_single_flight_runs_when_free() {
        let gate = SingleFlight::new();
        assert_eq!(gate.run(async { 42 }).await, Some(42));
        // And again after release.
        assert_eq!(gate.run(async { 43 }).await, Some(43));
    }

    #[tokio::test]
    async fn test_single_flight_skips_concurrent_run() {
        let gate = Arc::new(SingleFlight::new());
        let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();
        let (started_tx, started_rx) = tokio::sync::oneshot::channel::<()>();

        let first = {
            let gate = Arc::clone(&gate);
            tokio::spawn(async move {
                gate.run(async {
                    let _ = started_tx.send(());
                    let _ = release_rx.await;
                    1
                })
                .await
            })
        };

        // Wait until the first run holds the gate.
        started_rx.await.expect("first run started");

        // A tick firing while the previous cycle runs is skipped.
        assert_eq!(gate.run(async { 2 }).await, None);

        let _ = release_tx.send(());
        assert_eq!(first.await.expect("join"), Some(1));

        // Gate is free again afterwards.
        assert_eq!(gate.run(async { 3 }).await, Some(3));
    }
}
