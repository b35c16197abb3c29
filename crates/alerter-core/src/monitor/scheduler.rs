//! Fixed-interval driver for the miss monitor

use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::alerting::AlertSink;
use crate::db::MissStore;

use super::service::MissMonitor;

/// Runs `process_misses` on a fixed period until cancelled.
///
/// Passes never overlap: the next tick is only awaited once the current pass
/// has finished, and ticks missed meanwhile are skipped rather than replayed.
#[derive(Debug, Clone, Copy)]
pub struct Scheduler {
    period: Duration,
}

impl Scheduler {
    /// Create a scheduler with the given period
    pub fn new(period: Duration) -> Self {
        Self { period }
    }

    /// Drive the monitor until `shutdown` is cancelled. The first pass runs
    /// immediately. A pass already underway is allowed to finish.
    ///
    /// Returns the number of passes run.
    pub async fn run<S, A>(
        self,
        monitor: &mut MissMonitor<S, A>,
        shutdown: CancellationToken,
    ) -> u64
    where
        S: MissStore,
        A: AlertSink,
    {
        info!(
            address = monitor.address(),
            period_secs = self.period.as_secs(),
            "Starting miss monitor"
        );

        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut passes = 0;

        loop {
            tokio::select! {
                biased;

                () = shutdown.cancelled() => {
                    info!(passes, "Shutdown requested, stopping miss monitor");
                    break;
                }

                _ = ticker.tick() => {
                    debug!("Processing misses");
                    match monitor.process_misses().await {
                        Ok(summary) => {
                            debug!(
                                processed = summary.processed,
                                alerts_fired = summary.alerts_fired,
                                alerts_failed = summary.alerts_failed,
                                consecutive = monitor.state().consecutive,
                                "Finished processing misses"
                            );
                        }
                        Err(e) => {
                            error!(error = %e, "Error processing misses");
                        }
                    }
                    passes += 1;
                }
            }
        }

        passes
    }
}
