//! The miss monitor: turns pending miss rows into streak alerts

use tracing::{debug, error, warn};

use crate::alerting::AlertSink;
use crate::db::MissStore;
use crate::error::Result;
use crate::models::{BatchSummary, MissAlert};

use super::state::MonitorState;

/// Watches the misses of a single validator address
pub struct MissMonitor<S, A> {
    store: S,
    sink: A,
    address: String,
    threshold: u32,
    state: MonitorState,
}

impl<S: MissStore, A: AlertSink> MissMonitor<S, A> {
    /// Create a monitor with fresh state.
    ///
    /// A `threshold` of zero is treated as one: every sequential miss alerts.
    pub fn new(store: S, sink: A, address: impl Into<String>, threshold: u32) -> Self {
        Self::with_state(store, sink, address, threshold, MonitorState::default())
    }

    /// Create a monitor resuming from an existing state. `threshold` is
    /// clamped to at least one, as in [`MissMonitor::new`].
    pub fn with_state(
        store: S,
        sink: A,
        address: impl Into<String>,
        threshold: u32,
        state: MonitorState,
    ) -> Self {
        Self {
            store,
            sink,
            address: address.into(),
            threshold: threshold.max(1),
            state,
        }
    }

    /// Process every pending miss in height order.
    ///
    /// A failed read or acknowledge aborts the pass; rows acknowledged before
    /// the failure stay acknowledged. A failed alert delivery is logged and
    /// the row is still acknowledged.
    pub async fn process_misses(&mut self) -> Result<BatchSummary> {
        let misses = self.store.unacknowledged(&self.address).await?;
        let mut summary = BatchSummary::default();

        for miss in misses {
            if self.state.observe(miss.height, self.threshold) {
                let alert = MissAlert::from_record(&miss, self.threshold);
                warn!(
                    height = alert.height,
                    address = %alert.address,
                    consecutive = alert.consecutive,
                    "Consecutive miss threshold reached"
                );
                summary.alerts_fired += 1;
                if let Err(e) = self.sink.send(&alert).await {
                    error!(height = alert.height, error = %e, "Failed to deliver alert");
                    summary.alerts_failed += 1;
                }
            } else if self.state.consecutive > 0 {
                debug!(
                    height = miss.height,
                    consecutive = self.state.consecutive,
                    "Miss extends streak"
                );
            }

            self.store.acknowledge(miss.id).await?;
            summary.processed += 1;
            debug!(height = miss.height, "Processed miss");
        }

        Ok(summary)
    }

    /// Current streak state
    pub fn state(&self) -> MonitorState {
        self.state
    }

    /// Monitored address
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Underlying alert sink
    pub fn sink(&self) -> &A {
        &self.sink
    }
}
