//! Alert delivery for the alerter
//!
//! Alerts leave the process through an [`AlertSink`]. The production sink
//! reports to Sentry.

mod notifier;

pub use notifier::{SentryDsn, SentryNotifier};

use async_trait::async_trait;

use crate::error::Result;
use crate::models::MissAlert;

/// Destination for missed-block alerts
#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Deliver a single alert
    async fn send(&self, alert: &MissAlert) -> Result<()>;
}
