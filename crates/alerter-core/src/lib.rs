//! # Alerter
//!
//! Raises an alert when a validator misses too many blocks in a row.
//!
//! The chain exporter records every block the monitored validator failed to
//! sign in PostgreSQL. The alerter polls those records, tracks how many were
//! missed at consecutive heights, reports to Sentry once the streak reaches
//! the threshold and flags each record as processed.
//!
//! ## Architecture
//!
//! - **Monitor**: streak tracking and the fixed-interval scheduler
//! - **Storage**: PostgreSQL access to the `miss_infos` table
//! - **Alerting**: Sentry event delivery
//!
//! ## Quick Start
//!
//! ```bash
//! DB_HOST=localhost:5432 DB_USER=postgres DB_PW=secret \
//! RAVEN_DSN=https://key@sentry.io/1 ADDRESS=0F8A3C1D alerter
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod alerting;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod monitor;

pub use config::Config;
pub use error::{Error, Result};

/// Re-exports for convenience
pub mod prelude {
    pub use crate::alerting::{AlertSink, SentryNotifier};
    pub use crate::config::Config;
    pub use crate::db::{MissRepository, MissStore, PostgresPool};
    pub use crate::error::{Error, Result};
    pub use crate::models::*;
    pub use crate::monitor::{MissMonitor, MonitorState, Scheduler};
}
