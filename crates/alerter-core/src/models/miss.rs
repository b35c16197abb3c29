//! Missed-block record model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A block the monitored validator failed to sign, as written by the chain
/// exporter into `miss_infos`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MissRecord {
    /// Row identifier
    pub id: i64,

    /// Validator address
    pub address: String,

    /// Block height that was missed
    pub height: i64,

    /// Block time
    pub time: DateTime<Utc>,

    /// Whether the monitor has already processed this miss
    pub alerted: bool,
}
