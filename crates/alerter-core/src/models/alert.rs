//! Alert data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::MissRecord;

/// Raised when a validator misses `threshold` blocks in a row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissAlert {
    /// Height of the miss that completed the streak
    pub height: i64,

    /// Block time of that miss
    pub time: DateTime<Utc>,

    /// Validator address
    pub address: String,

    /// Length of the streak that triggered the alert
    pub consecutive: u32,
}

impl MissAlert {
    /// Build the alert for the miss that completed a streak
    pub fn from_record(record: &MissRecord, consecutive: u32) -> Self {
        Self {
            height: record.height,
            time: record.time,
            address: record.address.clone(),
            consecutive,
        }
    }

    /// Human-readable message
    pub fn message(&self) -> String {
        format!(
            "Validator {} missed {} consecutive blocks up to height {}",
            self.address, self.consecutive, self.height
        )
    }
}

/// Outcome of one pass over the unprocessed misses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Records acknowledged in this pass
    pub processed: usize,

    /// Alerts raised
    pub alerts_fired: usize,

    /// Alerts whose delivery failed
    pub alerts_failed: usize,
}
