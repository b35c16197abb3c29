//! Database layer for the alerter
//!
//! The miss table is owned by the chain exporter; the alerter only reads
//! pending rows and flags them as processed.

mod postgres;

pub use postgres::{MissRepository, PostgresPool};

use async_trait::async_trait;

use crate::error::Result;
use crate::models::MissRecord;

/// Access to the missed-block records of one validator
#[async_trait]
pub trait MissStore: Send + Sync {
    /// Misses not yet acknowledged for `address`, ascending by height
    async fn unacknowledged(&self, address: &str) -> Result<Vec<MissRecord>>;

    /// Mark a single miss as acknowledged
    async fn acknowledge(&self, id: i64) -> Result<()>;
}
