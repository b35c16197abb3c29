//! In-memory store and sink for exercising the monitor without I/O

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;

use crate::alerting::AlertSink;
use crate::db::MissStore;
use crate::error::{Error, Result};
use crate::models::{MissAlert, MissRecord};

pub(crate) fn miss(id: i64, address: &str, height: i64) -> MissRecord {
    MissRecord {
        id,
        address: address.to_string(),
        height,
        time: Utc.timestamp_opt(1_700_000_000 + height * 6, 0).unwrap(),
        alerted: false,
    }
}

#[derive(Default)]
struct Inner {
    rows: Vec<MissRecord>,
    acknowledged: Vec<i64>,
    fail_reads: bool,
    fail_ack: Option<i64>,
    reads: usize,
}

/// `MissStore` over a vector, with switchable failures
#[derive(Default)]
pub(crate) struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub(crate) fn with_heights(address: &str, heights: impl IntoIterator<Item = i64>) -> Self {
        let store = Self::default();
        store.insert_heights(address, heights);
        store
    }

    pub(crate) fn insert(&self, record: MissRecord) {
        self.inner.lock().rows.push(record);
    }

    pub(crate) fn insert_heights(&self, address: &str, heights: impl IntoIterator<Item = i64>) {
        let mut inner = self.inner.lock();
        for height in heights {
            let id = inner.rows.len() as i64 + 1;
            inner.rows.push(miss(id, address, height));
        }
    }

    pub(crate) fn pending(&self, address: &str) -> Vec<MissRecord> {
        let inner = self.inner.lock();
        let mut rows: Vec<MissRecord> = inner
            .rows
            .iter()
            .filter(|m| !m.alerted && m.address == address)
            .cloned()
            .collect();
        rows.sort_by_key(|m| m.height);
        rows
    }

    pub(crate) fn acknowledged_order(&self) -> Vec<i64> {
        self.inner.lock().acknowledged.clone()
    }

    pub(crate) fn reads(&self) -> usize {
        self.inner.lock().reads
    }

    pub(crate) fn fail_reads(&self, fail: bool) {
        self.inner.lock().fail_reads = fail;
    }

    pub(crate) fn fail_acknowledge(&self, id: i64) {
        self.inner.lock().fail_ack = Some(id);
    }

    pub(crate) fn clear_failures(&self) {
        let mut inner = self.inner.lock();
        inner.fail_reads = false;
        inner.fail_ack = None;
    }
}

#[async_trait]
impl MissStore for MemoryStore {
    async fn unacknowledged(&self, address: &str) -> Result<Vec<MissRecord>> {
        {
            let mut inner = self.inner.lock();
            inner.reads += 1;
            if inner.fail_reads {
                return Err(Error::Database(sqlx::Error::PoolTimedOut));
            }
        }
        Ok(self.pending(address))
    }

    async fn acknowledge(&self, id: i64) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.fail_ack == Some(id) {
            return Err(Error::Database(sqlx::Error::Protocol(format!(
                "acknowledge {id} failed"
            ))));
        }
        let row = inner
            .rows
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| Error::not_found("Miss", id.to_string()))?;
        row.alerted = true;
        inner.acknowledged.push(id);
        Ok(())
    }
}

/// `AlertSink` that keeps every alert it is handed
#[derive(Default)]
pub(crate) struct RecordingSink {
    alerts: Mutex<Vec<MissAlert>>,
    fail: AtomicBool,
}

impl RecordingSink {
    pub(crate) fn failing() -> Self {
        let sink = Self::default();
        sink.fail.store(true, Ordering::SeqCst);
        sink
    }

    pub(crate) fn alerts(&self) -> Vec<MissAlert> {
        self.alerts.lock().clone()
    }
}

#[async_trait]
impl AlertSink for RecordingSink {
    async fn send(&self, alert: &MissAlert) -> Result<()> {
        self.alerts.lock().push(alert.clone());
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::alert("sink unavailable"));
        }
        Ok(())
    }
}
