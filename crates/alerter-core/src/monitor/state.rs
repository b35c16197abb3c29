//! Consecutive-miss bookkeeping

use serde::{Deserialize, Serialize};

/// Streak state for one validator. Lives only in memory; a restart starts
/// again from height zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorState {
    /// Height of the last miss seen
    pub last_height: i64,
    /// Current run of misses at strictly sequential heights
    pub consecutive: u32,
}

impl MonitorState {
    /// State resuming after a known height
    pub fn starting_at(last_height: i64) -> Self {
        Self {
            last_height,
            consecutive: 0,
        }
    }

    /// Feed the next miss height.
    ///
    /// A height directly after the previous one extends the streak; anything
    /// else resets it to zero without counting the new miss. Returns `true`
    /// when the streak reaches `threshold`, in which case the counter is
    /// reset.
    pub fn observe(&mut self, height: i64, threshold: u32) -> bool {
        if self.last_height.checked_add(1) == Some(height) {
            self.consecutive += 1;
        } else {
            self.consecutive = 0;
        }
        self.last_height = height;

        if self.consecutive >= threshold {
            self.consecutive = 0;
            return true;
        }
        false
    }
}
