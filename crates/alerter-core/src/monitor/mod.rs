//! Missed-block monitoring
//!
//! [`MonitorState`] holds the streak arithmetic, [`MissMonitor`] applies it
//! to pending rows from the store, and [`Scheduler`] drives the monitor on a
//! fixed period.

mod scheduler;
mod service;
mod state;

#[cfg(test)]
pub(crate) mod fakes;

pub use scheduler::Scheduler;
pub use service::MissMonitor;
pub use state::MonitorState;
