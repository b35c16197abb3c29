//! Data models for the alerter

mod alert;
mod miss;

pub use alert::*;
pub use miss::*;
