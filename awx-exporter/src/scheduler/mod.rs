//! Scheduler layer for the exporter
//!
//! This layer owns the recurring poll cycle: fetch jobs, apply the
//! whitelist, aggregate and publish, then wait for the next round.

pub mod poller;

pub use poller::{JobPoller, PollerConfig};
