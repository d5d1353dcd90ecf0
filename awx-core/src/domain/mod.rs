//! Core domain types
//!
//! This module contains the structures every poll cycle works with.
//! They are shared between the client (which produces job records)
//! and the exporter (which filters, aggregates and publishes them).

pub mod aggregate;
pub mod job;
pub mod whitelist;
