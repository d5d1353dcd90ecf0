//! AWX Core
//!
//! Core types and pure logic for the AWX job exporter.
//!
//! This crate contains:
//! - Domain types: job records, whitelist policy, aggregate keys
//! - DTOs: wire representation of the AWX jobs endpoint

pub mod domain;
pub mod dto;
