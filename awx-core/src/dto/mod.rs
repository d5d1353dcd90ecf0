//! Data Transfer Objects for the AWX REST API
//!
//! DTOs mirror the JSON documents returned by AWX and are converted into
//! domain types right after decoding.

pub mod job;
