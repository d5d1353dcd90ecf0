//! Repository layer
//!
//! Repositories abstract where job records come from. The poller only sees
//! the trait, so tests can feed it canned jobs or failures.

mod jobs;

pub use jobs::AwxJobRepository;
pub use jobs::JobRepository;
