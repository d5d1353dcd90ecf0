//! Job domain types

use serde::{Deserialize, Serialize};

/// A single AWX job as seen by one poll cycle
///
/// Built fresh from every decoded response and dropped at the end of the cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: i64,
    /// Free-form status reported by AWX ("successful", "failed", "running", ...)
    pub status: String,
    pub organization: String,
    /// Label names in the order AWX returned them
    pub labels: Vec<String>,
    /// Elapsed seconds; carried for completeness, never aggregated
    pub elapsed: f64,
}

impl JobRecord {
    /// Creates a job record with zero elapsed time
    pub fn new(
        id: i64,
        status: impl Into<String>,
        organization: impl Into<String>,
        labels: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            id,
            status: status.into(),
            organization: organization.into(),
            labels: labels.into_iter().map(Into::into).collect(),
            elapsed: 0.0,
        }
    }
}
