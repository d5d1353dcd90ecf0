//! Job aggregation
//!
//! Groups filtered job records by (organization, status, combined labels) and
//! counts them. The map is rebuilt from nothing on every poll cycle.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::job::JobRecord;

/// Separator placed between label names in the combined label string
pub const LABEL_SEPARATOR: &str = ",";

/// Dimensions a job count is published under
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AggregateKey {
    pub organization: String,
    pub status: String,
    /// Label names joined with [`LABEL_SEPARATOR`]
    pub labels: String,
}

impl AggregateKey {
    pub fn new(
        organization: impl Into<String>,
        status: impl Into<String>,
        labels: impl Into<String>,
    ) -> Self {
        Self {
            organization: organization.into(),
            status: status.into(),
            labels: labels.into(),
        }
    }

    /// Builds the key a job record is counted under
    pub fn for_job(job: &JobRecord, order: LabelOrder) -> Self {
        let labels = match order {
            LabelOrder::Upstream => job.labels.join(LABEL_SEPARATOR),
            LabelOrder::Sorted => {
                let mut sorted: Vec<&str> = job.labels.iter().map(String::as_str).collect();
                sorted.sort_unstable();
                sorted.join(LABEL_SEPARATOR)
            }
        };

        Self {
            organization: job.organization.clone(),
            status: job.status.clone(),
            labels,
        }
    }
}

/// How label names are ordered before they are joined into a key
///
/// `Upstream` keeps the order AWX returned, so `[x, y]` and `[y, x]` become
/// two different series. `Sorted` collapses them into one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelOrder {
    #[default]
    Upstream,
    Sorted,
}

/// Job counts for a single poll cycle
pub type AggregateMap = BTreeMap<AggregateKey, u64>;

/// Counts jobs per key, keeping the upstream label order
pub fn aggregate<'a, I>(jobs: I) -> AggregateMap
where
    I: IntoIterator<Item = &'a JobRecord>,
{
    aggregate_with(jobs, LabelOrder::Upstream)
}

/// Counts jobs per key using the given label order
pub fn aggregate_with<'a, I>(jobs: I, order: LabelOrder) -> AggregateMap
where
    I: IntoIterator<Item = &'a JobRecord>,
{
    let mut counts = AggregateMap::new();
    for job in jobs {
        *counts.entry(AggregateKey::for_job(job, order)).or_insert(0) += 1;
    }
    counts
}
