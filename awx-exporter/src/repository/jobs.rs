//! Jobs repository
//!
//! Fetches the current list of jobs from AWX.

use anyhow::{Context, Result};
use async_trait::async_trait;
use awx_client::AwxClient;
use awx_core::domain::job::JobRecord;

/// Repository trait for reading jobs
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Fetches the jobs that make up one poll cycle
    ///
    /// Any error means the cycle has no data; callers must not publish
    /// anything derived from a failed fetch.
    async fn fetch_jobs(&self) -> Result<Vec<JobRecord>>;
}

/// AWX-backed implementation of JobRepository
pub struct AwxJobRepository {
    client: AwxClient,
}

impl AwxJobRepository {
    /// Creates a repository on top of a configured AWX client
    pub fn new(client: AwxClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JobRepository for AwxJobRepository {
    async fn fetch_jobs(&self) -> Result<Vec<JobRecord>> {
        self.client
            .fetch_jobs()
            .await
            .with_context(|| format!("Failed to fetch jobs from {}", self.client.api_url()))
    }
}
