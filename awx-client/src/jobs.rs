//! Job-related API endpoints

use crate::AwxClient;
use crate::error::Result;
use awx_core::domain::job::JobRecord;
use awx_core::dto::job::JobListResponse;
use tracing::debug;

impl AwxClient {
    /// Fetch the current page of jobs and convert them into job records
    ///
    /// Issues one GET with basic authentication. Transport failures, timeouts,
    /// non-2xx answers and undecodable bodies are all returned as errors.
    ///
    /// # Returns
    /// The jobs in the order AWX listed them
    pub async fn fetch_jobs(&self) -> Result<Vec<JobRecord>> {
        debug!("Fetching jobs from {}", self.api_url);

        let response = self
            .client
            .get(&self.api_url)
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .send()
            .await?;

        let list: JobListResponse = self.handle_response(response).await?;

        debug!("Decoded {} job(s)", list.results.len());

        Ok(list.into())
    }
}
