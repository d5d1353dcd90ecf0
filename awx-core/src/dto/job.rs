//! Job DTOs for the AWX jobs endpoint
//!
//! AWX exposes organization and labels through `summary_fields`. Some
//! deployments (and proxies in front of them) flatten these into dotted keys
//! such as `"summary_fields.organization"`; both shapes are accepted, with the
//! flat keys taking precedence.

use serde::{Deserialize, Serialize};

use crate::domain::job::JobRecord;

/// Top-level document returned by `GET /api/v2/jobs/`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobListResponse {
    #[serde(default)]
    pub results: Vec<AwxJob>,
}

/// A job object as it appears on the wire
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AwxJob {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub elapsed: Option<f64>,
    #[serde(
        rename = "summary_fields.organization",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub organization: Option<NamedRef>,
    #[serde(
        rename = "summary_fields.labels",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub labels: Option<Vec<Option<NamedRef>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_fields: Option<SummaryFields>,
}

/// Any AWX object reference that only matters by name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NamedRef {
    #[serde(default)]
    pub name: Option<String>,
}

/// Nested `summary_fields` object of the AWX v2 API
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryFields {
    #[serde(default)]
    pub organization: Option<NamedRef>,
    #[serde(default)]
    pub labels: Option<LabelPage>,
}

/// Paginated label list embedded in `summary_fields`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelPage {
    #[serde(default)]
    pub results: Vec<Option<NamedRef>>,
}

impl AwxJob {
    fn organization_name(&self) -> String {
        self.organization
            .as_ref()
            .or_else(|| {
                self.summary_fields
                    .as_ref()
                    .and_then(|s| s.organization.as_ref())
            })
            .and_then(|org| org.name.clone())
            .unwrap_or_default()
    }

    fn label_names(&self) -> Vec<String> {
        let refs = match &self.labels {
            Some(labels) => labels.as_slice(),
            None => self
                .summary_fields
                .as_ref()
                .and_then(|s| s.labels.as_ref())
                .map(|page| page.results.as_slice())
                .unwrap_or_default(),
        };

        refs.iter()
            .map(|label| {
                label
                    .as_ref()
                    .and_then(|l| l.name.clone())
                    .unwrap_or_default()
            })
            .collect()
    }
}

impl From<AwxJob> for JobRecord {
    fn from(job: AwxJob) -> Self {
        let organization = job.organization_name();
        let labels = job.label_names();

        JobRecord {
            id: job.id.unwrap_or_default(),
            status: job.status.unwrap_or_default(),
            organization,
            labels,
            elapsed: job.elapsed.unwrap_or_default(),
        }
    }
}

impl From<JobListResponse> for Vec<JobRecord> {
    fn from(response: JobListResponse) -> Self {
        response.results.into_iter().map(JobRecord::from).collect()
    }
}
