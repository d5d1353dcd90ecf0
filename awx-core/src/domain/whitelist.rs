//! Whitelist policy
//!
//! Decides whether a job counts toward the published metrics. Membership is
//! exact and case-sensitive for both organizations and labels.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Static allow-list loaded once at startup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhitelistPolicy {
    pub enabled: bool,
    pub organizations: HashSet<String>,
    pub labels: HashSet<String>,
}

impl WhitelistPolicy {
    /// Creates an enabled policy from organization and label names
    pub fn enabled<O, L>(organizations: O, labels: L) -> Self
    where
        O: IntoIterator,
        O::Item: Into<String>,
        L: IntoIterator,
        L::Item: Into<String>,
    {
        Self {
            enabled: true,
            organizations: organizations.into_iter().map(Into::into).collect(),
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns `true` when a job with this organization and labels is allowed
    ///
    /// A disabled policy allows everything. An enabled policy requires the
    /// organization to be listed and at least one label to be listed.
    pub fn is_allowed<S: AsRef<str>>(&self, organization: &str, labels: &[S]) -> bool {
        if !self.enabled {
            return true;
        }

        if !self.organizations.contains(organization) {
            return false;
        }

        labels
            .iter()
            .any(|label| self.labels.contains(label.as_ref()))
    }
}
