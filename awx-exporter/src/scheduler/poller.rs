//! Job poller
//!
//! Runs fetch → whitelist → aggregate → publish once per cycle, sequentially,
//! and sleeps a fixed interval between cycles. A failed fetch abandons the
//! cycle without touching the published gauges.

use anyhow::Result;
use awx_core::domain::aggregate::{LabelOrder, aggregate_with};
use awx_core::domain::job::JobRecord;
use awx_core::domain::whitelist::WhitelistPolicy;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::{self, Duration};
use tracing::{debug, error, info};

use crate::config::Config;
use crate::metrics::JobMetrics;
use crate::repository::JobRepository;

/// Everything the poller needs to know, fixed at construction
#[derive(Debug, Clone)]
pub struct PollerConfig {
    pub whitelist: WhitelistPolicy,
    pub label_order: LabelOrder,
    pub poll_interval: Duration,
}

impl PollerConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            whitelist: config.whitelist.clone(),
            label_order: config.label_order(),
            poll_interval: config.poll_interval(),
        }
    }
}

/// Outcome of one successful cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    /// Jobs returned by AWX
    pub fetched: usize,
    /// Jobs that passed the whitelist
    pub accepted: usize,
    /// Distinct series written to the gauges
    pub series: usize,
}

/// Job poller that periodically republishes AWX job counts
pub struct JobPoller {
    config: PollerConfig,
    repository: Arc<dyn JobRepository>,
    metrics: Arc<JobMetrics>,
}

impl JobPoller {
    /// Creates a new job poller
    pub fn new(
        config: PollerConfig,
        repository: Arc<dyn JobRepository>,
        metrics: Arc<JobMetrics>,
    ) -> Self {
        Self {
            config,
            repository,
            metrics,
        }
    }

    /// Runs poll cycles until `shutdown` becomes `true` or its sender is dropped
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(
            "Starting job poller (interval: {:?})",
            self.config.poll_interval
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            debug!("Polling AWX for jobs");

            match self.poll_once().await {
                Ok(report) => {
                    info!(
                        "Published {} series from {}/{} job(s)",
                        report.series, report.accepted, report.fetched
                    );
                }
                Err(e) => {
                    error!("Error during poll cycle: {:#}", e);
                }
            }

            if self.idle(&mut shutdown).await {
                break;
            }
        }

        info!("Job poller stopped");
    }

    /// Performs a single poll cycle
    pub async fn poll_once(&self) -> Result<CycleReport> {
        let jobs = self.repository.fetch_jobs().await?;
        let fetched = jobs.len();

        let accepted: Vec<&JobRecord> = if self.config.whitelist.enabled {
            jobs.iter().filter(|job| self.is_whitelisted(job)).collect()
        } else {
            jobs.iter().collect()
        };

        let counts = aggregate_with(accepted.iter().copied(), self.config.label_order);
        self.metrics.publish(&counts);

        Ok(CycleReport {
            fetched,
            accepted: accepted.len(),
            series: counts.len(),
        })
    }

    fn is_whitelisted(&self, job: &JobRecord) -> bool {
        let allowed = self
            .config
            .whitelist
            .is_allowed(&job.organization, job.labels.as_slice());
        if !allowed {
            debug!("Ignoring job {} as it is not on the whitelist", job.id);
        }
        allowed
    }

    /// Sleeps one full interval; returns `true` if shutdown was requested meanwhile
    async fn idle(&self, shutdown: &mut watch::Receiver<bool>) -> bool {
        let sleep = time::sleep(self.config.poll_interval);
        tokio::pin!(sleep);

        loop {
            tokio::select! {
                _ = &mut sleep => return false,
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        return true;
                    }
                }
            }
        }
    }
}
