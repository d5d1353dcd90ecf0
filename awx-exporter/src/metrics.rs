//! Job metrics
//!
//! Holds the `awx_jobs_total` gauge family and the registry it is exported
//! from. The poller writes into it once per cycle; the `/metrics` handler
//! reads from it whenever it is scraped. Each gauge is an atomic, so a scrape
//! in the middle of a publish sees either the old or the new value of a
//! series, never a torn one.
//!
//! On Linux the registry also carries the standard `process_*` collector.

use awx_core::domain::aggregate::{AggregateKey, AggregateMap};
use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};

pub const JOBS_TOTAL_NAME: &str = "awx_jobs_total";
const JOBS_TOTAL_HELP: &str = "Total number of AWX jobs per organization, status, and job labels.";
const JOBS_TOTAL_LABELS: [&str; 3] = ["organization", "status", "job_labels"];

/// Gauge collection published by the exporter
pub struct JobMetrics {
    registry: Registry,
    jobs_total: GaugeVec,
}

impl JobMetrics {
    /// Creates the gauge family and registers it with a fresh registry
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        #[cfg(target_os = "linux")]
        registry.register(Box::new(
            prometheus::process_collector::ProcessCollector::for_self(),
        ))?;

        let jobs_total = GaugeVec::new(
            Opts::new(JOBS_TOTAL_NAME, JOBS_TOTAL_HELP),
            &JOBS_TOTAL_LABELS,
        )?;
        registry.register(Box::new(jobs_total.clone()))?;

        Ok(Self {
            registry,
            jobs_total,
        })
    }

    /// Sets every gauge in `counts` to its count
    ///
    /// Series absent from `counts` keep whatever value they were last set to.
    pub fn publish(&self, counts: &AggregateMap) {
        for (key, count) in counts {
            self.jobs_total
                .with_label_values(&[
                    key.organization.as_str(),
                    key.status.as_str(),
                    key.labels.as_str(),
                ])
                .set(*count as f64);
        }
    }

    /// Current value of one series, if it was ever published
    #[cfg(test)]
    pub fn value(&self, key: &AggregateKey) -> Option<f64> {
        self.registry
            .gather()
            .iter()
            .filter(|family| family.get_name() == JOBS_TOTAL_NAME)
            .flat_map(|family| family.get_metric())
            .find(|metric| {
                let label = |name: &str| {
                    metric
                        .get_label()
                        .iter()
                        .find(|pair| pair.get_name() == name)
                        .map(|pair| pair.get_value().to_string())
                        .unwrap_or_default()
                };
                label("organization") == key.organization
                    && label("status") == key.status
                    && label("job_labels") == key.labels
            })
            .map(|metric| metric.get_gauge().get_value())
    }

    /// Number of series currently exported
    #[cfg(test)]
    pub fn series_count(&self) -> usize {
        self.registry
            .gather()
            .iter()
            .filter(|family| family.get_name() == JOBS_TOTAL_NAME)
            .map(|family| family.get_metric().len())
            .sum()
    }

    /// Content type of [`JobMetrics::render`] output
    pub fn content_type(&self) -> String {
        TextEncoder::new().format_type().to_string()
    }

    /// Encodes all registered metrics in the text exposition format
    pub fn render(&self) -> prometheus::Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    /// Encodes only the `awx_jobs_total` family
    #[cfg(test)]
    pub fn render_jobs(&self) -> String {
        use prometheus::core::Collector;

        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&self.jobs_total.collect(), &mut buffer)
            .unwrap();
        String::from_utf8(buffer).unwrap()
    }
}
