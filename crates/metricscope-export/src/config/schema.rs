use std::collections::BTreeMap;

use serde::Deserialize;

use metricscope_core::error::{MetricsError, Result};
use metricscope_core::{Label, MetricValue, PrefixMatch, StatisticsRequest, ValueVisitor};

use crate::storage::Storage;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportConfig {
    pub version: u32,

    #[serde(default)]
    pub request: RequestSection,

    #[serde(default)]
    pub output: OutputSection,

    #[serde(default)]
    pub metrics: Vec<SeedMetric>,
}

impl ExportConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(MetricsError::UnsupportedVersion);
        }
        self.request.validate()?;
        for (i, m) in self.metrics.iter().enumerate() {
            m.validate().map_err(|e| match e {
                MetricsError::BadRequest(msg) => {
                    MetricsError::BadRequest(format!("metrics[{i}]: {msg}"))
                }
                other => other,
            })?;
        }
        Ok(())
    }

    /// Registry populated with the `metrics` section.
    ///
    /// Integer values become counters, floating-point values gauges.
    pub fn build_storage(&self) -> Result<Storage> {
        let storage = Storage::new();
        for m in &self.metrics {
            let labels: Vec<(&str, &str)> =
                m.labels.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
            m.value.visit(Seed { storage: &storage, path: &m.path, labels: &labels })?;
        }
        Ok(storage)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequestSection {
    #[serde(default)]
    pub prefix: String,

    #[serde(default, rename = "match")]
    pub prefix_match: PrefixMatch,

    #[serde(default)]
    pub require_labels: BTreeMap<String, String>,

    #[serde(default)]
    pub add_labels: BTreeMap<String, String>,
}

impl RequestSection {
    pub fn validate(&self) -> Result<()> {
        if self.prefix_match == PrefixMatch::Exact && self.prefix.is_empty() {
            return Err(MetricsError::BadRequest(
                "request.prefix must not be empty when request.match is exact".into(),
            ));
        }
        if self.require_labels.keys().chain(self.add_labels.keys()).any(String::is_empty) {
            return Err(MetricsError::BadRequest("request label names must not be empty".into()));
        }
        Ok(())
    }

    pub fn to_request(&self) -> StatisticsRequest {
        let add = to_labels(&self.add_labels);
        let require = to_labels(&self.require_labels);
        match self.prefix_match {
            PrefixMatch::Prefix => {
                StatisticsRequest::make_with_prefix(self.prefix.as_str(), add, require)
            }
            PrefixMatch::Exact => {
                StatisticsRequest::make_with_path(self.prefix.as_str(), add, require)
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    #[serde(default)]
    pub pretty: bool,
}

/// A static metric seeded into the registry at startup.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedMetric {
    pub path: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    pub value: MetricValue,
}

impl SeedMetric {
    pub fn validate(&self) -> Result<()> {
        if self.path.is_empty() {
            return Err(MetricsError::BadRequest("path must not be empty".into()));
        }
        if self.labels.keys().any(String::is_empty) {
            return Err(MetricsError::BadRequest("label names must not be empty".into()));
        }
        Ok(())
    }
}

struct Seed<'a> {
    storage: &'a Storage,
    path: &'a str,
    labels: &'a [(&'a str, &'a str)],
}

impl ValueVisitor for Seed<'_> {
    type Output = Result<()>;

    fn visit_i64(self, v: i64) -> Result<()> {
        self.storage.counter(self.path)?.add(self.labels, v)
    }

    fn visit_f64(self, v: f64) -> Result<()> {
        self.storage.gauge(self.path)?.set(self.labels, v)
    }
}

fn to_labels(map: &BTreeMap<String, String>) -> Vec<Label> {
    map.iter().map(|(k, v)| Label::new(k.as_str(), v.as_str())).collect()
}
