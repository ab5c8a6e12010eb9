//! Reader for exported JSON documents.
//!
//! Parses the output of [`crate::json::JsonFormat`] back into typed entries
//! and answers the same path/prefix/label questions an HTTP client would ask
//! of a metrics endpoint.

use std::collections::BTreeMap;
use std::fmt::Write;

use serde::{Deserialize, Serialize};

use metricscope_core::{Label, MetricQueryError, MetricValue, MetricsError, Result};

use crate::snapshot::format_request;

/// One metric instance from an exported document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricEntry {
    pub value: MetricValue,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl MetricEntry {
    /// Every label in `required` is present with the same value.
    pub fn has_labels(&self, required: &[Label]) -> bool {
        required
            .iter()
            .all(|r| self.labels.get(r.name()).map(String::as_str) == Some(r.value()))
    }

    fn sorted_labels(&self) -> Vec<Label> {
        self.labels.iter().map(|(k, v)| Label::new(k.as_str(), v.as_str())).collect()
    }
}

/// `path -> [entry, ..]`, exactly as exported.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricsDocument {
    metrics: BTreeMap<String, Vec<MetricEntry>>,
}

impl MetricsDocument {
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.metrics.keys().map(String::as_str)
    }

    pub fn get(&self, path: &str) -> Option<&[MetricEntry]> {
        self.metrics.get(path).map(Vec::as_slice)
    }

    /// Entries filtered by exact `path`, path `prefix`, and a label subset.
    /// Paths left without entries are dropped from the result.
    pub fn metrics(
        &self,
        path: Option<&str>,
        prefix: Option<&str>,
        labels: &[Label],
    ) -> BTreeMap<&str, Vec<&MetricEntry>> {
        self.metrics
            .iter()
            .filter(|(p, _)| path.map_or(true, |want| p.as_str() == want))
            .filter(|(p, _)| prefix.map_or(true, |want| p.starts_with(want)))
            .filter_map(|(p, entries)| {
                let kept: Vec<&MetricEntry> =
                    entries.iter().filter(|e| e.has_labels(labels)).collect();
                (!kept.is_empty()).then_some((p.as_str(), kept))
            })
            .collect()
    }

    /// The entry at `path` carrying `labels`, `None` if absent, an error if
    /// more than one entry matches.
    pub fn single_metric(&self, path: &str, labels: &[Label]) -> Result<Option<&MetricEntry>> {
        let found = self.metrics(Some(path), None, labels).remove(path).unwrap_or_default();
        match found.as_slice() {
            [] => Ok(None),
            [single] => Ok(Some(*single)),
            many => {
                let mut msg = format!(
                    "Multiple metrics found for request {}",
                    format_request(path, labels)
                );
                for e in many {
                    let identity = format_request(path, &e.sorted_labels());
                    let _ = write!(msg, "\n  {} {}", identity, e.value);
                }
                Err(MetricsError::Query(MetricQueryError::new(msg)))
            }
        }
    }
}
