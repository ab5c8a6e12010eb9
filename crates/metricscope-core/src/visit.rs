//! Visitor contract between registries and output builders.
//!
//! A registry walks its metrics once per request and pushes each matching
//! instance into a [`FormatBuilder`]. Builders decide what to keep: the JSON
//! exporter accumulates a document, the snapshot builder copies entries into
//! an index.

use crate::model::{LabelsSpan, MetricValue, StatisticsRequest};

/// Receives metric instances during a traversal.
///
/// `handle_metric` runs once per delivered instance, any number of times
/// (including zero), in no particular order. `labels` borrows registry
/// storage and is gone once the call returns.
pub trait FormatBuilder {
    fn handle_metric(&mut self, path: &str, labels: LabelsSpan<'_>, value: &MetricValue);
}

/// A registry that can be traversed.
pub trait MetricsSource {
    /// Synchronously deliver every metric matching `request` to `out`,
    /// each exactly once.
    fn visit_metrics(&self, out: &mut dyn FormatBuilder, request: &StatisticsRequest);
}

