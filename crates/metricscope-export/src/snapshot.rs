//! Point-in-time metric index for assertions.
//!
//! A [`Snapshot`] runs one traversal at construction and copies every
//! delivered metric into an immutable index. Lookups then pick out exactly one
//! metric by path and a subset of its labels:
//!
//! - the entry may carry labels the query does not mention;
//! - zero matches and several matches are both errors, the latter listing
//!   every conflicting entry so the filter can be narrowed.

use std::collections::{BTreeSet, HashMap};
use std::fmt::Write;
use std::sync::Arc;

use metricscope_core::{
    FormatBuilder, Label, LabelsSpan, MetricQueryError, MetricValue, MetricsSource,
    StatisticsRequest,
};

const PATH_SEPARATOR: &str = ".";

#[derive(Debug)]
struct SnapshotEntry {
    labels: BTreeSet<Label>,
    value: MetricValue,
}

impl SnapshotEntry {
    fn contains_all(&self, required: &[Label]) -> bool {
        required.iter().all(|r| self.labels.contains(r))
    }
}

#[derive(Debug, Default)]
struct SnapshotData {
    metrics: HashMap<String, Vec<SnapshotEntry>>,
}

struct SnapshotVisitor<'a> {
    data: &'a mut SnapshotData,
}

impl FormatBuilder for SnapshotVisitor<'_> {
    fn handle_metric(&mut self, path: &str, labels: LabelsSpan<'_>, value: &MetricValue) {
        let entry = SnapshotEntry { labels: labels.to_set(), value: *value };
        self.data.metrics.entry(path.to_string()).or_default().push(entry);
    }
}

/// Immutable, cheaply clonable view over one traversal.
#[derive(Debug, Clone)]
pub struct Snapshot {
    request: StatisticsRequest,
    data: Arc<SnapshotData>,
}

impl Snapshot {
    /// Traverse `source` once, keeping metrics under `prefix` that carry all
    /// of `require_labels`.
    pub fn new<S>(source: &S, prefix: impl Into<String>, require_labels: Vec<Label>) -> Self
    where
        S: MetricsSource + ?Sized,
    {
        let request = StatisticsRequest::make_with_prefix(prefix, Vec::new(), require_labels);
        let mut data = SnapshotData::default();
        source.visit_metrics(&mut SnapshotVisitor { data: &mut data }, &request);

        tracing::debug!(
            prefix = request.prefix(),
            paths = data.metrics.len(),
            entries = data.metrics.values().map(Vec::len).sum::<usize>(),
            "snapshot built"
        );
        Self { request, data: Arc::new(data) }
    }

    /// Number of indexed metric instances.
    pub fn len(&self) -> usize {
        self.data.metrics.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.data.metrics.is_empty()
    }

    /// The value of the only metric at `path` (relative to the snapshot
    /// prefix) whose labels include every label in `require_labels`.
    pub fn single_metric(
        &self,
        path: &str,
        require_labels: &[Label],
    ) -> Result<MetricValue, MetricQueryError> {
        let full_path = self.qualify(path);
        match self.single_entry(&full_path, require_labels)? {
            Some(entry) => Ok(entry.value),
            None => {
                tracing::debug!(path = %full_path, "no metric found");
                Err(MetricQueryError::new(format!(
                    "No metric found for request {}",
                    format_request(&full_path, require_labels)
                )))
            }
        }
    }

    /// Like [`Snapshot::single_metric`], but a missing metric is `Ok(None)`.
    /// Ambiguous queries still fail.
    pub fn single_metric_optional(
        &self,
        path: &str,
        require_labels: &[Label],
    ) -> Result<Option<MetricValue>, MetricQueryError> {
        let full_path = self.qualify(path);
        Ok(self.single_entry(&full_path, require_labels)?.map(|e| e.value))
    }

    fn qualify(&self, path: &str) -> String {
        qualify_path(self.request.prefix(), path)
    }

    fn single_entry(
        &self,
        full_path: &str,
        require_labels: &[Label],
    ) -> Result<Option<&SnapshotEntry>, MetricQueryError> {
        let candidates = self.data.metrics.get(full_path).map(Vec::as_slice).unwrap_or_default();
        let found: Vec<&SnapshotEntry> =
            candidates.iter().filter(|e| e.contains_all(require_labels)).collect();

        match found.as_slice() {
            [] => Ok(None),
            [single] => Ok(Some(*single)),
            many => {
                tracing::debug!(path = full_path, matches = many.len(), "ambiguous metric query");
                let mut msg = format!(
                    "Multiple metrics found for request {}",
                    format_request(full_path, require_labels)
                );
                for e in many {
                    let _ = write!(
                        msg,
                        "\n  {} {}",
                        format_request(full_path, e.labels.iter()),
                        e.value
                    );
                }
                Err(MetricQueryError::new(msg))
            }
        }
    }
}

/// Join `prefix` and `path` with a dot, unless either is empty.
pub fn qualify_path(prefix: &str, path: &str) -> String {
    let separator = if prefix.is_empty() || path.is_empty() { "" } else { PATH_SEPARATOR };
    format!("{prefix}{separator}{path}")
}

/// `path;label1;label2`, the identity used in query error messages.
pub(crate) fn format_request<'a, I>(path: &str, labels: I) -> String
where
    I: IntoIterator<Item = &'a Label>,
{
    let mut out = format!("{path};");
    let mut first = true;
    for l in labels {
        if !first {
            out.push(';');
        }
        first = false;
        let _ = write!(out, "{l}");
    }
    out
}
