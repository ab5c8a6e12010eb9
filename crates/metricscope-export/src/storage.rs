//! In-memory metrics registry.
//!
//! Families are keyed by path and hold either integer counters or float
//! gauges with dynamic labels, backed by `DashMap`. Labels are flattened into
//! sorted vectors so each label set has one canonical key. Traversal copies
//! matching rows out before calling the visitor, so a builder may touch the
//! registry without deadlocking on shard locks.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use metricscope_core::model::label::ensure_unique_names;
use metricscope_core::{
    FormatBuilder, Label, LabelsSpan, MetricValue, MetricsError, MetricsSource, Result,
    StatisticsRequest,
};

/// Build the canonical (sorted, duplicate-free) key for a label set.
fn label_key(labels: &[(&str, &str)]) -> Result<Vec<Label>> {
    let mut key: Vec<Label> = labels.iter().map(|(k, v)| Label::new(*k, *v)).collect();
    key.sort();
    ensure_unique_names(&key)?;
    Ok(key)
}

type Row = (String, Vec<Label>, MetricValue);

fn push_row(
    rows: &mut Vec<Row>,
    path: &str,
    labels: &[Label],
    value: MetricValue,
    request: &StatisticsRequest,
) {
    if !request.matches_labels(labels) {
        return;
    }
    let mut labels = request.decorate(labels);
    labels.sort();
    rows.push((path.to_string(), labels, value));
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<Vec<Label>, AtomicI64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) -> Result<()> {
        self.add(labels, 1)
    }

    /// Increment by an arbitrary value.
    pub fn add(&self, labels: &[(&str, &str)], v: i64) -> Result<()> {
        let key = label_key(labels)?;
        let counter = self.map.entry(key).or_insert_with(|| AtomicI64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
        Ok(())
    }

    /// Current value for a label set, if it was ever touched.
    pub fn get(&self, labels: &[(&str, &str)]) -> Option<i64> {
        let key = label_key(labels).ok()?;
        self.map.get(&key).map(|c| c.load(Ordering::Relaxed))
    }

    fn collect(&self, path: &str, request: &StatisticsRequest, rows: &mut Vec<Row>) {
        for r in self.map.iter() {
            let value = MetricValue::from(r.value().load(Ordering::Relaxed));
            push_row(rows, path, r.key(), value, request);
        }
    }
}

/// Float gauges, stored as `f64` bits.
#[derive(Default)]
pub struct GaugeVec {
    map: DashMap<Vec<Label>, AtomicU64>,
}

impl GaugeVec {
    pub fn set(&self, labels: &[(&str, &str)], v: f64) -> Result<()> {
        let key = label_key(labels)?;
        let gauge = self.map.entry(key).or_insert_with(|| AtomicU64::new(0f64.to_bits()));
        gauge.store(v.to_bits(), Ordering::Relaxed);
        Ok(())
    }

    /// Add a signed delta.
    pub fn add(&self, labels: &[(&str, &str)], delta: f64) -> Result<()> {
        let key = label_key(labels)?;
        let gauge = self.map.entry(key).or_insert_with(|| AtomicU64::new(0f64.to_bits()));
        let _ = gauge.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |bits| {
            Some((f64::from_bits(bits) + delta).to_bits())
        });
        Ok(())
    }

    pub fn get(&self, labels: &[(&str, &str)]) -> Option<f64> {
        let key = label_key(labels).ok()?;
        self.map.get(&key).map(|g| f64::from_bits(g.load(Ordering::Relaxed)))
    }

    fn collect(&self, path: &str, request: &StatisticsRequest, rows: &mut Vec<Row>) {
        for r in self.map.iter() {
            let value = MetricValue::from(f64::from_bits(r.value().load(Ordering::Relaxed)));
            push_row(rows, path, r.key(), value, request);
        }
    }
}

enum Family {
    Counter(Arc<CounterVec>),
    Gauge(Arc<GaugeVec>),
}

/// Registry of metric families keyed by dot-separated path.
#[derive(Default)]
pub struct Storage {
    families: DashMap<String, Family>,
}

impl Storage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counter family at `path`, created on first use.
    pub fn counter(&self, path: &str) -> Result<Arc<CounterVec>> {
        check_path(path)?;
        let family = self.families.entry(path.to_string()).or_insert_with(|| {
            tracing::debug!(path, "register counter family");
            Family::Counter(Arc::default())
        });
        match &*family {
            Family::Counter(c) => Ok(Arc::clone(c)),
            Family::Gauge(_) => Err(MetricsError::BadRequest(format!(
                "{path} is already registered as a gauge"
            ))),
        }
    }

    /// Gauge family at `path`, created on first use.
    pub fn gauge(&self, path: &str) -> Result<Arc<GaugeVec>> {
        check_path(path)?;
        let family = self.families.entry(path.to_string()).or_insert_with(|| {
            tracing::debug!(path, "register gauge family");
            Family::Gauge(Arc::default())
        });
        match &*family {
            Family::Gauge(g) => Ok(Arc::clone(g)),
            Family::Counter(_) => Err(MetricsError::BadRequest(format!(
                "{path} is already registered as a counter"
            ))),
        }
    }
}

fn check_path(path: &str) -> Result<()> {
    if path.is_empty() || path.split('.').any(str::is_empty) {
        return Err(MetricsError::BadRequest(format!("invalid metric path: {path:?}")));
    }
    Ok(())
}

impl MetricsSource for Storage {
    fn visit_metrics(&self, out: &mut dyn FormatBuilder, request: &StatisticsRequest) {
        let mut rows = Vec::new();
        for family in self.families.iter() {
            let path = family.key();
            if !request.matches_path(path) {
                continue;
            }
            match family.value() {
                Family::Counter(c) => c.collect(path, request, &mut rows),
                Family::Gauge(g) => g.collect(path, request, &mut rows),
            }
        }
        // Deterministic delivery order: path, then label set.
        rows.sort_by(|a, b| (&a.0, &a.1).cmp(&(&b.0, &b.1)));

        tracing::trace!(prefix = request.prefix(), delivered = rows.len(), "visit metrics");
        for (path, labels, value) in &rows {
            out.handle_metric(path, LabelsSpan::new(labels), value);
        }
    }
}
