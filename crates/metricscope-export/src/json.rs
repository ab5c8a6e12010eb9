//! JSON export builder.
//!
//! Output shape: one top-level key per metric path, each mapping to an array
//! with one `{ "value": <number>, "labels": { .. } }` object per instance.
//! Paths nothing was delivered for never appear.

use std::collections::BTreeMap;

use serde::ser::Error as _;
use serde_json::{Map, Number, Value};

use metricscope_core::{
    FormatBuilder, LabelsSpan, MetricValue, MetricsSource, Result, StatisticsRequest, ValueVisitor,
};

/// Resolves a metric value into a typed JSON number.
///
/// Non-finite floats have no JSON representation and yield `None`.
struct JsonNumber;

impl ValueVisitor for JsonNumber {
    type Output = Option<Number>;

    fn visit_i64(self, v: i64) -> Option<Number> {
        Some(Number::from(v))
    }

    fn visit_f64(self, v: f64) -> Option<Number> {
        Number::from_f64(v)
    }
}

/// Accumulates visited metrics into a JSON document.
///
/// Single owner, single use: the `into_*` extractors consume the builder.
/// A value JSON cannot represent (NaN, infinities) makes every extractor
/// fail with `MetricsError::Json`.
#[derive(Debug, Default)]
pub struct JsonFormat {
    metrics: BTreeMap<String, Vec<Value>>,
    unrepresentable: Option<String>,
}

impl JsonFormat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_value(self) -> Result<Value> {
        if let Some(msg) = self.unrepresentable {
            return Err(serde_json::Error::custom(msg).into());
        }
        let root: Map<String, Value> = self
            .metrics
            .into_iter()
            .map(|(path, entries)| (path, Value::Array(entries)))
            .collect();
        Ok(Value::Object(root))
    }

    pub fn into_string(self) -> Result<String> {
        Ok(serde_json::to_string(&self.into_value()?)?)
    }

    pub fn into_string_pretty(self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.into_value()?)?)
    }

    fn build_labels(labels: LabelsSpan<'_>) -> Value {
        let obj: Map<String, Value> = labels
            .iter()
            .map(|l| (l.name().to_string(), Value::String(l.value().to_string())))
            .collect();
        Value::Object(obj)
    }
}

impl FormatBuilder for JsonFormat {
    fn handle_metric(&mut self, path: &str, labels: LabelsSpan<'_>, value: &MetricValue) {
        let Some(number) = value.visit(JsonNumber) else {
            tracing::debug!(path, %value, "metric value has no json representation");
            // Keep the first offender.
            if self.unrepresentable.is_none() {
                self.unrepresentable =
                    Some(format!("{path}: value {value} has no json representation"));
            }
            return;
        };

        let mut node = Map::new();
        node.insert("value".into(), Value::Number(number));
        node.insert("labels".into(), Self::build_labels(labels));

        tracing::trace!(path, labels = labels.len(), "json metric");
        self.metrics
            .entry(path.to_string())
            .or_default()
            .push(Value::Object(node));
    }
}

/// Export everything `request` selects from `source` as compact JSON.
pub fn to_json_format<S>(source: &S, request: &StatisticsRequest) -> Result<String>
where
    S: MetricsSource + ?Sized,
{
    let mut builder = JsonFormat::new();
    source.visit_metrics(&mut builder, request);
    builder.into_string()
}

/// Same as [`to_json_format`], indented for humans.
pub fn to_json_format_pretty<S>(source: &S, request: &StatisticsRequest) -> Result<String>
where
    S: MetricsSource + ?Sized,
{
    let mut builder = JsonFormat::new();
    source.visit_metrics(&mut builder, request);
    builder.into_string_pretty()
}
