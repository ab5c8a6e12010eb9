//! metricscope export library entry.
//!
//! This crate holds the consumers of the visitor contract (the JSON exporter
//! and the snapshot query engine), an in-memory registry that feeds them, a
//! reader for exported documents, and the YAML config used by the
//! `metricscope-dump` binary.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod config;
pub mod document;
pub mod json;
pub mod snapshot;
pub mod storage;

pub use document::{MetricEntry, MetricsDocument};
pub use json::{to_json_format, to_json_format_pretty, JsonFormat};
pub use snapshot::Snapshot;
pub use storage::{CounterVec, GaugeVec, Storage};
