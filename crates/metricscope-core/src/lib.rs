//! metricscope core: the metric data model, the visitor contract, and the
//! error surface shared by every exporter.
//!
//! A registry owns the live metrics and pushes them, one instance per
//! callback, into a [`FormatBuilder`]. This crate defines both sides of that
//! handshake and nothing else, so exporters and test helpers can be built on
//! top without pulling in a concrete registry.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. All fallible paths
//! surface as `MetricsError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod model;
pub mod visit;

/// Shared result type.
pub use error::{MetricQueryError, MetricsError, Result};
pub use model::{Label, LabelsSpan, MetricValue, PrefixMatch, StatisticsRequest, ValueVisitor};
pub use visit::{FormatBuilder, MetricsSource};
