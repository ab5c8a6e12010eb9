//! Metric data model shared by registries and exporters.
//!
//! - `label`: name/value pairs and the borrowed view handed to visitors.
//! - `value`: the closed numeric sum type and its visitation API.
//! - `request`: the traversal filter (path prefix + required labels).

pub mod label;
pub mod request;
pub mod value;

pub use label::{Label, LabelsSpan};
pub use request::{PrefixMatch, StatisticsRequest};
pub use value::{MetricValue, ValueVisitor};
