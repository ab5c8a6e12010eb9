//! Label, value, and request model tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use metricscope_core::model::label::ensure_unique_names;
use metricscope_core::{
    Label, LabelsSpan, MetricValue, PrefixMatch, StatisticsRequest, ValueVisitor,
};

fn l(name: &str, value: &str) -> Label {
    Label::new(name, value)
}

#[test]
fn labels_order_by_name_then_value() {
    let mut labels = vec![l("worker", "2"), l("code", "500"), l("worker", "1"), l("code", "200")];
    labels.sort();
    assert_eq!(
        labels,
        vec![l("code", "200"), l("code", "500"), l("worker", "1"), l("worker", "2")]
    );
    assert_eq!(l("code", "200").to_string(), "code=200");
}

#[test]
fn duplicate_label_names_rejected() {
    assert!(ensure_unique_names(&[l("a", "1"), l("b", "1")]).is_ok());
    let err = ensure_unique_names(&[l("a", "1"), l("a", "2")]).unwrap_err();
    assert_eq!(err.code().as_str(), "BAD_REQUEST");
}

#[test]
fn labels_span_copies_into_set() {
    let owned = vec![l("b", "2"), l("a", "1")];
    let span = LabelsSpan::new(&owned);
    assert_eq!(span.len(), 2);
    assert!(span.iter().any(|x| x.name() == "a" && x.value() == "1"));
    let set = span.to_set();
    assert_eq!(set.iter().next(), Some(&l("a", "1")));
}

struct Describe;

impl ValueVisitor for Describe {
    type Output = String;

    fn visit_i64(self, v: i64) -> String {
        format!("int:{v}")
    }

    fn visit_f64(self, v: f64) -> String {
        format!("float:{v}")
    }
}

#[test]
fn value_visit_dispatches_on_representation() {
    assert_eq!(MetricValue::from(5).visit(Describe), "int:5");
    assert_eq!(MetricValue::from(2.5).visit(Describe), "float:2.5");
    assert_eq!(MetricValue::from(2.5f64).to_string(), "2.5");
    assert_ne!(MetricValue::from(1), MetricValue::from(1.0));
}

#[test]
fn value_serde_keeps_representation() {
    assert_eq!(serde_json::to_string(&MetricValue::from(42)).unwrap(), "42");
    assert_eq!(serde_json::to_string(&MetricValue::from(3.14)).unwrap(), "3.14");

    let v: MetricValue = serde_json::from_str("7").unwrap();
    assert_eq!(v.visit(Describe), "int:7");
    let v: MetricValue = serde_json::from_str("7.5").unwrap();
    assert_eq!(v.visit(Describe), "float:7.5");
    let v: MetricValue = serde_json::from_str("18446744073709551615").unwrap();
    assert!(v.visit(Describe).starts_with("float:"));
    assert!(serde_json::from_str::<MetricValue>("\"7\"").is_err());
}

#[test]
fn request_prefix_and_path_matching() {
    let req = StatisticsRequest::make_with_prefix("http", vec![], vec![]);
    assert_eq!(req.prefix_match(), PrefixMatch::Prefix);
    assert!(req.matches_path("http.server.latency"));
    assert!(req.matches_path("http"));
    assert!(!req.matches_path("grpc.server"));

    let req = StatisticsRequest::make_with_path("http.requests", vec![], vec![]);
    assert!(req.matches_path("http.requests"));
    assert!(!req.matches_path("http.requests.total"));

    let all = StatisticsRequest::default();
    assert!(all.matches_path("anything"));
}

#[test]
fn request_requires_exact_label_values() {
    let req = StatisticsRequest::make_with_prefix("", vec![], vec![l("code", "200")]);
    assert!(req.matches_labels(&[l("code", "200"), l("worker", "1")]));
    assert!(!req.matches_labels(&[l("code", "500")]));
    assert!(!req.matches_labels(&[]));
}

#[test]
fn request_decorate_keeps_existing_names() {
    let req = StatisticsRequest::make_with_prefix("", vec![l("host", "a"), l("code", "x")], vec![]);
    let out = req.decorate(&[l("code", "200")]);
    assert_eq!(out, vec![l("code", "200"), l("host", "a")]);
}
