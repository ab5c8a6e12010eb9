//! Snapshot index and single-metric lookup tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::thread;

use metricscope_core::{Label, MetricValue};
use metricscope_export::snapshot::qualify_path;
use metricscope_export::{Snapshot, Storage};

fn l(name: &str, value: &str) -> Label {
    Label::new(name, value)
}

fn requests_registry() -> Storage {
    let storage = Storage::new();
    let total = storage.counter("requests.total").unwrap();
    total.add(&[("code", "200")], 5).unwrap();
    total.add(&[("code", "500")], 1).unwrap();
    storage
}

#[test]
fn single_metric_by_label() {
    let snapshot = Snapshot::new(&requests_registry(), "", vec![]);
    let v = snapshot.single_metric("requests.total", &[l("code", "200")]).unwrap();
    assert_eq!(v, MetricValue::from(5));
}

#[test]
fn ambiguous_query_lists_every_candidate() {
    let snapshot = Snapshot::new(&requests_registry(), "", vec![]);
    let err = snapshot.single_metric("requests.total", &[]).unwrap_err();
    let msg = err.to_string();
    assert!(msg.starts_with("Multiple metrics found for request requests.total;"), "{msg}");
    assert!(msg.contains("requests.total;code=200 5"), "{msg}");
    assert!(msg.contains("requests.total;code=500 1"), "{msg}");
}

#[test]
fn missing_label_value_is_not_found() {
    let snapshot = Snapshot::new(&requests_registry(), "", vec![]);
    let err = snapshot.single_metric("requests.total", &[l("code", "404")]).unwrap_err();
    assert_eq!(err.message(), "No metric found for request requests.total;code=404");

    let err = snapshot.single_metric("requests.missing", &[]).unwrap_err();
    assert!(err.message().starts_with("No metric found"));
}

#[test]
fn prefix_is_prepended_to_queries() {
    let storage = Storage::new();
    storage.gauge("http.server.latency").unwrap().set(&[], 12.5).unwrap();
    storage.gauge("grpc.server.latency").unwrap().set(&[], 99.0).unwrap();

    let snapshot = Snapshot::new(&storage, "http", vec![]);
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.single_metric("server.latency", &[]).unwrap(), MetricValue::from(12.5));
}

#[test]
fn query_labels_are_a_subset_of_entry_labels() {
    let storage = Storage::new();
    let c = storage.counter("tasks.done").unwrap();
    c.add(&[("queue", "fast"), ("worker", "1")], 3).unwrap();
    c.add(&[("queue", "slow"), ("worker", "1")], 4).unwrap();

    let snapshot = Snapshot::new(&storage, "", vec![]);
    assert_eq!(
        snapshot.single_metric("tasks.done", &[l("queue", "slow")]).unwrap(),
        MetricValue::from(4)
    );
    assert_eq!(
        snapshot.single_metric("tasks.done", &[l("worker", "1"), l("queue", "fast")]).unwrap(),
        MetricValue::from(3)
    );
    assert!(snapshot.single_metric("tasks.done", &[l("worker", "1")]).is_err());
    assert!(snapshot.single_metric("tasks.done", &[l("queue", "fast"), l("worker", "2")]).is_err());
}

#[test]
fn constructor_labels_filter_the_traversal() {
    let snapshot = Snapshot::new(&requests_registry(), "requests", vec![l("code", "500")]);
    assert_eq!(snapshot.len(), 1);
    // Only one instance survived the traversal, so an empty filter is unambiguous.
    assert_eq!(snapshot.single_metric("total", &[]).unwrap(), MetricValue::from(1));
}

#[test]
fn snapshot_is_frozen_at_construction() {
    let storage = requests_registry();
    let snapshot = Snapshot::new(&storage, "", vec![]);
    storage.counter("requests.total").unwrap().add(&[("code", "200")], 10).unwrap();

    let ok = [l("code", "200")];
    assert_eq!(snapshot.single_metric("requests.total", &ok).unwrap(), MetricValue::from(5));
    let fresh = Snapshot::new(&storage, "", vec![]);
    assert_eq!(fresh.single_metric("requests.total", &ok).unwrap(), MetricValue::from(15));
}

#[test]
fn optional_lookup() {
    let snapshot = Snapshot::new(&requests_registry(), "", vec![]);
    let missing = snapshot.single_metric_optional("requests.total", &[l("code", "404")]);
    assert_eq!(missing.unwrap(), None);
    assert_eq!(
        snapshot.single_metric_optional("requests.total", &[l("code", "500")]).unwrap(),
        Some(MetricValue::from(1))
    );
    assert!(snapshot.single_metric_optional("requests.total", &[]).is_err());
}

#[test]
fn shared_across_threads() {
    let snapshot = Arc::new(Snapshot::new(&requests_registry(), "requests", vec![]));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let s = Arc::clone(&snapshot);
            thread::spawn(move || s.single_metric("total", &[l("code", "200")]).unwrap())
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), MetricValue::from(5));
    }
}

#[test]
fn path_joining() {
    assert_eq!(qualify_path("http", "server.latency"), "http.server.latency");
    assert_eq!(qualify_path("", "server.latency"), "server.latency");
    assert_eq!(qualify_path("http", ""), "http");
    assert_eq!(qualify_path("", ""), "");
}
