//! Labels and the borrowed label view passed to visitors.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::{MetricsError, Result};

/// A `name=value` pair distinguishing metric instances on one path.
///
/// Ordering is by name, then value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Label {
    name: String,
    value: String,
}

impl Label {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: value.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// Reject label sets carrying the same name twice.
pub fn ensure_unique_names(labels: &[Label]) -> Result<()> {
    let mut seen = BTreeSet::new();
    for l in labels {
        if !seen.insert(l.name()) {
            return Err(MetricsError::BadRequest(format!(
                "duplicate label name: {}",
                l.name()
            )));
        }
    }
    Ok(())
}

/// Read-only view over one metric instance's labels.
///
/// Only valid for the duration of a [`crate::FormatBuilder::handle_metric`]
/// call. Builders that keep labels past the callback must copy them
/// (`to_vec` / `to_set`).
#[derive(Debug, Clone, Copy)]
pub struct LabelsSpan<'a> {
    labels: &'a [Label],
}

impl<'a> LabelsSpan<'a> {
    pub fn new(labels: &'a [Label]) -> Self {
        Self { labels }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'a, Label> {
        self.labels.iter()
    }

    pub fn to_vec(&self) -> Vec<Label> {
        self.labels.to_vec()
    }

    pub fn to_set(&self) -> BTreeSet<Label> {
        self.labels.iter().cloned().collect()
    }
}

impl<'a> IntoIterator for LabelsSpan<'a> {
    type Item = &'a Label;
    type IntoIter = std::slice::Iter<'a, Label>;

    fn into_iter(self) -> Self::IntoIter {
        self.labels.iter()
    }
}
