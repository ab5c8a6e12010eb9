//! Traversal filter descriptor.

use serde::Deserialize;

use super::label::Label;

/// How `StatisticsRequest::prefix` is compared against metric paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrefixMatch {
    /// Path must start with the prefix.
    #[default]
    Prefix,
    /// Path must equal the prefix.
    Exact,
}

/// Immutable filter applied by a registry during one traversal.
///
/// Metrics whose path fails `prefix` or whose labels lack any of
/// `require_labels` (exact name and value) are not delivered. `add_labels`
/// are appended to every delivered metric that does not already carry a
/// label of the same name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatisticsRequest {
    prefix: String,
    prefix_match: PrefixMatch,
    add_labels: Vec<Label>,
    require_labels: Vec<Label>,
}

impl StatisticsRequest {
    /// Deliver every metric whose path starts with `prefix`.
    pub fn make_with_prefix(
        prefix: impl Into<String>,
        add_labels: Vec<Label>,
        require_labels: Vec<Label>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            prefix_match: PrefixMatch::Prefix,
            add_labels,
            require_labels,
        }
    }

    /// Deliver only metrics whose path equals `path`.
    pub fn make_with_path(
        path: impl Into<String>,
        add_labels: Vec<Label>,
        require_labels: Vec<Label>,
    ) -> Self {
        Self {
            prefix: path.into(),
            prefix_match: PrefixMatch::Exact,
            add_labels,
            require_labels,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn prefix_match(&self) -> PrefixMatch {
        self.prefix_match
    }

    pub fn add_labels(&self) -> &[Label] {
        &self.add_labels
    }

    pub fn require_labels(&self) -> &[Label] {
        &self.require_labels
    }

    pub fn matches_path(&self, path: &str) -> bool {
        match self.prefix_match {
            PrefixMatch::Prefix => path.starts_with(&self.prefix),
            PrefixMatch::Exact => path == self.prefix,
        }
    }

    /// Every required label appears in `labels` with the same value.
    pub fn matches_labels(&self, labels: &[Label]) -> bool {
        self.require_labels.iter().all(|r| labels.contains(r))
    }

    pub fn matches(&self, path: &str, labels: &[Label]) -> bool {
        self.matches_path(path) && self.matches_labels(labels)
    }

    /// `labels` extended with the request's `add_labels`; existing names win.
    pub fn decorate(&self, labels: &[Label]) -> Vec<Label> {
        let mut out = labels.to_vec();
        for extra in &self.add_labels {
            if !out.iter().any(|l| l.name() == extra.name()) {
                out.push(extra.clone());
            }
        }
        out
    }
}
