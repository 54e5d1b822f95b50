//! Human-readable label names for diagnostics.

use crate::ids::Label;
use crate::node::Node;
use std::collections::BTreeMap;

/// Maps labels to display names.
///
/// Names carry no semantic weight; they only make diagnostic messages readable.
/// Labels without a name are rendered as `label N`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelNames(BTreeMap<Label, String>);

impl LabelNames {
    /// Creates an empty name map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name of `label`, replacing any previous one.
    pub fn insert(&mut self, label: Label, name: impl Into<String>) {
        self.0.insert(label, name.into());
    }

    /// Returns the registered name of `label`, if any.
    pub fn get(&self, label: Label) -> Option<&str> {
        self.0.get(&label).map(String::as_str)
    }

    /// Returns the name of `label`, falling back to `label N`.
    pub fn name(&self, label: Label) -> String {
        match self.get(label) {
            Some(name) => name.to_string(),
            None => format!("label {label}"),
        }
    }

    /// Describes `label` as `label N (NAME)`, or `label N` when unnamed.
    pub fn describe(&self, label: Label) -> String {
        match self.get(label) {
            Some(name) => format!("label {label} ({name})"),
            None => format!("label {label}"),
        }
    }

    /// Lists every label a node may occupy, primary first, separated by `/`.
    pub fn node_types<T>(&self, node: &Node<T>) -> String {
        node.candidate_labels()
            .map(|l| self.name(l))
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Returns the number of named labels.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no label is named.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(Label, S)> for LabelNames {
    fn from_iter<I: IntoIterator<Item = (Label, S)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(l, s)| (l, s.into())).collect())
    }
}

impl From<BTreeMap<Label, String>> for LabelNames {
    fn from(map: BTreeMap<Label, String>) -> Self {
        Self(map)
    }
}
