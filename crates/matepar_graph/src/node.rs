//! Graph nodes and their outbound edges.

use crate::ids::{Label, NodeId};
use serde::{Deserialize, Serialize};

/// An outbound connection from a node.
///
/// Port names are opaque strings; they carry no physical meaning and are only
/// compared for equality when matching a netlist edge against a device edge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Output port name on the source node.
    pub source_port: String,
    /// The destination node, in the same graph as the source.
    pub dest: NodeId,
    /// Input port name on the destination node.
    pub dest_port: String,
}

impl Edge {
    /// Returns `true` if this edge leads to `dest` and uses the given ports.
    pub fn connects(&self, source_port: &str, dest: NodeId, dest_port: &str) -> bool {
        self.dest == dest && self.source_port == source_port && self.dest_port == dest_port
    }
}

/// A single node of a place-and-route graph.
///
/// Structural changes (labels, edges) and mating go through the owning
/// [`Graph`](crate::Graph) and the [`mate`](crate::mate) functions so that
/// label ranges and the mutual mate relation stay valid. Only the payload is
/// freely mutable.
#[derive(Clone, Debug)]
pub struct Node<T> {
    label: Label,
    alternate_labels: Vec<Label>,
    data: T,
    mate: Option<NodeId>,
    edges: Vec<Edge>,
}

impl<T> Node<T> {
    pub(crate) fn new(label: Label, data: T) -> Self {
        Self {
            label,
            alternate_labels: Vec::new(),
            data,
            mate: None,
            edges: Vec::new(),
        }
    }

    /// Returns the primary label.
    pub fn label(&self) -> Label {
        self.label
    }

    /// Returns the alternate labels in insertion order.
    ///
    /// Only meaningful on netlist nodes: a node may legally occupy a device
    /// site carrying any of these labels as well as its primary one.
    pub fn alternate_labels(&self) -> &[Label] {
        &self.alternate_labels
    }

    /// Returns `true` if `target` is the primary label or one of the alternates.
    pub fn matches_label(&self, target: Label) -> bool {
        self.label == target || self.alternate_labels.contains(&target)
    }

    /// Iterates over the primary label followed by the alternates.
    pub fn candidate_labels(&self) -> impl Iterator<Item = Label> + '_ {
        std::iter::once(self.label).chain(self.alternate_labels.iter().copied())
    }

    /// Returns the node of the other graph this one is paired with.
    pub fn mate(&self) -> Option<NodeId> {
        self.mate
    }

    /// Returns the outbound edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns the number of outbound edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if this node has an outbound edge matching the arguments.
    pub fn has_edge(&self, source_port: &str, dest: NodeId, dest_port: &str) -> bool {
        self.edges
            .iter()
            .any(|e| e.connects(source_port, dest, dest_port))
    }

    /// Returns the caller payload.
    pub fn data(&self) -> &T {
        &self.data
    }

    /// Returns the caller payload mutably.
    pub fn data_mut(&mut self) -> &mut T {
        &mut self.data
    }

    pub(crate) fn set_label(&mut self, label: Label) {
        self.label = label;
    }

    pub(crate) fn push_alternate_label(&mut self, label: Label) {
        if !self.matches_label(label) {
            self.alternate_labels.push(label);
        }
    }

    pub(crate) fn set_mate(&mut self, mate: Option<NodeId>) {
        self.mate = mate;
    }

    pub(crate) fn take_mate(&mut self) -> Option<NodeId> {
        self.mate.take()
    }

    pub(crate) fn push_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    pub(crate) fn retain_edges(&mut self, keep: impl FnMut(&Edge) -> bool) -> usize {
        let before = self.edges.len();
        self.edges.retain(keep);
        before - self.edges.len()
    }
}
