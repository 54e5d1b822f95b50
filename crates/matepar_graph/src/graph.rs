//! Arena-owned place-and-route graph with label allocation and indexing.

use crate::ids::{Label, NodeId};
use crate::node::{Edge, Node};

/// A place-and-route graph: either a netlist or a device.
///
/// Nodes are stored in insertion order, which is also iteration order; every
/// pass over the graph is therefore reproducible. Labels are dense integers
/// handed out by [`allocate_label`](Self::allocate_label); a topology builder
/// typically allocates one per resource type and then adds nodes using them.
///
/// The per-label index built by [`index_nodes_by_label`](Self::index_nodes_by_label)
/// is a cache. It is not updated by later structural changes; queries against a
/// stale index see stale results.
#[derive(Clone, Debug)]
pub struct Graph<T> {
    nodes: Vec<Node<T>>,
    next_label: u32,
    label_index: Vec<Vec<NodeId>>,
}

impl<T> Default for Graph<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Graph<T> {
    /// Creates an empty graph with no labels allocated.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            next_label: 0,
            label_index: Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Labels

    /// Allocates a new label. Labels start at 0 and increase by one per call.
    pub fn allocate_label(&mut self) -> Label {
        let label = Label::from_raw(self.next_label);
        self.next_label += 1;
        label
    }

    /// Returns the most recently allocated label, or `None` if no label has
    /// been allocated yet.
    pub fn max_label(&self) -> Option<Label> {
        self.next_label.checked_sub(1).map(Label::from_raw)
    }

    /// Returns the number of labels allocated so far.
    pub fn label_count(&self) -> u32 {
        self.next_label
    }

    /// Iterates over every allocated label in increasing order.
    pub fn labels(&self) -> impl Iterator<Item = Label> {
        (0..self.next_label).map(Label::from_raw)
    }

    fn check_label(&self, label: Label) {
        assert!(
            label.as_raw() < self.next_label,
            "label {label} has not been allocated in this graph ({} allocated)",
            self.next_label
        );
    }

    // ------------------------------------------------------------------
    // Nodes

    /// Adds a node with the given primary label and payload.
    ///
    /// # Panics
    ///
    /// Panics if `label` has not been allocated by this graph.
    pub fn add_node(&mut self, label: Label, data: T) -> NodeId {
        self.check_label(label);
        let id = NodeId::from_raw(self.nodes.len() as u32);
        self.nodes.push(Node::new(label, data));
        id
    }

    /// Returns the node with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this graph.
    pub fn node(&self, id: NodeId) -> &Node<T> {
        &self.nodes[id.index()]
    }

    /// Returns the node with the given ID mutably (payload access only).
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        &mut self.nodes[id.index()]
    }

    /// Returns the node with the given ID, or `None` if it is out of range.
    pub fn get(&self, id: NodeId) -> Option<&Node<T>> {
        self.nodes.get(id.index())
    }

    pub(crate) fn node_slot(&mut self, id: NodeId) -> &mut Node<T> {
        &mut self.nodes[id.index()]
    }

    /// Returns the number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over all node IDs in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len() as u32).map(NodeId::from_raw)
    }

    /// Iterates over `(id, node)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node<T>)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId::from_raw(i as u32), n))
    }

    /// Changes the primary label of a node.
    ///
    /// Only meant for setting up constraints before placement; the label index
    /// must be rebuilt afterwards.
    ///
    /// # Panics
    ///
    /// Panics if `label` has not been allocated by this graph.
    pub fn relabel(&mut self, id: NodeId, label: Label) {
        self.check_label(label);
        self.node_slot(id).set_label(label);
    }

    /// Adds an alternate label to a node. Duplicates are ignored.
    ///
    /// # Panics
    ///
    /// Panics if `label` has not been allocated by this graph.
    pub fn add_alternate_label(&mut self, id: NodeId, label: Label) {
        self.check_label(label);
        self.node_slot(id).push_alternate_label(label);
    }

    // ------------------------------------------------------------------
    // Edges

    /// Adds an edge `source.source_port -> dest.dest_port`.
    ///
    /// # Panics
    ///
    /// Panics if either node does not belong to this graph.
    pub fn add_edge(
        &mut self,
        source: NodeId,
        source_port: impl Into<String>,
        dest: NodeId,
        dest_port: impl Into<String>,
    ) {
        assert!(
            dest.index() < self.nodes.len(),
            "edge destination {dest} is not a node of this graph"
        );
        self.node_slot(source).push_edge(Edge {
            source_port: source_port.into(),
            dest,
            dest_port: dest_port.into(),
        });
    }

    /// Removes every edge of `source` matching the given ports and destination.
    ///
    /// Returns the number of edges removed.
    pub fn remove_edge(
        &mut self,
        source: NodeId,
        source_port: &str,
        dest: NodeId,
        dest_port: &str,
    ) -> usize {
        self.node_slot(source)
            .retain_edges(|e| !e.connects(source_port, dest, dest_port))
    }

    /// Returns the total number of edges in the graph.
    pub fn num_edges(&self) -> usize {
        self.nodes.iter().map(Node::edge_count).sum()
    }

    /// Iterates over every edge in the graph as `(source, edge)`, ordered by
    /// source node then by edge insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, &Edge)> {
        self.iter()
            .flat_map(|(id, node)| node.edges().iter().map(move |e| (id, e)))
    }

    /// Iterates over every edge whose destination is `dest`, as `(source, edge)`.
    pub fn edges_into(&self, dest: NodeId) -> impl Iterator<Item = (NodeId, &Edge)> {
        self.edges().filter(move |(_, e)| e.dest == dest)
    }

    // ------------------------------------------------------------------
    // Label statistics and index

    /// Counts nodes per primary label. The result has one entry per allocated label.
    pub fn count_labels(&self) -> Vec<u32> {
        let mut counts = vec![0u32; self.next_label as usize];
        for node in &self.nodes {
            counts[node.label().index()] += 1;
        }
        counts
    }

    /// Rebuilds the per-label index.
    ///
    /// Every node is inserted into the bucket of its primary label first; a
    /// second pass adds nodes to the buckets of their alternate labels, so
    /// primary owners always precede alternate owners within a bucket.
    pub fn index_nodes_by_label(&mut self) {
        let mut index = vec![Vec::new(); self.next_label as usize];

        for (id, node) in self.iter() {
            index[node.label().index()].push(id);
        }
        for (id, node) in self.iter() {
            for alt in node.alternate_labels() {
                index[alt.index()].push(id);
            }
        }

        self.label_index = index;
    }

    /// Returns the indexed nodes carrying `label` as primary or alternate.
    ///
    /// Labels outside the index yield an empty slice.
    pub fn nodes_with_label(&self, label: Label) -> &[NodeId] {
        self.label_index
            .get(label.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns the number of indexed nodes carrying `label`.
    pub fn num_nodes_with_label(&self, label: Label) -> usize {
        self.nodes_with_label(label).len()
    }

    /// Returns the `index`-th node of the bucket for `label`.
    ///
    /// # Panics
    ///
    /// Panics if the bucket has fewer than `index + 1` entries.
    pub fn node_by_label_and_index(&self, label: Label, index: usize) -> NodeId {
        self.nodes_with_label(label)[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(g: &mut Graph<&'static str>, n: u32) -> Vec<Label> {
        (0..n).map(|_| g.allocate_label()).collect()
    }

    #[test]
    fn label_allocation_is_dense() {
        let mut g: Graph<()> = Graph::new();
        assert_eq!(g.max_label(), None);
        assert_eq!(g.label_count(), 0);

        assert_eq!(g.allocate_label(), Label::from_raw(0));
        assert_eq!(g.max_label(), Some(Label::from_raw(0)));
        assert_eq!(g.allocate_label(), Label::from_raw(1));
        assert_eq!(g.allocate_label(), Label::from_raw(2));
        assert_eq!(g.max_label(), Some(Label::from_raw(2)));
        assert_eq!(g.labels().count(), 3);
    }

    #[test]
    #[should_panic(expected = "has not been allocated")]
    fn add_node_rejects_unallocated_label() {
        let mut g = Graph::new();
        g.allocate_label();
        g.add_node(Label::from_raw(1), ());
    }

    #[test]
    fn nodes_keep_insertion_order() {
        let mut g = Graph::new();
        let l = labels(&mut g, 1);
        let a = g.add_node(l[0], "a");
        let b = g.add_node(l[0], "b");
        assert_eq!(g.node_ids().collect::<Vec<_>>(), vec![a, b]);
        assert_eq!(*g.node(b).data(), "b");
        assert_eq!(g.num_nodes(), 2);
        assert!(g.get(NodeId::from_raw(2)).is_none());
    }

    #[test]
    fn edge_counting_and_removal() {
        let mut g = Graph::new();
        let l = labels(&mut g, 1);
        let a = g.add_node(l[0], "a");
        let b = g.add_node(l[0], "b");
        g.add_edge(a, "O", b, "I");
        g.add_edge(a, "O", b, "I");
        g.add_edge(a, "O", b, "J");
        g.add_edge(b, "O", a, "I");
        assert_eq!(g.num_edges(), 4);
        assert!(g.node(a).has_edge("O", b, "J"));

        assert_eq!(g.remove_edge(a, "O", b, "I"), 2);
        assert_eq!(g.num_edges(), 2);
        assert_eq!(g.remove_edge(a, "O", b, "I"), 0);
    }

    #[test]
    fn edges_into_finds_incoming() {
        let mut g = Graph::new();
        let l = labels(&mut g, 1);
        let a = g.add_node(l[0], "a");
        let b = g.add_node(l[0], "b");
        let c = g.add_node(l[0], "c");
        g.add_edge(a, "O", c, "I0");
        g.add_edge(b, "O", c, "I1");
        g.add_edge(c, "O", a, "I0");

        let sources: Vec<NodeId> = g.edges_into(c).map(|(s, _)| s).collect();
        assert_eq!(sources, vec![a, b]);
    }

    #[test]
    fn index_puts_primary_before_alternate() {
        let mut g = Graph::new();
        let l = labels(&mut g, 3);
        let alt_owner = g.add_node(l[0], "lut_as_pgen");
        let primary = g.add_node(l[2], "pgen");
        g.add_alternate_label(alt_owner, l[2]);
        g.index_nodes_by_label();

        assert_eq!(g.nodes_with_label(l[2]), &[primary, alt_owner]);
        assert_eq!(g.num_nodes_with_label(l[0]), 1);
        assert_eq!(g.num_nodes_with_label(l[1]), 0);
        assert_eq!(g.node_by_label_and_index(l[2], 1), alt_owner);
    }

    #[test]
    fn index_is_a_cache() {
        let mut g = Graph::new();
        let l = labels(&mut g, 2);
        let a = g.add_node(l[0], "a");
        g.index_nodes_by_label();
        g.relabel(a, l[1]);

        // Stale until rebuilt.
        assert_eq!(g.nodes_with_label(l[0]), &[a]);
        g.index_nodes_by_label();
        assert!(g.nodes_with_label(l[0]).is_empty());
        assert_eq!(g.nodes_with_label(l[1]), &[a]);
    }

    #[test]
    fn unindexed_label_is_empty() {
        let mut g: Graph<()> = Graph::new();
        g.allocate_label();
        assert_eq!(g.num_nodes_with_label(Label::from_raw(0)), 0);
        assert_eq!(g.num_nodes_with_label(Label::from_raw(9)), 0);
    }

    #[test]
    fn count_labels_ignores_alternates() {
        let mut g = Graph::new();
        let l = labels(&mut g, 3);
        let a = g.add_node(l[0], "a");
        g.add_node(l[0], "b");
        g.add_node(l[2], "c");
        g.add_alternate_label(a, l[1]);
        assert_eq!(g.count_labels(), vec![2, 0, 1]);
    }
}
