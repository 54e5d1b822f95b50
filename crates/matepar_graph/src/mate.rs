//! The mutual mate relation between a netlist graph and a device graph.
//!
//! A mate link always spans two graphs, so these functions take both sides
//! mutably. After any call the relation is mutual and exclusive: if `a` is
//! mated to `b` then `b` is mated to `a`, and neither has another partner.

use crate::graph::Graph;
use crate::ids::NodeId;

/// Mates `node` of `graph` with `mate` of `other`, or clears its mate if `mate`
/// is `None`.
///
/// Any previous partner of `node` is released, as is any previous partner of
/// `mate`. Mating a node with its current partner is a no-op, and so is
/// clearing the mate of an unmated node.
///
/// # Panics
///
/// Panics if `node` does not belong to `graph` or `mate` does not belong to
/// `other`.
pub fn mate_with<A, B>(
    graph: &mut Graph<A>,
    node: NodeId,
    other: &mut Graph<B>,
    mate: Option<NodeId>,
) {
    if let Some(old) = graph.node_slot(node).take_mate() {
        other.node_slot(old).set_mate(None);
    }

    if let Some(new) = mate {
        if let Some(prev) = other.node_slot(new).take_mate() {
            graph.node_slot(prev).set_mate(None);
        }
        other.node_slot(new).set_mate(Some(node));
    }

    graph.node_slot(node).set_mate(mate);
}

/// Clears the mate of `node` and the back-pointer of its partner, if any.
pub fn unmate<A, B>(graph: &mut Graph<A>, node: NodeId, other: &mut Graph<B>) {
    mate_with(graph, node, other, None);
}

/// Returns `true` if every mate pointer in `a` and `b` is mirrored by the
/// partner, i.e. the relation is mutual and exclusive.
pub fn is_consistent<A, B>(a: &Graph<A>, b: &Graph<B>) -> bool {
    let forward = a.iter().all(|(id, node)| match node.mate() {
        Some(m) => b.get(m).is_some_and(|partner| partner.mate() == Some(id)),
        None => true,
    });
    let backward = b.iter().all(|(id, node)| match node.mate() {
        Some(m) => a.get(m).is_some_and(|partner| partner.mate() == Some(id)),
        None => true,
    });
    forward && backward
}
