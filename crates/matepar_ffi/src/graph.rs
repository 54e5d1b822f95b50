//! C functions over graphs, nodes and edges.
//!
//! Nodes are addressed by their index in the graph. Out-of-range indices and
//! unallocated labels are ignored: queries return `MATEPAR_NO_NODE`, 0 or
//! `false`, and mutations do nothing.

use crate::buffer::str_arg;
use matepar_graph::{mate_with, Graph, Label, NodeId};
use std::ffi::c_void;
use std::ptr;

/// A graph whose node payloads are opaque caller pointers.
pub type MateparGraph = Graph<*mut c_void>;

/// Node index meaning "no node".
pub const MATEPAR_NO_NODE: u32 = u32::MAX;

pub(crate) fn node_id<T>(graph: &Graph<T>, raw: u32) -> Option<NodeId> {
    ((raw as usize) < graph.num_nodes()).then(|| NodeId::from_raw(raw))
}

fn label_id<T>(graph: &Graph<T>, raw: u32) -> Option<Label> {
    (raw < graph.label_count()).then(|| Label::from_raw(raw))
}

pub(crate) fn raw_node(node: Option<NodeId>) -> u32 {
    node.map_or(MATEPAR_NO_NODE, NodeId::as_raw)
}

/// Creates an empty graph. Free it with [`matepar_graph_destroy`].
#[no_mangle]
pub extern "C" fn matepar_graph_create() -> *mut MateparGraph {
    Box::into_raw(Box::new(Graph::new()))
}

/// Destroys a graph. Node payloads are not touched.
///
/// # Safety
///
/// `graph` must be null or come from [`matepar_graph_create`], and must not be
/// used by a live engine.
#[no_mangle]
pub unsafe extern "C" fn matepar_graph_destroy(graph: *mut MateparGraph) {
    if !graph.is_null() {
        drop(Box::from_raw(graph));
    }
}

/// Allocates the next label.
///
/// # Safety
///
/// `graph` must be a valid graph handle.
#[no_mangle]
pub unsafe extern "C" fn matepar_graph_allocate_label(graph: *mut MateparGraph) -> u32 {
    match graph.as_mut() {
        Some(g) => g.allocate_label().as_raw(),
        None => 0,
    }
}

/// Returns the largest allocated label, or -1 if none has been allocated.
///
/// # Safety
///
/// `graph` must be a valid graph handle.
#[no_mangle]
pub unsafe extern "C" fn matepar_graph_max_label(graph: *const MateparGraph) -> i64 {
    graph
        .as_ref()
        .and_then(Graph::max_label)
        .map_or(-1, |l| i64::from(l.as_raw()))
}

/// Adds a node and returns its index, or `MATEPAR_NO_NODE` if `label` is not allocated.
///
/// # Safety
///
/// `graph` must be a valid graph handle. `data` is stored but never dereferenced.
#[no_mangle]
pub unsafe extern "C" fn matepar_graph_add_node(
    graph: *mut MateparGraph,
    label: u32,
    data: *mut c_void,
) -> u32 {
    let Some(g) = graph.as_mut() else {
        return MATEPAR_NO_NODE;
    };
    match label_id(g, label) {
        Some(label) => g.add_node(label, data).as_raw(),
        None => MATEPAR_NO_NODE,
    }
}

/// Returns the number of nodes.
///
/// # Safety
///
/// `graph` must be a valid graph handle.
#[no_mangle]
pub unsafe extern "C" fn matepar_graph_num_nodes(graph: *const MateparGraph) -> u32 {
    graph.as_ref().map_or(0, |g| g.num_nodes() as u32)
}

/// Returns the number of edges.
///
/// # Safety
///
/// `graph` must be a valid graph handle.
#[no_mangle]
pub unsafe extern "C" fn matepar_graph_num_edges(graph: *const MateparGraph) -> u32 {
    graph.as_ref().map_or(0, |g| g.num_edges() as u32)
}

/// Rebuilds the per-label node index.
///
/// # Safety
///
/// `graph` must be a valid graph handle.
#[no_mangle]
pub unsafe extern "C" fn matepar_graph_index_nodes_by_label(graph: *mut MateparGraph) {
    if let Some(g) = graph.as_mut() {
        g.index_nodes_by_label();
    }
}

/// Returns the number of indexed nodes carrying `label`.
///
/// # Safety
///
/// `graph` must be a valid graph handle.
#[no_mangle]
pub unsafe extern "C" fn matepar_graph_num_nodes_with_label(
    graph: *const MateparGraph,
    label: u32,
) -> u32 {
    graph
        .as_ref()
        .map_or(0, |g| g.num_nodes_with_label(Label::from_raw(label)) as u32)
}

/// Returns the `index`-th indexed node carrying `label`, or `MATEPAR_NO_NODE`.
///
/// # Safety
///
/// `graph` must be a valid graph handle.
#[no_mangle]
pub unsafe extern "C" fn matepar_graph_node_by_label_and_index(
    graph: *const MateparGraph,
    label: u32,
    index: u32,
) -> u32 {
    let Some(g) = graph.as_ref() else {
        return MATEPAR_NO_NODE;
    };
    raw_node(
        g.nodes_with_label(Label::from_raw(label))
            .get(index as usize)
            .copied(),
    )
}

/// Adds the edge `source.source_port -> dest.dest_port`. Port names are copied.
///
/// # Safety
///
/// `graph` must be a valid graph handle; each port pointer must be null or
/// point to the given number of bytes.
#[no_mangle]
pub unsafe extern "C" fn matepar_graph_add_edge(
    graph: *mut MateparGraph,
    source: u32,
    source_port: *const u8,
    source_port_len: usize,
    dest: u32,
    dest_port: *const u8,
    dest_port_len: usize,
) {
    let Some(g) = graph.as_mut() else { return };
    if let (Some(src), Some(dst)) = (node_id(g, source), node_id(g, dest)) {
        g.add_edge(
            src,
            str_arg(source_port, source_port_len),
            dst,
            str_arg(dest_port, dest_port_len),
        );
    }
}

/// Removes every matching edge and returns how many were removed.
///
/// # Safety
///
/// Same as [`matepar_graph_add_edge`].
#[no_mangle]
pub unsafe extern "C" fn matepar_graph_remove_edge(
    graph: *mut MateparGraph,
    source: u32,
    source_port: *const u8,
    source_port_len: usize,
    dest: u32,
    dest_port: *const u8,
    dest_port_len: usize,
) -> u32 {
    let Some(g) = graph.as_mut() else { return 0 };
    match (node_id(g, source), node_id(g, dest)) {
        (Some(src), Some(dst)) => g.remove_edge(
            src,
            &str_arg(source_port, source_port_len),
            dst,
            &str_arg(dest_port, dest_port_len),
        ) as u32,
        _ => 0,
    }
}

/// Returns the primary label of a node, or `u32::MAX` for an invalid node.
///
/// # Safety
///
/// `graph` must be a valid graph handle.
#[no_mangle]
pub unsafe extern "C" fn matepar_node_label(graph: *const MateparGraph, node: u32) -> u32 {
    graph
        .as_ref()
        .and_then(|g| node_id(g, node).map(|n| g.node(n).label().as_raw()))
        .unwrap_or(u32::MAX)
}

/// Changes the primary label of a node.
///
/// # Safety
///
/// `graph` must be a valid graph handle.
#[no_mangle]
pub unsafe extern "C" fn matepar_node_relabel(graph: *mut MateparGraph, node: u32, label: u32) {
    let Some(g) = graph.as_mut() else { return };
    if let (Some(n), Some(l)) = (node_id(g, node), label_id(g, label)) {
        g.relabel(n, l);
    }
}

/// Returns the payload pointer of a node, or null for an invalid node.
///
/// # Safety
///
/// `graph` must be a valid graph handle.
#[no_mangle]
pub unsafe extern "C" fn matepar_node_data(graph: *const MateparGraph, node: u32) -> *mut c_void {
    graph
        .as_ref()
        .and_then(|g| node_id(g, node).map(|n| *g.node(n).data()))
        .unwrap_or(ptr::null_mut())
}

/// Adds an alternate label to a node.
///
/// # Safety
///
/// `graph` must be a valid graph handle.
#[no_mangle]
pub unsafe extern "C" fn matepar_node_add_alternate_label(
    graph: *mut MateparGraph,
    node: u32,
    label: u32,
) {
    let Some(g) = graph.as_mut() else { return };
    if let (Some(n), Some(l)) = (node_id(g, node), label_id(g, label)) {
        g.add_alternate_label(n, l);
    }
}

/// Returns the number of alternate labels of a node.
///
/// # Safety
///
/// `graph` must be a valid graph handle.
#[no_mangle]
pub unsafe extern "C" fn matepar_node_alternate_label_count(
    graph: *const MateparGraph,
    node: u32,
) -> u32 {
    graph
        .as_ref()
        .and_then(|g| node_id(g, node).map(|n| g.node(n).alternate_labels().len() as u32))
        .unwrap_or(0)
}

/// Returns the `index`-th alternate label of a node, or `u32::MAX`.
///
/// # Safety
///
/// `graph` must be a valid graph handle.
#[no_mangle]
pub unsafe extern "C" fn matepar_node_alternate_label(
    graph: *const MateparGraph,
    node: u32,
    index: u32,
) -> u32 {
    graph
        .as_ref()
        .and_then(|g| {
            let n = node_id(g, node)?;
            g.node(n).alternate_labels().get(index as usize).copied()
        })
        .map_or(u32::MAX, Label::as_raw)
}

/// Returns `true` if `label` is the node's primary or an alternate label.
///
/// # Safety
///
/// `graph` must be a valid graph handle.
#[no_mangle]
pub unsafe extern "C" fn matepar_node_matches_label(
    graph: *const MateparGraph,
    node: u32,
    label: u32,
) -> bool {
    graph
        .as_ref()
        .and_then(|g| node_id(g, node).map(|n| g.node(n).matches_label(Label::from_raw(label))))
        .unwrap_or(false)
}

/// Returns the node's mate in the other graph, or `MATEPAR_NO_NODE`.
///
/// # Safety
///
/// `graph` must be a valid graph handle.
#[no_mangle]
pub unsafe extern "C" fn matepar_node_mate(graph: *const MateparGraph, node: u32) -> u32 {
    raw_node(
        graph
            .as_ref()
            .and_then(|g| node_id(g, node).and_then(|n| g.node(n).mate())),
    )
}

/// Mates `node` of `graph` with `mate` of `other`, or clears its mate when
/// `mate` is `MATEPAR_NO_NODE`. Returns `false` if nothing was done.
///
/// # Safety
///
/// `graph` and `other` must be valid, distinct graph handles.
#[no_mangle]
pub unsafe extern "C" fn matepar_node_mate_with(
    graph: *mut MateparGraph,
    node: u32,
    other: *mut MateparGraph,
    mate: u32,
) -> bool {
    if ptr::eq(graph, other) {
        return false;
    }
    let (Some(g), Some(o)) = (graph.as_mut(), other.as_mut()) else {
        return false;
    };
    let Some(n) = node_id(g, node) else {
        return false;
    };
    let m = if mate == MATEPAR_NO_NODE {
        None
    } else {
        match node_id(o, mate) {
            Some(m) => Some(m),
            None => return false,
        }
    };
    mate_with(g, n, o, m);
    true
}

/// Returns the number of outbound edges of a node.
///
/// # Safety
///
/// `graph` must be a valid graph handle.
#[no_mangle]
pub unsafe extern "C" fn matepar_node_edge_count(graph: *const MateparGraph, node: u32) -> u32 {
    graph
        .as_ref()
        .and_then(|g| node_id(g, node).map(|n| g.node(n).edge_count() as u32))
        .unwrap_or(0)
}

/// Returns the destination of the `index`-th outbound edge, or `MATEPAR_NO_NODE`.
///
/// # Safety
///
/// `graph` must be a valid graph handle.
#[no_mangle]
pub unsafe extern "C" fn matepar_edge_dest(graph: *const MateparGraph, node: u32, index: u32) -> u32 {
    raw_node(graph.as_ref().and_then(|g| {
        let n = node_id(g, node)?;
        g.node(n).edges().get(index as usize).map(|e| e.dest)
    }))
}

/// Returns the source port of the `index`-th outbound edge.
///
/// The string is borrowed: it stays valid until the graph is next modified.
/// Returns null (and a length of 0) for an invalid edge.
///
/// # Safety
///
/// `graph` must be a valid graph handle; `len` must be null or writable.
#[no_mangle]
pub unsafe extern "C" fn matepar_edge_source_port(
    graph: *const MateparGraph,
    node: u32,
    index: u32,
    len: *mut usize,
) -> *const u8 {
    edge_port(graph, node, index, len, |e| &e.source_port)
}

/// Returns the destination port of the `index`-th outbound edge.
///
/// Borrowed like [`matepar_edge_source_port`].
///
/// # Safety
///
/// Same as [`matepar_edge_source_port`].
#[no_mangle]
pub unsafe extern "C" fn matepar_edge_dest_port(
    graph: *const MateparGraph,
    node: u32,
    index: u32,
    len: *mut usize,
) -> *const u8 {
    edge_port(graph, node, index, len, |e| &e.dest_port)
}

unsafe fn edge_port(
    graph: *const MateparGraph,
    node: u32,
    index: u32,
    len: *mut usize,
    port: impl Fn(&matepar_graph::Edge) -> &String,
) -> *const u8 {
    let found = graph.as_ref().and_then(|g| {
        let n = node_id(g, node)?;
        g.node(n).edges().get(index as usize).map(&port)
    });
    let (ptr, n) = match found {
        Some(s) => (s.as_ptr(), s.len()),
        None => (ptr::null(), 0),
    };
    if let Some(len) = len.as_mut() {
        *len = n;
    }
    ptr
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_label_sentinel() {
        unsafe {
            let g = matepar_graph_create();
            assert_eq!(matepar_graph_max_label(g), -1);
            matepar_graph_allocate_label(g);
            assert_eq!(matepar_graph_max_label(g), 0);
            matepar_graph_destroy(g);
        }
    }

    #[test]
    fn invalid_arguments_are_ignored() {
        unsafe {
            let g = matepar_graph_create();
            assert_eq!(matepar_graph_add_node(g, 0, ptr::null_mut()), MATEPAR_NO_NODE);
            assert_eq!(matepar_node_mate(g, 5), MATEPAR_NO_NODE);
            assert_eq!(matepar_graph_num_nodes(ptr::null()), 0);
            assert!(!matepar_node_mate_with(g, 0, g, 0));
            matepar_graph_destroy(g);
        }
    }

    #[test]
    fn borrowed_ports() {
        unsafe {
            let g = matepar_graph_create();
            let l = matepar_graph_allocate_label(g);
            let a = matepar_graph_add_node(g, l, ptr::null_mut());
            let b = matepar_graph_add_node(g, l, ptr::null_mut());
            let (o, i) = ("O", "I0");
            matepar_graph_add_edge(g, a, o.as_ptr(), o.len(), b, i.as_ptr(), i.len());

            let mut len = 0usize;
            let p = matepar_edge_dest_port(g, a, 0, &mut len);
            assert_eq!(std::slice::from_raw_parts(p, len), b"I0");
            assert_eq!(matepar_edge_dest(g, a, 0), b);
            assert!(matepar_edge_source_port(g, a, 1, &mut len).is_null());
            assert_eq!(len, 0);

            assert_eq!(matepar_graph_remove_edge(g, a, o.as_ptr(), o.len(), b, i.as_ptr(), i.len()), 1);
            assert_eq!(matepar_graph_num_edges(g), 0);
            matepar_graph_destroy(g);
        }
    }
}
