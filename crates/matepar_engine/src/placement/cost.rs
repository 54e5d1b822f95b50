//! Placement cost functions.
//!
//! The total cost is `10 * unroutable + timing + congestion`, so any
//! unroutable edge outweighs the timing and congestion terms of the small
//! designs this engine targets.

use super::{PlacementEngine, PlacementPolicy};
use crate::error::Unroute;
use matepar_graph::{Edge, NodeId};

/// Weight of one unroutable edge in the total cost.
pub const UNROUTABLE_WEIGHT: u32 = 10;

/// Combines the three cost terms, saturating at `u32::MAX`.
pub(super) fn weighted_cost(unroutable: u32, timing: u32, congestion: u32) -> u32 {
    UNROUTABLE_WEIGHT
        .saturating_mul(unroutable)
        .saturating_add(timing)
        .saturating_add(congestion)
}

impl<N, D> PlacementEngine<'_, N, D> {
    /// Computes the total cost of the current placement.
    pub fn compute_cost<P>(&self, policy: &P) -> u32
    where
        P: PlacementPolicy<N, D> + ?Sized,
    {
        weighted_cost(
            self.count_unroutes(),
            policy.compute_timing_cost(self),
            policy.compute_congestion_cost(self),
        )
    }

    /// Counts netlist edges without a matching device edge and lists them.
    ///
    /// A netlist edge is routed when the mate of its source has a device edge
    /// with the same source port to the mate of its destination, arriving at
    /// the same destination port. Edges with an unplaced endpoint are unrouted.
    pub fn compute_unroutable_cost(&self) -> (u32, Vec<Unroute>) {
        let unroutes: Vec<Unroute> = self
            .netlist
            .edges()
            .filter(|(source, edge)| !self.is_edge_routed(*source, edge))
            .map(|(source, edge)| Unroute {
                source,
                source_port: edge.source_port.clone(),
                dest: edge.dest,
                dest_port: edge.dest_port.clone(),
            })
            .collect();
        (unroutes.len() as u32, unroutes)
    }

    /// Counts the unrouted edges touching `pivot` if it were placed at `candidate`.
    ///
    /// Both outbound and inbound edges of `pivot` are considered; every other
    /// node stays where it is.
    pub fn compute_node_unroutable_cost(&self, pivot: NodeId, candidate: NodeId) -> u32 {
        let site = |node: NodeId| {
            if node == pivot {
                Some(candidate)
            } else {
                self.site_of(node)
            }
        };

        let outbound = self
            .netlist
            .node(pivot)
            .edges()
            .iter()
            .filter(|e| {
                !self.is_routed(Some(candidate), &e.source_port, site(e.dest), &e.dest_port)
            })
            .count();
        let inbound = self
            .netlist
            .edges_into(pivot)
            .filter(|(source, _)| *source != pivot)
            .filter(|(source, e)| {
                !self.is_routed(site(*source), &e.source_port, Some(candidate), &e.dest_port)
            })
            .count();

        (outbound + inbound) as u32
    }

    /// Unroutable cost of the edges touching `nodes` at their current sites.
    pub(super) fn local_unroutable_cost(&self, nodes: &[NodeId]) -> u32 {
        nodes
            .iter()
            .filter_map(|&node| {
                self.site_of(node)
                    .map(|site| self.compute_node_unroutable_cost(node, site))
            })
            .sum()
    }

    fn count_unroutes(&self) -> u32 {
        self.netlist
            .edges()
            .filter(|(source, edge)| !self.is_edge_routed(*source, edge))
            .count() as u32
    }

    fn is_edge_routed(&self, source: NodeId, edge: &Edge) -> bool {
        self.is_routed(
            self.site_of(source),
            &edge.source_port,
            self.site_of(edge.dest),
            &edge.dest_port,
        )
    }

    fn site_of(&self, node: NodeId) -> Option<NodeId> {
        self.netlist.node(node).mate()
    }

    fn is_routed(
        &self,
        source_site: Option<NodeId>,
        source_port: &str,
        dest_site: Option<NodeId>,
        dest_port: &str,
    ) -> bool {
        match (source_site, dest_site) {
            (Some(src), Some(dst)) => self.device.node(src).has_edge(source_port, dst, dest_port),
            _ => false,
        }
    }
}
