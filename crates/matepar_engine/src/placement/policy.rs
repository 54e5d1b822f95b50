//! Device-specific placement hooks.

use super::PlacementEngine;
use matepar_graph::NodeId;

/// The device-specific half of a placement run.
///
/// The engine knows nothing about what labels mean; a policy supplies the
/// initial placement, says which nodes are badly placed and proposes new sites
/// for them. Every hook receives the running engine and may use its graph
/// accessors, its random stream and its cost functions.
///
/// Hooks must keep to the label contract: every site a hook mates a netlist
/// node with, or proposes for it, must carry one of the node's labels. The
/// engine panics when that contract is broken.
pub trait PlacementPolicy<N, D> {
    /// Produces a label-legal placement of every netlist node.
    ///
    /// Nodes mated before the run (placement constraints) may be kept as they
    /// are. The label indexes of both graphs are fresh when this is called.
    /// Returns `false` if no legal placement could be found.
    fn initial_placement_core(&mut self, engine: &mut PlacementEngine<'_, N, D>) -> bool;

    /// Lists the netlist nodes whose placement contributes to the current cost.
    ///
    /// An empty list means the placement cannot be improved further.
    fn find_suboptimal_placements(&mut self, engine: &mut PlacementEngine<'_, N, D>)
        -> Vec<NodeId>;

    /// Proposes a new device site for `pivot`, or `None` to skip this iteration.
    fn get_new_placement_for_node(
        &mut self,
        engine: &mut PlacementEngine<'_, N, D>,
        pivot: NodeId,
    ) -> Option<NodeId>;

    /// Decides whether `node` may move from `old_site` to `new_site`.
    ///
    /// Defaults to [`PlacementEngine::can_move_node`].
    fn can_move_node(
        &self,
        engine: &PlacementEngine<'_, N, D>,
        node: NodeId,
        old_site: NodeId,
        new_site: NodeId,
    ) -> bool {
        engine.can_move_node(node, old_site, new_site)
    }

    /// Cost of routing resources shared by several signals. Defaults to 0.
    fn compute_congestion_cost(&self, _engine: &PlacementEngine<'_, N, D>) -> u32 {
        0
    }

    /// Cost of missed timing constraints. Defaults to 0.
    fn compute_timing_cost(&self, _engine: &PlacementEngine<'_, N, D>) -> u32 {
        0
    }
}
