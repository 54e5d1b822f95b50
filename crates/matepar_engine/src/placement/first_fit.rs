//! Device-agnostic reference policy.

use super::{PlacementEngine, PlacementPolicy};
use matepar_graph::NodeId;
use std::collections::BTreeSet;

/// A simple, deterministic placement policy that works for any device.
///
/// - Initial placement gives each unplaced netlist node the first free device
///   site it can occupy. Nodes with fewer alternate labels are placed first,
///   and nodes mated before the run (placement constraints) are left alone.
/// - Both endpoints of every unrouted edge are suboptimal.
/// - A new site is drawn uniformly from the label-compatible sites other than
///   the pivot's current one, using the engine's random stream.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstFitPolicy;

impl<N, D> PlacementPolicy<N, D> for FirstFitPolicy {
    fn initial_placement_core(&mut self, engine: &mut PlacementEngine<'_, N, D>) -> bool {
        let mut order: Vec<NodeId> = engine
            .netlist()
            .iter()
            .filter(|(_, node)| node.mate().is_none())
            .map(|(id, _)| id)
            .collect();
        order.sort_by_key(|&id| engine.netlist().node(id).alternate_labels().len());

        for node in order {
            let Some(site) = first_free_site(engine, node) else {
                return false;
            };
            engine.mate(node, Some(site));
        }
        true
    }

    fn find_suboptimal_placements(&mut self, engine: &mut PlacementEngine<'_, N, D>) -> Vec<NodeId> {
        let (_, unroutes) = engine.compute_unroutable_cost();
        let nodes: BTreeSet<NodeId> = unroutes
            .iter()
            .flat_map(|u| [u.source, u.dest])
            .collect();
        nodes.into_iter().collect()
    }

    fn get_new_placement_for_node(
        &mut self,
        engine: &mut PlacementEngine<'_, N, D>,
        pivot: NodeId,
    ) -> Option<NodeId> {
        let candidates = compatible_sites(engine, pivot);
        if candidates.is_empty() {
            return None;
        }
        let pick = engine.random_number() as usize % candidates.len();
        Some(candidates[pick])
    }
}

/// First unoccupied device site whose label `node` accepts, trying the
/// primary label before the alternates.
fn first_free_site<N, D>(engine: &PlacementEngine<'_, N, D>, node: NodeId) -> Option<NodeId> {
    let cell = engine.netlist().node(node);
    let device = engine.device();
    cell.candidate_labels().find_map(|label| {
        device.nodes_with_label(label).iter().copied().find(|&site| {
            let site = device.node(site);
            site.mate().is_none() && cell.matches_label(site.label())
        })
    })
}

/// Every device site `node` could move to, in label-bucket order, excluding
/// its current site.
fn compatible_sites<N, D>(engine: &PlacementEngine<'_, N, D>, node: NodeId) -> Vec<NodeId> {
    let cell = engine.netlist().node(node);
    let device = engine.device();
    let mut sites = Vec::new();
    for label in cell.candidate_labels() {
        for &site in device.nodes_with_label(label) {
            if Some(site) != cell.mate()
                && cell.matches_label(device.node(site).label())
                && !sites.contains(&site)
            {
                sites.push(site);
            }
        }
    }
    sites
}
