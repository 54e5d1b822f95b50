//! First-fit placement with an edge delay limit.

use std::collections::{BTreeSet, HashMap};

use matepar_common::DelayTable;
use matepar_engine::{FirstFitPolicy, PlacementEngine, PlacementPolicy};
use matepar_graph::NodeId;

use crate::problem::{EdgeKey, TimingLimit};

/// [`FirstFitPolicy`] plus a timing cost of 1 per netlist edge routed over a
/// device edge slower than the limit.
pub struct TimedPolicy<'d> {
    inner: FirstFitPolicy,
    limit: Option<TimingLimit>,
    delays: &'d HashMap<EdgeKey, DelayTable>,
}

impl<'d> TimedPolicy<'d> {
    /// Creates the policy; without a limit it behaves like [`FirstFitPolicy`].
    pub fn new(limit: Option<TimingLimit>, delays: &'d HashMap<EdgeKey, DelayTable>) -> Self {
        Self {
            inner: FirstFitPolicy,
            limit,
            delays,
        }
    }

    /// Netlist edges, as `(source, dest)`, whose device edge is too slow.
    fn slow_edges(&self, engine: &PlacementEngine<'_, String, String>) -> Vec<(NodeId, NodeId)> {
        let Some(limit) = self.limit else {
            return Vec::new();
        };
        let netlist = engine.netlist();
        netlist
            .edges()
            .filter(|(source, edge)| {
                let (Some(from), Some(to)) =
                    (netlist.node(*source).mate(), netlist.node(edge.dest).mate())
                else {
                    return false;
                };
                let key = (from, edge.source_port.clone(), to, edge.dest_port.clone());
                self.delays
                    .get(&key)
                    .and_then(|table| table.get(&limit.corner))
                    .is_some_and(|delay| delay.worst() > limit.max_delay)
            })
            .map(|(source, edge)| (source, edge.dest))
            .collect()
    }
}

impl PlacementPolicy<String, String> for TimedPolicy<'_> {
    fn initial_placement_core(&mut self, engine: &mut PlacementEngine<'_, String, String>) -> bool {
        self.inner.initial_placement_core(engine)
    }

    fn find_suboptimal_placements(
        &mut self,
        engine: &mut PlacementEngine<'_, String, String>,
    ) -> Vec<NodeId> {
        let mut nodes: BTreeSet<NodeId> = self
            .inner
            .find_suboptimal_placements(engine)
            .into_iter()
            .collect();
        nodes.extend(self.slow_edges(engine).into_iter().flat_map(|(s, d)| [s, d]));
        nodes.into_iter().collect()
    }

    fn get_new_placement_for_node(
        &mut self,
        engine: &mut PlacementEngine<'_, String, String>,
        pivot: NodeId,
    ) -> Option<NodeId> {
        self.inner.get_new_placement_for_node(engine, pivot)
    }

    fn compute_timing_cost(&self, engine: &PlacementEngine<'_, String, String>) -> u32 {
        self.slow_edges(engine).len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::Problem;
    use matepar_config::EngineConfig;
    use matepar_diagnostics::DiagnosticSink;

    /// Two equivalent device paths `x -> y` (slow) and `z -> w` (fast).
    const TWO_PATHS: &str = r#"{
        "labels": ["LUT"],
        "device": {
            "nodes": [
                { "name": "x", "label": "LUT" }, { "name": "y", "label": "LUT" },
                { "name": "z", "label": "LUT" }, { "name": "w", "label": "LUT" }
            ],
            "edges": [
                { "from": "x", "from_port": "O", "to": "y", "to_port": "I", "delays": [
                    { "corner": { "speed": "slow", "die_temp": 85, "voltage": 3000 },
                      "rising": 9.0, "falling": 8.0 } ] },
                { "from": "z", "from_port": "O", "to": "w", "to_port": "I", "delays": [
                    { "corner": { "speed": "slow", "die_temp": 85, "voltage": 3000 },
                      "rising": 2.0, "falling": 2.5 } ] }
            ]
        },
        "netlist": {
            "nodes": [{ "name": "a", "label": "LUT" }, { "name": "b", "label": "LUT" }],
            "edges": [{ "from": "a", "from_port": "O", "to": "b", "to_port": "I" }]
        },
        "timing": {
            "corner": { "speed": "slow", "die_temp": 85, "voltage": 3000 },
            "max_delay": 5.0
        }
    }"#;

    #[test]
    fn slow_edge_costs_timing() {
        let problem: Problem = serde_json::from_str(TWO_PATHS).unwrap();
        let mut design = problem.build().unwrap();
        let policy = TimedPolicy::new(design.timing, &design.delays);
        let mut engine =
            PlacementEngine::new(&mut design.netlist, &mut design.device, EngineConfig::default());
        engine.mate(NodeId::from_raw(0), Some(NodeId::from_raw(0)));
        engine.mate(NodeId::from_raw(1), Some(NodeId::from_raw(1)));
        assert_eq!(policy.compute_timing_cost(&engine), 1);
        assert_eq!(engine.compute_cost(&policy), 1);

        engine.mate(NodeId::from_raw(0), Some(NodeId::from_raw(2)));
        engine.mate(NodeId::from_raw(1), Some(NodeId::from_raw(3)));
        assert_eq!(policy.compute_timing_cost(&engine), 0);
    }

    #[test]
    fn placement_moves_off_the_slow_path() {
        let problem: Problem = serde_json::from_str(TWO_PATHS).unwrap();
        let mut design = problem.build().unwrap();
        let mut policy = TimedPolicy::new(design.timing, &design.delays);
        let sink = DiagnosticSink::new();
        let mut engine =
            PlacementEngine::new(&mut design.netlist, &mut design.device, EngineConfig::default());
        let report = engine
            .place_and_route(&mut policy, &design.labels, 0, &sink)
            .unwrap();
        assert_eq!(report.cost, 0);
        drop(engine);
        assert_eq!(design.netlist.node(NodeId::from_raw(0)).mate(), Some(NodeId::from_raw(2)));
    }
}
