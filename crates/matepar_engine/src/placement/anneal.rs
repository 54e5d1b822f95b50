//! The optimization loop.
//!
//! Each iteration lowers the temperature by one and tries to move a single
//! badly placed node. Moves that lower the local cost are kept; others are
//! kept with probability `temperature / max_temperature`. After a run of
//! iterations without a new best cost the placement is reset to the best one.

use super::cost::weighted_cost;
use super::{PlacementEngine, PlacementPolicy};
use crate::codes;
use matepar_diagnostics::DiagnosticSink;
use matepar_graph::{LabelNames, NodeId};

/// Iterations without a new best cost before restarting from the best placement.
const STALL_LIMIT: u32 = 25;

impl<N, D> PlacementEngine<'_, N, D> {
    /// Runs the optimizer until the cost reaches 0, the policy reports no
    /// suboptimal nodes, or the temperature reaches 1.
    pub(super) fn optimize<P>(&mut self, policy: &mut P, labels: &LabelNames, sink: &DiagnosticSink)
    where
        P: PlacementPolicy<N, D> + ?Sized,
    {
        let mut cost = self.best_cost;
        let mut changed = false;
        let mut stall = 0u32;

        while self.temperature > 1 {
            self.temperature -= 1;
            self.iterations += 1;

            if changed {
                cost = self.compute_cost(&*policy);
            }

            if cost < self.best_cost {
                self.save_best_placement();
                self.best_cost = cost;
                stall = 0;
            } else {
                stall += 1;
            }

            if self.config.verbose {
                self.emit_score(&*policy, sink);
            }

            if cost == 0 {
                break;
            }

            if stall > STALL_LIMIT {
                self.restore_best_placement();
                cost = self.best_cost;
                stall = 0;
                changed = false;
                continue;
            }

            let suboptimal = policy.find_suboptimal_placements(self);
            if suboptimal.is_empty() {
                break;
            }

            changed = self.optimize_placement(policy, &suboptimal, labels);
        }
    }

    /// Tries to move one node from `suboptimal`. Returns `true` if the
    /// placement changed.
    ///
    /// # Panics
    ///
    /// Panics if the chosen pivot is unplaced or the policy proposes a site
    /// the pivot cannot occupy.
    pub fn optimize_placement<P>(
        &mut self,
        policy: &mut P,
        suboptimal: &[NodeId],
        labels: &LabelNames,
    ) -> bool
    where
        P: PlacementPolicy<N, D> + ?Sized,
    {
        if suboptimal.is_empty() {
            return false;
        }

        let pivot = suboptimal[self.random_number() as usize % suboptimal.len()];
        let Some(old_site) = self.netlist.node(pivot).mate() else {
            panic!("suboptimal netlist node {pivot} is not placed");
        };

        let Some(candidate) = policy.get_new_placement_for_node(self, pivot) else {
            return false;
        };
        let candidate_label = self.device.node(candidate).label();
        assert!(
            self.netlist.node(pivot).matches_label(candidate_label),
            "placement policy proposed device site {candidate} of {} for netlist node {pivot} ({})",
            labels.describe(candidate_label),
            self.node_types(pivot, labels)
        );

        if candidate == old_site || !policy.can_move_node(&*self, pivot, old_site, candidate) {
            return false;
        }

        let mut moved = vec![pivot];
        if let Some(displaced) = self.device.node(candidate).mate() {
            moved.push(displaced);
        }

        let before = self.local_cost(&*policy, &moved);
        self.move_node(pivot, candidate);
        let after = self.local_cost(&*policy, &moved);

        if after < before || self.random_number() % self.max_temperature < self.temperature {
            return true;
        }

        self.move_node(pivot, old_site);
        false
    }

    fn local_cost<P>(&self, policy: &P, nodes: &[NodeId]) -> u32
    where
        P: PlacementPolicy<N, D> + ?Sized,
    {
        weighted_cost(
            self.local_unroutable_cost(nodes),
            policy.compute_timing_cost(self),
            policy.compute_congestion_cost(self),
        )
    }

    fn emit_score<P>(&self, policy: &P, sink: &DiagnosticSink)
    where
        P: PlacementPolicy<N, D> + ?Sized,
    {
        let (unroutable, _) = self.compute_unroutable_cost();
        let congestion = policy.compute_congestion_cost(self);
        let timing = policy.compute_timing_cost(self);
        sink.emit(codes::note_score(
            self.iterations,
            unroutable,
            congestion,
            timing,
            weighted_cost(unroutable, timing, congestion),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::tests::two_by_two;
    use matepar_config::EngineConfig;

    fn id(raw: u32) -> NodeId {
        NodeId::from_raw(raw)
    }

    /// Always proposes one fixed site.
    struct Propose(Option<NodeId>);

    impl<N, D> PlacementPolicy<N, D> for Propose {
        fn initial_placement_core(&mut self, _engine: &mut PlacementEngine<'_, N, D>) -> bool {
            true
        }
        fn find_suboptimal_placements(&mut self, _engine: &mut PlacementEngine<'_, N, D>) -> Vec<NodeId> {
            Vec::new()
        }
        fn get_new_placement_for_node(
            &mut self,
            _engine: &mut PlacementEngine<'_, N, D>,
            _pivot: NodeId,
        ) -> Option<NodeId> {
            self.0
        }
    }

    #[test]
    fn improving_swap_is_kept() {
        let mut p = two_by_two();
        let mut engine = PlacementEngine::new(&mut p.netlist, &mut p.device, EngineConfig::default());
        engine.mate(id(0), Some(id(1)));
        engine.mate(id(1), Some(id(0)));

        let changed = engine.optimize_placement(&mut Propose(Some(id(0))), &[id(0)], &LabelNames::new());
        assert!(changed);
        assert_eq!(engine.placement(), vec![Some(id(0)), Some(id(1))]);
    }

    #[test]
    fn no_candidate_is_no_change() {
        let mut p = two_by_two();
        let mut engine = PlacementEngine::new(&mut p.netlist, &mut p.device, EngineConfig::default());
        engine.mate(id(0), Some(id(1)));
        engine.mate(id(1), Some(id(0)));

        assert!(!engine.optimize_placement(&mut Propose(None), &[id(0)], &LabelNames::new()));
        assert!(!engine.optimize_placement(&mut Propose(Some(id(1))), &[id(0)], &LabelNames::new()));
        assert_eq!(engine.placement(), vec![Some(id(1)), Some(id(0))]);
    }

    #[test]
    fn worsening_swap_rejected_when_cold() {
        let mut p = two_by_two();
        let config = EngineConfig {
            max_temperature: 1_000_000,
            ..EngineConfig::default()
        };
        let mut engine = PlacementEngine::new(&mut p.netlist, &mut p.device, config);
        engine.mate(id(0), Some(id(0)));
        engine.mate(id(1), Some(id(1)));
        // Temperature 0 never accepts a worse placement.
        engine.temperature = 0;

        let changed = engine.optimize_placement(&mut Propose(Some(id(1))), &[id(0)], &LabelNames::new());
        assert!(!changed);
        assert_eq!(engine.placement(), vec![Some(id(0)), Some(id(1))]);
    }

    /// Proposes a fixed site under the largest possible timing cost.
    struct Saturated(NodeId);

    impl<N, D> PlacementPolicy<N, D> for Saturated {
        fn initial_placement_core(&mut self, _engine: &mut PlacementEngine<'_, N, D>) -> bool {
            true
        }
        fn find_suboptimal_placements(&mut self, _engine: &mut PlacementEngine<'_, N, D>) -> Vec<NodeId> {
            Vec::new()
        }
        fn get_new_placement_for_node(
            &mut self,
            _engine: &mut PlacementEngine<'_, N, D>,
            _pivot: NodeId,
        ) -> Option<NodeId> {
            Some(self.0)
        }
        fn compute_timing_cost(&self, _engine: &PlacementEngine<'_, N, D>) -> u32 {
            u32::MAX
        }
    }

    #[test]
    fn saturated_local_cost_is_not_an_improvement() {
        let mut p = two_by_two();
        let mut engine = PlacementEngine::new(&mut p.netlist, &mut p.device, EngineConfig::default());
        engine.mate(id(0), Some(id(1)));
        engine.mate(id(1), Some(id(0)));
        engine.temperature = 0;

        // Routing the edge would help, but both sides of the move cost u32::MAX.
        let changed = engine.optimize_placement(&mut Saturated(id(0)), &[id(0)], &LabelNames::new());
        assert!(!changed);
        assert_eq!(engine.placement(), vec![Some(id(1)), Some(id(0))]);
    }

    #[test]
    #[should_panic(expected = "placement policy proposed device site")]
    fn mislabeled_candidate_panics() {
        let mut netlist: matepar_graph::Graph<()> = matepar_graph::Graph::new();
        let lut = netlist.allocate_label();
        let ff = netlist.allocate_label();
        let a = netlist.add_node(lut, ());
        let mut device: matepar_graph::Graph<()> = matepar_graph::Graph::new();
        device.allocate_label();
        device.allocate_label();
        let lut_site = device.add_node(lut, ());
        let ff_site = device.add_node(ff, ());

        let mut engine = PlacementEngine::new(&mut netlist, &mut device, EngineConfig::default());
        engine.mate(a, Some(lut_site));
        engine.optimize_placement(&mut Propose(Some(ff_site)), &[a], &LabelNames::new());
    }
}
