//! The annealing placement engine.
//!
//! A [`PlacementEngine`] borrows a netlist graph and a device graph for one
//! placement attempt. [`PlacementEngine::place_and_route`] runs four phases:
//!
//! 1. **Sanity check**: reject designs that cannot possibly fit the device.
//! 2. **Initial placement**: the policy produces any label-legal assignment.
//! 3. **Optimize**: single-node moves with linear cooling and annealing
//!    acceptance, restarting from the best placement after a stall.
//! 4. **Finalize**: fall back to the best placement and report unroutes.
//!
//! The current assignment lives in the graphs' mate pointers; the engine only
//! keeps a snapshot of the best one seen.

mod anneal;
mod cost;
mod first_fit;
mod policy;
mod sanity;

pub use cost::UNROUTABLE_WEIGHT;
pub use first_fit::FirstFitPolicy;
pub use policy::PlacementPolicy;

use crate::codes;
use crate::error::{PlacementError, Unroute};
use crate::report::PlacementReport;
use crate::rng::Lcg;
use matepar_common::ContentHash;
use matepar_config::EngineConfig;
use matepar_diagnostics::DiagnosticSink;
use matepar_graph::{mate_with, Graph, LabelNames, NodeId};

/// Annealing placer over a netlist graph `N` and a device graph `D`.
///
/// The graphs are borrowed exclusively for the lifetime of the engine; only
/// mate pointers are changed, never nodes or edges.
pub struct PlacementEngine<'g, N, D> {
    netlist: &'g mut Graph<N>,
    device: &'g mut Graph<D>,
    config: EngineConfig,
    max_temperature: u32,
    temperature: u32,
    iterations: u32,
    rng: Lcg,
    best: Vec<Option<NodeId>>,
    best_cost: u32,
}

impl<'g, N, D> PlacementEngine<'g, N, D> {
    /// Creates an engine over the given graphs.
    ///
    /// A `max_temperature` of 0 is treated as 1.
    pub fn new(netlist: &'g mut Graph<N>, device: &'g mut Graph<D>, config: EngineConfig) -> Self {
        let max_temperature = config.max_temperature.max(1);
        Self {
            netlist,
            device,
            rng: Lcg::new(config.seed),
            config,
            max_temperature,
            temperature: max_temperature,
            iterations: 0,
            best: Vec::new(),
            best_cost: u32::MAX,
        }
    }

    /// Returns the netlist graph.
    pub fn netlist(&self) -> &Graph<N> {
        &*self.netlist
    }

    /// Returns the device graph.
    pub fn device(&self) -> &Graph<D> {
        &*self.device
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the current temperature.
    pub fn temperature(&self) -> u32 {
        self.temperature
    }

    /// Returns the number of optimizer iterations run so far.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Returns the lowest total cost recorded, or `u32::MAX` before initial placement.
    pub fn best_cost(&self) -> u32 {
        self.best_cost
    }

    /// Returns the best-placement snapshot, one entry per netlist node.
    pub fn best_placement(&self) -> &[Option<NodeId>] {
        &self.best
    }

    /// Returns the current device site of every netlist node.
    pub fn placement(&self) -> Vec<Option<NodeId>> {
        self.netlist.iter().map(|(_, node)| node.mate()).collect()
    }

    /// Draws the next number from the engine's deterministic random stream.
    pub fn random_number(&mut self) -> u32 {
        self.rng.next_number()
    }

    /// Returns the engine's random stream, for use with [`rand::Rng`] helpers.
    pub fn rng_mut(&mut self) -> &mut Lcg {
        &mut self.rng
    }

    /// Mates netlist node `node` with device site `site`, or unplaces it.
    pub fn mate(&mut self, node: NodeId, site: Option<NodeId>) {
        mate_with(&mut *self.netlist, node, &mut *self.device, site);
    }

    /// Moves `node` to `new_site`.
    ///
    /// A netlist node already occupying `new_site` is moved to the site `node`
    /// vacated, so the move is a swap.
    pub fn move_node(&mut self, node: NodeId, new_site: NodeId) {
        let old_site = self.netlist.node(node).mate();
        let displaced = self.device.node(new_site).mate();

        self.mate(node, Some(new_site));
        if let (Some(displaced), Some(old_site)) = (displaced, old_site) {
            if displaced != node {
                self.mate(displaced, Some(old_site));
            }
        }
    }

    /// Default move rule: moving `node` from `old_site` to `new_site` is legal
    /// if whatever occupies `new_site` may take `old_site` in exchange.
    pub fn can_move_node(&self, node: NodeId, old_site: NodeId, new_site: NodeId) -> bool {
        match self.device.node(new_site).mate() {
            None => true,
            Some(displaced) if displaced == node => true,
            Some(displaced) => self
                .netlist
                .node(displaced)
                .matches_label(self.device.node(old_site).label()),
        }
    }

    /// Snapshots the current placement as the best one.
    pub fn save_best_placement(&mut self) {
        self.best = self.placement();
    }

    /// Restores the live placement from the best snapshot.
    ///
    /// Does nothing if no snapshot has been taken.
    pub fn restore_best_placement(&mut self) {
        let best = std::mem::take(&mut self.best);
        for (index, site) in best.iter().enumerate() {
            self.mate(NodeId::from_raw(index as u32), *site);
        }
        self.best = best;
    }

    /// Lists the label names netlist node `node` can take, primary first.
    pub fn node_types(&self, node: NodeId, labels: &LabelNames) -> String {
        labels.node_types(self.netlist.node(node))
    }

    /// Hashes the current placement.
    pub fn fingerprint(&self) -> ContentHash {
        ContentHash::from_words(
            self.netlist
                .iter()
                .map(|(_, node)| node.mate().map_or(u32::MAX, NodeId::as_raw)),
        )
    }

    /// Runs a complete placement with the given policy and seed.
    ///
    /// On success every netlist node is mated with a label-compatible device
    /// site and every netlist edge has a matching device edge. Failures are
    /// also emitted into `sink`; `labels` is only used to name labels in
    /// diagnostics.
    ///
    /// # Panics
    ///
    /// Panics if the policy breaks its contract (an unplaced or mislabeled node
    /// after initial placement, a mislabeled candidate site) or if restoring
    /// the best placement does not reproduce its recorded cost.
    pub fn place_and_route<P>(
        &mut self,
        policy: &mut P,
        labels: &LabelNames,
        seed: u32,
        sink: &DiagnosticSink,
    ) -> Result<PlacementReport, PlacementError>
    where
        P: PlacementPolicy<N, D> + ?Sized,
    {
        self.rng.reseed(seed);
        self.temperature = self.max_temperature;
        self.iterations = 0;
        self.best.clear();
        self.best_cost = u32::MAX;

        sink.emit(codes::note_start(
            self.netlist.num_nodes(),
            self.device.num_nodes(),
            self.netlist.num_edges(),
            self.device.num_edges(),
        ));

        if let Err(err) = self.sanity_check(labels) {
            return Err(self.fail(err, labels, sink));
        }

        if self.netlist.is_empty() {
            self.best_cost = 0;
            return Ok(self.report(seed, 0));
        }

        if let Err(err) = self.initial_placement(policy, labels) {
            return Err(self.fail(err, labels, sink));
        }

        self.optimize(policy, labels, sink);
        self.finalize(&*policy, labels, seed, sink)
    }

    fn initial_placement<P>(&mut self, policy: &mut P, labels: &LabelNames) -> Result<(), PlacementError>
    where
        P: PlacementPolicy<N, D> + ?Sized,
    {
        self.netlist.index_nodes_by_label();
        self.device.index_nodes_by_label();

        if !policy.initial_placement_core(self) {
            return Err(PlacementError::InitialPlacementFailed);
        }

        for (id, node) in self.netlist.iter() {
            let Some(site) = node.mate() else {
                panic!(
                    "initial placement left netlist node {id} ({}) unplaced",
                    labels.node_types(node)
                );
            };
            let site_label = self.device.node(site).label();
            assert!(
                node.matches_label(site_label),
                "initial placement mated netlist node {id} ({}) with device site {site} of {}",
                labels.node_types(node),
                labels.describe(site_label)
            );
        }

        self.save_best_placement();
        self.best_cost = self.compute_cost(&*policy);
        Ok(())
    }

    fn finalize<P>(
        &mut self,
        policy: &P,
        labels: &LabelNames,
        seed: u32,
        sink: &DiagnosticSink,
    ) -> Result<PlacementReport, PlacementError>
    where
        P: PlacementPolicy<N, D> + ?Sized,
    {
        let mut cost = self.compute_cost(policy);
        if cost > self.best_cost {
            self.restore_best_placement();
            cost = self.compute_cost(policy);
            assert_eq!(
                cost, self.best_cost,
                "restored best placement does not reproduce its recorded cost"
            );
        } else if cost < self.best_cost {
            self.save_best_placement();
            self.best_cost = cost;
        }

        if cost > 0 && self.temperature <= 1 {
            sink.emit(codes::warning_gave_up(self.iterations, cost));
        }

        let (unroutable, unroutes) = self.compute_unroutable_cost();
        if unroutable > 0 {
            return Err(self.fail(PlacementError::Unroutable { unroutes }, labels, sink));
        }

        Ok(self.report(seed, cost))
    }

    fn report(&self, seed: u32, cost: u32) -> PlacementReport {
        PlacementReport {
            seed,
            iterations: self.iterations,
            cost,
            final_temperature: self.temperature,
            fingerprint: self.fingerprint(),
        }
    }

    /// Emits the diagnostic for `err` and hands it back.
    fn fail(&self, err: PlacementError, labels: &LabelNames, sink: &DiagnosticSink) -> PlacementError {
        let mut diag = codes::error_placement(&err);
        if let PlacementError::Unroutable { unroutes } = &err {
            diag = diag.with_notes(unroutes.iter().map(|u| self.describe_unroute(u, labels)));
        }
        sink.emit(diag);
        err
    }

    /// Describes an unrouted edge, e.g. `node 0 (LUT2).O -> node 1 (DFF).D (site 4 -> site 7)`.
    pub fn describe_unroute(&self, unroute: &Unroute, labels: &LabelNames) -> String {
        let site = |node: NodeId| match self.netlist.node(node).mate() {
            Some(site) => format!("site {site}"),
            None => "unplaced".to_string(),
        };
        format!(
            "node {} ({}).{} -> node {} ({}).{} ({} -> {})",
            unroute.source,
            self.node_types(unroute.source, labels),
            unroute.source_port,
            unroute.dest,
            self.node_types(unroute.dest, labels),
            unroute.dest_port,
            site(unroute.source),
            site(unroute.dest),
        )
    }
}
