//! Summary of a successful placement run.

use matepar_common::ContentHash;
use serde::Serialize;

/// What a successful [`place_and_route`](crate::PlacementEngine::place_and_route) did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlacementReport {
    /// Seed of the run's random stream.
    pub seed: u32,
    /// Optimizer iterations executed.
    pub iterations: u32,
    /// Total cost of the final placement. Zero unless the policy reports
    /// timing or congestion cost.
    pub cost: u32,
    /// Temperature when the optimizer stopped.
    pub final_temperature: u32,
    /// Hash of the final netlist-to-device assignment.
    pub fingerprint: ContentHash,
}
