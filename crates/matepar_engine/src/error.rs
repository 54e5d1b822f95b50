//! Recoverable placement failures.

use matepar_graph::{Label, NodeId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A netlist edge with no matching device edge at the current placement.
///
/// All node IDs refer to the netlist graph.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unroute {
    /// Driving netlist node.
    pub source: NodeId,
    /// Output port on the driving node.
    pub source_port: String,
    /// Receiving netlist node.
    pub dest: NodeId,
    /// Input port on the receiving node.
    pub dest_port: String,
}

/// An infeasible placement problem.
///
/// These are expected failures: the design does not fit the device, or no
/// routable placement was found. The caller is expected to change the design
/// or the device rather than retry. Hook contract violations and internal
/// inconsistencies panic instead.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PlacementError {
    /// A netlist node uses a label the device never allocated.
    #[error("netlist uses label {label}, but the device only defines {device_labels} labels")]
    LabelOutOfRange {
        /// The offending netlist label.
        label: Label,
        /// Number of labels allocated by the device.
        device_labels: u32,
    },

    /// More netlist nodes need a group of labels than the device supplies.
    #[error("design is too big for the device (netlist has {required} nodes with {labels}, device only has {available})")]
    DesignTooBig {
        /// Human-readable description of the label group.
        labels: String,
        /// Netlist nodes restricted to that group.
        required: usize,
        /// Device sites carrying a label of the group.
        available: usize,
    },

    /// The placement policy could not produce an initial placement.
    #[error("initial placement failed")]
    InitialPlacementFailed,

    /// Some netlist edges have no matching device edge after optimization.
    #[error("{} netlist edge(s) could not be routed", unroutes.len())]
    Unroutable {
        /// Every unrouted edge at the final placement.
        unroutes: Vec<Unroute>,
    },
}
