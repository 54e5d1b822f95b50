//! JSON problem files: a device, a netlist and optional timing limits.
//!
//! ```json
//! {
//!   "labels": ["LUT", "DFF"],
//!   "device": {
//!     "nodes": [{ "name": "lut0", "label": "LUT" }, { "name": "ff0", "label": "DFF" }],
//!     "edges": [{ "from": "lut0", "from_port": "O", "to": "ff0", "to_port": "D" }]
//!   },
//!   "netlist": {
//!     "nodes": [
//!       { "name": "and", "label": "LUT" },
//!       { "name": "q", "label": "DFF", "site": "ff0" }
//!     ],
//!     "edges": [{ "from": "and", "from_port": "O", "to": "q", "to_port": "D" }]
//!   }
//! }
//! ```
//!
//! Device edges may carry a `delays` list of per-corner measurements. When a
//! `timing` section is present, routing a netlist edge over a device edge
//! slower than `max_delay` at `corner` costs 1.

use std::collections::HashMap;
use std::path::Path;

use matepar_common::{DelayTable, InternalError, ParResult, PtvCorner};
use matepar_graph::{mate_with, Graph, Label, LabelNames, NodeId};
use serde::Deserialize;

/// A parsed problem file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Problem {
    /// Label names, allocated in order in both graphs.
    pub labels: Vec<String>,
    /// The hardware.
    pub device: Section,
    /// The design; `site` pins a node to a device node.
    pub netlist: Section,
    /// Optional delay limit.
    #[serde(default)]
    pub timing: Option<TimingLimit>,
}

/// Nodes and edges of one graph.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Section {
    /// Nodes in insertion order.
    #[serde(default)]
    pub nodes: Vec<NodeSpec>,
    /// Edges in insertion order.
    #[serde(default)]
    pub edges: Vec<EdgeSpec>,
}

/// One node of a problem graph.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeSpec {
    /// Unique name within its graph.
    pub name: String,
    /// Primary label name.
    pub label: String,
    /// Additional label names (netlist only).
    #[serde(default)]
    pub alternates: Vec<String>,
    /// Device node this netlist node is constrained to.
    #[serde(default)]
    pub site: Option<String>,
}

/// One edge of a problem graph.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EdgeSpec {
    /// Source node name.
    pub from: String,
    /// Output port on the source.
    pub from_port: String,
    /// Destination node name.
    pub to: String,
    /// Input port on the destination.
    pub to_port: String,
    /// Per-corner delays (device only).
    #[serde(default)]
    pub delays: Option<DelayTable>,
}

/// Edges slower than `max_delay` ns at `corner` count against timing.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimingLimit {
    /// Corner at which delays are compared.
    pub corner: PtvCorner,
    /// Largest acceptable worst-case edge delay, in ns.
    pub max_delay: f32,
}

/// A device edge as seen from its endpoints and ports.
pub type EdgeKey = (NodeId, String, NodeId, String);

/// Graphs and side tables built from a [`Problem`].
#[derive(Debug)]
pub struct Design {
    /// Netlist graph; payloads are node names.
    pub netlist: Graph<String>,
    /// Device graph; payloads are node names.
    pub device: Graph<String>,
    /// Names of the labels.
    pub labels: LabelNames,
    /// Delays of the device edges that have them.
    pub delays: HashMap<EdgeKey, DelayTable>,
    /// Optional delay limit.
    pub timing: Option<TimingLimit>,
}

impl Problem {
    /// Reads a problem file.
    pub fn load(path: &Path) -> Result<Problem, Box<dyn std::error::Error>> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
        let problem = serde_json::from_str(&text)
            .map_err(|e| format!("cannot parse {}: {e}", path.display()))?;
        Ok(problem)
    }

    /// Builds the graphs, resolving every name.
    pub fn build(&self) -> ParResult<Design> {
        let mut netlist = Graph::new();
        let mut device = Graph::new();
        let mut labels = LabelNames::new();
        let mut label_ids = HashMap::new();
        for name in &self.labels {
            let label = netlist.allocate_label();
            device.allocate_label();
            if label_ids.insert(name.as_str(), label).is_some() {
                return Err(InternalError::new(format!("label `{name}` is defined twice")));
            }
            labels.insert(label, name.clone());
        }
        let label = |name: &str| {
            label_ids
                .get(name)
                .copied()
                .ok_or_else(|| InternalError::new(format!("unknown label `{name}`")))
        };

        let device_ids = add_nodes(&mut device, &self.device.nodes, "device", &label)?;
        let netlist_ids = add_nodes(&mut netlist, &self.netlist.nodes, "netlist", &label)?;

        let mut delays = HashMap::new();
        for edge in &self.device.edges {
            let (from, to) = endpoints(&device_ids, edge, "device")?;
            device.add_edge(from, edge.from_port.as_str(), to, edge.to_port.as_str());
            if let Some(table) = &edge.delays {
                let key = (from, edge.from_port.clone(), to, edge.to_port.clone());
                delays.insert(key, table.clone());
            }
        }
        for edge in &self.netlist.edges {
            let (from, to) = endpoints(&netlist_ids, edge, "netlist")?;
            netlist.add_edge(from, edge.from_port.as_str(), to, edge.to_port.as_str());
        }

        for (spec, &node) in self.netlist.nodes.iter().zip(netlist_ids.values_in_order()) {
            let Some(site) = &spec.site else { continue };
            let site = device_ids.get(site).ok_or_else(|| {
                InternalError::new(format!("node `{}` is pinned to unknown site `{site}`", spec.name))
            })?;
            let site_label = device.node(site).label();
            if !netlist.node(node).matches_label(site_label) {
                return Err(InternalError::new(format!(
                    "node `{}` cannot be pinned to site `{}`: it cannot take a `{}` site",
                    spec.name,
                    device.node(site).data(),
                    labels.name(site_label)
                )));
            }
            if let Some(other) = device.node(site).mate() {
                return Err(InternalError::new(format!(
                    "site `{}` is pinned by both `{}` and `{}`",
                    device.node(site).data(),
                    netlist.node(other).data(),
                    spec.name
                )));
            }
            mate_with(&mut netlist, node, &mut device, Some(site));
        }

        Ok(Design {
            netlist,
            device,
            labels,
            delays,
            timing: self.timing,
        })
    }
}

/// Name to node lookup that remembers insertion order.
struct Names {
    ids: HashMap<String, NodeId>,
    order: Vec<NodeId>,
}

impl Names {
    fn get(&self, name: &str) -> Option<NodeId> {
        self.ids.get(name).copied()
    }

    fn values_in_order(&self) -> &[NodeId] {
        &self.order
    }
}

fn add_nodes(
    graph: &mut Graph<String>,
    specs: &[NodeSpec],
    what: &str,
    label: &impl Fn(&str) -> ParResult<Label>,
) -> ParResult<Names> {
    let mut names = Names {
        ids: HashMap::new(),
        order: Vec::with_capacity(specs.len()),
    };
    for spec in specs {
        let id = graph.add_node(label(&spec.label)?, spec.name.clone());
        for alt in &spec.alternates {
            graph.add_alternate_label(id, label(alt)?);
        }
        if names.ids.insert(spec.name.clone(), id).is_some() {
            return Err(InternalError::new(format!(
                "{what} node `{}` is defined twice",
                spec.name
            )));
        }
        names.order.push(id);
    }
    Ok(names)
}

fn endpoints(names: &Names, edge: &EdgeSpec, what: &str) -> ParResult<(NodeId, NodeId)> {
    let lookup = |name: &str| {
        names
            .get(name)
            .ok_or_else(|| InternalError::new(format!("edge refers to unknown {what} node `{name}`")))
    };
    Ok((lookup(&edge.from)?, lookup(&edge.to)?))
}
