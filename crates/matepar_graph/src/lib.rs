//! Place-and-route graphs for the matepar toolchain.
//!
//! A [`Graph`] is either a netlist (the design being placed) or a device (the
//! fixed resource sites of a chip). Both are arenas of [`Node`]s addressed by
//! [`NodeId`]; each node carries a resource-class [`Label`], optional alternate
//! labels, an opaque caller payload, outbound [`Edge`]s and a *mate*: the node
//! of the other graph it is currently paired with.
//!
//! Mating always spans two graphs, so it is performed by the free functions in
//! [`mate`] which borrow both sides mutably and keep the relation mutual.
//!
//! ```
//! use matepar_graph::{mate_with, Graph};
//!
//! let mut device = Graph::new();
//! let lut = device.allocate_label();
//! let site = device.add_node(lut, "LUT2_0");
//!
//! let mut netlist = Graph::new();
//! netlist.allocate_label();
//! let cell = netlist.add_node(lut, "and_gate");
//!
//! mate_with(&mut netlist, cell, &mut device, Some(site));
//! assert_eq!(netlist.node(cell).mate(), Some(site));
//! assert_eq!(device.node(site).mate(), Some(cell));
//! ```

#![warn(missing_docs)]

pub mod graph;
pub mod ids;
pub mod labels;
pub mod mate;
pub mod node;

pub use graph::Graph;
pub use ids::{Label, NodeId};
pub use labels::LabelNames;
pub use mate::{is_consistent, mate_with, unmate};
pub use node::{Edge, Node};
