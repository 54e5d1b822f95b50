//! Annealing place-and-route engine for matepar.
//!
//! The engine maps the nodes of a netlist [`Graph`](matepar_graph::Graph) onto
//! the sites of a device graph so that every netlist edge has a matching
//! device edge. It knows nothing about the device: a [`PlacementPolicy`]
//! supplies the initial placement, identifies badly placed nodes and proposes
//! new sites, and may add timing and congestion costs.
//!
//! # Usage
//!
//! ```
//! use matepar_config::EngineConfig;
//! use matepar_diagnostics::DiagnosticSink;
//! use matepar_engine::{FirstFitPolicy, PlacementEngine};
//! use matepar_graph::{Graph, LabelNames};
//!
//! let mut netlist = Graph::new();
//! let lut = netlist.allocate_label();
//! let a = netlist.add_node(lut, "a");
//! let b = netlist.add_node(lut, "b");
//! netlist.add_edge(a, "O", b, "I");
//!
//! let mut device = Graph::new();
//! device.allocate_label();
//! let x = device.add_node(lut, "x");
//! let y = device.add_node(lut, "y");
//! device.add_edge(x, "O", y, "I");
//!
//! let sink = DiagnosticSink::new();
//! let mut engine = PlacementEngine::new(&mut netlist, &mut device, EngineConfig::default());
//! let report = engine
//!     .place_and_route(&mut FirstFitPolicy, &LabelNames::new(), 0, &sink)
//!     .unwrap();
//! assert_eq!(report.cost, 0);
//! drop(engine);
//! assert_eq!(netlist.node(a).mate(), Some(x));
//! ```

#![warn(missing_docs)]

pub mod codes;
pub mod error;
pub mod placement;
pub mod report;
pub mod rng;

pub use error::{PlacementError, Unroute};
pub use placement::{FirstFitPolicy, PlacementEngine, PlacementPolicy, UNROUTABLE_WEIGHT};
pub use report::PlacementReport;
pub use rng::Lcg;
