//! Flat C ABI over matepar graphs and the placement engine.
//!
//! Graphs, engines and runs are opaque handles; nodes are addressed by index.
//! The device policy is supplied as a [`MateparHooks`] table of function
//! pointers. Strings cross the boundary as pointer and length.
//!
//! Ownership follows two rules. A [`MateparBuffer`] returned by a `matepar_*`
//! function belongs to the caller and must be released with the matching
//! `*_free` function. A bare `*const u8` returned by a `matepar_*` function is
//! borrowed and stays valid only until the graph it came from is modified.

#![warn(missing_docs)]

pub mod buffer;
pub mod engine;
pub mod graph;
pub mod run;

pub use buffer::{
    matepar_node_list_free, matepar_string_free, MateparBuffer, MateparNodeList, MateparString,
};
pub use engine::{
    matepar_engine_compute_cost, matepar_engine_create, matepar_engine_destroy,
    matepar_engine_diagnostics, matepar_engine_iterations, matepar_engine_node_types,
    matepar_engine_place_and_route, matepar_engine_unroutes, MateparEngine, MateparHooks,
};
pub use graph::*;
pub use run::*;
