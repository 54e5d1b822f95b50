//! Caller-supplied hooks and the engine handle.

use crate::buffer::{str_arg, MateparBuffer, MateparNodeList, MateparString};
use crate::graph::{node_id, MateparGraph};
use crate::run::{unroute_list, Engine, MateparRun, MateparUnrouteList};
use matepar_config::EngineConfig;
use matepar_diagnostics::{DiagnosticRenderer, DiagnosticSink, TerminalRenderer};
use matepar_engine::{PlacementError, PlacementPolicy, PlacementReport};
use matepar_graph::{Label, LabelNames, NodeId};
use std::ffi::c_void;
use std::ptr::{self, NonNull};

/// Device policy supplied as C function pointers.
///
/// `ctx` is passed back unchanged as the first argument of every hook. The
/// first three hooks are required; the others fall back to the built-in
/// behaviour when null.
///
/// Node lists returned by `find_suboptimal_placements` stay owned by the
/// caller: the engine copies them and hands them back through
/// `free_node_list`, or simply forgets them if that hook is null.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct MateparHooks {
    /// Opaque caller context.
    pub ctx: *mut c_void,
    /// Mates every netlist node with a label-compatible device site.
    pub initial_placement_core:
        Option<unsafe extern "C" fn(*mut c_void, *mut MateparRun) -> bool>,
    /// Lists the netlist nodes worth moving; an empty list ends optimization.
    pub find_suboptimal_placements:
        Option<unsafe extern "C" fn(*mut c_void, *mut MateparRun) -> MateparNodeList>,
    /// Releases a list returned by `find_suboptimal_placements`.
    pub free_node_list: Option<unsafe extern "C" fn(*mut c_void, MateparNodeList)>,
    /// Proposes a device site for a pivot, or `MATEPAR_NO_NODE`.
    pub get_new_placement_for_node:
        Option<unsafe extern "C" fn(*mut c_void, *mut MateparRun, u32) -> u32>,
    /// Decides whether a node may move from its old site to a new one.
    pub can_move_node:
        Option<unsafe extern "C" fn(*mut c_void, *const MateparRun, u32, u32, u32) -> bool>,
    /// Congestion cost of the current placement.
    pub compute_congestion_cost:
        Option<unsafe extern "C" fn(*mut c_void, *const MateparRun) -> u32>,
    /// Timing cost of the current placement.
    pub compute_timing_cost: Option<unsafe extern "C" fn(*mut c_void, *const MateparRun) -> u32>,
    /// Human-readable name of a label, borrowed for the duration of the call.
    pub label_name: Option<unsafe extern "C" fn(*mut c_void, u32, *mut usize) -> *const u8>,
}

impl MateparHooks {
    fn is_complete(&self) -> bool {
        self.initial_placement_core.is_some()
            && self.find_suboptimal_placements.is_some()
            && self.get_new_placement_for_node.is_some()
    }

    /// Asks the `label_name` hook for the names of labels `0..count`.
    unsafe fn label_names(&self, count: u32) -> LabelNames {
        let mut names = LabelNames::new();
        let Some(hook) = self.label_name else {
            return names;
        };
        for raw in 0..count {
            let mut len = 0usize;
            let name = hook(self.ctx, raw, &mut len);
            if !name.is_null() {
                names.insert(Label::from_raw(raw), str_arg(name, len));
            }
        }
        names
    }
}

struct FfiPolicy<'h> {
    hooks: &'h MateparHooks,
}

impl PlacementPolicy<*mut c_void, *mut c_void> for FfiPolicy<'_> {
    fn initial_placement_core(&mut self, engine: &mut Engine<'_>) -> bool {
        let Some(hook) = self.hooks.initial_placement_core else {
            return false;
        };
        let mut run = MateparRun::new(engine);
        unsafe { hook(self.hooks.ctx, &mut run) }
    }

    fn find_suboptimal_placements(&mut self, engine: &mut Engine<'_>) -> Vec<NodeId> {
        let Some(hook) = self.hooks.find_suboptimal_placements else {
            return Vec::new();
        };
        let mut run = MateparRun::new(engine);
        let list = unsafe { hook(self.hooks.ctx, &mut run) };
        let nodes = unsafe { list.as_slice() }
            .iter()
            .filter_map(|&raw| node_id(engine.netlist(), raw))
            .collect();
        if let Some(free) = self.hooks.free_node_list {
            unsafe { free(self.hooks.ctx, list) };
        }
        nodes
    }

    fn get_new_placement_for_node(
        &mut self,
        engine: &mut Engine<'_>,
        pivot: NodeId,
    ) -> Option<NodeId> {
        let hook = self.hooks.get_new_placement_for_node?;
        let mut run = MateparRun::new(engine);
        let site = unsafe { hook(self.hooks.ctx, &mut run, pivot.as_raw()) };
        node_id(engine.device(), site)
    }

    fn can_move_node(
        &self,
        engine: &Engine<'_>,
        node: NodeId,
        old_site: NodeId,
        new_site: NodeId,
    ) -> bool {
        match self.hooks.can_move_node {
            Some(hook) => {
                let run = MateparRun::read_only(engine);
                let (node, old, new) = (node.as_raw(), old_site.as_raw(), new_site.as_raw());
                unsafe { hook(self.hooks.ctx, &run, node, old, new) }
            }
            None => engine.can_move_node(node, old_site, new_site),
        }
    }

    fn compute_congestion_cost(&self, engine: &Engine<'_>) -> u32 {
        self.hooks.compute_congestion_cost.map_or(0, |hook| {
            let run = MateparRun::read_only(engine);
            unsafe { hook(self.hooks.ctx, &run) }
        })
    }

    fn compute_timing_cost(&self, engine: &Engine<'_>) -> u32 {
        self.hooks.compute_timing_cost.map_or(0, |hook| {
            let run = MateparRun::read_only(engine);
            unsafe { hook(self.hooks.ctx, &run) }
        })
    }
}

/// A placement engine bound to a netlist, a device and a set of hooks.
///
/// Both graphs must outlive the engine and must not be touched by the caller
/// while [`matepar_engine_place_and_route`] runs, except through the run
/// handle passed to the hooks.
pub struct MateparEngine {
    netlist: NonNull<MateparGraph>,
    device: NonNull<MateparGraph>,
    hooks: MateparHooks,
    config: EngineConfig,
    sink: DiagnosticSink,
    last: Option<PlacementReport>,
}

impl MateparEngine {
    /// Builds a placement engine over the two graphs for the duration of `f`.
    unsafe fn with_engine<R>(&mut self, f: impl FnOnce(&mut Engine<'_>, &MateparHooks) -> R) -> R {
        let config = self.config.clone();
        let mut engine = Engine::new(self.netlist.as_mut(), self.device.as_mut(), config);
        f(&mut engine, &self.hooks)
    }

    unsafe fn labels(&self) -> LabelNames {
        let count = self
            .netlist
            .as_ref()
            .label_count()
            .max(self.device.as_ref().label_count());
        self.hooks.label_names(count)
    }
}

/// Creates an engine, or returns null if a graph is missing, both graphs are
/// the same, or a required hook is null. `max_temperature` of 0 is treated as 1.
///
/// # Safety
///
/// `netlist` and `device` must be valid graph handles outliving the engine;
/// `hooks` must be null or point to a readable hook table, which is copied.
#[no_mangle]
pub unsafe extern "C" fn matepar_engine_create(
    netlist: *mut MateparGraph,
    device: *mut MateparGraph,
    hooks: *const MateparHooks,
    max_temperature: u32,
    verbose: bool,
) -> *mut MateparEngine {
    let (Some(netlist), Some(device), Some(hooks)) =
        (NonNull::new(netlist), NonNull::new(device), hooks.as_ref())
    else {
        return ptr::null_mut();
    };
    if netlist == device || !hooks.is_complete() {
        return ptr::null_mut();
    }
    let config = EngineConfig {
        max_temperature,
        verbose,
        ..EngineConfig::default()
    };
    Box::into_raw(Box::new(MateparEngine {
        netlist,
        device,
        hooks: *hooks,
        config,
        sink: DiagnosticSink::new(),
        last: None,
    }))
}

/// Destroys an engine. The graphs are left untouched.
///
/// # Safety
///
/// `engine` must be null or come from [`matepar_engine_create`].
#[no_mangle]
pub unsafe extern "C" fn matepar_engine_destroy(engine: *mut MateparEngine) {
    if !engine.is_null() {
        drop(Box::from_raw(engine));
    }
}

/// Runs placement and routing with the given seed.
///
/// Returns `true` if every netlist edge was routed. On failure the reasons are
/// available from [`matepar_engine_diagnostics`]. A hook that breaks the label
/// contract aborts the process.
///
/// # Safety
///
/// `engine` must be a valid engine handle and its graphs must still be alive.
#[no_mangle]
pub unsafe extern "C" fn matepar_engine_place_and_route(
    engine: *mut MateparEngine,
    seed: u32,
) -> bool {
    let Some(this) = engine.as_mut() else {
        return false;
    };
    let labels = this.labels();
    let sink = DiagnosticSink::new();
    let result: Result<PlacementReport, PlacementError> = this.with_engine(|engine, hooks| {
        engine.place_and_route(&mut FfiPolicy { hooks }, &labels, seed, &sink)
    });
    for diag in sink.take_all() {
        this.sink.emit(diag);
    }
    match result {
        Ok(report) => {
            this.last = Some(report);
            true
        }
        Err(_) => {
            this.last = None;
            false
        }
    }
}

/// Returns the total cost of the current placement, calling the cost hooks.
///
/// # Safety
///
/// `engine` must be a valid engine handle and its graphs must still be alive.
#[no_mangle]
pub unsafe extern "C" fn matepar_engine_compute_cost(engine: *mut MateparEngine) -> u32 {
    match engine.as_mut() {
        Some(this) => this.with_engine(|engine, hooks| engine.compute_cost(&FfiPolicy { hooks })),
        None => 0,
    }
}

/// Returns the optimizer iterations of the last successful run, or 0.
///
/// # Safety
///
/// `engine` must be null or a valid engine handle.
#[no_mangle]
pub unsafe extern "C" fn matepar_engine_iterations(engine: *const MateparEngine) -> u32 {
    engine
        .as_ref()
        .and_then(|this| this.last.as_ref())
        .map_or(0, |report| report.iterations)
}

/// Lists the unrouted netlist edges at the current placement. Free the list
/// with [`matepar_unroute_list_free`](crate::matepar_unroute_list_free).
///
/// # Safety
///
/// `engine` must be a valid engine handle and its graphs must still be alive.
#[no_mangle]
pub unsafe extern "C" fn matepar_engine_unroutes(engine: *mut MateparEngine) -> MateparUnrouteList {
    match engine.as_mut() {
        Some(this) => this.with_engine(|engine, _| {
            let (_, unroutes) = engine.compute_unroutable_cost();
            unroute_list(engine, &unroutes)
        }),
        None => MateparBuffer::empty(),
    }
}

/// Renders and clears the diagnostics collected so far. Free the text with
/// [`matepar_string_free`](crate::matepar_string_free).
///
/// # Safety
///
/// `engine` must be null or a valid engine handle.
#[no_mangle]
pub unsafe extern "C" fn matepar_engine_diagnostics(engine: *mut MateparEngine) -> MateparString {
    let Some(this) = engine.as_mut() else {
        return MateparBuffer::empty();
    };
    let renderer = TerminalRenderer::new(false);
    let text: String = this.sink.take_all().iter().map(|d| renderer.render(d)).collect();
    MateparString::from_string(text)
}

/// Returns the label names a netlist node can take, e.g. `LUT2/PGEN`, or an
/// empty string for an invalid node. Free it with
/// [`matepar_string_free`](crate::matepar_string_free).
///
/// # Safety
///
/// `engine` must be a valid engine handle and its graphs must still be alive.
#[no_mangle]
pub unsafe extern "C" fn matepar_engine_node_types(
    engine: *const MateparEngine,
    node: u32,
) -> MateparString {
    let Some(this) = engine.as_ref() else {
        return MateparBuffer::empty();
    };
    let netlist = this.netlist.as_ref();
    match node_id(netlist, node) {
        Some(id) => MateparString::from_string(this.labels().node_types(netlist.node(id))),
        None => MateparBuffer::empty(),
    }
}
