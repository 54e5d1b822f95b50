//! The view of a running placement handed to hooks.

use crate::buffer::MateparBuffer;
use crate::graph::{node_id, MateparGraph, MATEPAR_NO_NODE};
use matepar_engine::{PlacementEngine, Unroute};
use std::ffi::c_void;

pub(crate) type Engine<'g> = PlacementEngine<'g, *mut c_void, *mut c_void>;

/// A placement run in progress, passed to every hook.
///
/// Hooks that receive a `const` run (`can_move_node` and the cost hooks) may
/// only query it; the mutating `matepar_run_*` functions do nothing on such a
/// run. The handle is only valid for the duration of the hook call.
pub struct MateparRun {
    engine: *mut Engine<'static>,
    mutable: bool,
}

impl MateparRun {
    pub(crate) fn new(engine: &mut Engine<'_>) -> Self {
        Self {
            engine: (engine as *mut Engine<'_>).cast(),
            mutable: true,
        }
    }

    pub(crate) fn read_only(engine: &Engine<'_>) -> Self {
        Self {
            engine: (engine as *const Engine<'_> as *mut Engine<'_>).cast(),
            mutable: false,
        }
    }
}

unsafe fn engine_ref<'a>(run: *const MateparRun) -> Option<&'a Engine<'static>> {
    run.as_ref().and_then(|r| r.engine.as_ref())
}

unsafe fn engine_mut<'a>(run: *mut MateparRun) -> Option<&'a mut Engine<'static>> {
    match run.as_ref() {
        Some(r) if r.mutable => r.engine.as_mut(),
        _ => None,
    }
}

/// One unrouted netlist edge: the `edge_index`-th outbound edge of `source`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MateparUnroute {
    /// Driving netlist node.
    pub source: u32,
    /// Index of the edge among the outbound edges of `source`.
    pub edge_index: u32,
    /// Receiving netlist node.
    pub dest: u32,
}

/// A list of unrouted edges, owned by the caller.
pub type MateparUnrouteList = MateparBuffer<MateparUnroute>;

pub(crate) fn unroute_list(engine: &Engine<'_>, unroutes: &[Unroute]) -> MateparUnrouteList {
    let list = unroutes
        .iter()
        .map(|u| {
            let edge_index = engine
                .netlist()
                .node(u.source)
                .edges()
                .iter()
                .position(|e| e.connects(&u.source_port, u.dest, &u.dest_port))
                .map_or(u32::MAX, |i| i as u32);
            MateparUnroute {
                source: u.source.as_raw(),
                edge_index,
                dest: u.dest.as_raw(),
            }
        })
        .collect();
    MateparBuffer::from_vec(list)
}

/// Frees an unroute list returned by matepar.
///
/// # Safety
///
/// `list` must have been returned by a matepar function and not freed before.
#[no_mangle]
pub unsafe extern "C" fn matepar_unroute_list_free(list: MateparUnrouteList) {
    drop(list.into_vec());
}

/// Returns the netlist graph of a run, for the `matepar_graph_*` and
/// `matepar_node_*` queries. It must not be modified through this pointer.
///
/// # Safety
///
/// `run` must be the handle passed to the current hook call.
#[no_mangle]
pub unsafe extern "C" fn matepar_run_netlist(run: *const MateparRun) -> *const MateparGraph {
    engine_ref(run).map_or(std::ptr::null(), |e| e.netlist() as *const MateparGraph)
}

/// Returns the device graph of a run. It must not be modified through this pointer.
///
/// # Safety
///
/// `run` must be the handle passed to the current hook call.
#[no_mangle]
pub unsafe extern "C" fn matepar_run_device(run: *const MateparRun) -> *const MateparGraph {
    engine_ref(run).map_or(std::ptr::null(), |e| e.device() as *const MateparGraph)
}

/// Returns the current temperature.
///
/// # Safety
///
/// `run` must be the handle passed to the current hook call.
#[no_mangle]
pub unsafe extern "C" fn matepar_run_temperature(run: *const MateparRun) -> u32 {
    engine_ref(run).map_or(0, |e| e.temperature())
}

/// Draws the next number from the run's random stream, or 0 on a read-only run.
///
/// # Safety
///
/// `run` must be the handle passed to the current hook call.
#[no_mangle]
pub unsafe extern "C" fn matepar_run_random_number(run: *mut MateparRun) -> u32 {
    engine_mut(run).map_or(0, |e| e.random_number())
}

/// Mates netlist node `node` with device site `site`, or unplaces it when
/// `site` is `MATEPAR_NO_NODE`. Returns `false` if nothing was done.
///
/// # Safety
///
/// `run` must be the handle passed to the current hook call.
#[no_mangle]
pub unsafe extern "C" fn matepar_run_mate(run: *mut MateparRun, node: u32, site: u32) -> bool {
    let Some(engine) = engine_mut(run) else {
        return false;
    };
    let Some(node) = node_id(engine.netlist(), node) else {
        return false;
    };
    let site = if site == MATEPAR_NO_NODE {
        None
    } else {
        match node_id(engine.device(), site) {
            Some(site) => Some(site),
            None => return false,
        }
    };
    engine.mate(node, site);
    true
}

/// Moves `node` to `site`, swapping with any netlist node already there.
///
/// # Safety
///
/// `run` must be the handle passed to the current hook call.
#[no_mangle]
pub unsafe extern "C" fn matepar_run_move_node(run: *mut MateparRun, node: u32, site: u32) -> bool {
    let Some(engine) = engine_mut(run) else {
        return false;
    };
    match (node_id(engine.netlist(), node), node_id(engine.device(), site)) {
        (Some(node), Some(site)) => {
            engine.move_node(node, site);
            true
        }
        _ => false,
    }
}

/// Applies the built-in move rule: the netlist node occupying `new_site`, if
/// any, must accept `old_site`.
///
/// # Safety
///
/// `run` must be the handle passed to the current hook call.
#[no_mangle]
pub unsafe extern "C" fn matepar_run_can_move_node(
    run: *const MateparRun,
    node: u32,
    old_site: u32,
    new_site: u32,
) -> bool {
    let Some(engine) = engine_ref(run) else {
        return false;
    };
    match (
        node_id(engine.netlist(), node),
        node_id(engine.device(), old_site),
        node_id(engine.device(), new_site),
    ) {
        (Some(node), Some(old), Some(new)) => engine.can_move_node(node, old, new),
        _ => false,
    }
}

/// Returns the number of unrouted netlist edges at the current placement.
///
/// # Safety
///
/// `run` must be the handle passed to the current hook call.
#[no_mangle]
pub unsafe extern "C" fn matepar_run_unroutable_cost(run: *const MateparRun) -> u32 {
    engine_ref(run).map_or(0, |e| e.compute_unroutable_cost().0)
}

/// Lists the unrouted netlist edges. Free the list with
/// [`matepar_unroute_list_free`].
///
/// # Safety
///
/// `run` must be the handle passed to the current hook call.
#[no_mangle]
pub unsafe extern "C" fn matepar_run_unroutes(run: *const MateparRun) -> MateparUnrouteList {
    match engine_ref(run) {
        Some(engine) => unroute_list(engine, &engine.compute_unroutable_cost().1),
        None => MateparBuffer::empty(),
    }
}

/// Counts the unrouted edges touching `pivot` if it were placed at `candidate`.
///
/// # Safety
///
/// `run` must be the handle passed to the current hook call.
#[no_mangle]
pub unsafe extern "C" fn matepar_run_node_unroutable_cost(
    run: *const MateparRun,
    pivot: u32,
    candidate: u32,
) -> u32 {
    let Some(engine) = engine_ref(run) else {
        return 0;
    };
    let netlist = engine.netlist();
    match (node_id(netlist, pivot), node_id(engine.device(), candidate)) {
        (Some(pivot), Some(candidate)) => engine.compute_node_unroutable_cost(pivot, candidate),
        _ => 0,
    }
}

/// Snapshots the current placement as the best one.
///
/// # Safety
///
/// `run` must be the handle passed to the current hook call.
#[no_mangle]
pub unsafe extern "C" fn matepar_run_save_best(run: *mut MateparRun) {
    if let Some(engine) = engine_mut(run) {
        engine.save_best_placement();
    }
}

/// Restores the best placement snapshot.
///
/// # Safety
///
/// `run` must be the handle passed to the current hook call.
#[no_mangle]
pub unsafe extern "C" fn matepar_run_restore_best(run: *mut MateparRun) {
    if let Some(engine) = engine_mut(run) {
        engine.restore_best_placement();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matepar_config::EngineConfig;
    use matepar_graph::Graph;

    fn pair() -> (MateparGraph, MateparGraph) {
        let mut netlist: MateparGraph = Graph::new();
        let lut = netlist.allocate_label();
        let a = netlist.add_node(lut, std::ptr::null_mut());
        let b = netlist.add_node(lut, std::ptr::null_mut());
        netlist.add_edge(a, "O", b, "I");
        let mut device: MateparGraph = Graph::new();
        device.allocate_label();
        let x = device.add_node(lut, std::ptr::null_mut());
        let y = device.add_node(lut, std::ptr::null_mut());
        device.add_edge(x, "O", y, "I");
        (netlist, device)
    }

    #[test]
    fn read_only_run_refuses_mutation() {
        let (mut netlist, mut device) = pair();
        let engine = Engine::new(&mut netlist, &mut device, EngineConfig::default());
        let mut run = MateparRun::read_only(&engine);
        unsafe {
            assert!(!matepar_run_mate(&mut run, 0, 0));
            assert_eq!(matepar_run_random_number(&mut run), 0);
            assert_eq!(matepar_run_temperature(&run), 100);
        }
    }

    #[test]
    fn unroutes_point_at_edges() {
        let (mut netlist, mut device) = pair();
        let mut engine = Engine::new(&mut netlist, &mut device, EngineConfig::default());
        let mut run = MateparRun::new(&mut engine);
        unsafe {
            assert!(matepar_run_mate(&mut run, 0, 1));
            assert!(matepar_run_mate(&mut run, 1, 0));
            assert_eq!(matepar_run_unroutable_cost(&run), 1);
            let list = matepar_run_unroutes(&run);
            assert_eq!(
                list.as_slice(),
                &[MateparUnroute { source: 0, edge_index: 0, dest: 1 }]
            );
            matepar_unroute_list_free(list);

            assert!(matepar_run_move_node(&mut run, 0, 0));
            assert_eq!(matepar_run_unroutable_cost(&run), 0);
            assert!(!matepar_run_move_node(&mut run, 0, 7));
        }
    }
}
