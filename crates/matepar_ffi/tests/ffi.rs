//! Drives the C ABI the way a foreign caller would.

use matepar_ffi::*;
use std::ffi::c_void;
use std::ptr;

#[derive(Default)]
struct Ctx {
    freed: u32,
    timing: u32,
}

unsafe fn ctx<'a>(raw: *mut c_void) -> &'a mut Ctx {
    &mut *raw.cast::<Ctx>()
}

/// Places netlist node `i` on device site `n - 1 - i`.
unsafe extern "C" fn reversed(_ctx: *mut c_void, run: *mut MateparRun) -> bool {
    let n = matepar_graph_num_nodes(matepar_run_netlist(run));
    for i in 0..n {
        if !matepar_run_mate(run, i, n - 1 - i) {
            return false;
        }
    }
    true
}

unsafe extern "C" fn unroute_endpoints(_ctx: *mut c_void, run: *mut MateparRun) -> MateparNodeList {
    let unroutes = matepar_run_unroutes(run);
    let mut nodes: Vec<u32> = unroutes
        .as_slice()
        .iter()
        .flat_map(|u| [u.source, u.dest])
        .collect();
    matepar_unroute_list_free(unroutes);
    nodes.sort_unstable();
    nodes.dedup();
    MateparBuffer::from_vec(nodes)
}

unsafe extern "C" fn free_list(ctx_ptr: *mut c_void, list: MateparNodeList) {
    ctx(ctx_ptr).freed += 1;
    drop(list.into_vec());
}

/// Proposes the other of two device sites.
unsafe extern "C" fn other_site(_ctx: *mut c_void, run: *mut MateparRun, pivot: u32) -> u32 {
    match matepar_node_mate(matepar_run_netlist(run), pivot) {
        MATEPAR_NO_NODE => 0,
        site => 1 - site,
    }
}

unsafe extern "C" fn timing(ctx_ptr: *mut c_void, _run: *const MateparRun) -> u32 {
    ctx(ctx_ptr).timing
}

unsafe extern "C" fn label_name(_ctx: *mut c_void, label: u32, len: *mut usize) -> *const u8 {
    let name: &'static str = if label == 0 { "LUT" } else { "DFF" };
    *len = name.len();
    name.as_ptr()
}

fn hooks(ctx: &mut Ctx) -> MateparHooks {
    MateparHooks {
        ctx: (ctx as *mut Ctx).cast(),
        initial_placement_core: Some(reversed),
        find_suboptimal_placements: Some(unroute_endpoints),
        free_node_list: Some(free_list),
        get_new_placement_for_node: Some(other_site),
        can_move_node: None,
        compute_congestion_cost: None,
        compute_timing_cost: Some(timing),
        label_name: Some(label_name),
    }
}

unsafe fn add_edge(g: *mut MateparGraph, src: u32, dst: u32) {
    let (o, i) = ("O", "I");
    matepar_graph_add_edge(g, src, o.as_ptr(), o.len(), dst, i.as_ptr(), i.len());
}

/// Netlist `a -> b` and device `x -> y`, both with one label.
unsafe fn two_by_two() -> (*mut MateparGraph, *mut MateparGraph) {
    let netlist = matepar_graph_create();
    let lut = matepar_graph_allocate_label(netlist);
    let a = matepar_graph_add_node(netlist, lut, ptr::null_mut());
    let b = matepar_graph_add_node(netlist, lut, ptr::null_mut());
    add_edge(netlist, a, b);

    let device = matepar_graph_create();
    matepar_graph_allocate_label(device);
    let x = matepar_graph_add_node(device, lut, ptr::null_mut());
    let y = matepar_graph_add_node(device, lut, ptr::null_mut());
    add_edge(device, x, y);
    (netlist, device)
}

unsafe fn take_string(s: MateparString) -> String {
    let text = String::from_utf8_lossy(s.as_slice()).into_owned();
    matepar_string_free(s);
    text
}

#[test]
fn hooks_drive_placement_to_a_routable_result() {
    let mut state = Ctx::default();
    let hooks = hooks(&mut state);
    unsafe {
        let (netlist, device) = two_by_two();
        let engine = matepar_engine_create(netlist, device, &hooks, 100, false);
        assert!(!engine.is_null());

        assert!(matepar_engine_place_and_route(engine, 0));
        assert_eq!(matepar_node_mate(netlist, 0), 0);
        assert_eq!(matepar_node_mate(netlist, 1), 1);
        assert_eq!(matepar_node_mate(device, 1), 1);
        assert!(matepar_engine_iterations(engine) >= 1);
        assert_eq!(matepar_engine_compute_cost(engine), 0);

        let unroutes = matepar_engine_unroutes(engine);
        assert_eq!(unroutes.len, 0);
        matepar_unroute_list_free(unroutes);

        assert_eq!(take_string(matepar_engine_node_types(engine, 0)), "LUT");

        matepar_engine_destroy(engine);
        matepar_graph_destroy(netlist);
        matepar_graph_destroy(device);
    }
    assert!(state.freed >= 1);
}

#[test]
fn timing_hook_feeds_the_cost() {
    let mut state = Ctx {
        timing: 7,
        ..Ctx::default()
    };
    let hooks = hooks(&mut state);
    unsafe {
        let (netlist, device) = two_by_two();
        let engine = matepar_engine_create(netlist, device, &hooks, 100, false);
        // a on y, b on x: one unrouted edge.
        assert!(matepar_node_mate_with(netlist, 0, device, 1));
        assert!(matepar_node_mate_with(netlist, 1, device, 0));
        assert_eq!(matepar_engine_compute_cost(engine), 17);

        let unroutes = matepar_engine_unroutes(engine);
        assert_eq!(
            unroutes.as_slice(),
            &[MateparUnroute {
                source: 0,
                edge_index: 0,
                dest: 1
            }]
        );
        matepar_unroute_list_free(unroutes);

        matepar_engine_destroy(engine);
        matepar_graph_destroy(netlist);
        matepar_graph_destroy(device);
    }
}

#[test]
fn too_big_design_is_reported_with_label_names() {
    let mut state = Ctx::default();
    let hooks = hooks(&mut state);
    unsafe {
        let netlist = matepar_graph_create();
        let lut = matepar_graph_allocate_label(netlist);
        matepar_graph_add_node(netlist, lut, ptr::null_mut());
        matepar_graph_add_node(netlist, lut, ptr::null_mut());
        let device = matepar_graph_create();
        matepar_graph_allocate_label(device);
        matepar_graph_add_node(device, lut, ptr::null_mut());

        let engine = matepar_engine_create(netlist, device, &hooks, 100, false);
        assert!(!matepar_engine_place_and_route(engine, 0));
        assert_eq!(matepar_engine_iterations(engine), 0);

        let text = take_string(matepar_engine_diagnostics(engine));
        assert!(text.contains("error[E102]"), "{text}");
        assert!(text.contains("(LUT)"), "{text}");
        assert!(take_string(matepar_engine_diagnostics(engine)).is_empty());

        matepar_engine_destroy(engine);
        matepar_graph_destroy(netlist);
        matepar_graph_destroy(device);
    }
}

#[test]
fn engine_creation_checks_its_arguments() {
    let mut state = Ctx::default();
    let mut partial = hooks(&mut state);
    unsafe {
        let (netlist, device) = two_by_two();
        let complete = partial;
        assert!(matepar_engine_create(netlist, netlist, &complete, 100, false).is_null());
        assert!(matepar_engine_create(netlist, device, ptr::null(), 100, false).is_null());
        partial.get_new_placement_for_node = None;
        assert!(matepar_engine_create(netlist, device, &partial, 100, false).is_null());
        matepar_graph_destroy(netlist);
        matepar_graph_destroy(device);
    }
}
