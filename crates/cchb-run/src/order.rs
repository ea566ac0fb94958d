//! Adapters for the ordering operations: compute and save CCH node orders,
//! and examine the chordal supergraph statistics of an existing order.

use std::collections::BTreeMap;
use std::path::Path;

use cchb_core::{BenchError, FlowCutterConfig, GraphId, MetricValue};
use cchb_parse::parse_metrics_log;

use crate::console::ConsoleCommand;
use crate::paths::{Binaries, ExperimentPaths};

/// Cut size cap passed to the accelerated ordering so enumeration never
/// stops early during parameter studies.
const MAX_CUT_SIZE: u64 = 100_000_000;

/// Computes a plain flow-cutter CCH order and saves it to `order`; the
/// console log (timing plus supergraph statistics) goes to `log`.
pub fn save_flowcutter_order(
    binaries: &Binaries,
    paths: &ExperimentPaths,
    graph: &GraphId,
    cutters: u32,
    order: &Path,
    log: &Path,
) -> Result<(), BenchError> {
    ConsoleCommand::new(&binaries.console)
        .load_graph(paths, graph)
        .normalize()
        .canonical_preorder()
        .set("cutter_count", cutters)
        .timed(|cmd| cmd.verb("reorder_nodes_in_flow_cutter_cch_order"))
        .verb("examine_chordal_supergraph")
        .verb("save_routingkit_node_permutation_since_last_load")
        .arg(order)
        .run_to_file(log)
}

/// Computes an accelerated flow-cutter CCH order with geographic cutter
/// seeding at its default tunables and saves it to `order`; the console log
/// goes to `log`. The cutter count should be a multiple of four so the
/// standard compass directions are among the chosen ones.
pub fn save_inertialflowcutter_order(
    binaries: &Binaries,
    paths: &ExperimentPaths,
    graph: &GraphId,
    cutters: u32,
    order: &Path,
    log: &Path,
) -> Result<(), BenchError> {
    ConsoleCommand::new(&binaries.console)
        .load_graph(paths, graph)
        .load_coordinates(paths, graph)
        .normalize()
        .canonical_preorder()
        .set("geo_pos_ordering_cutter_count", cutters)
        .timed(|cmd| cmd.verb("reorder_nodes_in_accelerated_flow_cutter_cch_order"))
        .verb("examine_chordal_supergraph")
        .verb("save_routingkit_node_permutation_since_last_load")
        .arg(order)
        .run_to_file(log)
}

/// Computes an inertial-flow nested dissection CCH order and saves it to
/// `order`; the console log goes to `log`. `min_balance` is the minimum
/// relative size of the smaller side at every dissection level.
pub fn save_inertial_flow_order(
    binaries: &Binaries,
    paths: &ExperimentPaths,
    graph: &GraphId,
    min_balance: f64,
    order: &Path,
    log: &Path,
) -> Result<(), BenchError> {
    ConsoleCommand::new(&binaries.console)
        .load_graph(paths, graph)
        .load_coordinates(paths, graph)
        .normalize()
        .canonical_preorder()
        .timed(|cmd| {
            cmd.verb("reorder_nodes_in_inertial_flow_ford_fulkerson_nested_dissection_order")
                .arg(min_balance.to_string())
        })
        .verb("examine_chordal_supergraph")
        .verb("save_routingkit_node_permutation_since_last_load")
        .arg(order)
        .run_to_file(log)
}

/// Computes an accelerated (inertial) flow-cutter CCH order under the given
/// tunables and saves it to `order`; the console log goes to `log`.
pub fn save_accelerated_order(
    binaries: &Binaries,
    paths: &ExperimentPaths,
    graph: &GraphId,
    config: &FlowCutterConfig,
    order: &Path,
    log: &Path,
) -> Result<(), BenchError> {
    ConsoleCommand::new(&binaries.console)
        .load_graph(paths, graph)
        .load_coordinates(paths, graph)
        .normalize()
        .canonical_preorder()
        .set("max_cut_size", MAX_CUT_SIZE)
        .set("distance_ordering_cutter_count", config.hop_distance_cutters)
        .set("geo_pos_ordering_cutter_count", config.geo_distance_cutters)
        .set(
            "bulk_assimilation_threshold",
            config.bulk_assimilation_threshold,
        )
        .set(
            "bulk_assimilation_order_threshold",
            config.bulk_assimilation_order_threshold,
        )
        .set("bulk_step_fraction", config.bulk_step_fraction)
        .set(
            "initial_assimilated_fraction",
            config.initial_assimilated_fraction,
        )
        .timed(|cmd| cmd.verb("reorder_nodes_in_accelerated_flow_cutter_cch_order"))
        .verb("examine_chordal_supergraph")
        .verb("save_routingkit_node_permutation_since_last_load")
        .arg(order)
        .run_to_file(log)
}

/// Applies a saved node order and reports chordal supergraph statistics.
pub fn examine_order(
    binaries: &Binaries,
    paths: &ExperimentPaths,
    graph: &GraphId,
    order: &Path,
) -> Result<BTreeMap<String, MetricValue>, BenchError> {
    let output = ConsoleCommand::new(&binaries.console)
        .load_graph(paths, graph)
        .normalize()
        .verb("permutate_nodes_routingkit")
        .arg(order)
        .verb("examine_chordal_supergraph")
        .run_capture()?;
    parse_metrics_log(&output)
}
