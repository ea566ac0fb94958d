//! Adapters for the cut operations: pareto enumeration, one-shot inertial
//! flow cuts, and METIS bipartitions examined through the console.

use std::collections::BTreeMap;
use std::ffi::OsString;

use cchb_core::{BenchError, CutCandidate, ErrorInfo, GraphId, MetricValue};
use cchb_parse::{parse_cut_enumeration, parse_metrics_log_with, RunningTimePolicy};
use tempfile::tempdir;

use crate::console::{capture_output, ConsoleCommand};
use crate::paths::{Binaries, ExperimentPaths};

/// Enumerates the cut frontier of the plain flow cutter.
pub fn enumerate_flowcutter_cuts(
    binaries: &Binaries,
    paths: &ExperimentPaths,
    graph: &GraphId,
    cutters: u32,
) -> Result<Vec<CutCandidate>, BenchError> {
    let output = ConsoleCommand::new(&binaries.console)
        .load_graph(paths, graph)
        .normalize()
        .canonical_preorder()
        .set("cutter_count", cutters)
        .set("ReportCuts", "no")
        .verb("flow_cutter_enum_cuts")
        .arg("-")
        .run_capture()?;
    parse_cut_enumeration(&output)
}

/// Enumerates the cut frontier of the accelerated (inertial) flow cutter.
pub fn enumerate_accelerated_cuts(
    binaries: &Binaries,
    paths: &ExperimentPaths,
    graph: &GraphId,
    cutters: u32,
) -> Result<Vec<CutCandidate>, BenchError> {
    let output = ConsoleCommand::new(&binaries.console)
        .load_graph(paths, graph)
        .load_coordinates(paths, graph)
        .normalize()
        .canonical_preorder()
        .set("geo_pos_ordering_cutter_count", cutters)
        .set("ReportCuts", "no")
        .verb("flow_cutter_accelerated_enum_cuts")
        .arg("-")
        .run_capture()?;
    parse_cut_enumeration(&output)
}

/// Runs the one-shot inertial flow cut. `min_balance` is the minimum
/// relative size of the smaller side, between 0.0 and 0.5.
pub fn inertial_flow_cut(
    binaries: &Binaries,
    paths: &ExperimentPaths,
    graph: &GraphId,
    min_balance: f64,
) -> Result<BTreeMap<String, MetricValue>, BenchError> {
    let output = ConsoleCommand::new(&binaries.console)
        .load_graph(paths, graph)
        .load_coordinates(paths, graph)
        .normalize()
        .canonical_preorder()
        .timed(|cmd| cmd.verb("inertial_flow_cut").arg(min_balance.to_string()))
        .verb("examine_node_color_cut")
        .run_capture()?;
    parse_metrics_log_with(&output, RunningTimePolicy::RescaleMicros)
}

/// Runs a METIS bipartition at the given imbalance and examines the
/// resulting cut through the console. METIS reports its own running time
/// in seconds; the examined metrics are merged on top of it.
pub fn metis_cut(
    binaries: &Binaries,
    paths: &ExperimentPaths,
    graph: &GraphId,
    epsilon: f64,
) -> Result<BTreeMap<String, MetricValue>, BenchError> {
    let metis = binaries.metis.as_deref().ok_or_else(|| {
        BenchError::Config(ErrorInfo::new(
            "metis-binary-missing",
            "no METIS binary configured for the metis partitioner",
        ))
    })?;
    let workdir = tempdir().map_err(|err| {
        BenchError::Io(
            ErrorInfo::new("tempdir-create", "failed to create METIS working directory")
                .with_hint(err.to_string()),
        )
    })?;
    let metis_graph = workdir.path().join("graph.metis");
    let partition = workdir.path().join("graph.metis.part.2");

    ConsoleCommand::new(&binaries.console)
        .load_graph(paths, graph)
        .load_coordinates(paths, graph)
        .verb("assign_constant_arc_weights")
        .arg("1")
        .normalize()
        .canonical_preorder()
        .verb("save_metis_graph")
        .arg(&metis_graph)
        .run_capture()?;

    // METIS rejects a ufactor of zero; the perfectly balanced case is
    // requested as 0.001 instead.
    let ufactor = ((if epsilon == 0.0 { 0.001 } else { epsilon }) * 1000.0) as i64;
    let metis_args: Vec<OsString> = vec![
        metis_graph.clone().into(),
        "2".into(),
        format!("-ufactor={ufactor}").into(),
    ];
    let metis_output = capture_output(metis, &metis_args)?;
    let running_time = parse_metis_partition_time(&metis_output).ok_or_else(|| {
        BenchError::Parse(
            ErrorInfo::new(
                "malformed-metis-output",
                "METIS output lacks a partitioning time line",
            )
            .with_context("graph", graph.as_str()),
        )
    })?;

    let examined = ConsoleCommand::new(&binaries.console)
        .verb("load_metis_graph")
        .arg(&metis_graph)
        .verb("load_node_color_partition")
        .arg(&partition)
        .verb("examine_node_color_cut")
        .run_capture()?;
    let mut metrics = parse_metrics_log_with(&examined, RunningTimePolicy::Keep)?;
    metrics.insert("running_time".to_string(), MetricValue::Float(running_time));
    Ok(metrics)
}

/// Extracts the seconds figure from METIS' `Partitioning: ... sec` line.
fn parse_metis_partition_time(output: &str) -> Option<f64> {
    for line in output.lines() {
        let Some(rest) = line.trim_start().strip_prefix("Partitioning:") else {
            continue;
        };
        let words: Vec<&str> = rest.split_whitespace().collect();
        for pair in words.windows(2) {
            if pair[1].starts_with("sec") {
                if let Ok(value) = pair[0].parse::<f64>() {
                    return Some(value);
                }
            }
        }
    }
    None
}

/// Derives the one-shot cut candidate from examined node-color metrics.
pub fn one_shot_candidate(
    metrics: &BTreeMap<String, MetricValue>,
    running_time_seconds: f64,
) -> Option<CutCandidate> {
    let side = |key: &str| -> Option<u64> {
        match metrics.get(key)? {
            MetricValue::Int(v) if *v >= 0 => Some(*v as u64),
            _ => None,
        }
    };
    let left = side("left_side_size")?;
    let right = side("right_side_size")?;
    let cut = side("cut_size")?;
    Some(CutCandidate {
        small_side_size: left.min(right),
        large_side_size: left.max(right),
        cut_size: cut,
        time_us: running_time_seconds * 1_000_000.0,
    })
}

#[cfg(test)]
mod tests {
    use super::parse_metis_partition_time;

    #[test]
    fn partition_time_line_is_recognized() {
        let output = "  Timing Information\n  Partitioning:    1.234 sec   (METIS time)\n";
        assert_eq!(parse_metis_partition_time(output), Some(1.234));
        assert_eq!(parse_metis_partition_time("no timing here"), None);
    }
}
