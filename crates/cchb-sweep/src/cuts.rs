//! Cut experiment sweep: one frontier enumeration (or one-shot cut) per
//! partitioner variant, recorded per imbalance bound in the cut ledger.

use std::collections::BTreeMap;

use cchb_core::{BenchError, CutCandidate, ErrorInfo, GraphId, MetricValue};
use cchb_ledger::{ExperimentRecord, Ledger, SortPolicy};
use cchb_pareto::ParetoFrontier;
use cchb_run::{
    enumerate_accelerated_cuts, enumerate_flowcutter_cuts, inertial_flow_cut, metis_cut,
    one_shot_candidate, Binaries, ExperimentPaths,
};

use crate::config::HarnessConfig;
use crate::partitioner::{classify, PartitionerKind};
use crate::SweepOutcome;

/// Persisted cut experiment ledger file.
pub const CUT_LEDGER: &str = "cut_experiments.csv";

/// Runs the full (graph x partitioner x imbalance) cut experiment sweep.
/// Enumerating variants run the expensive enumeration once per graph and
/// answer every imbalance bound from the resulting frontier; one-shot
/// variants run once per bound. A failing experiment is reported and the
/// sweep continues.
pub fn run_cut_experiments(config: &HarnessConfig) -> Result<SweepOutcome, BenchError> {
    let paths = config.paths();
    let binaries = config.binaries();
    let ledger_path = paths.ledger(CUT_LEDGER);
    let mut ledger = Ledger::load(
        &ledger_path,
        ["graph", "partitioner", "epsilon"],
        SortPolicy::Catalogs {
            graphs: config.graph_catalog(),
            partitioners: config.cut_catalog(),
        },
    )?;

    let mut outcome = SweepOutcome::default();
    for graph_name in &config.graphs {
        let graph = GraphId::new(graph_name.clone());
        for partitioner in &config.cut_partitioners {
            let kind = classify(partitioner)?;
            let missing: Vec<f64> = config
                .imbalances
                .iter()
                .copied()
                .filter(|epsilon| {
                    !ledger.contains(&experiment_key(graph_name, partitioner, *epsilon))
                })
                .collect();
            if missing.is_empty() {
                println!("skipping {partitioner} {graph_name}: already recorded");
                outcome.skipped += config.imbalances.len() as u64;
                continue;
            }
            outcome.skipped += (config.imbalances.len() - missing.len()) as u64;
            println!("running {partitioner} {graph_name}");
            let result = if kind.enumerates() {
                enumerated_experiments(&binaries, &paths, &graph, partitioner, kind, &missing)
            } else {
                one_shot_experiments(&binaries, &paths, &graph, partitioner, kind, &missing)
            };
            match result {
                Ok(records) => {
                    outcome.computed += records.len() as u64;
                    for record in records {
                        ledger.append(record)?;
                    }
                }
                Err(err) => {
                    eprintln!("experiment {partitioner} {graph_name} failed: {err}");
                    outcome.failed += 1;
                }
            }
        }
    }
    ledger.save(&ledger_path)?;
    Ok(outcome)
}

fn experiment_key(graph: &str, partitioner: &str, epsilon: f64) -> Vec<String> {
    vec![graph.to_string(), partitioner.to_string(), epsilon.to_string()]
}

fn enumerated_experiments(
    binaries: &Binaries,
    paths: &ExperimentPaths,
    graph: &GraphId,
    partitioner: &str,
    kind: PartitionerKind,
    imbalances: &[f64],
) -> Result<Vec<ExperimentRecord>, BenchError> {
    let candidates = match kind {
        PartitionerKind::FlowCutter(cutters) => {
            enumerate_flowcutter_cuts(binaries, paths, graph, cutters)?
        }
        PartitionerKind::InertialFlowCutter(cutters) => {
            enumerate_accelerated_cuts(binaries, paths, graph, cutters)?
        }
        _ => unreachable!("one-shot variants are dispatched separately"),
    };
    let frontier = ParetoFrontier::from_enumeration(candidates)?;
    let mut records = Vec::with_capacity(imbalances.len());
    for &epsilon in imbalances {
        let selection = match frontier.query(epsilon) {
            Ok(selection) => selection,
            Err(err) => {
                eprintln!("no cut for {partitioner} {graph} at epsilon {epsilon}: {err}");
                continue;
            }
        };
        records.push(cut_record(
            graph,
            partitioner,
            epsilon,
            &selection.candidate,
            selection.achieved_imbalance,
            true,
            selection.feasible,
        ));
    }
    Ok(records)
}

fn one_shot_experiments(
    binaries: &Binaries,
    paths: &ExperimentPaths,
    graph: &GraphId,
    partitioner: &str,
    kind: PartitionerKind,
    imbalances: &[f64],
) -> Result<Vec<ExperimentRecord>, BenchError> {
    let mut records = Vec::with_capacity(imbalances.len());
    for &epsilon in imbalances {
        let metrics = match kind {
            PartitionerKind::Metis => metis_cut(binaries, paths, graph, epsilon)?,
            // The console expects the minimum relative size of the smaller
            // side, not an imbalance bound.
            PartitionerKind::InertialFlow => {
                inertial_flow_cut(binaries, paths, graph, (1.0 - epsilon) / 2.0)?
            }
            _ => unreachable!("enumerating variants are dispatched separately"),
        };
        let running_time = metric_f64(&metrics, "running_time", graph, partitioner)?;
        let candidate = one_shot_candidate(&metrics, running_time).ok_or_else(|| {
            BenchError::Parse(
                ErrorInfo::new(
                    "malformed-cut-metrics",
                    "examined cut lacks side sizes or cut size",
                )
                .with_context("graph", graph.as_str())
                .with_context("partitioner", partitioner),
            )
        })?;
        let achieved = achieved_imbalance(&candidate);
        let frontier = ParetoFrontier::from_single(candidate, achieved);
        let selection = frontier.query(epsilon)?;
        let mut record = cut_record(
            graph,
            partitioner,
            epsilon,
            &selection.candidate,
            selection.achieved_imbalance,
            is_connected(&metrics),
            selection.feasible,
        );
        record.set("running_time", MetricValue::Float(running_time));
        records.push(record);
    }
    Ok(records)
}

fn cut_record(
    graph: &GraphId,
    partitioner: &str,
    epsilon: f64,
    candidate: &CutCandidate,
    achieved: f64,
    connected: bool,
    feasible: bool,
) -> ExperimentRecord {
    let mut record = ExperimentRecord::new([
        graph.as_str().to_string(),
        partitioner.to_string(),
        epsilon.to_string(),
    ]);
    record.set("achieved_epsilon", MetricValue::Float(achieved));
    record.set("cut_size", MetricValue::Int(candidate.cut_size as i64));
    record.set(
        "running_time",
        MetricValue::Float(candidate.time_us * 1e-6),
    );
    record.set("connected", MetricValue::Bool(connected));
    record.set("feasible", MetricValue::Bool(feasible));
    record
}

fn achieved_imbalance(candidate: &CutCandidate) -> f64 {
    let half = candidate.total_nodes().div_ceil(2);
    candidate.large_side_size as f64 / half as f64 - 1.0
}

/// Both sides of the bipartition must form single connected components for
/// the cut to count as connected.
fn is_connected(metrics: &BTreeMap<String, MetricValue>) -> bool {
    let one = |key: &str| matches!(metrics.get(key), Some(MetricValue::Int(1)));
    one("left_components") && one("right_components")
}

fn metric_f64(
    metrics: &BTreeMap<String, MetricValue>,
    name: &str,
    graph: &GraphId,
    partitioner: &str,
) -> Result<f64, BenchError> {
    metrics.get(name).and_then(MetricValue::as_f64).ok_or_else(|| {
        BenchError::Parse(
            ErrorInfo::new("missing-metric", "examined cut output lacks an expected metric")
                .with_context("metric", name)
                .with_context("graph", graph.as_str())
                .with_context("partitioner", partitioner),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connectivity_needs_both_sides_in_one_piece() {
        let mut metrics = BTreeMap::new();
        metrics.insert("left_components".to_string(), MetricValue::Int(1));
        metrics.insert("right_components".to_string(), MetricValue::Int(1));
        assert!(is_connected(&metrics));
        metrics.insert("right_components".to_string(), MetricValue::Int(3));
        assert!(!is_connected(&metrics));
    }

    #[test]
    fn achieved_imbalance_uses_the_larger_half() {
        let candidate = CutCandidate {
            small_side_size: 40,
            large_side_size: 60,
            cut_size: 5,
            time_us: 0.0,
        };
        assert!((achieved_imbalance(&candidate) - 0.2).abs() < 1e-12);
    }
}
