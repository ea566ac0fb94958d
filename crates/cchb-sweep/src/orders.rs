//! Order experiment sweep: examine precomputed CCH orders, time
//! customization and queries, and record everything in the order ledger.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use cchb_core::{BenchError, ErrorInfo, GraphId, MetricValue};
use cchb_ledger::{ExperimentRecord, Ledger, SortPolicy};
use cchb_parse::{parse_metrics_log, ORDER_RUNNING_TIME};
use cchb_run::{
    average_query_us, examine_order, median_customization_ms, save_flowcutter_order,
    save_inertial_flow_order, save_inertialflowcutter_order, Binaries, ExperimentPaths,
};

use crate::config::HarnessConfig;
use crate::SweepOutcome;

/// Persisted order experiment ledger file.
pub const ORDER_LEDGER: &str = "order_experiments.csv";
/// Input table of order computation times produced by the single-run
/// commands (`partitioner,graph,order_running_time_sec`).
pub const ORDER_TIMES: &str = "order_running_time.csv";

/// Runs the full (graph x partitioner) order experiment sweep. Experiments
/// whose key is already in the ledger, or whose order artifact is missing,
/// are skipped; a failing experiment is reported and the sweep continues.
pub fn run_order_experiments(config: &HarnessConfig) -> Result<SweepOutcome, BenchError> {
    let paths = config.paths();
    let binaries = config.binaries();
    let ledger_path = paths.ledger(ORDER_LEDGER);
    let mut ledger = Ledger::load(
        &ledger_path,
        ["graph", "partitioner"],
        SortPolicy::Catalogs {
            graphs: config.graph_catalog(),
            partitioners: config.order_catalog(),
        },
    )?;
    let order_times = load_order_times(&paths.ledger(ORDER_TIMES))?;

    let mut outcome = SweepOutcome::default();
    for graph_name in &config.graphs {
        let graph = GraphId::new(graph_name.clone());
        for partitioner in &config.order_partitioners {
            let key = vec![graph_name.clone(), partitioner.clone()];
            let order = paths.order(&graph, partitioner);
            if !order.exists() {
                eprintln!(
                    "warning: order for partitioner {partitioner} on graph {graph_name} missing, skip"
                );
                outcome.skipped += 1;
                continue;
            }
            if ledger.contains(&key) {
                println!("skipping {partitioner} {graph_name}: already recorded");
                outcome.skipped += 1;
                continue;
            }
            println!("running {partitioner} {graph_name}");
            match order_experiment(&binaries, &paths, &graph, partitioner, &order, &order_times) {
                Ok(record) => {
                    ledger.append(record)?;
                    outcome.computed += 1;
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

fn order_experiment(
    binaries: &Binaries,
    paths: &ExperimentPaths,
    graph: &GraphId,
    partitioner: &str,
    order: &Path,
    order_times: &BTreeMap<(String, String), f64>,
) -> Result<ExperimentRecord, BenchError> {
    let order_time = order_times
        .get(&(partitioner.to_string(), graph.as_str().to_string()))
        .copied()
        .ok_or_else(|| {
            BenchError::Config(
                ErrorInfo::new(
                    "order-time-missing",
                    "order artifact exists but its computation time is not recorded",
                )
                .with_context("graph", graph.as_str())
                .with_context("partitioner", partitioner),
            )
        })?;
    let metrics = examine_order(binaries, paths, graph, order)?;
    let mut record = ExperimentRecord::new([graph.as_str(), partitioner]);
    for (name, value) in metrics {
        record.set(name, value);
    }
    record.set(ORDER_RUNNING_TIME, MetricValue::Float(order_time));
    record.set(
        "median_customization_time",
        MetricValue::Float(median_customization_ms(binaries, paths, graph, order)?),
    );
    record.set(
        "avg_query_time",
        MetricValue::Float(average_query_us(binaries, paths, graph, order)?),
    );
    Ok(record)
}

/// Dissection balance used by the standalone inertial-flow ordering.
const INERTIAL_FLOW_MIN_BALANCE: f64 = 0.2;

/// Computes one plain flow-cutter order, saves its artifacts, and returns
/// the order computation time in seconds (the single-run CLI contract).
pub fn run_single_flowcutter_order(
    config: &HarnessConfig,
    graph_name: &str,
    cutters: u32,
) -> Result<f64, BenchError> {
    single_order(config, graph_name, &format!("flowcutter{cutters}"), |b, p, g, order, log| {
        save_flowcutter_order(b, p, g, cutters, order, log)
    })
}

/// Computes one accelerated flow-cutter order with geographic cutter
/// seeding and returns its computation time in seconds.
pub fn run_single_inertialflowcutter_order(
    config: &HarnessConfig,
    graph_name: &str,
    cutters: u32,
) -> Result<f64, BenchError> {
    single_order(
        config,
        graph_name,
        &format!("inertialflowcutter{cutters}"),
        |b, p, g, order, log| save_inertialflowcutter_order(b, p, g, cutters, order, log),
    )
}

/// Computes one inertial-flow nested dissection order and returns its
/// computation time in seconds.
pub fn run_single_inertial_flow_order(
    config: &HarnessConfig,
    graph_name: &str,
) -> Result<f64, BenchError> {
    single_order(config, graph_name, "inertial_flow", |b, p, g, order, log| {
        save_inertial_flow_order(b, p, g, INERTIAL_FLOW_MIN_BALANCE, order, log)
    })
}

fn single_order(
    config: &HarnessConfig,
    graph_name: &str,
    variant: &str,
    save: impl FnOnce(
        &Binaries,
        &ExperimentPaths,
        &GraphId,
        &Path,
        &Path,
    ) -> Result<(), BenchError>,
) -> Result<f64, BenchError> {
    let paths = config.paths();
    let binaries = config.binaries();
    let graph = GraphId::new(graph_name);
    let order = paths.order(&graph, variant);
    let log = paths.order_log(&graph, variant);
    save(&binaries, &paths, &graph, &order, &log)?;
    let text = fs::read_to_string(&log).map_err(|err| {
        BenchError::Io(
            ErrorInfo::new("log-read", "failed to read captured console log")
                .with_context("path", log.display().to_string())
                .with_hint(err.to_string()),
        )
    })?;
    let metrics = parse_metrics_log(&text)?;
    metrics
        .get(ORDER_RUNNING_TIME)
        .and_then(MetricValue::as_f64)
        .ok_or_else(|| {
            BenchError::Parse(
                ErrorInfo::new("missing-metric", "console log reports no running time")
                    .with_context("path", log.display().to_string()),
            )
        })
}

fn load_order_times(path: &Path) -> Result<BTreeMap<(String, String), f64>, BenchError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|err| {
            BenchError::Config(
                ErrorInfo::new("order-times-missing", "cannot read the order running time table")
                    .with_context("path", path.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;
    let headers = reader
        .headers()
        .map_err(|err| order_times_error(path, err.to_string()))?
        .clone();
    let column = |name: &str| -> Result<usize, BenchError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| order_times_error(path, format!("missing column `{name}`")))
    };
    let partitioner_idx = column("partitioner")?;
    let graph_idx = column("graph")?;
    let time_idx = column("order_running_time_sec")?;
    let mut times = BTreeMap::new();
    for row in reader.records() {
        let row = row.map_err(|err| order_times_error(path, err.to_string()))?;
        let partitioner = row.get(partitioner_idx).unwrap_or_default().to_string();
        let graph = row.get(graph_idx).unwrap_or_default().to_string();
        let time = row
            .get(time_idx)
            .unwrap_or_default()
            .parse::<f64>()
            .map_err(|err| order_times_error(path, err.to_string()))?;
        times.insert((partitioner, graph), time);
    }
    Ok(times)
}

fn order_times_error(path: &Path, hint: String) -> BenchError {
    BenchError::Config(
        ErrorInfo::new("order-times-invalid", "malformed order running time table")
            .with_context("path", path.display().to_string())
            .with_hint(hint),
    )
}
