//! Parameter study sweep: compute accelerated flow-cutter orders for a list
//! of tunable configurations on one graph and record the resulting order,
//! customization, and query metrics.

use std::fs;
use std::path::Path;

use cchb_core::{BenchError, ErrorInfo, FlowCutterConfig, GraphId, MetricValue};
use cchb_ledger::{ExperimentRecord, Ledger, SortPolicy};
use cchb_parse::parse_metrics_log;
use cchb_run::{
    average_query_us, median_customization_ms, save_accelerated_order, Binaries, ExperimentPaths,
};

use crate::config::HarnessConfig;
use crate::SweepOutcome;

/// Persisted parameter study ledger file.
pub const STUDY_LEDGER: &str = "parameterstudy.csv";
/// Input table listing the tunable configurations to sweep, one CSV row per
/// configuration with the tunables as columns.
pub const STUDY_CONFIGS: &str = "parameterstudy_configs.csv";

/// Runs the parameter study on `graph_name` over every configuration listed
/// in the configs table. Configurations already in the ledger are skipped; a
/// failing configuration is reported and the sweep continues.
pub fn run_parameter_study(
    config: &HarnessConfig,
    graph_name: &str,
) -> Result<SweepOutcome, BenchError> {
    let paths = config.paths();
    let binaries = config.binaries();
    let graph = GraphId::new(graph_name);
    let configs = load_study_configs(&paths.ledger(STUDY_CONFIGS))?;
    fs::create_dir_all(paths.study_dir()).map_err(|err| {
        BenchError::Io(
            ErrorInfo::new("study-dir-create", "failed to create parameter study directory")
                .with_context("path", paths.study_dir().display().to_string())
                .with_hint(err.to_string()),
        )
    })?;

    let ledger_path = paths.ledger(STUDY_LEDGER);
    let mut ledger = Ledger::load(
        &ledger_path,
        FlowCutterConfig::KEY_COLUMNS,
        SortPolicy::KeyColumns,
    )?;

    let mut outcome = SweepOutcome::default();
    for study_config in &configs {
        let key = study_config.key_values();
        if ledger.contains(&key) {
            println!("skipping {}: already recorded", study_config.artifact_stem());
            outcome.skipped += 1;
            continue;
        }
        println!("running {}", study_config.artifact_stem());
        match study_experiment(&binaries, &paths, &graph, study_config) {
            Ok(record) => {
                ledger.append(record)?;
                outcome.computed += 1;
            }
            Err(err) => {
                eprintln!("configuration {} failed: {err}", study_config.artifact_stem());
                outcome.failed += 1;
            }
        }
    }
    ledger.save(&ledger_path)?;
    Ok(outcome)
}

fn study_experiment(
    binaries: &Binaries,
    paths: &ExperimentPaths,
    graph: &GraphId,
    config: &FlowCutterConfig,
) -> Result<ExperimentRecord, BenchError> {
    let order = paths.study_order(graph, config);
    let log = paths.study_order_log(graph, config);
    save_accelerated_order(binaries, paths, graph, config, &order, &log)?;
    let text = fs::read_to_string(&log).map_err(|err| {
        BenchError::Io(
            ErrorInfo::new("log-read", "failed to read captured console log")
                .with_context("path", log.display().to_string())
                .with_hint(err.to_string()),
        )
    })?;
    let metrics = parse_metrics_log(&text)?;
    let mut record = ExperimentRecord::new(config.key_values());
    for (name, value) in metrics {
        record.set(name, value);
    }
    record.set(
        "median_customization_time",
        MetricValue::Float(median_customization_ms(binaries, paths, graph, &order)?),
    );
    record.set(
        "avg_query_time",
        MetricValue::Float(average_query_us(binaries, paths, graph, &order)?),
    );
    Ok(record)
}

/// Reads the configuration table; each row deserializes into the tunables.
pub fn load_study_configs(path: &Path) -> Result<Vec<FlowCutterConfig>, BenchError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|err| {
            BenchError::Config(
                ErrorInfo::new("study-configs-missing", "cannot read the parameter study configs")
                    .with_context("path", path.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;
    let mut configs = Vec::new();
    for row in reader.deserialize() {
        let config: FlowCutterConfig = row.map_err(|err| {
            BenchError::Config(
                ErrorInfo::new("study-configs-invalid", "malformed parameter study config row")
                    .with_context("path", path.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;
        configs.push(config);
    }
    Ok(configs)
}
