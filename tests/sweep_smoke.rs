#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use cchb_sweep::config::HarnessConfig;
use cchb_sweep::cuts::{run_cut_experiments, CUT_LEDGER};
use cchb_sweep::orders::run_single_inertialflowcutter_order;
use cchb_sweep::tables::{write_order_table, write_parameterstudy_table, write_pareto_table};
use tempfile::TempDir;

/// Fake console reporting a three-point cut frontier over 100 nodes.
const ENUM_SCRIPT: &str = "#!/bin/sh\n\
    echo 'cut_size,small_side_size,large_side_size,    time'\n\
    echo '5,40,60,1000.0'\n\
    echo '8,48,52,2000.0'\n\
    echo '10,50,50,3000.0'\n";

fn install_console(dir: &Path, script: &str) {
    let path = dir.join("console");
    fs::write(&path, script).expect("write script");
    let mut permissions = fs::metadata(&path).expect("metadata").permissions();
    permissions.set_mode(0o755);
    fs::set_permissions(&path, permissions).expect("chmod");
}

fn smoke_config(experiments: &Path, build: &Path) -> HarnessConfig {
    HarnessConfig {
        experiments_dir: experiments.to_path_buf(),
        build_dir: build.to_path_buf(),
        graphs: vec!["toy".to_string()],
        cut_partitioners: vec!["flowcutter3".to_string()],
        imbalances: vec![0.0, 0.1, 0.3],
        ..HarnessConfig::default()
    }
}

#[test]
fn cut_sweep_records_one_row_per_imbalance_and_is_idempotent() {
    let experiments = TempDir::new().expect("tempdir");
    let build = TempDir::new().expect("tempdir");
    install_console(build.path(), ENUM_SCRIPT);
    let config = smoke_config(experiments.path(), build.path());

    let first = run_cut_experiments(&config).expect("sweep");
    assert_eq!(first.computed, 3);
    assert_eq!(first.failed, 0);

    let ledger_path = experiments.path().join(CUT_LEDGER);
    let text = fs::read_to_string(&ledger_path).expect("read ledger");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("graph,partitioner,epsilon"));

    // Tightest bound first after sorting; the balanced cut costs 10 arcs.
    assert!(lines[1].starts_with("toy,flowcutter3,0,"));
    assert!(lines[1].contains(",10,"));
    // The loose bound settles for the cheapest cut.
    assert!(lines[3].starts_with("toy,flowcutter3,0.3,"));
    assert!(lines[3].contains(",5,"));

    // Rerun: everything already recorded, file unchanged.
    let second = run_cut_experiments(&config).expect("rerun");
    assert_eq!(second.computed, 0);
    assert_eq!(second.skipped, 3);
    assert_eq!(fs::read_to_string(&ledger_path).expect("read"), text);
}

#[test]
fn pareto_table_renders_from_the_swept_ledger() {
    let experiments = TempDir::new().expect("tempdir");
    let build = TempDir::new().expect("tempdir");
    install_console(build.path(), ENUM_SCRIPT);
    let config = smoke_config(experiments.path(), build.path());
    run_cut_experiments(&config).expect("sweep");

    let out = experiments.path().join("pareto_toy.tex");
    write_pareto_table(&config, "toy", &out).expect("render");
    let latex = fs::read_to_string(&out).expect("read");
    assert!(latex.contains("\\begin{tabular}"));
    assert!(latex.contains("Cut Size"));
    // All enumerated cuts are feasible and connected.
    assert!(!latex.contains("\\cancel"));
    assert!(latex.contains("$\\bullet$"));
    assert!(latex.ends_with("\\bottomrule\n\\end{tabular}\n"));
}

/// Fake console reporting the timing and supergraph statistics of one
/// ordering run.
const ORDER_SCRIPT: &str = "#!/bin/sh\n\
    echo 'running time : 2500000 musec'\n\
    echo 'elimination tree height : 312'\n";

#[test]
fn single_order_run_reports_seconds_from_the_console_log() {
    let experiments = TempDir::new().expect("tempdir");
    let build = TempDir::new().expect("tempdir");
    install_console(build.path(), ORDER_SCRIPT);
    let config = smoke_config(experiments.path(), build.path());

    let seconds = run_single_inertialflowcutter_order(&config, "toy", 4).expect("order");
    assert!((seconds - 2.5).abs() < 1e-9);
    assert_eq!(format!("{seconds:.3}"), "2.500");
    // The console log sits next to the order artifact for later examination.
    let log = experiments.path().join("toy.inertialflowcutter4.order.log");
    assert!(fs::read_to_string(&log).expect("read log").contains("running time"));
}

/// Order ledger rows using the column names `examine_chordal_supergraph`
/// actually reports.
const ORDER_LEDGER_FIXTURE: &str = "\
graph,partitioner,average_elimination_tree_depth,elimination_tree_height,\
average_arcs_in_search_space,maximum_arcs_in_search_space,\
super_graph_upward_arc_count,number_of_triangles_in_super_graph,\
upper_tree_width_bound,order_running_time,median_customization_time,avg_query_time
toy,flowcutter3,118.4,312,123400,250000,1200000,4200000,100,17.6,205.4,32.1
toy,metis,150.5,400,200000,300000,1500000,5000000,120,3.2,250.0,40.0
";

#[test]
fn order_table_reads_the_examined_metric_columns() {
    let experiments = TempDir::new().expect("tempdir");
    let build = TempDir::new().expect("tempdir");
    let config = smoke_config(experiments.path(), build.path());
    let input = experiments.path().join("precomputed_orders.csv");
    fs::write(&input, ORDER_LEDGER_FIXTURE).expect("write fixture");

    let out = experiments.path().join("order_table.tex");
    write_order_table(&config, Some(&input), &out).expect("render");
    let latex = fs::read_to_string(&out).expect("read");
    // The minimum tree depth is bolded within the graph group.
    assert!(latex.contains("\\bfseries{118.4}"));
    // Arc counts are rescaled by 10^3 and 10^5 for display.
    assert!(latex.contains("123.4"));
    assert!(latex.contains("42.0"));
    assert!(latex.ends_with("\\bottomrule\n\\end{tabular}\n"));
}

/// Parameter study rows: four varied bulk tunables plus the full metric set.
const STUDY_LEDGER_FIXTURE: &str = "\
geo_distance_cutters,hop_distance_cutters,initial_assimilated_fraction,\
bulk_step_fraction,bulk_assimilation_order_threshold,bulk_assimilation_threshold,\
average_elimination_tree_depth,elimination_tree_height,\
average_arcs_in_search_space,maximum_arcs_in_search_space,\
super_graph_upward_arc_count,number_of_triangles_in_super_graph,\
upper_tree_width_bound,order_running_time,median_customization_time,avg_query_time
8,0,0.05,0.05,0.25,0.4,118.4,312,123400,250000,1200000,4200000,100,17.6,205.4,32.1
8,0,0.1,0.05,0.25,0.4,150.5,400,200000,300000,1500000,5000000,120,3.2,250.0,40.0
";

#[test]
fn parameterstudy_table_keeps_all_metric_columns_decorated() {
    let experiments = TempDir::new().expect("tempdir");
    let build = TempDir::new().expect("tempdir");
    let config = smoke_config(experiments.path(), build.path());
    let input = experiments.path().join("parameterstudy.csv");
    fs::write(&input, STUDY_LEDGER_FIXTURE).expect("write fixture");

    let out = experiments.path().join("study_table.tex");
    write_parameterstudy_table(&config, Some(&input), &out).expect("render");
    let latex = fs::read_to_string(&out).expect("read");
    // Supergraph statistics survive into the rendered table.
    assert!(latex.contains("312"));
    assert!(latex.contains("12.0"));
    assert!(latex.contains("42.0"));
    // Heat fills and minimum bolding apply together to the metric cells.
    assert!(latex.contains("\\cellcolor{cyan!"));
    assert!(latex.contains("\\bfseries{118.4}"));
    // Order time is shown as whole seconds; the minimum is bolded.
    assert!(latex.contains("\\bfseries{3}"));
    // Configuration labels stay undecorated.
    assert!(!latex.contains("\\bfseries{0.05}"));
    assert!(!latex.contains("\\bfseries{0.25}"));
}

#[test]
fn console_failure_is_isolated_to_the_experiment() {
    let experiments = TempDir::new().expect("tempdir");
    let build = TempDir::new().expect("tempdir");
    install_console(build.path(), "#!/bin/sh\nexit 1\n");
    let config = smoke_config(experiments.path(), build.path());

    let outcome = run_cut_experiments(&config).expect("sweep survives");
    assert_eq!(outcome.computed, 0);
    assert_eq!(outcome.failed, 1);
    // The ledger is still written, headers only.
    let text = fs::read_to_string(experiments.path().join(CUT_LEDGER)).expect("read");
    assert_eq!(text.lines().count(), 1);
}
