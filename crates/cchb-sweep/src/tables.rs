//! LaTeX report tables over the persisted ledgers.

use std::fs;
use std::path::Path;

use cchb_core::{BenchError, ErrorInfo, FlowCutterConfig, GraphId};
use cchb_ledger::{Ledger, SortPolicy};
use cchb_table::{build_table, render_latex, render_pareto_table, ColumnSpec, TableOptions};

use crate::config::HarnessConfig;
use crate::cuts::CUT_LEDGER;
use crate::orders::ORDER_LEDGER;
use crate::study::STUDY_LEDGER;

/// LaTeX thin space used between digit groups in print tables.
const THIN_SPACE: &str = "\\,";

const ORDER_PREAMBLE: &str = r"\begin{tabular}{clrrrrrrrrrr}
\toprule
& & \multicolumn{2}{c}{Tree} & \multicolumn{2}{c}{Search space} & \multicolumn{2}{c}{Supergraph} & & \multicolumn{3}{c}{Running times} \\
\cmidrule(lr){3-4} \cmidrule(lr){5-6} \cmidrule(lr){7-8} \cmidrule(lr){10-12}
& & depth & height & avg.\ [$\cdot 10^3$] & max.\ [$\cdot 10^3$] & arcs [$\cdot 10^5$] & tri.\ [$\cdot 10^5$] & tw.\ bound & order [s] & cust.\ [ms] & query [$\mu$s] \\";

const STUDY_PREAMBLE: &str = r"\begin{tabular}{c *{4}{c} *{4}{r} *{3}{r} *{3}{r}}
\toprule
& & & & & \multicolumn{4}{c}{Search Space} & CCH & & Up. & \multicolumn{3}{c}{Running times} \\
\cmidrule(lr){6-9} \cmidrule(lr){13-15}
& \multicolumn{4}{c}{Configuration} & \multicolumn{2}{c}{Nodes} & \multicolumn{2}{c}{Arcs [$\cdot10^{3}$]} & Arcs & \#Tri. & Tw. & Order & Cust. & Query \\
\cmidrule(lr){2-5} \cmidrule(lr){6-7} \cmidrule(lr){8-9}
& $\alpha$ & $\delta$ & $\gamma_a$ & $\gamma_o$ & Avg. & Max. & Avg. & Max. & [$\cdot10^{5}$] & [$\cdot10^{5}$] & Bd. & [s] & [ms] & [$\mu$s] \\
\midrule";

/// Renders the order experiment comparison table to `out`.
pub fn write_order_table(
    config: &HarnessConfig,
    input: Option<&Path>,
    out: &Path,
) -> Result<(), BenchError> {
    let default_path = config.paths().ledger(ORDER_LEDGER);
    let path = input.unwrap_or(&default_path);
    let ledger = Ledger::load(
        path,
        ["graph", "partitioner"],
        SortPolicy::Catalogs {
            graphs: config.graph_catalog(),
            partitioners: config.order_catalog(),
        },
    )?;
    let columns = [
        ColumnSpec::label("partitioner"),
        ColumnSpec::numeric("average_elimination_tree_depth"),
        ColumnSpec::numeric("elimination_tree_height"),
        ColumnSpec::scaled("average_arcs_in_search_space", 1000.0),
        ColumnSpec::scaled("maximum_arcs_in_search_space", 1000.0),
        ColumnSpec::scaled("super_graph_upward_arc_count", 100_000.0),
        ColumnSpec::scaled("number_of_triangles_in_super_graph", 100_000.0),
        ColumnSpec::numeric("upper_tree_width_bound"),
        ColumnSpec::numeric("order_running_time"),
        ColumnSpec::numeric("median_customization_time"),
        ColumnSpec::numeric("avg_query_time"),
    ];
    let options = TableOptions {
        group_rows: true,
        thousands_sep: THIN_SPACE.to_string(),
        label_names: config.partitioner_names.clone(),
        group_names: config.graph_names.clone(),
        ..TableOptions::default()
    };
    let table = build_table(&ledger, &columns, &options)?;
    write_output(out, &render_latex(&table, ORDER_PREAMBLE, "cyan"))
}

/// Renders the parameter study table to `out`. Cutter counts are fixed
/// across the study, so only the four bulk tunables identify a row.
pub fn write_parameterstudy_table(
    config: &HarnessConfig,
    input: Option<&Path>,
    out: &Path,
) -> Result<(), BenchError> {
    let default_path = config.paths().ledger(STUDY_LEDGER);
    let path = input.unwrap_or(&default_path);
    let ledger = Ledger::load(path, FlowCutterConfig::KEY_COLUMNS, SortPolicy::KeyColumns)?;
    let columns = [
        ColumnSpec::label("initial_assimilated_fraction"),
        ColumnSpec::label("bulk_step_fraction"),
        ColumnSpec::label("bulk_assimilation_threshold"),
        ColumnSpec::label("bulk_assimilation_order_threshold"),
        ColumnSpec::numeric("average_elimination_tree_depth"),
        ColumnSpec::numeric("elimination_tree_height"),
        ColumnSpec::scaled("average_arcs_in_search_space", 1000.0),
        ColumnSpec::scaled("maximum_arcs_in_search_space", 1000.0),
        ColumnSpec::scaled("super_graph_upward_arc_count", 100_000.0),
        ColumnSpec::scaled("number_of_triangles_in_super_graph", 100_000.0),
        ColumnSpec::numeric("upper_tree_width_bound"),
        ColumnSpec::numeric("order_running_time").as_integer(),
        ColumnSpec::numeric("median_customization_time").as_integer(),
        ColumnSpec::numeric("avg_query_time"),
    ];
    let options = TableOptions {
        heatmap: true,
        thousands_sep: THIN_SPACE.to_string(),
        ..TableOptions::default()
    };
    let table = build_table(&ledger, &columns, &options)?;
    write_output(out, &render_latex(&table, STUDY_PREAMBLE, "cyan"))
}

/// Renders the per-graph pareto cut comparison table to `out`.
pub fn write_pareto_table(
    config: &HarnessConfig,
    graph_name: &str,
    out: &Path,
) -> Result<(), BenchError> {
    let path = config.paths().ledger(CUT_LEDGER);
    let ledger = Ledger::load(
        &path,
        ["graph", "partitioner", "epsilon"],
        SortPolicy::Catalogs {
            graphs: config.graph_catalog(),
            partitioners: config.cut_catalog(),
        },
    )?;
    let graph = GraphId::new(graph_name);
    let latex = render_pareto_table(
        &ledger,
        &graph,
        &config.cut_partitioners,
        &config.imbalances,
        &config.partitioner_names,
    )?;
    write_output(out, &latex)
}

fn write_output(path: &Path, latex: &str) -> Result<(), BenchError> {
    fs::write(path, latex).map_err(|err| {
        BenchError::Io(
            ErrorInfo::new("table-write", "failed to write rendered table")
                .with_context("path", path.display().to_string())
                .with_hint(err.to_string()),
        )
    })
}
