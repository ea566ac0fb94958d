//! Per-graph pareto cut comparison table.
//!
//! Renders, for one graph, the achieved imbalance and cut size (then
//! connectivity and running time) of every partitioner at every requested
//! imbalance bound. Infeasible results, that is one-shot cuts that miss
//! their bound, are struck through in red rather than silently compared.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use cchb_core::{BenchError, ErrorInfo, GraphId};
use cchb_ledger::{ExperimentRecord, Ledger};

use crate::format::round1;

/// Column widths and spacing preamble shared by all pareto tables.
const PREAMBLE: &str = r"\newcolumntype{R}[1]{>{\raggedleft\arraybackslash}p{#1}}
\setlength\tabcolsep{3pt}
\setlength\mycolwidth{0.74cm}
";

/// Renders the pareto cut table for `graph` from the cut ledger
/// (key columns `graph`, `partitioner`, `epsilon`).
pub fn render_pareto_table(
    ledger: &Ledger,
    graph: &GraphId,
    partitioners: &[String],
    imbalances: &[f64],
    partitioner_names: &BTreeMap<String, String>,
) -> Result<String, BenchError> {
    let mut out = String::new();
    out.push_str(PREAMBLE);
    let _ = writeln!(
        out,
        "\\begin{{tabular}}{{r{}}}",
        "R{\\mycolwidth}".repeat(partitioners.len() * 2)
    );
    out.push_str("\\toprule\n");
    out.push_str(&block_header(
        partitioners,
        partitioner_names,
        "Achieved $\\epsilon$ [\\%]",
        "Cut Size",
    ));
    out.push_str(&block_content(
        ledger,
        graph,
        partitioners,
        imbalances,
        format_achieved,
        format_cut_size,
    )?);
    out.push_str("\\midrule\n");
    out.push_str(&block_header(
        partitioners,
        partitioner_names,
        "Are sides connected?",
        "Running Time [s]",
    ));
    out.push_str(&block_content(
        ledger,
        graph,
        partitioners,
        imbalances,
        format_connected,
        format_running_time,
    )?);
    out.push_str("\\bottomrule\n\\end{tabular}\n");
    Ok(out)
}

fn block_header(
    partitioners: &[String],
    names: &BTreeMap<String, String>,
    left: &str,
    right: &str,
) -> String {
    let span = partitioners.len();
    let mut header = format!(
        "\\multirow{{2}}{{*}}{{\\rotatebox[origin=c]{{90}}{{$\\max\\epsilon$}}}} \
         & \\multicolumn{{{span}}}{{c}}{{{left}}} & \\multicolumn{{{span}}}{{c}}{{{right}}}\\\\\n"
    );
    let _ = writeln!(
        header,
        "\\cmidrule(lr){{2-{}}} \\cmidrule(lr){{{}-{}}}",
        1 + span,
        2 + span,
        1 + 2 * span
    );
    for _ in 0..2 {
        for name in partitioners {
            let display = names.get(name).cloned().unwrap_or_else(|| name.clone());
            let _ = write!(header, "& {display}");
        }
    }
    header.push_str("\\\\\n\\midrule\n");
    header
}

fn block_content(
    ledger: &Ledger,
    graph: &GraphId,
    partitioners: &[String],
    imbalances: &[f64],
    left: impl Fn(&ExperimentRecord, f64) -> Result<String, BenchError>,
    right: impl Fn(&ExperimentRecord, f64) -> Result<String, BenchError>,
) -> Result<String, BenchError> {
    let mut out = String::new();
    for &epsilon in imbalances {
        let _ = write!(out, "{}", (epsilon * 100.0).round() as i64);
        let records: Vec<&ExperimentRecord> = partitioners
            .iter()
            .map(|partitioner| cut_record(ledger, graph, partitioner, epsilon))
            .collect::<Result<_, _>>()?;
        for record in &records {
            let text = left(record, epsilon)?;
            push_cell(&mut out, &text, is_infeasible(record, epsilon));
        }
        for record in &records {
            let text = right(record, epsilon)?;
            push_cell(&mut out, &text, is_infeasible(record, epsilon));
        }
        out.push_str("\\\\\n");
    }
    Ok(out)
}

fn push_cell(out: &mut String, text: &str, infeasible: bool) {
    if infeasible {
        let _ = write!(out, "& \\textcolor{{red}}{{\\cancel{{{text}}}}}");
    } else {
        let _ = write!(out, "& {text}");
    }
}

fn cut_record<'a>(
    ledger: &'a Ledger,
    graph: &GraphId,
    partitioner: &str,
    epsilon: f64,
) -> Result<&'a ExperimentRecord, BenchError> {
    let key = vec![
        graph.as_str().to_string(),
        partitioner.to_string(),
        epsilon.to_string(),
    ];
    ledger.get(&key).ok_or_else(|| {
        BenchError::Render(
            ErrorInfo::new("render-missing-record", "cut ledger lacks a requested record")
                .with_context("graph", graph.as_str())
                .with_context("partitioner", partitioner)
                .with_context("epsilon", epsilon.to_string()),
        )
    })
}

/// A record is infeasible when its stored flag says so. Ledgers written
/// before the flag existed fall back to comparing the achieved imbalance
/// against the requested bound.
fn is_infeasible(record: &ExperimentRecord, epsilon: f64) -> bool {
    if let Some(flag) = record.get("feasible") {
        return flag == "false";
    }
    achieved(record).map_or(false, |value| value > epsilon)
}

fn achieved(record: &ExperimentRecord) -> Option<f64> {
    record.metric("achieved_epsilon")?.as_f64()
}

fn format_achieved(record: &ExperimentRecord, _epsilon: f64) -> Result<String, BenchError> {
    let value = achieved(record).ok_or_else(|| missing_metric(record, "achieved_epsilon"))?;
    let percent = 100.0 * value;
    if round1(percent) == 0.0 && value != 0.0 {
        return Ok("${<0.1}$".to_string());
    }
    Ok(format!("{:.1}", round1(percent)))
}

fn format_cut_size(record: &ExperimentRecord, _epsilon: f64) -> Result<String, BenchError> {
    record
        .get("cut_size")
        .map(str::to_string)
        .ok_or_else(|| missing_metric(record, "cut_size"))
}

fn format_connected(record: &ExperimentRecord, _epsilon: f64) -> Result<String, BenchError> {
    match record.get("connected") {
        Some("true") => Ok("$\\bullet$".to_string()),
        Some("false") => Ok("$\\circ$".to_string()),
        _ => Err(missing_metric(record, "connected")),
    }
}

fn format_running_time(record: &ExperimentRecord, _epsilon: f64) -> Result<String, BenchError> {
    let value = record
        .metric("running_time")
        .and_then(|metric| metric.as_f64())
        .ok_or_else(|| missing_metric(record, "running_time"))?;
    Ok(format!("{:.1}", round1(value)))
}

fn missing_metric(record: &ExperimentRecord, column: &str) -> BenchError {
    BenchError::Render(
        ErrorInfo::new("render-missing-column", "cut record lacks a required metric")
            .with_context("column", column)
            .with_context("key", record.key().join(",")),
    )
}
