//! Customization and query timing adapters.
//!
//! Both binaries print a single number: the customization binary the
//! elapsed microseconds of one customization pass, the query binary the
//! average query time in microseconds.

use std::ffi::OsString;
use std::path::Path;

use cchb_core::{BenchError, ErrorInfo, GraphId};

use crate::console::capture_output;
use crate::paths::{Binaries, ExperimentPaths};

/// Repetitions used for the customization median.
const CUSTOMIZATION_RUNS: usize = 9;

/// Runs the customization binary nine times and returns the median
/// customization time in milliseconds.
pub fn median_customization_ms(
    binaries: &Binaries,
    paths: &ExperimentPaths,
    graph: &GraphId,
    order: &Path,
) -> Result<f64, BenchError> {
    let args: Vec<OsString> = vec![
        paths.first_out(graph).into(),
        paths.head(graph).into(),
        order.to_path_buf().into(),
        paths.travel_time(graph).into(),
        "1".into(),
    ];
    let mut runtimes = Vec::with_capacity(CUSTOMIZATION_RUNS);
    for _ in 0..CUSTOMIZATION_RUNS {
        let output = capture_output(&binaries.customize, &args)?;
        runtimes.push(parse_timing(&binaries.customize, &output)? / 1000.0);
    }
    runtimes.sort_by(f64::total_cmp);
    Ok(runtimes[CUSTOMIZATION_RUNS / 2])
}

/// Runs the query binary once and returns the average query time in
/// microseconds.
pub fn average_query_us(
    binaries: &Binaries,
    paths: &ExperimentPaths,
    graph: &GraphId,
    order: &Path,
) -> Result<f64, BenchError> {
    let args: Vec<OsString> = vec![
        paths.first_out(graph).into(),
        paths.head(graph).into(),
        order.to_path_buf().into(),
        paths.travel_time(graph).into(),
        paths.query_sources(graph).into(),
        paths.query_targets(graph).into(),
    ];
    let output = capture_output(&binaries.query, &args)?;
    parse_timing(&binaries.query, &output)
}

fn parse_timing(program: &Path, output: &str) -> Result<f64, BenchError> {
    output.trim().parse::<f64>().map_err(|_| {
        BenchError::Parse(
            ErrorInfo::new("malformed-timing-output", "timing binary printed a non-numeric value")
                .with_context("program", program.display().to_string())
                .with_context("output", output.trim().to_string()),
        )
    })
}
