use std::collections::BTreeMap;

use cchb_core::{Catalog, MetricValue};
use cchb_ledger::{ExperimentRecord, Ledger, SortPolicy};
use cchb_table::format::{group_thousands, heat_bucket, heat_intensity};
use cchb_table::{build_table, render_latex, ColumnSpec, TableOptions};

fn sort_policy() -> SortPolicy {
    SortPolicy::Catalogs {
        graphs: Catalog::new(["col", "cal"].map(String::from)),
        partitioners: Catalog::new(["metis", "flowcutter3"].map(String::from)),
    }
}

fn ledger_with(rows: &[(&str, &str, f64)]) -> Ledger {
    let mut ledger = Ledger::new(["graph", "partitioner"], sort_policy());
    for (graph, partitioner, value) in rows {
        let mut record = ExperimentRecord::new([*graph, *partitioner]);
        record.set("metric", MetricValue::Float(*value));
        record.set("count", MetricValue::Int((*value * 1000.0) as i64));
        ledger.append(record).expect("append");
    }
    ledger
}

#[test]
fn thousands_groups_only_the_integer_part() {
    assert_eq!(group_thousands("1234567", ","), "1,234,567");
    assert_eq!(group_thousands("1234567.25", ","), "1,234,567.25");
    assert_eq!(group_thousands("-1234", ","), "-1,234");
    assert_eq!(group_thousands("987", ","), "987");
    assert_eq!(group_thousands("1234567", "\\,"), "1\\,234\\,567");
}

#[test]
fn heat_buckets_cover_eleven_steps() {
    // Scale [0, 10]: value v lands in bucket floor(v), 10 clamps at 10.
    let buckets: Vec<u8> = (0..=10).map(|v| heat_bucket(v as f64, 0.0, 10.0)).collect();
    assert_eq!(buckets, [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
    assert_eq!(heat_intensity(0), 100);
    assert_eq!(heat_intensity(10), 0);
}

#[test]
fn constant_columns_get_full_intensity() {
    assert_eq!(heat_bucket(5.0, 5.0, 5.0), 0);
    assert_eq!(heat_intensity(heat_bucket(5.0, 5.0, 5.0)), 100);
}

#[test]
fn minimum_is_bolded_per_group_with_ties() {
    let ledger = ledger_with(&[
        ("col", "metis", 3.2),
        ("col", "flowcutter3", 1.5),
        ("cal", "metis", 1.5),
        ("cal", "flowcutter3", 9.0),
    ]);
    let columns = [ColumnSpec::label("partitioner"), ColumnSpec::numeric("metric")];
    let options = TableOptions {
        group_rows: true,
        ..TableOptions::default()
    };
    let table = build_table(&ledger, &columns, &options).expect("build");
    assert_eq!(table.rows.len(), 4);

    // col group: flowcutter3 row (sorted second) holds the minimum.
    let bold: Vec<bool> = table.rows.iter().map(|row| row.cells[1].bold).collect();
    assert_eq!(bold, [false, true, true, false]);
}

#[test]
fn whole_table_minimum_is_bolded_without_grouping() {
    let ledger = ledger_with(&[
        ("col", "metis", 1.5),
        ("col", "flowcutter3", 1.5),
        ("cal", "metis", 9.0),
    ]);
    let columns = [ColumnSpec::numeric("metric")];
    let table = build_table(&ledger, &columns, &TableOptions::default()).expect("build");
    let bold: Vec<bool> = table.rows.iter().map(|row| row.cells[0].bold).collect();
    // Both tied minima are bold.
    assert_eq!(bold.iter().filter(|b| **b).count(), 2);
}

#[test]
fn scaled_columns_round_to_one_decimal() {
    let mut ledger = Ledger::new(["graph", "partitioner"], sort_policy());
    let mut record = ExperimentRecord::new(["col", "metis"]);
    record.set("arcs", MetricValue::Int(1_234_567));
    ledger.append(record).expect("append");

    let columns = [ColumnSpec::scaled("arcs", 1000.0)];
    let table = build_table(&ledger, &columns, &TableOptions::default()).expect("build");
    assert_eq!(table.rows[0].cells[0].text, "1,234.6");
}

#[test]
fn integer_display_drops_the_decimals() {
    let mut ledger = Ledger::new(["graph", "partitioner"], sort_policy());
    let mut record = ExperimentRecord::new(["col", "metis"]);
    record.set("seconds", MetricValue::Float(17.6));
    ledger.append(record).expect("append");

    let columns = [ColumnSpec::numeric("seconds").as_integer()];
    let table = build_table(&ledger, &columns, &TableOptions::default()).expect("build");
    assert_eq!(table.rows[0].cells[0].text, "18");
}

#[test]
fn label_columns_use_display_names_and_stay_undecorated() {
    let ledger = ledger_with(&[("col", "metis", 1.0), ("col", "flowcutter3", 2.0)]);
    let columns = [ColumnSpec::label("partitioner"), ColumnSpec::numeric("metric")];
    let options = TableOptions {
        label_names: BTreeMap::from([
            ("metis".to_string(), "M".to_string()),
            ("flowcutter3".to_string(), "F3".to_string()),
        ]),
        ..TableOptions::default()
    };
    let table = build_table(&ledger, &columns, &options).expect("build");
    let labels: Vec<&str> = table
        .rows
        .iter()
        .map(|row| row.cells[0].text.as_str())
        .collect();
    assert_eq!(labels, ["M", "F3"]);
    assert!(table.rows.iter().all(|row| !row.cells[0].bold));
}

#[test]
fn heatmap_scales_over_the_whole_table() {
    let ledger = ledger_with(&[
        ("col", "metis", 0.0),
        ("col", "flowcutter3", 5.0),
        ("cal", "metis", 10.0),
    ]);
    let columns = [ColumnSpec::numeric("metric")];
    let options = TableOptions {
        highlight_min: false,
        heatmap: true,
        ..TableOptions::default()
    };
    let table = build_table(&ledger, &columns, &options).expect("build");
    let fills: Vec<Option<u8>> = table.rows.iter().map(|row| row.cells[0].fill).collect();
    assert_eq!(fills, [Some(100), Some(50), Some(0)]);
}

#[test]
fn grouped_latex_emits_sideways_spans() {
    let ledger = ledger_with(&[
        ("col", "metis", 3.2),
        ("col", "flowcutter3", 1.5),
        ("cal", "metis", 2.0),
    ]);
    let columns = [ColumnSpec::label("partitioner"), ColumnSpec::numeric("metric")];
    let options = TableOptions {
        group_rows: true,
        group_names: BTreeMap::from([
            ("col".to_string(), "Col".to_string()),
            ("cal".to_string(), "Cal".to_string()),
        ]),
        ..TableOptions::default()
    };
    let table = build_table(&ledger, &columns, &options).expect("build");
    let latex = render_latex(&table, "\\begin{tabular}{clr}\n\\toprule", "cyan");
    assert!(latex.contains("\\multirow{2}{*}{\\begin{sideways}Col \\end{sideways}}"));
    assert!(latex.contains("\\multirow{1}{*}{\\begin{sideways}Cal \\end{sideways}}"));
    assert!(latex.contains("\\bfseries{1.5}"));
    assert!(latex.ends_with("\\bottomrule\n\\end{tabular}\n"));
}

#[test]
fn missing_spec_column_is_a_typed_error() {
    let ledger = ledger_with(&[("col", "metis", 1.0)]);
    let columns = [ColumnSpec::numeric("no_such_column")];
    let err = build_table(&ledger, &columns, &TableOptions::default()).unwrap_err();
    assert_eq!(err.info().code, "render-missing-column");
}
