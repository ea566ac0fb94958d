//! Construction of decorated tables from ledger records.

use std::collections::BTreeMap;

use cchb_core::{BenchError, ErrorInfo, MetricValue};
use cchb_ledger::{ExperimentRecord, Ledger};
use serde::{Deserialize, Serialize};

use crate::format::{group_thousands, heat_bucket, heat_intensity, round1};

/// How a column participates in decoration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    /// Identifier column, displayed through the label name map, undecorated.
    Label,
    /// Numeric column, eligible for rescaling, highlighting, and heat maps.
    Numeric,
}

/// Declared display behavior of one table column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Ledger column (key or body) the cell is read from.
    pub key: String,
    /// Label or numeric treatment.
    pub kind: ColumnKind,
    /// Fixed divisor applied before formatting (1.0 for none).
    pub divisor: f64,
    /// Round to an integer for display instead of one decimal.
    pub integer_display: bool,
}

impl ColumnSpec {
    /// An undecorated identifier column.
    pub fn label(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: ColumnKind::Label,
            divisor: 1.0,
            integer_display: false,
        }
    }

    /// A numeric column displayed at its reported scale.
    pub fn numeric(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: ColumnKind::Numeric,
            divisor: 1.0,
            integer_display: false,
        }
    }

    /// A numeric column divided by `divisor` for compact display.
    pub fn scaled(key: impl Into<String>, divisor: f64) -> Self {
        Self {
            key: key.into(),
            kind: ColumnKind::Numeric,
            divisor,
            integer_display: false,
        }
    }

    /// Rounds the column to a whole number for display.
    pub fn as_integer(mut self) -> Self {
        self.integer_display = true;
        self
    }
}

/// Decoration switches and naming maps for a rendered table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableOptions {
    /// Bold the column minimum within each grouping scope.
    pub highlight_min: bool,
    /// Attach heat-map intensities to numeric cells.
    pub heatmap: bool,
    /// Group rows by the first key column with a spanning label.
    pub group_rows: bool,
    /// Separator inserted between digit groups (`,` or a LaTeX thin space).
    pub thousands_sep: String,
    /// Display names for label-column values.
    pub label_names: BTreeMap<String, String>,
    /// Display names for group labels.
    pub group_names: BTreeMap<String, String>,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            highlight_min: true,
            heatmap: false,
            group_rows: false,
            thousands_sep: ",".to_string(),
            label_names: BTreeMap::new(),
            group_names: BTreeMap::new(),
        }
    }
}

/// One rendered cell with its decorations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Display string, digit groups already separated.
    pub text: String,
    /// Bold marker: this cell equals its column minimum in scope.
    pub bold: bool,
    /// Heat-map color intensity percentage, when heat maps are on.
    pub fill: Option<u8>,
}

/// Spanning label emitted at the first row of each group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupLabel {
    /// Display name of the group.
    pub text: String,
    /// Number of rows the label spans.
    pub span: usize,
}

/// One table row; `group` is set on the first row of each group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    /// Spanning group label, present on group-opening rows only.
    pub group: Option<GroupLabel>,
    /// Cells in column-specification order.
    pub cells: Vec<Cell>,
}

/// The fully decorated rendering target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FormattedTable {
    /// Rows in ledger sort order.
    pub rows: Vec<TableRow>,
}

/// Builds a decorated table from a ledger and an ordered column spec.
pub fn build_table(
    ledger: &Ledger,
    columns: &[ColumnSpec],
    options: &TableOptions,
) -> Result<FormattedTable, BenchError> {
    let records = ledger.sorted_records();
    let prepared: Vec<Vec<PreparedCell>> = records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|column| prepare_cell(ledger, record, column))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    let scopes = grouping_scopes(&records, options.group_rows);
    let minima = column_minima(&prepared, columns.len(), &scopes);
    let extrema = column_extrema(&prepared, columns.len());

    let mut rows = Vec::with_capacity(records.len());
    for (row_idx, cells) in prepared.iter().enumerate() {
        let scope = scopes
            .iter()
            .position(|scope| scope.contains(&row_idx))
            .unwrap_or(0);
        let group = group_label(&records, row_idx, options);
        let rendered: Vec<Cell> = cells
            .iter()
            .enumerate()
            .map(|(col_idx, cell)| {
                decorate_cell(cell, minima[scope][col_idx], extrema[col_idx], options)
            })
            .collect();
        rows.push(TableRow {
            group,
            cells: rendered,
        });
    }
    Ok(FormattedTable { rows })
}

struct PreparedCell {
    text: String,
    /// Comparable value after rescale and rounding; `None` for labels.
    value: Option<f64>,
}

fn prepare_cell(
    ledger: &Ledger,
    record: &ExperimentRecord,
    column: &ColumnSpec,
) -> Result<PreparedCell, BenchError> {
    let raw = cell_text(ledger, record, &column.key).ok_or_else(|| {
        BenchError::Render(
            ErrorInfo::new("render-missing-column", "record lacks a column named by the spec")
                .with_context("column", column.key.clone())
                .with_context("key", record.key().join(",")),
        )
    })?;
    if column.kind == ColumnKind::Label {
        return Ok(PreparedCell {
            text: raw.to_string(),
            value: None,
        });
    }
    let Some(metric) = MetricValue::parse_literal(raw) else {
        // Non-numeric content in a numeric column passes through undecorated.
        return Ok(PreparedCell {
            text: raw.to_string(),
            value: None,
        });
    };
    let Some(reported) = metric.as_f64() else {
        return Ok(PreparedCell {
            text: raw.to_string(),
            value: None,
        });
    };
    let scaled = reported / column.divisor;
    let was_float = matches!(metric, MetricValue::Float(_)) || column.divisor != 1.0;
    let (value, text) = if column.integer_display {
        let rounded = scaled.round();
        (rounded, format!("{rounded:.0}"))
    } else if was_float {
        let rounded = round1(scaled);
        (rounded, format!("{rounded:.1}"))
    } else {
        (scaled, format!("{scaled:.0}"))
    };
    Ok(PreparedCell {
        text,
        value: Some(value),
    })
}

/// Reads a cell from the key fields or the record body.
fn cell_text<'a>(ledger: &Ledger, record: &'a ExperimentRecord, key: &str) -> Option<&'a str> {
    if let Some(idx) = ledger.key_columns().iter().position(|c| c == key) {
        return record.key().get(idx).map(String::as_str);
    }
    record.get(key)
}

/// Row-index ranges sharing one highlight scope.
fn grouping_scopes(records: &[&ExperimentRecord], group_rows: bool) -> Vec<std::ops::Range<usize>> {
    if !group_rows || records.is_empty() {
        return vec![0..records.len()];
    }
    let mut scopes = Vec::new();
    let mut start = 0;
    for idx in 1..records.len() {
        if group_key(records[idx]) != group_key(records[start]) {
            scopes.push(start..idx);
            start = idx;
        }
    }
    scopes.push(start..records.len());
    scopes
}

fn group_key(record: &ExperimentRecord) -> &str {
    record.key().first().map_or("", String::as_str)
}

fn group_label(
    records: &[&ExperimentRecord],
    row_idx: usize,
    options: &TableOptions,
) -> Option<GroupLabel> {
    if !options.group_rows {
        return None;
    }
    let key = group_key(records[row_idx]);
    if row_idx > 0 && group_key(records[row_idx - 1]) == key {
        return None;
    }
    let span = records[row_idx..]
        .iter()
        .take_while(|record| group_key(record) == key)
        .count();
    let text = options
        .group_names
        .get(key)
        .cloned()
        .unwrap_or_else(|| key.to_string());
    Some(GroupLabel { text, span })
}

fn column_minima(
    prepared: &[Vec<PreparedCell>],
    columns: usize,
    scopes: &[std::ops::Range<usize>],
) -> Vec<Vec<Option<f64>>> {
    scopes
        .iter()
        .map(|scope| {
            (0..columns)
                .map(|col| {
                    prepared[scope.clone()]
                        .iter()
                        .filter_map(|row| row[col].value)
                        .fold(None, |min: Option<f64>, v| {
                            Some(min.map_or(v, |m| m.min(v)))
                        })
                })
                .collect()
        })
        .collect()
}

/// Whole-table (min, max) per column, the heat-map scale.
fn column_extrema(prepared: &[Vec<PreparedCell>], columns: usize) -> Vec<Option<(f64, f64)>> {
    (0..columns)
        .map(|col| {
            prepared
                .iter()
                .filter_map(|row| row[col].value)
                .fold(None, |acc: Option<(f64, f64)>, v| {
                    Some(acc.map_or((v, v), |(lo, hi)| (lo.min(v), hi.max(v))))
                })
        })
        .collect()
}

fn decorate_cell(
    cell: &PreparedCell,
    scope_min: Option<f64>,
    extrema: Option<(f64, f64)>,
    options: &TableOptions,
) -> Cell {
    let text = match cell.value {
        Some(_) => group_thousands(&cell.text, &options.thousands_sep),
        None => options
            .label_names
            .get(&cell.text)
            .cloned()
            .unwrap_or_else(|| cell.text.clone()),
    };
    let bold = options.highlight_min
        && matches!((cell.value, scope_min), (Some(v), Some(min)) if v == min);
    let fill = if options.heatmap {
        match (cell.value, extrema) {
            (Some(v), Some((lo, hi))) => Some(heat_intensity(heat_bucket(v, lo, hi))),
            _ => None,
        }
    } else {
        None
    };
    Cell { text, bold, fill }
}
