//! Persistent, appendable, deduplicated experiment result store.
//!
//! The ledger is the idempotence boundary of the harness: every sweep loop
//! asks `contains` before computing, appends exactly one record per
//! configuration key, and rewrites the persisted table wholesale on save.
//! Saving applies a deterministic total order so two ledgers holding the
//! same records produce byte-identical files regardless of append order.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use cchb_core::{BenchError, Catalog, ErrorInfo, MetricValue};
use csv::{ReaderBuilder, WriterBuilder};

/// Declared ordering policy applied on save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortPolicy {
    /// Benchmark sweeps: rank the first key column by the graph catalog,
    /// the second by the partitioner catalog, remaining key columns by
    /// numeric-aware ascending order.
    Catalogs {
        /// Declared graph order.
        graphs: Catalog,
        /// Declared partitioner order.
        partitioners: Catalog,
    },
    /// Parameter sweeps: numeric-aware ascending order over all key columns.
    KeyColumns,
}

/// One experiment row: key fields plus a column-to-cell body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentRecord {
    key: Vec<String>,
    values: BTreeMap<String, String>,
}

impl ExperimentRecord {
    /// Creates a record from its key fields, in declared key-column order.
    pub fn new<I, S>(key: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            key: key.into_iter().map(Into::into).collect(),
            values: BTreeMap::new(),
        }
    }

    /// Sets a typed metric cell, rendering it to its persisted form.
    pub fn set(&mut self, column: impl Into<String>, value: MetricValue) {
        self.values.insert(column.into(), value.to_string());
    }

    /// Sets a raw textual cell.
    pub fn set_text(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.values.insert(column.into(), value.into());
    }

    /// Key fields in key-column order.
    pub fn key(&self) -> &[String] {
        &self.key
    }

    /// Returns the persisted cell for `column`, if present.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }

    /// Parses the cell for `column` as a numeric literal.
    pub fn metric(&self, column: &str) -> Option<MetricValue> {
        MetricValue::parse_literal(self.get(column)?)
    }

    /// Body column names of this record.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

/// The persisted table of completed experiment results.
#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    key_columns: Vec<String>,
    records: Vec<ExperimentRecord>,
    sort: SortPolicy,
}

impl Ledger {
    /// Creates an empty ledger with the declared key columns.
    pub fn new<I, S>(key_columns: I, sort: SortPolicy) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            key_columns: key_columns.into_iter().map(Into::into).collect(),
            records: Vec::new(),
            sort,
        }
    }

    /// Loads the persisted table, or synthesizes an empty ledger with the
    /// declared key columns when the file does not exist. Columns beyond the
    /// declared keys pass through untouched.
    pub fn load<I, S>(path: &Path, key_columns: I, sort: SortPolicy) -> Result<Self, BenchError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ledger = Self::new(key_columns, sort);
        if !path.exists() {
            return Ok(ledger);
        }
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)
            .map_err(|err| ledger_io("ledger-open", path, err.to_string()))?;
        let headers = reader
            .headers()
            .map_err(|err| ledger_io("ledger-header", path, err.to_string()))?
            .clone();
        let mut key_indices = Vec::with_capacity(ledger.key_columns.len());
        for column in &ledger.key_columns {
            let idx = headers.iter().position(|h| h == column).ok_or_else(|| {
                BenchError::Ledger(
                    ErrorInfo::new("ledger-missing-key-column", "persisted table lacks a key column")
                        .with_context("column", column.clone())
                        .with_context("path", path.display().to_string()),
                )
            })?;
            key_indices.push(idx);
        }
        for result in reader.records() {
            let row = result.map_err(|err| ledger_io("ledger-record", path, err.to_string()))?;
            let key: Vec<String> = key_indices
                .iter()
                .map(|idx| row.get(*idx).unwrap_or_default().to_string())
                .collect();
            let mut record = ExperimentRecord::new(key);
            for (idx, cell) in row.iter().enumerate() {
                if key_indices.contains(&idx) {
                    continue;
                }
                if let Some(column) = headers.get(idx) {
                    record.set_text(column, cell);
                }
            }
            ledger.records.push(record);
        }
        Ok(ledger)
    }

    /// Exact-equality membership test across all key fields.
    pub fn contains(&self, key: &[String]) -> bool {
        self.records.iter().any(|record| record.key == key)
    }

    /// Returns the record stored under `key`, if any.
    pub fn get(&self, key: &[String]) -> Option<&ExperimentRecord> {
        self.records.iter().find(|record| record.key == key)
    }

    /// Appends a record under the "compute only if missing" discipline.
    ///
    /// Callers check [`Self::contains`] first; a key that is already present
    /// is rejected as a collision rather than silently upserted.
    pub fn append(&mut self, record: ExperimentRecord) -> Result<(), BenchError> {
        if record.key.len() != self.key_columns.len() {
            return Err(BenchError::Ledger(
                ErrorInfo::new("ledger-key-arity", "record key does not match declared key columns")
                    .with_context("expected", self.key_columns.len().to_string())
                    .with_context("actual", record.key.len().to_string()),
            ));
        }
        if self.contains(&record.key) {
            return Err(BenchError::Ledger(
                ErrorInfo::new("ledger-key-collision", "record key already present")
                    .with_context("key", record.key.join(",")),
            ));
        }
        self.records.push(record);
        Ok(())
    }

    /// Writes the full record set back, sorted under the declared policy.
    /// Body columns are emitted as the sorted union across all records so
    /// the file layout is independent of append order.
    pub fn save(&self, path: &Path) -> Result<(), BenchError> {
        let mut ordered: Vec<&ExperimentRecord> = self.records.iter().collect();
        ordered.sort_by(|a, b| self.compare_keys(&a.key, &b.key));

        let mut body_columns: Vec<String> = self
            .records
            .iter()
            .flat_map(|record| record.values.keys().cloned())
            .collect();
        body_columns.sort();
        body_columns.dedup();

        let file = File::create(path)
            .map_err(|err| ledger_io("ledger-create", path, err.to_string()))?;
        let mut writer = WriterBuilder::new().from_writer(BufWriter::new(file));
        let header: Vec<&str> = self
            .key_columns
            .iter()
            .map(String::as_str)
            .chain(body_columns.iter().map(String::as_str))
            .collect();
        writer
            .write_record(&header)
            .map_err(|err| ledger_io("ledger-write-header", path, err.to_string()))?;
        for record in ordered {
            let row: Vec<&str> = record
                .key
                .iter()
                .map(String::as_str)
                .chain(
                    body_columns
                        .iter()
                        .map(|column| record.get(column).unwrap_or_default()),
                )
                .collect();
            writer
                .write_record(&row)
                .map_err(|err| ledger_io("ledger-write-row", path, err.to_string()))?;
        }
        writer
            .flush()
            .map_err(|err| ledger_io("ledger-flush", path, err.to_string()))?;
        Ok(())
    }

    /// Records in append order; use [`Self::save`] for the sorted view.
    pub fn records(&self) -> &[ExperimentRecord] {
        &self.records
    }

    /// Records sorted under the declared policy.
    pub fn sorted_records(&self) -> Vec<&ExperimentRecord> {
        let mut ordered: Vec<&ExperimentRecord> = self.records.iter().collect();
        ordered.sort_by(|a, b| self.compare_keys(&a.key, &b.key));
        ordered
    }

    /// Declared key column names.
    pub fn key_columns(&self) -> &[String] {
        &self.key_columns
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no records are stored.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn compare_keys(&self, a: &[String], b: &[String]) -> Ordering {
        let ranked = match &self.sort {
            SortPolicy::Catalogs {
                graphs,
                partitioners,
            } => {
                let graph_rank = |key: &[String]| graphs.rank(key.first().map_or("", String::as_str));
                let part_rank =
                    |key: &[String]| partitioners.rank(key.get(1).map_or("", String::as_str));
                graph_rank(a)
                    .cmp(&graph_rank(b))
                    .then_with(|| part_rank(a).cmp(&part_rank(b)))
                    .then_with(|| compare_fields(a.get(2..).unwrap_or(&[]), b.get(2..).unwrap_or(&[])))
            }
            SortPolicy::KeyColumns => compare_fields(a, b),
        };
        // Full-key tiebreak keeps the order total even for unknown names.
        ranked.then_with(|| a.cmp(b))
    }
}

/// Numeric-aware ascending field comparison: fields that both parse as
/// numbers compare numerically, everything else lexicographically.
fn compare_fields(a: &[String], b: &[String]) -> Ordering {
    for (left, right) in a.iter().zip(b.iter()) {
        let ord = match (left.parse::<f64>(), right.parse::<f64>()) {
            (Ok(x), Ok(y)) => x.total_cmp(&y),
            _ => left.cmp(right),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.len().cmp(&b.len())
}

fn ledger_io(code: &str, path: &Path, hint: String) -> BenchError {
    BenchError::Ledger(
        ErrorInfo::new(code, "ledger persistence failure")
            .with_context("path", path.display().to_string())
            .with_hint(hint),
    )
}
