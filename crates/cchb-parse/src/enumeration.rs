//! Parser for the console's cut-enumeration table output.
//!
//! Enumeration-mode operations print a CSV header followed by one numeric
//! row per discovered cut. Header tokens may carry alignment padding
//! (the console emits `    time`), so all fields are trimmed.

use cchb_core::{BenchError, CutCandidate, ErrorInfo};
use csv::{ReaderBuilder, Trim};

const CUT_SIZE: &str = "cut_size";
const SMALL_SIDE: &str = "small_side_size";
const LARGE_SIDE: &str = "large_side_size";
const TIME: &str = "time";

/// Parses the enumeration table into candidates in enumeration order.
pub fn parse_cut_enumeration(text: &str) -> Result<Vec<CutCandidate>, BenchError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());
    let headers = reader
        .headers()
        .map_err(|err| malformed_table("missing header row", err.to_string()))?
        .clone();
    let cut_idx = column_index(&headers, CUT_SIZE)?;
    let small_idx = column_index(&headers, SMALL_SIDE)?;
    let large_idx = column_index(&headers, LARGE_SIDE)?;
    let time_idx = column_index(&headers, TIME)?;

    let mut candidates = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|err| malformed_table("unreadable row", err.to_string()))?;
        candidates.push(CutCandidate {
            cut_size: parse_field::<u64>(&record, cut_idx, CUT_SIZE, row)?,
            small_side_size: parse_field::<u64>(&record, small_idx, SMALL_SIDE, row)?,
            large_side_size: parse_field::<u64>(&record, large_idx, LARGE_SIDE, row)?,
            time_us: parse_field::<f64>(&record, time_idx, TIME, row)?,
        });
    }
    Ok(candidates)
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize, BenchError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| malformed_table("missing column", format!("column `{name}` not present")))
}

fn parse_field<T: std::str::FromStr>(
    record: &csv::StringRecord,
    idx: usize,
    name: &str,
    row: usize,
) -> Result<T, BenchError> {
    let raw = record.get(idx).ok_or_else(|| {
        malformed_table("short row", format!("row {row} has no `{name}` field"))
    })?;
    raw.parse::<T>().map_err(|_| {
        BenchError::Parse(
            ErrorInfo::new("malformed-cut-table", "non-numeric enumeration field")
                .with_context("column", name.to_string())
                .with_context("row", row.to_string())
                .with_context("value", raw.to_string()),
        )
    })
}

fn malformed_table(message: &str, hint: String) -> BenchError {
    BenchError::Parse(
        ErrorInfo::new("malformed-cut-table", message.to_string()).with_hint(hint),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_headers_are_accepted() {
        let text = "cut_size,small_side_size,large_side_size,    time\n10,40,60,150.5\n";
        let cuts = parse_cut_enumeration(text).expect("parse");
        assert_eq!(cuts.len(), 1);
        assert_eq!(cuts[0].cut_size, 10);
        assert_eq!(cuts[0].large_side_size, 60);
        assert!((cuts[0].time_us - 150.5).abs() < 1e-9);
    }

    #[test]
    fn missing_column_is_a_typed_error() {
        let err = parse_cut_enumeration("cut_size,small_side_size\n1,2\n").unwrap_err();
        assert_eq!(err.info().code, "malformed-cut-table");
    }
}
