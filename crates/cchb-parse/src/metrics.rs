//! Line-grammar parser for `label : value` metric logs.
//!
//! The external console reports statistics as one metric per line:
//!
//! ```text
//! number of arcs : 1234567
//! running time : 8224855 musec
//! ```
//!
//! Each non-blank line must match `<label> : <numeric literal> [unit]` where
//! the label consists of letters, underscores, and spaces, and the trailing
//! unit text contains no digits. Anything else is a contract violation of
//! the external tool and aborts the experiment with a typed error.

use std::collections::BTreeMap;

use cchb_core::{BenchError, ErrorInfo, MetricValue};

/// Microseconds per second; the console reports running times in musec.
const MICROS_PER_SECOND: f64 = 1_000_000.0;

/// Canonical key that all reported running-time labels collapse to.
pub const ORDER_RUNNING_TIME: &str = "order_running_time";

/// Treatment of labels containing `running_time`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunningTimePolicy {
    /// Keep the label and value untouched (tools that already report seconds).
    Keep,
    /// Divide the value by 1e6 (musec to seconds), keep the label.
    RescaleMicros,
    /// Divide by 1e6 and rename the label to [`ORDER_RUNNING_TIME`].
    CanonicalOrderTime,
}

/// Parses a metrics log with the canonical order-time policy.
pub fn parse_metrics_log(text: &str) -> Result<BTreeMap<String, MetricValue>, BenchError> {
    parse_metrics_log_with(text, RunningTimePolicy::CanonicalOrderTime)
}

/// Parses a metrics log under an explicit running-time policy.
pub fn parse_metrics_log_with(
    text: &str,
    policy: RunningTimePolicy,
) -> Result<BTreeMap<String, MetricValue>, BenchError> {
    let mut metrics = BTreeMap::new();
    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let (label, value) = parse_line(line).ok_or_else(|| malformed_line(idx, line))?;
        let (label, value) = apply_policy(label, value, policy);
        metrics.insert(label, value);
    }
    Ok(metrics)
}

fn apply_policy(label: String, value: MetricValue, policy: RunningTimePolicy) -> (String, MetricValue) {
    if !label.contains("running_time") {
        return (label, value);
    }
    match policy {
        RunningTimePolicy::Keep => (label, value),
        RunningTimePolicy::RescaleMicros => (label, rescale_micros(value)),
        RunningTimePolicy::CanonicalOrderTime => {
            (ORDER_RUNNING_TIME.to_string(), rescale_micros(value))
        }
    }
}

fn rescale_micros(value: MetricValue) -> MetricValue {
    match value.as_f64() {
        Some(v) => MetricValue::Float(v / MICROS_PER_SECOND),
        None => value,
    }
}

/// Single-line acceptor for the `label : value [unit]` grammar.
///
/// Deterministic left-to-right scan: optional leading whitespace, label run,
/// a `:` separator, a `[0-9.]` literal, then a digit-free suffix.
fn parse_line(line: &str) -> Option<(String, MetricValue)> {
    let (raw_label, rest) = line.split_once(':')?;
    let label = normalize_label(raw_label)?;
    let rest = rest.trim_start();
    let literal_len = rest.bytes().take_while(|b| b.is_ascii_digit() || *b == b'.').count();
    if literal_len == 0 {
        return None;
    }
    let (literal, suffix) = rest.split_at(literal_len);
    if suffix.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    let value = MetricValue::parse_literal(literal)?;
    Some((label, value))
}

/// Collapses the label's interior whitespace to single underscores.
fn normalize_label(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphabetic() || c == '_' || c == ' ' || c == '\t')
    {
        return None;
    }
    Some(trimmed.split_whitespace().collect::<Vec<_>>().join("_"))
}

fn malformed_line(idx: usize, line: &str) -> BenchError {
    BenchError::Parse(
        ErrorInfo::new("malformed-log-line", "log line violates the label : value grammar")
            .with_context("line_number", (idx + 1).to_string())
            .with_context("line", line.to_string()),
    )
}
