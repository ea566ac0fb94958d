//! Structured error types shared across the benchmark harness crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`BenchError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (identifiers, line numbers, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the benchmark harness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum BenchError {
    /// External tool output violated its line or table grammar.
    #[error("parse error: {0}")]
    Parse(ErrorInfo),
    /// External executable failed to start, exited non-zero, or produced no output.
    #[error("process error: {0}")]
    Process(ErrorInfo),
    /// No enumerated candidate satisfies the requested imbalance bound.
    #[error("frontier error: {0}")]
    Frontier(ErrorInfo),
    /// Ledger persistence or key discipline errors.
    #[error("ledger error: {0}")]
    Ledger(ErrorInfo),
    /// Table rendering errors.
    #[error("render error: {0}")]
    Render(ErrorInfo),
    /// Harness configuration errors.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Filesystem errors outside the ledger persistence boundary.
    #[error("io error: {0}")]
    Io(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl BenchError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            BenchError::Parse(info)
            | BenchError::Process(info)
            | BenchError::Frontier(info)
            | BenchError::Ledger(info)
            | BenchError::Render(info)
            | BenchError::Config(info)
            | BenchError::Io(info) => info,
        }
    }

    /// True when the error marks a frontier that cannot satisfy the bound.
    pub fn is_frontier_exhaustion(&self) -> bool {
        matches!(self, BenchError::Frontier(info) if info.code == "frontier-exhausted")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_serialize_with_family_and_detail() {
        let err = BenchError::Parse(
            ErrorInfo::new("malformed-log-line", "bad line")
                .with_context("line_number", "3")
                .with_hint("check the console version"),
        );
        let json = serde_json::to_value(&err).expect("serialize");
        assert_eq!(json["family"], "Parse");
        assert_eq!(json["detail"]["code"], "malformed-log-line");
        assert_eq!(json["detail"]["context"]["line_number"], "3");

        let back: BenchError = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, err);
    }

    #[test]
    fn display_includes_code_context_and_hint() {
        let err = BenchError::Ledger(
            ErrorInfo::new("ledger-key-collision", "record key already present")
                .with_context("key", "col,metis"),
        );
        let rendered = err.to_string();
        assert!(rendered.contains("ledger-key-collision"));
        assert!(rendered.contains("key=col,metis"));
    }
}
