use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// Opaque identifier of a benchmark graph instance.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GraphId(String);

impl GraphId {
    /// Creates an identifier from its textual name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the textual name of the graph.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for GraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GraphId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Tunables of the configurable accelerated flow-cutter CCH ordering.
///
/// Two configs are equal iff all fields match; the config participates in
/// the parameter-study ledger key.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowCutterConfig {
    /// Number of cutters seeded from geographic positions.
    pub geo_distance_cutters: u32,
    /// Number of cutters seeded from hop distances.
    pub hop_distance_cutters: u32,
    /// Fraction of nodes assimilated before cutting starts.
    pub initial_assimilated_fraction: f64,
    /// Fraction of nodes assimilated per bulk step.
    pub bulk_step_fraction: f64,
    /// Order threshold below which bulk assimilation is applied.
    pub bulk_assimilation_order_threshold: f64,
    /// Size threshold below which bulk assimilation is applied.
    pub bulk_assimilation_threshold: f64,
}

impl FlowCutterConfig {
    /// Declared ledger key column order for parameter studies.
    pub const KEY_COLUMNS: [&'static str; 6] = [
        "geo_distance_cutters",
        "hop_distance_cutters",
        "initial_assimilated_fraction",
        "bulk_step_fraction",
        "bulk_assimilation_order_threshold",
        "bulk_assimilation_threshold",
    ];

    /// Dotted field rendering used in artifact file names,
    /// e.g. `col.4.0.0.05.0.05.0.25.0.4.order`.
    pub fn artifact_stem(&self) -> String {
        format!(
            "{}.{}.{}.{}.{}.{}",
            self.geo_distance_cutters,
            self.hop_distance_cutters,
            self.initial_assimilated_fraction,
            self.bulk_step_fraction,
            self.bulk_assimilation_order_threshold,
            self.bulk_assimilation_threshold
        )
    }

    /// Key field values aligned with [`Self::KEY_COLUMNS`].
    pub fn key_values(&self) -> Vec<String> {
        vec![
            self.geo_distance_cutters.to_string(),
            self.hop_distance_cutters.to_string(),
            self.initial_assimilated_fraction.to_string(),
            self.bulk_step_fraction.to_string(),
            self.bulk_assimilation_order_threshold.to_string(),
            self.bulk_assimilation_threshold.to_string(),
        ]
    }
}

/// One reported partition attempt from the external tool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CutCandidate {
    /// Node count of the smaller side.
    pub small_side_size: u64,
    /// Node count of the larger side.
    pub large_side_size: u64,
    /// Number of arcs crossing the bipartition.
    pub cut_size: u64,
    /// Elapsed time reported for this candidate, in microseconds.
    pub time_us: f64,
}

impl CutCandidate {
    /// Total node count covered by both sides.
    pub fn total_nodes(&self) -> u64 {
        self.small_side_size + self.large_side_size
    }
}

/// A typed metric cell value.
///
/// A literal without a decimal point is an integer, one with it a float.
/// This mirrors the external tool's report format; columns with a declared
/// kind override the inference at render time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    /// Integer-valued metric (counts, sizes).
    Int(i64),
    /// Floating point metric (times, fractions).
    Float(f64),
    /// Boolean metric (connectivity and feasibility flags).
    Bool(bool),
}

impl MetricValue {
    /// Parses a numeric literal, typing by presence of a decimal point.
    pub fn parse_literal(literal: &str) -> Option<Self> {
        if literal.is_empty() {
            return None;
        }
        if literal.contains('.') {
            literal.parse::<f64>().ok().map(MetricValue::Float)
        } else {
            literal.parse::<i64>().ok().map(MetricValue::Int)
        }
    }

    /// Numeric view of the value; booleans are not numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Int(v) => Some(*v as f64),
            MetricValue::Float(v) => Some(*v),
            MetricValue::Bool(_) => None,
        }
    }
}

impl Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Int(v) => write!(f, "{v}"),
            MetricValue::Float(v) => write!(f, "{v}"),
            MetricValue::Bool(v) => write!(f, "{v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_typing_follows_decimal_point() {
        assert_eq!(MetricValue::parse_literal("42"), Some(MetricValue::Int(42)));
        assert_eq!(
            MetricValue::parse_literal("42.0"),
            Some(MetricValue::Float(42.0))
        );
        assert_eq!(MetricValue::parse_literal(""), None);
        assert_eq!(MetricValue::parse_literal("1.2.3"), None);
    }

    #[test]
    fn config_artifact_stem_joins_fields_with_dots() {
        let config = FlowCutterConfig {
            geo_distance_cutters: 4,
            hop_distance_cutters: 0,
            initial_assimilated_fraction: 0.05,
            bulk_step_fraction: 0.05,
            bulk_assimilation_order_threshold: 0.25,
            bulk_assimilation_threshold: 0.4,
        };
        assert_eq!(config.artifact_stem(), "4.0.0.05.0.05.0.25.0.4");
    }
}
