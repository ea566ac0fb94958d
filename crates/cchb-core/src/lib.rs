#![deny(missing_docs)]
#![doc = "Core identifiers, value types, and errors for the CCH ordering benchmark harness."]

pub mod catalog;
pub mod errors;
mod types;

pub use catalog::Catalog;
pub use errors::{BenchError, ErrorInfo};
pub use types::{CutCandidate, FlowCutterConfig, GraphId, MetricValue};
