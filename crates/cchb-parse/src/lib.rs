//! Fixed-grammar parsers for the external partitioning tool's output.

mod enumeration;
mod metrics;

pub use enumeration::parse_cut_enumeration;
pub use metrics::{
    parse_metrics_log, parse_metrics_log_with, RunningTimePolicy, ORDER_RUNNING_TIME,
};
