//! Partitioner variant names and their cut-experiment dispatch.

use cchb_core::{BenchError, ErrorInfo};

/// How a partitioner variant produces cuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionerKind {
    /// One-shot METIS bipartition via the external gpmetis binary.
    Metis,
    /// One-shot inertial flow cut via the console.
    InertialFlow,
    /// Pareto-enumerating plain flow cutter with the given cutter count.
    FlowCutter(u32),
    /// Pareto-enumerating accelerated flow cutter with the given cutter count.
    InertialFlowCutter(u32),
}

impl PartitionerKind {
    /// True when the variant enumerates a full cut frontier in one run.
    pub fn enumerates(&self) -> bool {
        matches!(
            self,
            PartitionerKind::FlowCutter(_) | PartitionerKind::InertialFlowCutter(_)
        )
    }
}

/// Resolves a variant name like `flowcutter20` or `inertialflowcutter8`.
pub fn classify(name: &str) -> Result<PartitionerKind, BenchError> {
    if name == "metis" {
        return Ok(PartitionerKind::Metis);
    }
    if name == "inertial_flow" {
        return Ok(PartitionerKind::InertialFlow);
    }
    if let Some(suffix) = name.strip_prefix("inertialflowcutter") {
        if let Ok(cutters) = suffix.parse::<u32>() {
            return Ok(PartitionerKind::InertialFlowCutter(cutters));
        }
    }
    if let Some(suffix) = name.strip_prefix("flowcutter") {
        if let Ok(cutters) = suffix.parse::<u32>() {
            return Ok(PartitionerKind::FlowCutter(cutters));
        }
    }
    Err(BenchError::Config(
        ErrorInfo::new("unknown-partitioner", "no cut adapter for partitioner variant")
            .with_context("partitioner", name),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cutter_counts_come_from_the_name_suffix() {
        assert_eq!(classify("flowcutter3").unwrap(), PartitionerKind::FlowCutter(3));
        assert_eq!(
            classify("inertialflowcutter16").unwrap(),
            PartitionerKind::InertialFlowCutter(16)
        );
        assert_eq!(classify("metis").unwrap(), PartitionerKind::Metis);
        assert!(classify("kahip_v2_11").is_err());
    }
}
