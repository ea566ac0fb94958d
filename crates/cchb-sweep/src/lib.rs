//! Sweep orchestration: configuration, partitioner dispatch, the three
//! experiment loops, and the rendered report tables.

pub mod config;
pub mod cuts;
pub mod orders;
pub mod partitioner;
pub mod study;
pub mod tables;

/// Tally of one sweep invocation, printed when the loop finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepOutcome {
    /// Experiments computed and appended this run.
    pub computed: u64,
    /// Experiments skipped because they were recorded or lacked inputs.
    pub skipped: u64,
    /// Experiments that failed; their keys stay absent for a rerun.
    pub failed: u64,
}

impl std::fmt::Display for SweepOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} computed, {} skipped, {} failed",
            self.computed, self.skipped, self.failed
        )
    }
}
