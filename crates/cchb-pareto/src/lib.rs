//! Pareto frontier extraction and feasibility queries.
//!
//! Incremental partitioners enumerate cuts with growing cut size and
//! shrinking imbalance. The frontier keeps that enumeration order, derives
//! each candidate's imbalance, and answers "best feasible cut at imbalance
//! at most epsilon" queries. One-shot partitioners share the abstraction as
//! single-point frontiers whose only candidate may be infeasible.

use cchb_core::{BenchError, CutCandidate, ErrorInfo};
use serde::{Deserialize, Serialize};

/// A candidate admitted to the frontier together with its derived imbalance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct FrontierPoint {
    candidate: CutCandidate,
    imbalance: f64,
}

/// Result of a frontier query at a requested imbalance bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    /// The selected cut.
    pub candidate: CutCandidate,
    /// The imbalance the cut actually achieves.
    pub achieved_imbalance: f64,
    /// False when the cut violates the requested bound (one-shot results
    /// only); the flag must propagate to every metric derived from it.
    pub feasible: bool,
}

/// An immutable, queryable frontier of enumerated cut candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParetoFrontier {
    points: Vec<FrontierPoint>,
    /// True when the frontier covers the partitioner's full enumeration, in
    /// which case a query below the most balanced entry is an error rather
    /// than an infeasible-but-present result.
    exhaustive: bool,
}

impl ParetoFrontier {
    /// Builds a frontier from candidates in enumeration order (increasing
    /// cut size, non-increasing imbalance). The node count is taken from the
    /// last, most balanced candidate; each candidate's imbalance is
    /// `large_side_size / ceil(total / 2) - 1`.
    pub fn from_enumeration(candidates: Vec<CutCandidate>) -> Result<Self, BenchError> {
        let last = candidates.last().ok_or_else(|| {
            BenchError::Frontier(ErrorInfo::new(
                "frontier-empty",
                "cut enumeration produced no candidates",
            ))
        })?;
        let half = (last.total_nodes() + 1) / 2;
        if half == 0 {
            return Err(BenchError::Frontier(ErrorInfo::new(
                "frontier-empty",
                "cut enumeration reports zero nodes",
            )));
        }
        let points = candidates
            .iter()
            .map(|candidate| FrontierPoint {
                candidate: *candidate,
                imbalance: candidate.large_side_size as f64 / half as f64 - 1.0,
            })
            .collect();
        Ok(Self {
            points,
            exhaustive: true,
        })
    }

    /// Wraps a one-shot result as a single-point, non-exhaustive frontier.
    /// `achieved_imbalance` is the imbalance reported by the tool itself.
    pub fn from_single(candidate: CutCandidate, achieved_imbalance: f64) -> Self {
        Self {
            points: vec![FrontierPoint {
                candidate,
                imbalance: achieved_imbalance,
            }],
            exhaustive: false,
        }
    }

    /// Returns the first candidate in enumeration order whose imbalance is
    /// at most `epsilon`.
    ///
    /// An exhaustive frontier with no such candidate signals frontier
    /// exhaustion: the enumeration budget was too small or the bound is
    /// below the partitioner's achievable range. A single-point frontier
    /// instead returns its candidate marked infeasible.
    pub fn query(&self, epsilon: f64) -> Result<Selection, BenchError> {
        if let Some(point) = self.points.iter().find(|p| p.imbalance <= epsilon) {
            return Ok(Selection {
                candidate: point.candidate,
                achieved_imbalance: point.imbalance,
                feasible: true,
            });
        }
        if self.exhaustive {
            let most_balanced = self
                .points
                .last()
                .map(|p| p.imbalance.to_string())
                .unwrap_or_default();
            return Err(BenchError::Frontier(
                ErrorInfo::new(
                    "frontier-exhausted",
                    "no enumerated candidate satisfies the imbalance bound",
                )
                .with_context("epsilon", epsilon.to_string())
                .with_context("most_balanced_imbalance", most_balanced),
            ));
        }
        // Single-point frontier: the result is reported, flagged infeasible.
        let point = self.points.first().ok_or_else(|| {
            BenchError::Frontier(ErrorInfo::new(
                "frontier-empty",
                "frontier holds no candidates",
            ))
        })?;
        Ok(Selection {
            candidate: point.candidate,
            achieved_imbalance: point.imbalance,
            feasible: false,
        })
    }

    /// Number of candidates on the frontier.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the frontier holds no candidates.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Derived imbalances in enumeration order.
    pub fn imbalances(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.imbalance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(cut: u64, small: u64, large: u64) -> CutCandidate {
        CutCandidate {
            small_side_size: small,
            large_side_size: large,
            cut_size: cut,
            time_us: 1.0,
        }
    }

    #[test]
    fn imbalance_uses_ceil_half_of_last_row() {
        // 99 nodes total, ceil half = 50.
        let frontier =
            ParetoFrontier::from_enumeration(vec![candidate(3, 24, 75), candidate(7, 49, 50)])
                .expect("frontier");
        let imbalances: Vec<f64> = frontier.imbalances().collect();
        assert!((imbalances[0] - 0.5).abs() < 1e-12);
        assert!(imbalances[1].abs() < 1e-12);
    }

    #[test]
    fn single_point_reports_infeasible_instead_of_exhausting() {
        let frontier = ParetoFrontier::from_single(candidate(11, 40, 60), 0.2);
        let selection = frontier.query(0.05).expect("query");
        assert!(!selection.feasible);
        assert_eq!(selection.candidate.cut_size, 11);
    }
}
