use cchb_core::CutCandidate;
use cchb_pareto::ParetoFrontier;
use proptest::prelude::*;

fn candidate(cut: u64, small: u64, large: u64) -> CutCandidate {
    CutCandidate {
        small_side_size: small,
        large_side_size: large,
        cut_size: cut,
        time_us: 1000.0,
    }
}

/// Frontier over 100 nodes: cut 5 at imbalance 0.2, cut 8 at 0.04,
/// cut 10 perfectly balanced.
fn example_frontier() -> ParetoFrontier {
    ParetoFrontier::from_enumeration(vec![
        candidate(5, 40, 60),
        candidate(8, 48, 52),
        candidate(10, 50, 50),
    ])
    .expect("frontier")
}

#[test]
fn query_returns_the_first_feasible_candidate() {
    let frontier = example_frontier();
    let loose = frontier.query(0.3).expect("query");
    assert_eq!(loose.candidate.cut_size, 5);
    assert!(loose.feasible);

    let mid = frontier.query(0.1).expect("query");
    assert_eq!(mid.candidate.cut_size, 8);
    assert!((mid.achieved_imbalance - 0.04).abs() < 1e-12);

    let tight = frontier.query(0.0).expect("query");
    assert_eq!(tight.candidate.cut_size, 10);
}

#[test]
fn impossible_bound_exhausts_an_exhaustive_frontier() {
    let err = example_frontier().query(-1.0).unwrap_err();
    assert!(err.is_frontier_exhaustion());
    assert_eq!(err.info().code, "frontier-exhausted");
}

#[test]
fn empty_enumeration_is_a_typed_error() {
    let err = ParetoFrontier::from_enumeration(Vec::new()).unwrap_err();
    assert_eq!(err.info().code, "frontier-empty");
}

#[test]
fn deserialized_empty_frontier_queries_without_panicking() {
    // A frontier can arrive over the wire with no points at all; the query
    // must surface the typed error instead of indexing out of bounds.
    let frontier: ParetoFrontier =
        serde_json::from_value(serde_json::json!({ "points": [], "exhaustive": false }))
            .expect("deserialize");
    assert!(frontier.is_empty());
    let err = frontier.query(0.1).unwrap_err();
    assert_eq!(err.info().code, "frontier-empty");
}

#[test]
fn single_point_frontier_marks_missed_bounds_infeasible() {
    let frontier = ParetoFrontier::from_single(candidate(11, 40, 60), 0.2);
    let miss = frontier.query(0.05).expect("query");
    assert!(!miss.feasible);
    assert_eq!(miss.candidate.cut_size, 11);

    let hit = frontier.query(0.2).expect("query");
    assert!(hit.feasible);
}

proptest! {
    /// Loosening the bound never selects a larger cut.
    #[test]
    fn cut_size_is_monotone_in_the_bound(
        sizes in prop::collection::vec((1u64..50, 1u64..500), 1..20),
        eps_a in 0.0f64..1.0,
        eps_b in 0.0f64..1.0,
    ) {
        // Build an enumeration with increasing cut size and shrinking
        // imbalance over a fixed 1000-node graph.
        let mut cut = 0;
        let mut small = 100u64;
        let mut candidates = Vec::new();
        for (dc, ds) in sizes {
            cut += dc;
            small = (small + ds).min(500);
            candidates.push(candidate(cut, small, 1000 - small));
        }
        candidates.sort_by_key(|c| c.cut_size);
        let frontier = ParetoFrontier::from_enumeration(candidates).unwrap();

        let (tight, loose) = if eps_a <= eps_b { (eps_a, eps_b) } else { (eps_b, eps_a) };
        if let (Ok(t), Ok(l)) = (frontier.query(tight), frontier.query(loose)) {
            prop_assert!(l.candidate.cut_size <= t.candidate.cut_size);
            prop_assert!(l.achieved_imbalance <= loose);
            prop_assert!(t.achieved_imbalance <= tight);
        }
    }
}
