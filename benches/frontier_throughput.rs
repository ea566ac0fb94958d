use cchb_core::CutCandidate;
use cchb_pareto::ParetoFrontier;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Synthetic enumeration over a million-node graph: cut size grows, the
/// larger side shrinks toward the balanced half.
fn synthetic_enumeration(points: u64) -> Vec<CutCandidate> {
    let total = 1_000_000u64;
    (0..points)
        .map(|i| {
            let large = total - (total / 2) * (i + 1) / points;
            CutCandidate {
                small_side_size: total - large,
                large_side_size: large,
                cut_size: 3 + i * 2,
                time_us: 1000.0 * i as f64,
            }
        })
        .collect()
}

fn bench_frontier(c: &mut Criterion) {
    let candidates = synthetic_enumeration(10_000);

    c.bench_function("frontier_from_enumeration_10k", |b| {
        b.iter(|| ParetoFrontier::from_enumeration(black_box(candidates.clone())).unwrap())
    });

    let frontier = ParetoFrontier::from_enumeration(candidates).unwrap();
    let bounds = [0.0, 0.01, 0.03, 0.05, 0.1, 0.2, 0.3, 0.5, 0.7, 0.9];
    c.bench_function("frontier_query_sweep_10k", |b| {
        b.iter(|| {
            for &epsilon in &bounds {
                black_box(frontier.query(black_box(epsilon)).unwrap());
            }
        })
    });
}

criterion_group!(benches, bench_frontier);
criterion_main!(benches);
