//! Criterion benchmarks for the draw and curve hot paths.
//!
//! Benchmarks:
//! 1. Cumulative-table shuffle (quadratic reference)
//! 2. Fenwick shuffle
//! 3. Trend curve generation + segment localization

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;

use trendify_core::{
    generate_trend_curve, localize_segments, shuffle_with, DrawRng, Entry, ShuffleStrategy,
};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_entries(n: usize) -> Vec<Entry> {
    (0..n)
        .map(|i| {
            let tickets = 1.0 + (i as f64 * 0.37).sin().abs() * 50.0;
            Entry::from_value(json!({"name": format!("entry-{i}"), "tickets": tickets}))
                .expect("bench entry")
        })
        .collect()
}

// ── Benchmarks ───────────────────────────────────────────────────────

fn bench_shuffle(c: &mut Criterion) {
    let mut group = c.benchmark_group("weighted_shuffle");
    for n in [100usize, 500, 2_000] {
        let entries = make_entries(n);
        for strategy in [ShuffleStrategy::Cumulative, ShuffleStrategy::Fenwick] {
            group.bench_with_input(BenchmarkId::new(strategy.name(), n), &entries, |b, input| {
                let mut rng = DrawRng::from_seed(42);
                b.iter(|| shuffle_with(strategy, black_box(input), &mut rng));
            });
        }
    }
    group.finish();
}

fn bench_curve(c: &mut Criterion) {
    let mut group = c.benchmark_group("trend_curve");
    for n in [1_000usize, 100_000] {
        group.bench_with_input(BenchmarkId::new("generate_and_localize", n), &n, |b, &n| {
            b.iter(|| {
                let curve = generate_trend_curve(black_box(n));
                localize_segments(&curve).expect("curve long enough")
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_shuffle, bench_curve);
criterion_main!(benches);
