//! Criterion benchmarks for the feature pipeline hot paths.
//!
//! Benchmarks:
//! 1. Single-day feature extraction over a 250-bar window
//! 2. Full dataset construction (sliding extraction + targets)
//! 3. Normalization fit + apply over the built table

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use alphalab_core::dataset::{build_dataset, NormalizationStats};
use alphalab_core::domain::PriceBar;
use alphalab_core::features::extract_features;

fn make_bars(n: usize) -> Vec<PriceBar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
    (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0 + i as f64 * 0.05;
            let open = close - 0.3;
            PriceBar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: close + 1.5,
                low: close - 1.5,
                close,
                volume: 1_000_000.0 + (i % 500) as f64 * 1_000.0,
            }
        })
        .collect()
}

fn bench_extract_features(c: &mut Criterion) {
    let bars = make_bars(250);
    c.bench_function("extract_features_250", |b| {
        b.iter(|| extract_features(black_box(&bars), None).unwrap())
    });
}

fn bench_build_dataset(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_dataset");
    for n in [300usize, 500, 750] {
        let bars = make_bars(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &bars, |b, bars| {
            b.iter(|| build_dataset(black_box(bars), 1, None).unwrap())
        });
    }
    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    let bars = make_bars(500);
    let table = build_dataset(&bars, 1, None).unwrap().to_table();
    c.bench_function("normalize_fit_apply", |b| {
        b.iter(|| {
            let stats = NormalizationStats::fit(black_box(&table.features));
            stats.apply_table(&table.features)
        })
    });
}

criterion_group!(
    benches,
    bench_extract_features,
    bench_build_dataset,
    bench_normalize
);
criterion_main!(benches);
