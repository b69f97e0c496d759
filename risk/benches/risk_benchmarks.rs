//! Benchmarks for the risk estimators
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use riskcalc::{greeks, var, MonteCarloConfig, OptionParams, RiskEngine, VarMethod};

fn sample_returns(len: usize) -> Vec<f64> {
    (0..len).map(|i| (i as f64 * 0.001).sin() * 0.02).collect()
}

fn bench_var_methods(c: &mut Criterion) {
    let mut group = c.benchmark_group("var");

    for len in [250, 1_000, 10_000] {
        let returns = sample_returns(len);

        group.bench_with_input(BenchmarkId::new("historical", len), &returns, |b, r| {
            b.iter(|| var::historical_var(black_box(r), 0.99, 10))
        });
        group.bench_with_input(BenchmarkId::new("parametric", len), &returns, |b, r| {
            b.iter(|| var::parametric_var(black_box(r), 0.99, 10))
        });
    }

    let returns = sample_returns(1_000);
    let mc = MonteCarloConfig {
        simulations: 10_000,
        seed: Some(42),
    };
    group.bench_function("monte_carlo_10k", |b| {
        b.iter(|| var::estimate(black_box(&returns), 0.99, 10, VarMethod::MonteCarlo, &mc))
    });

    group.finish();
}

fn bench_greeks(c: &mut Criterion) {
    let option = OptionParams::call(100.0, 100.0, 0.05, 0.20, 1.0);

    c.bench_function("black_scholes_delta", |b| {
        b.iter(|| greeks::delta(black_box(&option)))
    });
    c.bench_function("black_scholes_all_greeks", |b| {
        b.iter(|| greeks::greeks(black_box(&option)))
    });
}

fn bench_batch(c: &mut Criterion) {
    let engine = RiskEngine::default();
    let portfolios: Vec<Vec<f64>> = (0..200)
        .map(|p| {
            (0..500)
                .map(|i| ((i + p) as f64 * 0.01).sin() * 0.02)
                .collect()
        })
        .collect();

    c.bench_function("var_batch_200x500", |b| {
        b.iter(|| engine.var_batch(black_box(&portfolios)))
    });
}

criterion_group!(benches, bench_var_methods, bench_greeks, bench_batch);
criterion_main!(benches);
