//! Criterion benchmarks for the projection engine
//!
//! Run with: cargo bench -p foresight_core

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use foresight_core::model::{Holding, MarketParameters, Portfolio, ReturnSeries};
use foresight_core::simulate::{SimulationConfig, SimulationMethod, simulate};

fn sample_portfolio() -> Portfolio {
    Portfolio::new(vec![
        Holding {
            symbol: "NIFTYBEES".to_string(),
            quantity: 500,
            average_cost: 180.0,
            last_price: 245.0,
            sector: Some("Index".to_string()),
        },
        Holding {
            symbol: "INFY".to_string(),
            quantity: 120,
            average_cost: 1_350.0,
            last_price: 1_520.0,
            sector: Some("IT".to_string()),
        },
        Holding {
            symbol: "HDFCBANK".to_string(),
            quantity: 80,
            average_cost: 1_480.0,
            last_price: 1_610.0,
            sector: Some("Financials".to_string()),
        },
    ])
    .unwrap()
}

fn sample_history() -> ReturnSeries {
    let returns: Vec<f64> = (0..504)
        .map(|i| 0.0005 + 0.012 * ((i as f64) * 0.7).sin())
        .collect();
    ReturnSeries::new("synthetic daily", returns)
}

fn bench_parametric(c: &mut Criterion) {
    let portfolio = sample_portfolio();
    let params = MarketParameters::new(0.12, 0.22, 0.0625);

    let mut group = c.benchmark_group("parametric");
    for num_paths in [1_000usize, 10_000] {
        group.bench_with_input(
            BenchmarkId::from_parameter(num_paths),
            &num_paths,
            |b, &num_paths| {
                let config = SimulationConfig {
                    horizon_periods: 60,
                    num_paths,
                    ..SimulationConfig::default()
                };
                b.iter(|| simulate(black_box(&portfolio), black_box(&params), &config).unwrap());
            },
        );
    }
    group.finish();
}

fn bench_bootstrap(c: &mut Criterion) {
    let portfolio = sample_portfolio();
    let params = MarketParameters::new(0.12, 0.22, 0.0625);
    let config = SimulationConfig {
        horizon_periods: 60,
        num_paths: 1_000,
        method: SimulationMethod::HistoricalBootstrap {
            history: sample_history(),
        },
        ..SimulationConfig::default()
    };

    c.bench_function("bootstrap_1000", |b| {
        b.iter(|| simulate(black_box(&portfolio), black_box(&params), &config).unwrap());
    });
}

fn bench_portfolio_aware(c: &mut Criterion) {
    let portfolio = sample_portfolio();
    let params = MarketParameters::new(0.12, 0.22, 0.0625);
    let config = SimulationConfig {
        horizon_periods: 60,
        num_paths: 1_000,
        method: SimulationMethod::PortfolioAware {
            sensitivities: Default::default(),
        },
        ..SimulationConfig::default()
    };

    c.bench_function("portfolio_aware_1000", |b| {
        b.iter(|| simulate(black_box(&portfolio), black_box(&params), &config).unwrap());
    });
}

criterion_group!(
    benches,
    bench_parametric,
    bench_bootstrap,
    bench_portfolio_aware
);
criterion_main!(benches);
