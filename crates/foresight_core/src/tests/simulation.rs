//! Tests for path generation across simulation methods
//!
//! These tests verify that:
//! - Every path has length `horizon_periods + 1` and starts at the
//!   portfolio's current value
//! - Zero volatility degenerates to exact deterministic compounding
//! - A fixed seed reproduces identical paths
//! - Paths floor at zero and stay there
//! - Invalid shapes are rejected with parameter errors

use rustc_hash::FxHashMap;

use super::portfolio_worth;
use crate::error::{DataError, EngineError, ParameterError};
use crate::model::{Holding, MarketParameters, Portfolio, ReturnSeries};
use crate::simulate::{SimulationConfig, SimulationMethod, simulate};

fn config(horizon: usize, paths: usize, seed: u64, method: SimulationMethod) -> SimulationConfig {
    SimulationConfig {
        horizon_periods: horizon,
        num_paths: paths,
        periods_per_year: 12,
        seed,
        contribution_per_period: 0.0,
        method,
    }
}

#[test]
fn test_paths_have_horizon_length_and_common_start() {
    let portfolio = portfolio_worth(1_000_000.0);
    let params = MarketParameters::new(0.12, 0.22, 0.0625);

    let result = simulate(
        &portfolio,
        &params,
        &config(24, 50, 42, SimulationMethod::Parametric),
    )
    .unwrap();

    assert_eq!(result.num_paths, 50);
    assert_eq!(result.paths.len(), 50);
    for path in &result.paths {
        assert_eq!(path.len(), 25, "path must hold horizon + 1 values");
        assert!(
            (path[0] - 1_000_000.0).abs() < 1e-9,
            "every path starts at the portfolio value, got {}",
            path[0]
        );
    }
}

#[test]
fn test_zero_volatility_compounds_at_mean_exactly() {
    let portfolio = portfolio_worth(1_000_000.0);
    let params = MarketParameters::new(0.10, 0.0, 0.0625);

    let result = simulate(
        &portfolio,
        &params,
        &config(12, 1, 42, SimulationMethod::Parametric),
    )
    .unwrap();

    let ending = *result.paths[0].last().unwrap();
    let expected = 1_000_000.0 * (1.0_f64 + 0.10 / 12.0).powi(12);
    assert!(
        (ending - expected).abs() < 1e-6,
        "expected {expected}, got {ending}"
    );
    // Within compounding-period rounding of 10% simple annual growth
    assert!((ending / 1_100_000.0 - 1.0).abs() < 0.005);
}

#[test]
fn test_same_seed_reproduces_paths() {
    let portfolio = portfolio_worth(500_000.0);
    let params = MarketParameters::new(0.12, 0.22, 0.0625);
    let cfg = config(36, 40, 1234, SimulationMethod::Parametric);

    let first = simulate(&portfolio, &params, &cfg).unwrap();
    let second = simulate(&portfolio, &params, &cfg).unwrap();

    assert_eq!(first.paths, second.paths);
}

#[test]
fn test_different_seeds_differ() {
    let portfolio = portfolio_worth(500_000.0);
    let params = MarketParameters::new(0.12, 0.22, 0.0625);

    let first = simulate(
        &portfolio,
        &params,
        &config(36, 40, 1, SimulationMethod::Parametric),
    )
    .unwrap();
    let second = simulate(
        &portfolio,
        &params,
        &config(36, 40, 2, SimulationMethod::Parametric),
    )
    .unwrap();

    assert_ne!(first.paths, second.paths);
}

#[test]
fn test_bootstrap_single_value_series_compounds_exactly() {
    let portfolio = portfolio_worth(100_000.0);
    let params = MarketParameters::fallback();
    let history = ReturnSeries::new("flat", vec![0.02]);

    let result = simulate(
        &portfolio,
        &params,
        &config(10, 3, 42, SimulationMethod::HistoricalBootstrap { history }),
    )
    .unwrap();

    let expected = 100_000.0 * 1.02f64.powi(10);
    for path in &result.paths {
        let ending = *path.last().unwrap();
        assert!(
            (ending - expected).abs() < 1e-6,
            "expected {expected}, got {ending}"
        );
    }
}

#[test]
fn test_bootstrap_empty_history_is_insufficient_data() {
    let portfolio = portfolio_worth(100_000.0);
    let params = MarketParameters::fallback();
    let history = ReturnSeries::new("empty", Vec::new());

    let err = simulate(
        &portfolio,
        &params,
        &config(10, 3, 42, SimulationMethod::HistoricalBootstrap { history }),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        EngineError::Data(DataError::EmptySeries("bootstrap return history"))
    ));
}

#[test]
fn test_floor_at_zero_is_terminal() {
    let portfolio = portfolio_worth(100_000.0);
    let params = MarketParameters::fallback();
    // A -200% return wipes the path out in the first period
    let history = ReturnSeries::new("wipeout", vec![-2.0]);

    let result = simulate(
        &portfolio,
        &params,
        &config(8, 2, 42, SimulationMethod::HistoricalBootstrap { history }),
    )
    .unwrap();

    for path in &result.paths {
        assert!((path[0] - 100_000.0).abs() < 1e-9);
        for &value in &path[1..] {
            assert_eq!(value, 0.0, "a wiped-out path must stay at zero");
        }
    }
}

#[test]
fn test_contribution_accumulates_without_growth() {
    let portfolio = portfolio_worth(10_000.0);
    let params = MarketParameters::new(0.0, 0.0, 0.0);
    let cfg = SimulationConfig {
        contribution_per_period: 100.0,
        ..config(12, 1, 42, SimulationMethod::Parametric)
    };

    let result = simulate(&portfolio, &params, &cfg).unwrap();
    let ending = *result.paths[0].last().unwrap();
    assert!(
        (ending - 11_200.0).abs() < 1e-9,
        "12 flat contributions of 100 on 10,000, got {ending}"
    );
}

#[test]
fn test_portfolio_aware_sums_holding_paths() {
    let portfolio = Portfolio::new(vec![
        Holding {
            symbol: "GROWER".to_string(),
            quantity: 100,
            average_cost: 90.0,
            last_price: 100.0,
            sector: None,
        },
        Holding {
            symbol: "FLAT".to_string(),
            quantity: 50,
            average_cost: 180.0,
            last_price: 200.0,
            sector: None,
        },
    ])
    .unwrap();
    // Zero market volatility keeps every leg deterministic
    let params = MarketParameters::new(0.12, 0.0, 0.0625);

    let mut sensitivities = FxHashMap::default();
    sensitivities.insert("GROWER".to_string(), 1.0);
    sensitivities.insert("FLAT".to_string(), 0.0);

    let result = simulate(
        &portfolio,
        &params,
        &config(12, 2, 42, SimulationMethod::PortfolioAware { sensitivities }),
    )
    .unwrap();

    // GROWER compounds at 1% per period, FLAT holds its 10,000 value
    let expected = 10_000.0 * 1.01f64.powi(12) + 10_000.0;
    for path in &result.paths {
        assert!((path[0] - 20_000.0).abs() < 1e-9);
        let ending = *path.last().unwrap();
        assert!(
            (ending - expected).abs() < 1e-6,
            "expected {expected}, got {ending}"
        );
    }
}

#[test]
fn test_portfolio_aware_default_sensitivity_matches_parametric() {
    let portfolio = portfolio_worth(250_000.0);
    let params = MarketParameters::new(0.09, 0.0, 0.0625);

    let aware = simulate(
        &portfolio,
        &params,
        &config(
            24,
            1,
            42,
            SimulationMethod::PortfolioAware {
                sensitivities: FxHashMap::default(),
            },
        ),
    )
    .unwrap();
    let parametric = simulate(
        &portfolio,
        &params,
        &config(24, 1, 42, SimulationMethod::Parametric),
    )
    .unwrap();

    let aware_end = *aware.paths[0].last().unwrap();
    let parametric_end = *parametric.paths[0].last().unwrap();
    assert!(
        (aware_end - parametric_end).abs() < 1e-6,
        "unit sensitivity on one holding must match the aggregate walk"
    );
}

#[test]
fn test_invalid_shapes_are_rejected() {
    let portfolio = portfolio_worth(100_000.0);
    let params = MarketParameters::fallback();

    let err = simulate(
        &portfolio,
        &params,
        &config(0, 10, 42, SimulationMethod::Parametric),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Parameter(ParameterError::InvalidHorizon(0))
    ));

    let err = simulate(
        &portfolio,
        &params,
        &config(10, 0, 42, SimulationMethod::Parametric),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Parameter(ParameterError::InvalidPathCount(0))
    ));

    let cfg = SimulationConfig {
        periods_per_year: 0,
        ..config(10, 10, 42, SimulationMethod::Parametric)
    };
    let err = simulate(&portfolio, &params, &cfg).unwrap_err();
    assert!(matches!(
        err,
        EngineError::Parameter(ParameterError::InvalidPeriodsPerYear(0))
    ));
}

#[test]
fn test_empty_portfolio_is_rejected() {
    let portfolio = Portfolio::new(Vec::new()).unwrap();
    let params = MarketParameters::fallback();

    let err = simulate(
        &portfolio,
        &params,
        &config(10, 10, 42, SimulationMethod::Parametric),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Parameter(ParameterError::NonPositivePortfolioValue(_))
    ));
}

#[test]
fn test_ending_percentiles_are_ordered() {
    let portfolio = portfolio_worth(1_000_000.0);
    let params = MarketParameters::new(0.12, 0.22, 0.0625);

    let result = simulate(
        &portfolio,
        &params,
        &config(60, 1_000, 42, SimulationMethod::Parametric),
    )
    .unwrap();

    let table = result.ending_percentiles();
    assert_eq!(table.len(), 5);
    assert_eq!(table[0].0, 0.05);
    assert_eq!(table[4].0, 0.95);
    for pair in table.windows(2) {
        assert!(
            pair[0].1 <= pair[1].1,
            "percentile table must be non-decreasing: {table:?}"
        );
    }
}

#[test]
fn test_result_serializes_to_json() {
    let portfolio = portfolio_worth(50_000.0);
    let params = MarketParameters::new(0.10, 0.15, 0.06);

    let result = simulate(
        &portfolio,
        &params,
        &config(6, 4, 42, SimulationMethod::Parametric),
    )
    .unwrap();

    let json = serde_json::to_string(&result).unwrap();
    let roundtrip: crate::model::SimulationResult = serde_json::from_str(&json).unwrap();
    assert_eq!(roundtrip.paths, result.paths);
    assert_eq!(roundtrip.num_paths, 4);
    assert_eq!(roundtrip.horizon_periods, 6);
}
