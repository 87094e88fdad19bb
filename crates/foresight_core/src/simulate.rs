//! Monte Carlo simulation engine
//!
//! Three interchangeable methods behind one `simulate` contract, selected by
//! a [`SimulationMethod`] tag. Randomness is always drawn from explicitly
//! seeded per-path generators (`seed + path_index`), so results are
//! identical whether paths run on one thread or across the rayon pool.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::error::{DataError, EngineError, NumericError, ParameterError};
use crate::model::{MarketParameters, MethodKind, Portfolio, ReturnSeries, SimulationResult};

/// Path-generation method
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimulationMethod {
    /// Geometric random walk with Normal period returns parameterized by
    /// the market estimates
    Parametric,
    /// Period returns drawn with replacement from an empirical series,
    /// preserving the realized distribution shape
    HistoricalBootstrap { history: ReturnSeries },
    /// Each holding simulated on its own path with independent noise,
    /// scaled by a per-symbol sensitivity (1.0 when absent), then summed
    PortfolioAware {
        #[serde(default)]
        sensitivities: FxHashMap<String, f64>,
    },
}

impl SimulationMethod {
    #[must_use]
    pub fn kind(&self) -> MethodKind {
        match self {
            SimulationMethod::Parametric => MethodKind::Parametric,
            SimulationMethod::HistoricalBootstrap { .. } => MethodKind::HistoricalBootstrap,
            SimulationMethod::PortfolioAware { .. } => MethodKind::PortfolioAware,
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            SimulationMethod::Parametric => "parametric",
            SimulationMethod::HistoricalBootstrap { .. } => "historical_bootstrap",
            SimulationMethod::PortfolioAware { .. } => "portfolio_aware",
        }
    }
}

/// Simulation shape and reproducibility settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub horizon_periods: usize,
    pub num_paths: usize,
    pub periods_per_year: usize,
    /// Base seed; path i draws from a generator seeded `seed + i`
    pub seed: u64,
    /// Amount added to each live path every period (used by the FIRE
    /// planner; zero for plain projections)
    pub contribution_per_period: f64,
    pub method: SimulationMethod,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            horizon_periods: 60,
            num_paths: 10_000,
            periods_per_year: 12,
            seed: 42,
            contribution_per_period: 0.0,
            method: SimulationMethod::Parametric,
        }
    }
}

impl SimulationConfig {
    fn validate(&self) -> Result<(), ParameterError> {
        if self.horizon_periods == 0 {
            return Err(ParameterError::InvalidHorizon(self.horizon_periods));
        }
        if self.num_paths == 0 {
            return Err(ParameterError::InvalidPathCount(self.num_paths));
        }
        if self.periods_per_year == 0 {
            return Err(ParameterError::InvalidPeriodsPerYear(self.periods_per_year));
        }
        if !self.contribution_per_period.is_finite() || self.contribution_per_period < 0.0 {
            return Err(ParameterError::NegativeContribution(
                self.contribution_per_period,
            ));
        }
        Ok(())
    }
}

/// Simulate portfolio value paths.
///
/// Pure function of its inputs. CPU cost scales with
/// `num_paths * horizon_periods`; callers are responsible for bounding that
/// product and for any request-level timeout.
///
/// Values compound multiplicatively per period; a path that reaches zero is
/// floored there and treated as terminal.
pub fn simulate(
    portfolio: &Portfolio,
    params: &MarketParameters,
    config: &SimulationConfig,
) -> Result<SimulationResult, EngineError> {
    config.validate()?;
    let initial_value = portfolio.total_value();
    if !initial_value.is_finite() || initial_value <= 0.0 {
        return Err(ParameterError::NonPositivePortfolioValue(initial_value).into());
    }

    debug!(
        method = config.method.label(),
        num_paths = config.num_paths,
        horizon_periods = config.horizon_periods,
        initial_value,
        "running projection"
    );

    let paths = match &config.method {
        SimulationMethod::Parametric => parametric_paths(initial_value, params, config)?,
        SimulationMethod::HistoricalBootstrap { history } => {
            bootstrap_paths(initial_value, history, config)?
        }
        SimulationMethod::PortfolioAware { sensitivities } => {
            portfolio_aware_paths(portfolio, params, sensitivities, config)?
        }
    };

    Ok(SimulationResult {
        paths,
        method: config.method.kind(),
        horizon_periods: config.horizon_periods,
        num_paths: config.num_paths,
        periods_per_year: config.periods_per_year,
        initial_value,
    })
}

fn run_paths<F>(num_paths: usize, build: F) -> Vec<Vec<f64>>
where
    F: Fn(usize) -> Vec<f64> + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        (0..num_paths).into_par_iter().map(build).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        (0..num_paths).map(build).collect()
    }
}

/// Compound one path: `value[t] = value[t-1] * (1 + r) + contribution`,
/// floored at zero as a terminal state.
fn compound_path<F>(
    initial_value: f64,
    horizon_periods: usize,
    contribution: f64,
    mut next_return: F,
) -> Vec<f64>
where
    F: FnMut() -> f64,
{
    let mut path = Vec::with_capacity(horizon_periods + 1);
    let mut value = initial_value;
    path.push(value);
    for _ in 0..horizon_periods {
        if value <= 0.0 {
            path.push(0.0);
            continue;
        }
        value = value * (1.0 + next_return()) + contribution;
        if value <= 0.0 {
            value = 0.0;
        }
        path.push(value);
    }
    path
}

fn period_normal(mean: f64, std_dev: f64, what: &'static str) -> Result<Normal<f64>, NumericError> {
    Normal::new(mean, std_dev).map_err(|_| NumericError::InvalidDistributionParameters {
        what,
        mean,
        std_dev,
        reason: "standard deviation must be non-negative and finite",
    })
}

fn parametric_paths(
    initial_value: f64,
    params: &MarketParameters,
    config: &SimulationConfig,
) -> Result<Vec<Vec<f64>>, EngineError> {
    let periods = config.periods_per_year as f64;
    let mean = params.expected_return / periods;
    let std_dev = params.volatility / periods.sqrt();

    // Zero volatility degenerates to exact compounding at the mean
    if std_dev == 0.0 {
        let path = compound_path(
            initial_value,
            config.horizon_periods,
            config.contribution_per_period,
            || mean,
        );
        return Ok(vec![path; config.num_paths]);
    }

    let normal = period_normal(mean, std_dev, "parametric period return")?;

    Ok(run_paths(config.num_paths, |path_index| {
        let mut rng = SmallRng::seed_from_u64(config.seed.wrapping_add(path_index as u64));
        compound_path(
            initial_value,
            config.horizon_periods,
            config.contribution_per_period,
            || normal.sample(&mut rng),
        )
    }))
}

fn bootstrap_paths(
    initial_value: f64,
    history: &ReturnSeries,
    config: &SimulationConfig,
) -> Result<Vec<Vec<f64>>, EngineError> {
    if history.is_empty() {
        return Err(DataError::EmptySeries("bootstrap return history").into());
    }
    let returns = history.returns();

    Ok(run_paths(config.num_paths, |path_index| {
        let mut rng = SmallRng::seed_from_u64(config.seed.wrapping_add(path_index as u64));
        compound_path(
            initial_value,
            config.horizon_periods,
            config.contribution_per_period,
            || returns[rng.random_range(0..returns.len())],
        )
    }))
}

struct HoldingLeg {
    start: f64,
    /// Share of each period's contribution, by starting allocation
    weight: f64,
    mean: f64,
    sampler: Option<Normal<f64>>,
}

fn portfolio_aware_paths(
    portfolio: &Portfolio,
    params: &MarketParameters,
    sensitivities: &FxHashMap<String, f64>,
    config: &SimulationConfig,
) -> Result<Vec<Vec<f64>>, EngineError> {
    let periods = config.periods_per_year as f64;
    let total = portfolio.total_value();

    let mut legs = Vec::with_capacity(portfolio.len());
    for holding in portfolio.holdings() {
        let beta = sensitivities
            .get(holding.symbol.as_str())
            .copied()
            .unwrap_or(1.0);
        let mean = beta * params.expected_return / periods;
        let std_dev = beta.abs() * params.volatility / periods.sqrt();
        let sampler = if std_dev == 0.0 {
            None
        } else {
            Some(period_normal(mean, std_dev, "holding period return")?)
        };
        let start = holding.market_value();
        legs.push(HoldingLeg {
            start,
            weight: start / total,
            mean,
            sampler,
        });
    }

    Ok(run_paths(config.num_paths, |path_index| {
        let mut rng = SmallRng::seed_from_u64(config.seed.wrapping_add(path_index as u64));
        let mut values: Vec<f64> = legs.iter().map(|l| l.start).collect();

        let mut path: Vec<f64> = Vec::with_capacity(config.horizon_periods + 1);
        path.push(values.iter().sum());
        for _ in 0..config.horizon_periods {
            let previous_total: f64 = values.iter().sum();
            if previous_total <= 0.0 {
                path.push(0.0);
                continue;
            }
            let mut total = 0.0;
            for (leg, value) in legs.iter().zip(values.iter_mut()) {
                let r = match &leg.sampler {
                    Some(normal) => normal.sample(&mut rng),
                    None => leg.mean,
                };
                *value = (*value * (1.0 + r)).max(0.0)
                    + leg.weight * config.contribution_per_period;
                total += *value;
            }
            path.push(total);
        }
        path
    }))
}
