//! Deterministic stress scenarios
//!
//! Scenario definitions are data, not code: a [`ScenarioShock`] names the
//! shock and carries its parameters, and the evaluator applies any set of
//! them with the same compounding rule the simulation engine uses. New
//! scenarios need no evaluator changes.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, ParameterError};
use crate::model::{MarketParameters, ParameterSource, Portfolio, ScenarioResult};
use crate::risk::probability_of_loss;
use crate::simulate::{SimulationConfig, SimulationMethod, simulate};

/// Paths used for the per-scenario probability-of-loss estimate
const SCENARIO_NUM_PATHS: usize = 1_000;

/// How a scenario adjusts the baseline expected return
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ReturnAdjustment {
    /// Scale the baseline return
    Multiplier { factor: f64 },
    /// Replace the baseline return outright
    Absolute { rate: f64 },
}

impl ReturnAdjustment {
    #[must_use]
    pub fn resolve(&self, base_return: f64) -> f64 {
        match self {
            ReturnAdjustment::Multiplier { factor } => base_return * factor,
            ReturnAdjustment::Absolute { rate } => *rate,
        }
    }
}

/// A named deterministic shock
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioShock {
    pub name: String,
    pub description: String,
    pub return_adjustment: ReturnAdjustment,
    pub volatility_multiplier: f64,
    /// One-time fractional hit applied to the starting value, e.g. -0.3
    /// for an immediate 30% decline. Zero for the built-in sets.
    #[serde(default)]
    pub immediate_shock: f64,
}

impl ScenarioShock {
    fn new(
        name: &str,
        description: &str,
        return_adjustment: ReturnAdjustment,
        volatility_multiplier: f64,
    ) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            return_adjustment,
            volatility_multiplier,
            immediate_shock: 0.0,
        }
    }
}

/// The standard scenario set for normal market conditions.
#[must_use]
pub fn default_scenarios() -> Vec<ScenarioShock> {
    vec![
        ScenarioShock::new(
            "Bull Market",
            "Strong economic growth, positive reforms",
            ReturnAdjustment::Multiplier { factor: 1.5 },
            0.8,
        ),
        ScenarioShock::new(
            "Base Case",
            "Normal market conditions based on historical average",
            ReturnAdjustment::Multiplier { factor: 1.0 },
            1.0,
        ),
        ScenarioShock::new(
            "Bear Market",
            "Economic slowdown, global headwinds",
            ReturnAdjustment::Multiplier { factor: 0.3 },
            1.5,
        ),
        ScenarioShock::new(
            "Market Crash",
            "Severe recession, systemic crisis",
            ReturnAdjustment::Absolute { rate: -0.20 },
            2.5,
        ),
    ]
}

/// Scenario set conditioned on the current volatility-index level.
///
/// A reading well above its historical average (ratio > 1.5) yields more
/// conservative scenarios; well below (ratio < 0.8) yields more optimistic
/// ones; otherwise the defaults apply. The base-case volatility tracks the
/// index ratio in both adjusted regimes.
#[must_use]
pub fn vix_conditioned_scenarios(current_index: f64, average_index: f64) -> Vec<ScenarioShock> {
    if average_index <= 0.0 {
        return default_scenarios();
    }
    let ratio = current_index / average_index;

    if ratio > 1.5 {
        vec![
            ScenarioShock::new(
                "Bull Market",
                "Recovery from high volatility",
                ReturnAdjustment::Multiplier { factor: 1.3 },
                1.2,
            ),
            ScenarioShock::new(
                "Base Case",
                "Volatile market conditions",
                ReturnAdjustment::Multiplier { factor: 0.8 },
                ratio,
            ),
            ScenarioShock::new(
                "Bear Market",
                "Continued high volatility",
                ReturnAdjustment::Multiplier { factor: 0.2 },
                2.0,
            ),
            ScenarioShock::new(
                "Market Crash",
                "Extreme volatility scenario",
                ReturnAdjustment::Absolute { rate: -0.30 },
                3.0,
            ),
        ]
    } else if ratio < 0.8 {
        vec![
            ScenarioShock::new(
                "Bull Market",
                "Strong growth in calm markets",
                ReturnAdjustment::Multiplier { factor: 1.8 },
                0.7,
            ),
            ScenarioShock::new(
                "Base Case",
                "Stable market conditions",
                ReturnAdjustment::Multiplier { factor: 1.1 },
                ratio,
            ),
            ScenarioShock::new(
                "Bear Market",
                "Mild correction",
                ReturnAdjustment::Multiplier { factor: 0.5 },
                1.3,
            ),
            ScenarioShock::new(
                "Market Crash",
                "Sharp but brief correction",
                ReturnAdjustment::Absolute { rate: -0.15 },
                2.0,
            ),
        ]
    } else {
        default_scenarios()
    }
}

/// Evaluate a scenario set against the current portfolio.
///
/// Each scenario resolves to an (annual return, annual volatility) pair,
/// compounds the shocked starting value over `years`, and estimates the
/// probability of loss from a reduced parametric run at the shocked
/// parameters. Results come back in input order.
pub fn evaluate_scenarios(
    portfolio: &Portfolio,
    params: &MarketParameters,
    scenarios: &[ScenarioShock],
    years: usize,
    seed: u64,
) -> Result<Vec<ScenarioResult>, EngineError> {
    if years == 0 {
        return Err(ParameterError::InvalidHorizon(years).into());
    }
    let initial_value = portfolio.total_value();
    if !initial_value.is_finite() || initial_value <= 0.0 {
        return Err(ParameterError::NonPositivePortfolioValue(initial_value).into());
    }

    let mut results = Vec::with_capacity(scenarios.len());
    for shock in scenarios {
        let expected_return = shock.return_adjustment.resolve(params.expected_return);
        let expected_volatility = params.volatility * shock.volatility_multiplier;

        let shocked_start = initial_value * (1.0 + shock.immediate_shock);
        let projected_value =
            (shocked_start * (1.0 + expected_return).powi(years as i32)).max(0.0);

        let shocked_params = MarketParameters {
            expected_return,
            volatility: expected_volatility,
            risk_free_rate: params.risk_free_rate,
            vol_index: params.vol_index,
            source: ParameterSource::Supplied,
        };
        let config = SimulationConfig {
            horizon_periods: years,
            num_paths: SCENARIO_NUM_PATHS,
            periods_per_year: 1,
            seed,
            contribution_per_period: 0.0,
            method: SimulationMethod::Parametric,
        };
        let run = simulate(portfolio, &shocked_params, &config)?;

        // Scale endings by the one-time shock; paths grow linearly with
        // their starting value under parametric compounding
        let shocked_endings: Vec<f64> = run
            .ending_values()
            .iter()
            .map(|v| v * (1.0 + shock.immediate_shock))
            .collect();

        results.push(ScenarioResult {
            name: shock.name.clone(),
            description: shock.description.clone(),
            expected_return,
            expected_volatility,
            projected_value,
            change_fraction: projected_value / initial_value - 1.0,
            probability_of_loss: probability_of_loss(&shocked_endings, initial_value)?,
        });
    }

    Ok(results)
}
