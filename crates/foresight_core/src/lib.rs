//! Portfolio projection and risk analytics engine
//!
//! This crate projects the future value of an investment portfolio and
//! quantifies its risk under uncertainty. It provides:
//! - Market parameter derivation from historical return series, with a
//!   reported fallback when history is too thin
//! - Monte Carlo simulation with interchangeable methods (parametric,
//!   historical bootstrap, portfolio-aware multi-asset)
//! - Risk metrics: volatility, Sharpe ratio, max drawdown, VaR, CVaR,
//!   probability of loss
//! - Deterministic stress scenarios (bull/bear/crash) defined as data
//! - FIRE feasibility planning over a savings/withdrawal profile
//!
//! The engine is pure and synchronous: it consumes a portfolio snapshot and
//! market data from its caller, performs CPU-bound computation (optionally
//! parallelized across paths via the `parallel` feature), and returns
//! structured results. It never fetches data, renders output, or persists
//! anything.
//!
//! ```ignore
//! use foresight_core::model::{Holding, MarketParameters, Portfolio};
//! use foresight_core::risk::compute_risk_summary;
//! use foresight_core::simulate::{simulate, SimulationConfig, SimulationMethod};
//!
//! let portfolio = Portfolio::new(vec![Holding {
//!     symbol: "NIFTYBEES".into(),
//!     quantity: 500,
//!     average_cost: 180.0,
//!     last_price: 245.0,
//!     sector: None,
//! }])?;
//! let params = MarketParameters::new(0.12, 0.22, 0.0625);
//! let result = simulate(&portfolio, &params, &SimulationConfig {
//!     horizon_periods: 60,
//!     num_paths: 10_000,
//!     ..SimulationConfig::default()
//! })?;
//! let summary = compute_risk_summary(&result, params.risk_free_rate, 0.95)?;
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod error;
pub mod fire;
pub mod risk;
pub mod scenario;
pub mod simulate;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use error::{DataError, EngineError, NumericError, ParameterError};
pub use fire::{FireProfile, FireTarget, fire_number, plan_fire, required_savings};
pub use model::{
    FireOutcome, FirePlan, Holding, MarketParameters, Portfolio, ReturnSeries, RiskSummary,
    ScenarioResult, SimulationResult,
};
pub use risk::{compute_return_metrics, compute_risk_summary};
pub use scenario::{
    ReturnAdjustment, ScenarioShock, default_scenarios, evaluate_scenarios,
    vix_conditioned_scenarios,
};
pub use simulate::{SimulationConfig, SimulationMethod, simulate};
