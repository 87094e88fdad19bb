//! Engine output types
//!
//! Everything here is derived read-only from simulation inputs and handed
//! back to the caller; nothing is persisted. All types serialize so the web
//! layer can emit them as JSON.

use serde::{Deserialize, Serialize};

use crate::risk::quantile_sorted;

/// Which simulation method produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MethodKind {
    Parametric,
    HistoricalBootstrap,
    PortfolioAware,
}

/// Standard reporting percentiles for ending-value distributions
pub const REPORT_PERCENTILES: [f64; 5] = [0.05, 0.25, 0.50, 0.75, 0.95];

/// Simulated portfolio value paths
///
/// Every path has length `horizon_periods + 1` and starts at
/// `initial_value` (index 0 is the starting portfolio value).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub paths: Vec<Vec<f64>>,
    pub method: MethodKind,
    pub horizon_periods: usize,
    pub num_paths: usize,
    pub periods_per_year: usize,
    pub initial_value: f64,
}

impl SimulationResult {
    /// Final value of every path
    #[must_use]
    pub fn ending_values(&self) -> Vec<f64> {
        self.paths
            .iter()
            .map(|p| p.last().copied().unwrap_or(self.initial_value))
            .collect()
    }

    /// Cross-path values at a period index, clamped to the final period.
    #[must_use]
    pub fn values_at(&self, period: usize) -> Vec<f64> {
        self.paths
            .iter()
            .map(|p| {
                p.get(period.min(p.len().saturating_sub(1)))
                    .copied()
                    .unwrap_or(self.initial_value)
            })
            .collect()
    }

    /// Ending-value distribution at the standard reporting percentiles
    /// (P5 through P95).
    #[must_use]
    pub fn ending_percentiles(&self) -> Vec<(f64, f64)> {
        let mut endings = self.ending_values();
        if endings.is_empty() {
            return Vec::new();
        }
        endings.sort_by(f64::total_cmp);
        REPORT_PERCENTILES
            .iter()
            .map(|&p| (p, quantile_sorted(&endings, p)))
            .collect()
    }

    /// The simulated path whose ending value lands closest to the median
    /// ending value.
    #[must_use]
    pub fn median_path(&self) -> &[f64] {
        if self.paths.is_empty() {
            return &[];
        }
        let mut endings = self.ending_values();
        endings.sort_by(f64::total_cmp);
        let median = quantile_sorted(&endings, 0.5);

        let mut best = 0;
        let mut best_distance = f64::INFINITY;
        for (i, path) in self.paths.iter().enumerate() {
            let ending = path.last().copied().unwrap_or(self.initial_value);
            let distance = (ending - median).abs();
            if distance < best_distance {
                best_distance = distance;
                best = i;
            }
        }
        &self.paths[best]
    }
}

/// Risk statistics derived from a simulation result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskSummary {
    /// Dispersion of annualized simulated returns
    pub volatility: f64,
    /// `None` when volatility is zero (undefined, not an error)
    pub sharpe_ratio: Option<f64>,
    /// Peak-to-trough decline of the median path, as a positive fraction
    pub max_drawdown: f64,
    /// Loss fraction not exceeded with probability `confidence`
    pub var: f64,
    /// Mean loss fraction in the tail at or beyond the VaR threshold
    pub cvar: f64,
    pub confidence: f64,
    /// Fraction of paths ending below the initial value
    pub probability_of_loss: f64,
    /// Mean annualized simulated return
    pub expected_return: f64,
}

/// Projection under a single deterministic stress scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: String,
    pub description: String,
    /// Annual return the scenario resolved to
    pub expected_return: f64,
    /// Annual volatility the scenario resolved to
    pub expected_volatility: f64,
    pub projected_value: f64,
    /// Projected value relative to the starting value, minus one
    pub change_fraction: f64,
    pub probability_of_loss: f64,
}

/// Return-series metrics in the shape the holdings dashboard consumes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnMetrics {
    pub volatility: f64,
    pub sharpe_ratio: Option<f64>,
    pub max_drawdown: f64,
    pub total_return: f64,
    /// Cumulative growth minus one, per period
    pub cumulative_returns: Vec<f64>,
}

/// Outcome of the FIRE feasibility search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FireOutcome {
    /// The withdrawal target is supported at `years`
    Reachable {
        years: usize,
        median_value: f64,
        sustainable_withdrawal: f64,
    },
    /// No year within the horizon supports the target
    NotReachable {
        horizon_years: usize,
        best_median_value: f64,
    },
}

/// FIRE feasibility result with the inputs echoed back
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirePlan {
    pub target_annual_spending: f64,
    pub withdrawal_rate: f64,
    pub annual_contribution: f64,
    pub outcome: FireOutcome,
}

/// FIRE number breakdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FireNumber {
    /// Portfolio value needed at retirement to sustain withdrawals
    pub fire_number: f64,
    pub annual_expenses_today: f64,
    /// Expenses inflated to the retirement date
    pub annual_expenses_at_retirement: f64,
    pub years_to_retirement: u32,
    pub retirement_years: u32,
    /// Present value of all retirement-era spending
    pub total_retirement_needs: f64,
    pub withdrawal_rate: f64,
}

/// Savings needed to reach a target portfolio value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SavingsRequirement {
    /// Growth of the current portfolio alone covers the target
    AlreadyFunded {
        future_value_current: f64,
        surplus: f64,
    },
    /// Level monthly savings required to close the gap
    MonthlyContribution {
        monthly_savings: f64,
        total_savings: f64,
        future_value_current: f64,
        gap: f64,
    },
}
