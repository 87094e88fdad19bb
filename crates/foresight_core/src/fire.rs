//! FIRE feasibility planning
//!
//! [`plan_fire`] searches for the earliest year at which the simulated
//! median portfolio value supports a sustainable withdrawal. The companion
//! calculators translate a spending profile into a FIRE number and a
//! required monthly savings amount.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{EngineError, ParameterError};
use crate::model::{
    FireNumber, FireOutcome, FirePlan, MarketParameters, Portfolio, SavingsRequirement,
};
use crate::risk::percentile;
use crate::simulate::{SimulationConfig, SimulationMethod, simulate};

/// Savings and withdrawal assumptions for the feasibility search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FireProfile {
    /// Annual spending the portfolio must sustain
    pub target_annual_spending: f64,
    /// Safe withdrawal rate, in (0, 1)
    pub withdrawal_rate: f64,
    /// Amount saved into the portfolio per year
    pub annual_contribution: f64,
    /// Search bound in years
    pub horizon_years: usize,
    pub num_paths: usize,
    pub periods_per_year: usize,
    pub seed: u64,
    pub method: SimulationMethod,
}

impl Default for FireProfile {
    fn default() -> Self {
        Self {
            target_annual_spending: 0.0,
            withdrawal_rate: 0.04,
            annual_contribution: 0.0,
            horizon_years: 60,
            num_paths: 1_000,
            periods_per_year: 12,
            seed: 42,
            method: SimulationMethod::Parametric,
        }
    }
}

impl FireProfile {
    fn validate(&self) -> Result<(), ParameterError> {
        if !self.target_annual_spending.is_finite() || self.target_annual_spending <= 0.0 {
            return Err(ParameterError::NonPositiveTarget(self.target_annual_spending));
        }
        if !(self.withdrawal_rate > 0.0 && self.withdrawal_rate < 1.0) {
            return Err(ParameterError::InvalidWithdrawalRate(self.withdrawal_rate));
        }
        if !self.annual_contribution.is_finite() || self.annual_contribution < 0.0 {
            return Err(ParameterError::NegativeContribution(self.annual_contribution));
        }
        if self.horizon_years == 0 {
            return Err(ParameterError::InvalidHorizon(self.horizon_years));
        }
        Ok(())
    }
}

/// Find the smallest number of years at which the median simulated value
/// supports the withdrawal target.
///
/// Runs one simulation over the full horizon and scans year boundaries, so
/// every candidate year reads the same seeded paths: the search is
/// deterministic for a fixed seed and monotonic in the contribution rate.
/// An unreachable target is reported as [`FireOutcome::NotReachable`],
/// never as an error.
pub fn plan_fire(
    portfolio: &Portfolio,
    params: &MarketParameters,
    profile: &FireProfile,
) -> Result<FirePlan, EngineError> {
    profile.validate()?;

    let config = SimulationConfig {
        horizon_periods: profile.horizon_years * profile.periods_per_year,
        num_paths: profile.num_paths,
        periods_per_year: profile.periods_per_year,
        seed: profile.seed,
        contribution_per_period: profile.annual_contribution / profile.periods_per_year as f64,
        method: profile.method.clone(),
    };
    let result = simulate(portfolio, params, &config)?;

    let required_value = profile.target_annual_spending / profile.withdrawal_rate;
    let mut best_median: f64 = 0.0;

    for year in 1..=profile.horizon_years {
        let mut at_year = result.values_at(year * profile.periods_per_year);
        at_year.sort_by(f64::total_cmp);
        let median = percentile(&at_year, 0.5)?;
        best_median = best_median.max(median);

        if median >= required_value {
            info!(years = year, median, "withdrawal target reachable");
            return Ok(FirePlan {
                target_annual_spending: profile.target_annual_spending,
                withdrawal_rate: profile.withdrawal_rate,
                annual_contribution: profile.annual_contribution,
                outcome: FireOutcome::Reachable {
                    years: year,
                    median_value: median,
                    sustainable_withdrawal: median * profile.withdrawal_rate,
                },
            });
        }
    }

    info!(
        horizon_years = profile.horizon_years,
        best_median, "withdrawal target not reachable within horizon"
    );
    Ok(FirePlan {
        target_annual_spending: profile.target_annual_spending,
        withdrawal_rate: profile.withdrawal_rate,
        annual_contribution: profile.annual_contribution,
        outcome: FireOutcome::NotReachable {
            horizon_years: profile.horizon_years,
            best_median_value: best_median,
        },
    })
}

/// Spending profile for the FIRE number calculation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FireTarget {
    pub annual_expenses: f64,
    pub current_age: u32,
    pub retirement_age: u32,
    pub life_expectancy: u32,
    pub inflation_rate: f64,
    /// Safe withdrawal rate, in (0, 1)
    pub withdrawal_rate: f64,
}

/// Compute the FIRE number for a spending profile.
///
/// Expenses grow at the inflation rate until retirement; the FIRE number is
/// the inflated expense level divided by the withdrawal rate. Total
/// retirement needs are the present value of the growing expense stream
/// over the retirement years at the market's expected return.
pub fn fire_number(
    target: &FireTarget,
    params: &MarketParameters,
) -> Result<FireNumber, ParameterError> {
    if !target.annual_expenses.is_finite() || target.annual_expenses <= 0.0 {
        return Err(ParameterError::NonPositiveTarget(target.annual_expenses));
    }
    if target.retirement_age <= target.current_age {
        return Err(ParameterError::RetirementBeforeCurrentAge {
            current_age: target.current_age,
            retirement_age: target.retirement_age,
        });
    }
    if target.life_expectancy < target.retirement_age {
        return Err(ParameterError::LifeExpectancyBeforeRetirement {
            retirement_age: target.retirement_age,
            life_expectancy: target.life_expectancy,
        });
    }
    if !(target.withdrawal_rate > 0.0 && target.withdrawal_rate < 1.0) {
        return Err(ParameterError::InvalidWithdrawalRate(target.withdrawal_rate));
    }

    let years_to_retirement = target.retirement_age - target.current_age;
    let retirement_years = target.life_expectancy - target.retirement_age;

    let annual_expenses_at_retirement = target.annual_expenses
        * (1.0 + target.inflation_rate).powi(years_to_retirement as i32);
    let fire_number = annual_expenses_at_retirement / target.withdrawal_rate;

    let total_retirement_needs = retirement_needs(
        annual_expenses_at_retirement,
        retirement_years,
        target.inflation_rate,
        params.expected_return,
    );

    Ok(FireNumber {
        fire_number,
        annual_expenses_today: target.annual_expenses,
        annual_expenses_at_retirement,
        years_to_retirement,
        retirement_years,
        total_retirement_needs,
        withdrawal_rate: target.withdrawal_rate,
    })
}

/// Present value of an expense stream growing at the inflation rate, funded
/// at the given return rate.
fn retirement_needs(
    annual_expenses: f64,
    years: u32,
    inflation_rate: f64,
    return_rate: f64,
) -> f64 {
    let real_return = (1.0 + return_rate) / (1.0 + inflation_rate) - 1.0;

    if real_return <= 0.0 {
        // Returns do not outpace inflation: sum the inflated expenses
        (0..years)
            .map(|i| annual_expenses * (1.0 + inflation_rate).powi(i as i32))
            .sum()
    } else {
        let ratio = (1.0 + inflation_rate) / (1.0 + return_rate);
        annual_expenses * (1.0 - ratio.powi(years as i32)) / (return_rate - inflation_rate)
    }
}

/// Solve for the level monthly savings needed to grow `current_value` to
/// `target_value` over `years` at the expected return.
///
/// Reports [`SavingsRequirement::AlreadyFunded`] when growth of the current
/// portfolio alone covers the target.
pub fn required_savings(
    current_value: f64,
    target_value: f64,
    years: usize,
    expected_return: f64,
) -> Result<SavingsRequirement, ParameterError> {
    if !current_value.is_finite() || current_value < 0.0 {
        return Err(ParameterError::NonPositivePortfolioValue(current_value));
    }
    if !target_value.is_finite() || target_value <= 0.0 {
        return Err(ParameterError::NonPositiveTarget(target_value));
    }
    if years == 0 {
        return Err(ParameterError::InvalidHorizon(years));
    }

    let months = (years * 12) as f64;
    let monthly_return = expected_return / 12.0;
    let future_value_current = current_value * (1.0 + expected_return).powi(years as i32);
    let remaining = target_value - future_value_current;

    if remaining <= 0.0 {
        return Ok(SavingsRequirement::AlreadyFunded {
            future_value_current,
            surplus: -remaining,
        });
    }

    let monthly_savings = if monthly_return == 0.0 {
        remaining / months
    } else {
        remaining * monthly_return / ((1.0 + monthly_return).powf(months) - 1.0)
    };

    Ok(SavingsRequirement::MonthlyContribution {
        monthly_savings,
        total_savings: monthly_savings * months,
        future_value_current,
        gap: remaining,
    })
}
