//! Risk metrics
//!
//! Pure statistics over return series, value paths, and ending-value
//! distributions. Every function fails with an explicit error on empty
//! input; nothing here has side effects.

use crate::error::{DataError, EngineError, ParameterError};
use crate::model::{ReturnMetrics, RiskSummary, SimulationResult};

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator); 0 for fewer than 2 points
fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Linear-interpolated quantile of an ascending-sorted slice.
///
/// Callers guarantee the slice is non-empty and `p` is in [0, 1].
pub(crate) fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    let rank = p * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let frac = rank - lo as f64;
        sorted[lo] * (1.0 - frac) + sorted[hi] * frac
    }
}

/// Linear-interpolated percentile of an ascending-sorted slice.
pub fn percentile(sorted_values: &[f64], p: f64) -> Result<f64, EngineError> {
    if sorted_values.is_empty() {
        return Err(DataError::EmptySeries("percentile input").into());
    }
    if !(0.0..=1.0).contains(&p) || !p.is_finite() {
        return Err(ParameterError::InvalidQuantile(p).into());
    }
    Ok(quantile_sorted(sorted_values, p))
}

/// Annualized volatility: sample standard deviation of the periodic return
/// series scaled by the square root of the period count.
pub fn volatility(returns: &[f64], periods_per_year: usize) -> Result<f64, EngineError> {
    if returns.is_empty() {
        return Err(DataError::EmptySeries("return series").into());
    }
    if returns.len() < 2 {
        return Err(DataError::TooFewObservations {
            required: 2,
            actual: returns.len(),
        }
        .into());
    }
    if periods_per_year == 0 {
        return Err(ParameterError::InvalidPeriodsPerYear(0).into());
    }
    Ok(sample_std_dev(returns) * (periods_per_year as f64).sqrt())
}

/// Annualized Sharpe ratio: excess periodic return over periodic standard
/// deviation, scaled by the square root of the period count.
///
/// `Ok(None)` when the standard deviation is zero; the ratio is undefined
/// there, not an error.
pub fn sharpe_ratio(
    returns: &[f64],
    risk_free_rate: f64,
    periods_per_year: usize,
) -> Result<Option<f64>, EngineError> {
    if returns.is_empty() {
        return Err(DataError::EmptySeries("return series").into());
    }
    if returns.len() < 2 {
        return Err(DataError::TooFewObservations {
            required: 2,
            actual: returns.len(),
        }
        .into());
    }
    if periods_per_year == 0 {
        return Err(ParameterError::InvalidPeriodsPerYear(0).into());
    }
    let std_dev = sample_std_dev(returns);
    if std_dev == 0.0 {
        return Ok(None);
    }
    let periods = periods_per_year as f64;
    let excess = mean(returns) - risk_free_rate / periods;
    Ok(Some(excess / std_dev * periods.sqrt()))
}

/// Maximum peak-to-trough decline of a value path, as a positive fraction.
///
/// Zero for a monotonically non-decreasing path.
pub fn max_drawdown(values: &[f64]) -> Result<f64, DataError> {
    if values.is_empty() {
        return Err(DataError::EmptySeries("value path"));
    }
    let mut peak = values[0];
    let mut worst = 0.0;
    for &value in values {
        if value > peak {
            peak = value;
        }
        if peak > 0.0 {
            let drawdown = (peak - value) / peak;
            if drawdown > worst {
                worst = drawdown;
            }
        }
    }
    Ok(worst)
}

fn check_tail_inputs(
    ending_values: &[f64],
    initial_value: f64,
    confidence: f64,
) -> Result<(), EngineError> {
    if ending_values.is_empty() {
        return Err(DataError::EmptySeries("ending values").into());
    }
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(ParameterError::InvalidConfidence(confidence).into());
    }
    if !initial_value.is_finite() || initial_value <= 0.0 {
        return Err(ParameterError::NonPositivePortfolioValue(initial_value).into());
    }
    Ok(())
}

/// Value at Risk: the (1 - confidence) quantile of ending values, expressed
/// as a loss fraction of the initial value and floored at zero.
pub fn value_at_risk(
    ending_values: &[f64],
    initial_value: f64,
    confidence: f64,
) -> Result<f64, EngineError> {
    check_tail_inputs(ending_values, initial_value, confidence)?;
    let mut sorted = ending_values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let threshold = quantile_sorted(&sorted, 1.0 - confidence);
    Ok(((initial_value - threshold) / initial_value).max(0.0))
}

/// Conditional VaR: mean of the outcomes at or below the VaR threshold,
/// expressed as a loss fraction of the initial value and floored at zero.
///
/// Always at least as large as [`value_at_risk`] in loss magnitude.
pub fn conditional_var(
    ending_values: &[f64],
    initial_value: f64,
    confidence: f64,
) -> Result<f64, EngineError> {
    check_tail_inputs(ending_values, initial_value, confidence)?;
    let mut sorted = ending_values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let threshold = quantile_sorted(&sorted, 1.0 - confidence);

    let mut tail_sum = 0.0;
    let mut tail_count = 0usize;
    for &value in &sorted {
        if value <= threshold {
            tail_sum += value;
            tail_count += 1;
        } else {
            break;
        }
    }
    let tail_mean = if tail_count == 0 {
        threshold
    } else {
        tail_sum / tail_count as f64
    };
    Ok(((initial_value - tail_mean) / initial_value).max(0.0))
}

/// Fraction of ending values strictly below the initial value.
pub fn probability_of_loss(ending_values: &[f64], initial_value: f64) -> Result<f64, DataError> {
    if ending_values.is_empty() {
        return Err(DataError::EmptySeries("ending values"));
    }
    let losses = ending_values.iter().filter(|&&v| v < initial_value).count();
    Ok(losses as f64 / ending_values.len() as f64)
}

/// Assemble the full risk summary for a simulation result.
///
/// Volatility and Sharpe ratio are measured over the cross-path
/// distribution of annualized ending returns; max drawdown is measured on
/// the median path; tail metrics come from the ending-value distribution.
pub fn compute_risk_summary(
    result: &SimulationResult,
    risk_free_rate: f64,
    confidence: f64,
) -> Result<RiskSummary, EngineError> {
    let ending = result.ending_values();
    if ending.is_empty() {
        return Err(DataError::EmptySeries("simulation paths").into());
    }
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(ParameterError::InvalidConfidence(confidence).into());
    }
    if result.periods_per_year == 0 {
        return Err(ParameterError::InvalidPeriodsPerYear(0).into());
    }
    if result.horizon_periods == 0 {
        return Err(ParameterError::InvalidHorizon(0).into());
    }

    let years = result.horizon_periods as f64 / result.periods_per_year as f64;
    let annualized: Vec<f64> = ending
        .iter()
        .map(|&v| (v / result.initial_value).powf(1.0 / years) - 1.0)
        .collect();

    let expected_return = mean(&annualized);
    let vol = sample_std_dev(&annualized);
    let sharpe = if vol == 0.0 {
        None
    } else {
        Some((expected_return - risk_free_rate) / vol)
    };

    Ok(RiskSummary {
        volatility: vol,
        sharpe_ratio: sharpe,
        max_drawdown: max_drawdown(result.median_path())?,
        var: value_at_risk(&ending, result.initial_value, confidence)?,
        cvar: conditional_var(&ending, result.initial_value, confidence)?,
        confidence,
        probability_of_loss: probability_of_loss(&ending, result.initial_value)?,
        expected_return,
    })
}

/// Metrics for a raw periodic return series: annualized volatility and
/// Sharpe, max drawdown of the cumulative-growth path, and total return.
pub fn compute_return_metrics(
    returns: &[f64],
    risk_free_rate: f64,
    periods_per_year: usize,
) -> Result<ReturnMetrics, EngineError> {
    if returns.is_empty() {
        return Err(DataError::EmptySeries("return series").into());
    }

    let mut growth = 1.0;
    let mut cumulative_growth = Vec::with_capacity(returns.len());
    for r in returns {
        growth *= 1.0 + r;
        cumulative_growth.push(growth);
    }

    Ok(ReturnMetrics {
        volatility: volatility(returns, periods_per_year)?,
        sharpe_ratio: sharpe_ratio(returns, risk_free_rate, periods_per_year)?,
        max_drawdown: max_drawdown(&cumulative_growth)?,
        total_return: growth - 1.0,
        cumulative_returns: cumulative_growth.iter().map(|g| g - 1.0).collect(),
    })
}
