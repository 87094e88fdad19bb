//! Market parameter derivation and historical return series
//!
//! [`MarketParameters`] is constructed fresh per analysis request, either
//! derived from a historical return series or taken from the static fallback
//! set. It is never mutated after construction.

use std::borrow::Cow;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Static defaults used when history is too thin to estimate from.
///
/// Conservative estimates: return understated, volatility overstated.
pub mod defaults {
    /// Minimum observations before a historical estimate is trusted
    pub const MIN_OBSERVATIONS: usize = 30;

    pub const EXPECTED_RETURN: f64 = 0.10;
    pub const VOLATILITY: f64 = 0.25;
    pub const RISK_FREE_RATE: f64 = 0.0625;

    /// Weight on the historical volatility estimate when blending with a
    /// volatility-index reading
    pub const HISTORICAL_VOL_WEIGHT: f64 = 0.4;
    /// Weight on the (forward-looking) volatility-index reading
    pub const INDEX_VOL_WEIGHT: f64 = 0.6;
}

/// Ordered periodic return series for parameter derivation and
/// bootstrap sampling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnSeries {
    /// Benchmark/index name for display purposes
    pub name: Cow<'static, str>,
    /// Periodic returns in chronological order
    returns: Cow<'static, [f64]>,
}

impl ReturnSeries {
    #[must_use]
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        returns: impl Into<Cow<'static, [f64]>>,
    ) -> Self {
        Self {
            name: name.into(),
            returns: returns.into(),
        }
    }

    /// Build a return series from a chronological price series.
    ///
    /// Produces one fewer observation than prices; zero or negative prices
    /// are skipped as the base of a return.
    #[must_use]
    pub fn from_prices(name: impl Into<Cow<'static, str>>, prices: &[f64]) -> Self {
        let returns: Vec<f64> = prices
            .windows(2)
            .filter(|w| w[0] > 0.0)
            .map(|w| w[1] / w[0] - 1.0)
            .collect();
        Self::new(name, returns)
    }

    #[must_use]
    pub fn returns(&self) -> &[f64] {
        &self.returns
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.returns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.returns.is_empty()
    }

    /// Sample a single return i.i.d. with replacement.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<f64> {
        if self.returns.is_empty() {
            return None;
        }
        let idx = rng.random_range(0..self.returns.len());
        Some(self.returns[idx])
    }

    /// Sample n periods with replacement (i.i.d. bootstrap).
    pub fn sample_periods<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Option<Vec<f64>> {
        if self.returns.is_empty() {
            return None;
        }
        Some(
            (0..n)
                .map(|_| self.returns[rng.random_range(0..self.returns.len())])
                .collect(),
        )
    }

    /// Compute descriptive statistics of the series.
    #[must_use]
    pub fn statistics(&self) -> Option<SeriesStatistics> {
        if self.returns.is_empty() {
            return None;
        }
        let n = self.returns.len() as f64;
        let arithmetic_mean = self.returns.iter().sum::<f64>() / n;

        // Geometric mean: (product of (1+r))^(1/n) - 1
        let product: f64 = self.returns.iter().map(|r| 1.0 + r).product();
        let geometric_mean = product.powf(1.0 / n) - 1.0;

        let std_dev = if self.returns.len() < 2 {
            0.0
        } else {
            let variance = self
                .returns
                .iter()
                .map(|r| (r - arithmetic_mean).powi(2))
                .sum::<f64>()
                / (n - 1.0);
            variance.sqrt()
        };

        let min = self.returns.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self
            .returns
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);

        Some(SeriesStatistics {
            arithmetic_mean,
            geometric_mean,
            std_dev,
            min,
            max,
            observations: self.returns.len(),
        })
    }
}

/// Descriptive statistics of a return series
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SeriesStatistics {
    pub arithmetic_mean: f64,
    pub geometric_mean: f64,
    /// Sample standard deviation (n - 1 denominator)
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub observations: usize,
}

/// Where a parameter set came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ParameterSource {
    /// Supplied directly by the caller
    Supplied,
    /// Estimated from a historical return series
    Historical {
        observations: usize,
        vol_index_blended: bool,
    },
    /// Static default set; history was absent or too thin
    Fallback,
}

/// Annualized market parameter estimates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketParameters {
    /// Expected annual return (can be negative)
    pub expected_return: f64,
    /// Annual volatility, >= 0
    pub volatility: f64,
    /// Annual risk-free rate, >= 0
    pub risk_free_rate: f64,
    /// Volatility-index reading the estimate was blended with, if any
    pub vol_index: Option<f64>,
    pub source: ParameterSource,
}

impl MarketParameters {
    /// Caller-supplied parameters, no derivation.
    #[must_use]
    pub fn new(expected_return: f64, volatility: f64, risk_free_rate: f64) -> Self {
        Self {
            expected_return,
            volatility,
            risk_free_rate,
            vol_index: None,
            source: ParameterSource::Supplied,
        }
    }

    /// The static fallback parameter set.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            expected_return: defaults::EXPECTED_RETURN,
            volatility: defaults::VOLATILITY,
            risk_free_rate: defaults::RISK_FREE_RATE,
            vol_index: None,
            source: ParameterSource::Fallback,
        }
    }

    /// Derive annualized parameters from a historical return series.
    ///
    /// With fewer than [`defaults::MIN_OBSERVATIONS`] points the static
    /// fallback set is returned and reported via
    /// [`ParameterSource::Fallback`]; derivation never fails.
    ///
    /// When a volatility-index reading is present the volatility estimate
    /// is blended as `0.4 * historical + 0.6 * (index / 100)`. This is the
    /// single blending rule; callers must not recompute their own.
    #[must_use]
    pub fn derive(
        series: &ReturnSeries,
        periods_per_year: usize,
        risk_free_rate: Option<f64>,
        vol_index: Option<f64>,
    ) -> Self {
        let risk_free = risk_free_rate.unwrap_or(defaults::RISK_FREE_RATE);

        let stats = match series.statistics() {
            Some(stats) if stats.observations >= defaults::MIN_OBSERVATIONS => stats,
            _ => {
                warn!(
                    series = %series.name,
                    observations = series.len(),
                    required = defaults::MIN_OBSERVATIONS,
                    "insufficient history, using fallback market parameters"
                );
                return Self {
                    risk_free_rate: risk_free,
                    vol_index,
                    ..Self::fallback()
                };
            }
        };

        let periods = periods_per_year.max(1) as f64;
        let expected_return = stats.arithmetic_mean * periods;
        let historical_vol = stats.std_dev * periods.sqrt();

        let (volatility, blended) = match vol_index {
            Some(index) => (
                defaults::HISTORICAL_VOL_WEIGHT * historical_vol
                    + defaults::INDEX_VOL_WEIGHT * (index / 100.0),
                true,
            ),
            None => (historical_vol, false),
        };

        Self {
            expected_return,
            volatility,
            risk_free_rate: risk_free,
            vol_index,
            source: ParameterSource::Historical {
                observations: stats.observations,
                vol_index_blended: blended,
            },
        }
    }

    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.source == ParameterSource::Fallback
    }
}
