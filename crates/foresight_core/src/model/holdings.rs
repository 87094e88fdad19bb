//! Portfolio snapshot types
//!
//! A [`Portfolio`] is an immutable snapshot supplied by the holdings-fetching
//! layer. The engine only reads it; it never fetches or mutates holdings.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::ParameterError;

/// A single position in the portfolio
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Holding {
    pub symbol: String,
    pub quantity: u32,
    /// Average cost basis per unit
    pub average_cost: f64,
    /// Most recent traded price per unit
    pub last_price: f64,
    #[serde(default)]
    pub sector: Option<String>,
}

impl Holding {
    #[must_use]
    pub fn market_value(&self) -> f64 {
        f64::from(self.quantity) * self.last_price
    }

    #[must_use]
    pub fn invested(&self) -> f64 {
        f64::from(self.quantity) * self.average_cost
    }

    #[must_use]
    pub fn unrealized_pnl(&self) -> f64 {
        self.market_value() - self.invested()
    }

    /// Fractional return on cost basis, `None` when nothing was invested
    #[must_use]
    pub fn return_fraction(&self) -> Option<f64> {
        let invested = self.invested();
        if invested > 0.0 {
            Some(self.unrealized_pnl() / invested)
        } else {
            None
        }
    }

    fn validate(&self) -> Result<(), ParameterError> {
        if !self.last_price.is_finite() || self.last_price < 0.0 {
            return Err(ParameterError::InvalidHolding {
                symbol: self.symbol.clone(),
                reason: "last price must be non-negative and finite",
            });
        }
        if !self.average_cost.is_finite() || self.average_cost < 0.0 {
            return Err(ParameterError::InvalidHolding {
                symbol: self.symbol.clone(),
                reason: "average cost must be non-negative and finite",
            });
        }
        Ok(())
    }
}

/// Ordered set of holdings with unique symbols
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portfolio {
    holdings: Vec<Holding>,
}

impl Portfolio {
    /// Build a portfolio snapshot, rejecting duplicate symbols and
    /// non-finite or negative prices.
    pub fn new(holdings: Vec<Holding>) -> Result<Self, ParameterError> {
        let mut seen = FxHashSet::default();
        for holding in &holdings {
            holding.validate()?;
            if !seen.insert(holding.symbol.as_str()) {
                return Err(ParameterError::DuplicateSymbol(holding.symbol.clone()));
            }
        }
        Ok(Self { holdings })
    }

    #[must_use]
    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    /// Sum of holding market values
    #[must_use]
    pub fn total_value(&self) -> f64 {
        self.holdings.iter().map(Holding::market_value).sum()
    }

    #[must_use]
    pub fn total_invested(&self) -> f64 {
        self.holdings.iter().map(Holding::invested).sum()
    }

    #[must_use]
    pub fn total_pnl(&self) -> f64 {
        self.total_value() - self.total_invested()
    }

    /// Per-holding share of total market value, in holding order.
    ///
    /// Empty when the portfolio has no market value.
    #[must_use]
    pub fn allocations(&self) -> Vec<(&str, f64)> {
        let total = self.total_value();
        if total <= 0.0 {
            return Vec::new();
        }
        self.holdings
            .iter()
            .map(|h| (h.symbol.as_str(), h.market_value() / total))
            .collect()
    }
}
