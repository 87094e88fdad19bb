//! Integration tests for the projection engine
//!
//! Tests are organized by topic:
//! - `market` - Parameter derivation, fallback reporting, series statistics
//! - `simulation` - Path generation across methods, reproducibility
//! - `risk` - Metric definitions and tail statistics
//! - `scenarios` - Stress scenario sets and evaluation
//! - `fire` - Feasibility search and savings calculators

mod simulation;

use crate::model::{Holding, Portfolio};

/// Single-holding portfolio worth exactly `value`
pub(crate) fn portfolio_worth(value: f64) -> Portfolio {
    Portfolio::new(vec![Holding {
        symbol: "BENCH".to_string(),
        quantity: 1,
        average_cost: value,
        last_price: value,
        sector: None,
    }])
    .unwrap()
}
