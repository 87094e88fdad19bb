use std::fmt;

/// Errors raised when a caller supplies invalid inputs
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterError {
    InvalidHorizon(usize),
    InvalidPathCount(usize),
    InvalidPeriodsPerYear(usize),
    NonPositivePortfolioValue(f64),
    InvalidConfidence(f64),
    InvalidQuantile(f64),
    InvalidWithdrawalRate(f64),
    NonPositiveTarget(f64),
    NegativeContribution(f64),
    RetirementBeforeCurrentAge {
        current_age: u32,
        retirement_age: u32,
    },
    LifeExpectancyBeforeRetirement {
        retirement_age: u32,
        life_expectancy: u32,
    },
    DuplicateSymbol(String),
    InvalidHolding {
        symbol: String,
        reason: &'static str,
    },
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterError::InvalidHorizon(h) => {
                write!(f, "horizon must be at least 1 period, got {h}")
            }
            ParameterError::InvalidPathCount(n) => {
                write!(f, "at least 1 simulation path is required, got {n}")
            }
            ParameterError::InvalidPeriodsPerYear(p) => {
                write!(f, "periods per year must be at least 1, got {p}")
            }
            ParameterError::NonPositivePortfolioValue(v) => {
                write!(f, "portfolio value must be positive and finite, got {v}")
            }
            ParameterError::InvalidConfidence(c) => {
                write!(f, "confidence level must be in (0, 1), got {c}")
            }
            ParameterError::InvalidQuantile(q) => {
                write!(f, "quantile must be in [0, 1], got {q}")
            }
            ParameterError::InvalidWithdrawalRate(w) => {
                write!(f, "withdrawal rate must be in (0, 1), got {w}")
            }
            ParameterError::NonPositiveTarget(t) => {
                write!(f, "target amount must be positive and finite, got {t}")
            }
            ParameterError::NegativeContribution(c) => {
                write!(f, "contribution must be non-negative and finite, got {c}")
            }
            ParameterError::RetirementBeforeCurrentAge {
                current_age,
                retirement_age,
            } => {
                write!(
                    f,
                    "retirement age {retirement_age} must be greater than current age {current_age}"
                )
            }
            ParameterError::LifeExpectancyBeforeRetirement {
                retirement_age,
                life_expectancy,
            } => {
                write!(
                    f,
                    "life expectancy {life_expectancy} must be at least retirement age {retirement_age}"
                )
            }
            ParameterError::DuplicateSymbol(s) => {
                write!(f, "portfolio already contains symbol {s}")
            }
            ParameterError::InvalidHolding { symbol, reason } => {
                write!(f, "invalid holding {symbol}: {reason}")
            }
        }
    }
}

impl std::error::Error for ParameterError {}

/// Errors raised when a metric or sampler needs more data than was supplied
#[derive(Debug, Clone, PartialEq)]
pub enum DataError {
    EmptySeries(&'static str),
    TooFewObservations { required: usize, actual: usize },
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::EmptySeries(what) => write!(f, "{what} is empty"),
            DataError::TooFewObservations { required, actual } => {
                write!(f, "need at least {required} observations, got {actual}")
            }
        }
    }
}

impl std::error::Error for DataError {}

/// Errors raised when a computation cannot be carried out numerically
#[derive(Debug, Clone, PartialEq)]
pub enum NumericError {
    InvalidDistributionParameters {
        what: &'static str,
        mean: f64,
        std_dev: f64,
        reason: &'static str,
    },
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::InvalidDistributionParameters {
                what,
                mean,
                std_dev,
                reason,
            } => {
                write!(
                    f,
                    "invalid {what} parameters (mean={mean}, std_dev={std_dev}): {reason}"
                )
            }
        }
    }
}

impl std::error::Error for NumericError {}

/// Top-level engine error
///
/// Errors are raised at the point of detection and propagated unmodified;
/// the web layer decides user-facing degradation. Expected-but-uncommon
/// outcomes (parameter fallback, an unreachable FIRE target) are result
/// variants, never errors.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    Parameter(ParameterError),
    Data(DataError),
    Numeric(NumericError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Parameter(e) => write!(f, "{e}"),
            EngineError::Data(e) => write!(f, "{e}"),
            EngineError::Numeric(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Parameter(e) => Some(e),
            EngineError::Data(e) => Some(e),
            EngineError::Numeric(e) => Some(e),
        }
    }
}

impl From<ParameterError> for EngineError {
    fn from(e: ParameterError) -> Self {
        EngineError::Parameter(e)
    }
}

impl From<DataError> for EngineError {
    fn from(e: DataError) -> Self {
        EngineError::Data(e)
    }
}

impl From<NumericError> for EngineError {
    fn from(e: NumericError) -> Self {
        EngineError::Numeric(e)
    }
}
