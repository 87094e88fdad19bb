mod holdings;
mod market;
mod results;

pub use holdings::{Holding, Portfolio};
pub use market::{MarketParameters, ParameterSource, ReturnSeries, SeriesStatistics, defaults};
pub use results::{
    FireNumber, FireOutcome, FirePlan, MethodKind, REPORT_PERCENTILES, ReturnMetrics, RiskSummary,
    SavingsRequirement, ScenarioResult, SimulationResult,
};
