pub mod analysis;
pub mod data;
pub mod metrics;
pub mod rolling;
pub mod simulate;

// Re-export commonly used types
pub use analysis::{run_analysis, AnalysisConfig, AnalysisReport, StrategyOutcome};
pub use data::{BarLoader, DataError, PriceBar, PriceSeries};
pub use metrics::{calculate_returns, elapsed_years, ReturnMetrics};
pub use rolling::{
    RollingAnalyzer, RollingConfig, RollingRow, RollingSummary, RollingWindow, RollingWindows,
    RollingWindowsConfig,
};
pub use simulate::{simulate, BuyEvent, ContributionSchedule, SimulationResult, StrategyKind};
