//! Request/response analysis over one price history.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::data::PriceSeries;
use crate::metrics::{calculate_returns, elapsed_years};
use crate::rolling::windows::add_months;
use crate::simulate::{simulate, BuyEvent, StrategyKind};

/// Configuration for one analysis request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Stock symbol to analyze.
    pub symbol: String,

    /// Start of the investment period.
    pub start_date: NaiveDate,

    /// Investment period length in years.
    pub years: u32,

    /// Additional months on top of `years`.
    pub months: u32,

    /// Cash contributed per year.
    pub annual_investment: Decimal,

    /// Strategies to replay.
    pub strategies: Vec<StrategyKind>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            symbol: "SPY".to_string(),
            // First trading day with SPY data
            start_date: NaiveDate::from_ymd_opt(1993, 1, 29).unwrap_or_default(),
            years: 20,
            months: 0,
            annual_investment: Decimal::from(2000),
            strategies: StrategyKind::ALL.to_vec(),
        }
    }
}

impl AnalysisConfig {
    /// Requested end of the investment period, calendar-aware.
    pub fn end_date(&self) -> NaiveDate {
        add_months(self.start_date, (self.years * 12 + self.months) as i32)
    }
}

/// Result row for one strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyOutcome {
    pub strategy: StrategyKind,
    pub final_value: Decimal,
    pub total_invested: Decimal,
    pub total_return_pct: f64,
    pub annualized_return_pct: f64,
    pub buy_events: Vec<BuyEvent>,
}

impl StrategyOutcome {
    /// Generate a summary block.
    pub fn summary(&self) -> String {
        format!(
            "{} Strategy:\n\
             Final portfolio value: ${:.2}\n\
             Total invested: ${:.2}\n\
             Total return: {:.2}%\n\
             Average annual return rate: {:.2}%",
            self.strategy.label(),
            self.final_value,
            self.total_invested,
            self.total_return_pct,
            self.annualized_return_pct
        )
    }
}

/// Results payload for one analysis request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub symbol: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub outcomes: Vec<StrategyOutcome>,
}

impl AnalysisReport {
    /// False when no strategy found a single usable buy, so callers can
    /// warn about the date range instead of rendering empty results.
    pub fn has_buys(&self) -> bool {
        self.outcomes.iter().any(|o| !o.buy_events.is_empty())
    }

    /// Generate a full report string.
    pub fn summary(&self) -> String {
        let mut out = format!(
            "Analyzing {} from {} to {}\n",
            self.symbol, self.start_date, self.end_date
        );
        for outcome in &self.outcomes {
            out.push('\n');
            out.push_str(&outcome.summary());
            out.push('\n');
        }
        out
    }
}

/// Run every requested strategy over the series and collect one outcome per
/// strategy.
///
/// The elapsed years fed to the return calculator come from the actual data
/// span, clamped to at least one year. An empty series produces zero-valued
/// outcomes, not an error; user-visible messaging is the caller's job.
pub fn run_analysis(series: &PriceSeries, config: &AnalysisConfig) -> AnalysisReport {
    let years = elapsed_years(series);

    let outcomes = config
        .strategies
        .iter()
        .map(|&strategy| {
            let result = simulate(series, strategy, config.annual_investment);
            let (total_return_pct, annualized_return_pct) =
                calculate_returns(result.final_value, result.total_invested, years);

            StrategyOutcome {
                strategy,
                final_value: result.final_value,
                total_invested: result.total_invested,
                total_return_pct,
                annualized_return_pct,
                buy_events: result.buy_events,
            }
        })
        .collect();

    AnalysisReport {
        symbol: config.symbol.clone(),
        start_date: config.start_date,
        end_date: config.end_date(),
        outcomes,
    }
}
