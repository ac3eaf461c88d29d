//! Rolling-window sweep with parallel execution.
//!
//! Takes an already-loaded series, slices one owned window per start date,
//! and replays every configured strategy inside each window. Simulations are
//! pure functions over their own slice, so windows run in parallel without
//! synchronization.

use chrono::NaiveDate;
use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::data::PriceSeries;
use crate::metrics::calculate_returns;
use crate::simulate::{simulate, StrategyKind};

use super::windows::{RollingWindow, RollingWindows, RollingWindowsConfig};

/// Configuration for a rolling sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollingConfig {
    pub windows: RollingWindowsConfig,
    /// Cash contributed per year inside each window.
    pub annual_investment: Decimal,
    /// Strategies replayed in every window.
    pub strategies: Vec<StrategyKind>,
}

impl Default for RollingConfig {
    fn default() -> Self {
        Self {
            windows: RollingWindowsConfig::default(),
            annual_investment: Decimal::from(2000),
            strategies: StrategyKind::ALL.to_vec(),
        }
    }
}

/// One result row per (start date, strategy) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollingRow {
    pub strategy: StrategyKind,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub final_value: Decimal,
    pub total_invested: Decimal,
    pub total_return_pct: f64,
    pub annualized_return_pct: f64,
}

/// Per-strategy distribution of annualized returns across start dates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollingSummary {
    pub strategy: StrategyKind,
    pub windows: usize,
    pub mean_annualized_pct: f64,
    pub stddev_annualized_pct: f64,
    pub min_annualized_pct: f64,
    pub max_annualized_pct: f64,
}

/// Rolling-window analyzer.
pub struct RollingAnalyzer {
    config: RollingConfig,
}

impl RollingAnalyzer {
    pub fn new(config: RollingConfig) -> Self {
        Self { config }
    }

    /// Sweep every window across the series.
    ///
    /// Each window simulates against its own owned slice. Rows come back
    /// grouped by window in chronological order, strategies in the
    /// configured order within each window. An empty series yields no rows.
    pub fn run(&self, series: &PriceSeries) -> Vec<RollingRow> {
        let (Some(first), Some(last)) = (series.first_date(), series.last_date()) else {
            return Vec::new();
        };

        let windows = RollingWindows::new(self.config.windows.clone(), first, last).generate();
        info!(
            "Generated {} rolling windows for {}",
            windows.len(),
            series.symbol
        );

        let years = f64::from(self.config.windows.window_years);

        let per_window: Vec<Vec<RollingRow>> = windows
            .par_iter()
            .map(|window| self.run_window(series, window, years))
            .collect();

        let rows: Vec<RollingRow> = per_window.into_iter().flatten().collect();
        info!("Rolling sweep complete: {} result rows", rows.len());
        rows
    }

    /// Replay every configured strategy inside one window.
    fn run_window(
        &self,
        series: &PriceSeries,
        window: &RollingWindow,
        years: f64,
    ) -> Vec<RollingRow> {
        let windowed = series.slice(window.start, window.end);

        self.config
            .strategies
            .iter()
            .map(|&strategy| {
                let result = simulate(&windowed, strategy, self.config.annual_investment);
                let (total_return_pct, annualized_return_pct) =
                    calculate_returns(result.final_value, result.total_invested, years);

                RollingRow {
                    strategy,
                    start_date: window.start,
                    end_date: window.end,
                    final_value: result.final_value,
                    total_invested: result.total_invested,
                    total_return_pct,
                    annualized_return_pct,
                }
            })
            .collect()
    }

    /// Summarize annualized returns per strategy across all start dates.
    pub fn summarize(&self, rows: &[RollingRow]) -> Vec<RollingSummary> {
        self.config
            .strategies
            .iter()
            .filter_map(|&strategy| {
                let values: Vec<f64> = rows
                    .iter()
                    .filter(|r| r.strategy == strategy)
                    .map(|r| r.annualized_return_pct)
                    .collect();

                if values.is_empty() {
                    return None;
                }

                let n = values.len() as f64;
                let mean = values.iter().sum::<f64>() / n;
                let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
                let min = values.iter().copied().fold(f64::INFINITY, f64::min);
                let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

                Some(RollingSummary {
                    strategy,
                    windows: values.len(),
                    mean_annualized_pct: mean,
                    stddev_annualized_pct: variance.sqrt(),
                    min_annualized_pct: min,
                    max_annualized_pct: max,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PriceBar;
    use rust_decimal_macros::dec;

    /// One bar on the first trading day of every month across four years.
    fn monthly_series() -> PriceSeries {
        let mut bars = Vec::new();
        let mut price = dec!(100);
        for year in 2018..=2021 {
            for month in 1..=12 {
                bars.push(PriceBar {
                    date: NaiveDate::from_ymd_opt(year, month, 2).unwrap(),
                    open: price,
                    high: price + dec!(5),
                    low: price - dec!(5),
                    close: price + dec!(2),
                    volume: 1_000,
                });
                price += dec!(1);
            }
        }
        PriceSeries::new("SPY", bars)
    }

    fn yearly_config() -> RollingConfig {
        RollingConfig {
            windows: RollingWindowsConfig {
                window_years: 1,
                roll_months: 12,
            },
            annual_investment: dec!(2000),
            strategies: StrategyKind::ALL.to_vec(),
        }
    }

    #[test]
    fn test_run_produces_one_row_per_window_and_strategy() {
        let analyzer = RollingAnalyzer::new(yearly_config());
        let rows = analyzer.run(&monthly_series());

        // 2018-01-02 .. 2021-12-02: three full 1-year windows stepping yearly
        assert_eq!(rows.len(), 3 * StrategyKind::ALL.len());
        assert_eq!(
            rows[0].start_date,
            NaiveDate::from_ymd_opt(2018, 1, 2).unwrap()
        );
        assert_eq!(rows[0].strategy, StrategyKind::PerfectTiming);
    }

    #[test]
    fn test_rows_carry_consistent_invested_amounts() {
        let analyzer = RollingAnalyzer::new(yearly_config());
        let rows = analyzer.run(&monthly_series());

        for row in &rows {
            match row.strategy {
                // One yearly bucket per 1-year window
                StrategyKind::DollarCostAveraging => {
                    assert_eq!(row.total_invested, dec!(2000) / dec!(12) * dec!(12));
                }
                _ => assert_eq!(row.total_invested, dec!(2000)),
            }
        }
    }

    #[test]
    fn test_empty_series_yields_no_rows() {
        let analyzer = RollingAnalyzer::new(yearly_config());
        let rows = analyzer.run(&PriceSeries::new("SPY", vec![]));
        assert!(rows.is_empty());
    }

    #[test]
    fn test_summarize_per_strategy() {
        let analyzer = RollingAnalyzer::new(yearly_config());
        let rows = analyzer.run(&monthly_series());
        let summaries = analyzer.summarize(&rows);

        assert_eq!(summaries.len(), StrategyKind::ALL.len());
        for summary in &summaries {
            assert_eq!(summary.windows, 3);
            assert!(summary.min_annualized_pct <= summary.mean_annualized_pct);
            assert!(summary.mean_annualized_pct <= summary.max_annualized_pct);
            assert!(summary.stddev_annualized_pct >= 0.0);
        }
    }

    #[test]
    fn test_summarize_empty_rows() {
        let analyzer = RollingAnalyzer::new(yearly_config());
        assert!(analyzer.summarize(&[]).is_empty());
    }
}
