//! Total and annualized return arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::data::PriceSeries;

/// Total and annualized percentage returns for one outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnMetrics {
    pub total_return_pct: f64,
    pub annualized_return_pct: f64,
}

impl ReturnMetrics {
    pub fn new(final_value: Decimal, total_invested: Decimal, years: f64) -> Self {
        let (total_return_pct, annualized_return_pct) =
            calculate_returns(final_value, total_invested, years);
        Self {
            total_return_pct,
            annualized_return_pct,
        }
    }
}

/// Calculate total and annualized (CAGR) percentage returns.
///
/// Zero invested cash or a zero-length period is a degenerate case, not an
/// error: both rates report as zero. A non-positive final value reports a
/// full annualized loss, since compound growth is undefined there; any
/// positive final value goes through the CAGR formula. No input panics.
pub fn calculate_returns(final_value: Decimal, total_invested: Decimal, years: f64) -> (f64, f64) {
    let invested: f64 = total_invested.try_into().unwrap_or(0.0);
    let fin: f64 = final_value.try_into().unwrap_or(0.0);

    if invested <= 0.0 || years <= 0.0 {
        return (0.0, 0.0);
    }

    let total_return = (fin - invested) / invested * 100.0;

    let annualized = if fin <= 0.0 {
        -100.0
    } else {
        ((fin / invested).powf(1.0 / years) - 1.0) * 100.0
    };

    (total_return, annualized)
}

/// Elapsed calendar years covered by a series, clamped to a minimum of one
/// full year so short histories do not inflate annualized rates.
pub fn elapsed_years(series: &PriceSeries) -> f64 {
    series.span_years().max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PriceBar;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn test_degenerate_period_is_zero() {
        assert_eq!(calculate_returns(dec!(0), dec!(0), 5.0), (0.0, 0.0));
        assert_eq!(calculate_returns(dec!(5000), dec!(1000), 0.0), (0.0, 0.0));
    }

    #[test]
    fn test_doubling_in_one_year() {
        let (total, annualized) = calculate_returns(dec!(2000), dec!(1000), 1.0);
        assert!((total - 100.0).abs() < 1e-9);
        assert!((annualized - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_positive_final_value_uses_cagr() {
        // 1000 -> 100 over 5 years: -90% total, CAGR (0.1^(1/5) - 1)
        let (total, annualized) = calculate_returns(dec!(100), dec!(1000), 5.0);
        assert!((total + 90.0).abs() < 1e-9);
        let expected = (0.1f64.powf(0.2) - 1.0) * 100.0;
        assert!((annualized - expected).abs() < 1e-9);
        assert!(annualized > -100.0);
    }

    #[test]
    fn test_total_loss_clamps_annualized() {
        let (total, annualized) = calculate_returns(dec!(0), dec!(1000), 5.0);
        assert!((total + 100.0).abs() < 1e-9);
        assert_eq!(annualized, -100.0);
    }

    #[test]
    fn test_cagr_ten_percent() {
        // 100K -> 121K over 2 years = 10% CAGR
        let (_, annualized) = calculate_returns(dec!(121_000), dec!(100_000), 2.0);
        assert!((annualized - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_elapsed_years_clamps_short_histories() {
        let bar = |y: i32, m: u32, d: u32| PriceBar {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            open: dec!(100),
            high: dec!(100),
            low: dec!(100),
            close: dec!(100),
            volume: 0,
        };

        let short = PriceSeries::new("SPY", vec![bar(2020, 1, 2), bar(2020, 3, 2)]);
        assert_eq!(elapsed_years(&short), 1.0);

        let long = PriceSeries::new("SPY", vec![bar(2010, 1, 2), bar(2020, 1, 2)]);
        assert!((elapsed_years(&long) - 10.0).abs() < 0.01);
    }
}
