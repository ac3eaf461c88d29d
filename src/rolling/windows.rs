//! Rolling window generation.
//!
//! Produces fixed-length analysis windows whose start advances by a
//! configurable number of calendar months across the available history.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A single rolling analysis window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollingWindow {
    /// Window number (1-indexed).
    pub window_num: usize,
    /// Window start date.
    pub start: NaiveDate,
    /// Window end date (exclusive).
    pub end: NaiveDate,
}

impl RollingWindow {
    /// Window length in days.
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// Configuration for rolling windows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollingWindowsConfig {
    /// Window length in years.
    pub window_years: u32,
    /// Advance the start date by this many months between windows.
    pub roll_months: u32,
}

impl Default for RollingWindowsConfig {
    fn default() -> Self {
        Self {
            window_years: 20,
            roll_months: 1,
        }
    }
}

/// Generator for rolling windows over an available date range.
pub struct RollingWindows {
    config: RollingWindowsConfig,
    start_date: NaiveDate,
    last_date: NaiveDate,
}

impl RollingWindows {
    /// Create a new window generator.
    pub fn new(config: RollingWindowsConfig, start_date: NaiveDate, last_date: NaiveDate) -> Self {
        Self {
            config,
            start_date,
            last_date,
        }
    }

    /// Generate every window that fits before the last available date.
    pub fn generate(&self) -> Vec<RollingWindow> {
        let mut windows = Vec::new();
        let mut window_num = 1;
        let mut start = self.start_date;

        loop {
            let end = add_months(start, self.config.window_years as i32 * 12);
            if end > self.last_date {
                break;
            }

            windows.push(RollingWindow {
                window_num,
                start,
                end,
            });

            window_num += 1;
            start = add_months(start, self.config.roll_months.max(1) as i32);

            // Prevent infinite loops
            if window_num > 10_000 {
                break;
            }
        }

        windows
    }

    /// Get expected number of windows.
    pub fn expected_windows(&self) -> usize {
        let total_months = months_between(self.start_date, self.last_date);
        let window_months = self.config.window_years * 12;

        if total_months < window_months {
            return 0;
        }

        let available_months = total_months - window_months;
        (available_months / self.config.roll_months.max(1) + 1) as usize
    }
}

/// Add months to a date.
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let mut year = date.year();
    let mut month = date.month() as i32 + months;

    while month > 12 {
        year += 1;
        month -= 12;
    }
    while month < 1 {
        year -= 1;
        month += 12;
    }

    // Handle day overflow (e.g., Jan 31 + 1 month)
    let day = date.day().min(days_in_month(year, month as u32));
    NaiveDate::from_ymd_opt(year, month as u32, day).unwrap_or(date)
}

/// Get the number of days in a month.
fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}

/// Check if a year is a leap year.
fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// Calculate months between two dates.
fn months_between(start: NaiveDate, end: NaiveDate) -> u32 {
    let years = end.year() - start.year();
    let months_diff = end.month() as i32 - start.month() as i32;
    (years * 12 + months_diff).max(0) as u32
}
