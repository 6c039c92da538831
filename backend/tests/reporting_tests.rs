//! Reporting and alert tests
//!
//! Covers the difference-percentage arithmetic, the abuse signal threshold,
//! month bounds, and the zero-filled consumption series.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashMap;

use kitchen_stock_backend::services::reporting::{
    difference_percentage, fill_daily_series, month_bounds, month_key,
    ABUSE_SIGNAL_THRESHOLD_PERCENT,
};
use shared::types::DateRange;

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// prepared=100, potential=0 -> 0%, no signal
    #[test]
    fn test_everything_served_no_signal() {
        let pct = difference_percentage(100, 0);
        assert_eq!(pct, 0.0);
        assert!(pct <= ABUSE_SIGNAL_THRESHOLD_PERCENT);
    }

    /// prepared=0, potential=100 -> 100%, signal fires
    #[test]
    fn test_nothing_served_full_signal() {
        let pct = difference_percentage(0, 100);
        assert_eq!(pct, 100.0);
        assert!(pct > ABUSE_SIGNAL_THRESHOLD_PERCENT);
    }

    /// Empty kitchen: denominator of 0 yields 0, not NaN
    #[test]
    fn test_zero_denominator() {
        assert_eq!(difference_percentage(0, 0), 0.0);
    }

    #[test]
    fn test_rounding_to_two_decimals() {
        // 1/6 of capacity unused: 16.666... -> 16.67, above the 15% signal
        let pct = difference_percentage(500, 100);
        assert_eq!(pct, 16.67);
        assert!(pct > ABUSE_SIGNAL_THRESHOLD_PERCENT);

        // 1/7 unused: 14.29, below the signal
        let pct = difference_percentage(600, 100);
        assert_eq!(pct, 14.29);
        assert!(pct <= ABUSE_SIGNAL_THRESHOLD_PERCENT);
    }

    #[test]
    fn test_month_key_format() {
        assert_eq!(month_key(2024, 3), "2024-03");
        assert_eq!(month_key(2024, 12), "2024-12");
    }

    #[test]
    fn test_month_bounds_are_half_open() {
        let (start, end) = month_bounds(2024, 2).unwrap();
        // 2024 is a leap year; February runs through the 29th
        assert_eq!(start.date_naive(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(end.date_naive(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn test_month_bounds_reject_nonsense() {
        assert!(month_bounds(2024, 0).is_none());
        assert!(month_bounds(2024, 13).is_none());
    }

    /// One serving of 10 portions of a recipe needing 100g/portion on day D
    /// yields exactly one 1000g point for D and zeros elsewhere
    #[test]
    fn test_consumption_series_shape() {
        let d = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 5, 14).unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 16).unwrap(),
        );

        let mut totals = HashMap::new();
        totals.insert(d, Decimal::from(1000));

        let series = fill_daily_series(range, &totals);
        assert_eq!(series.len(), 3);
        assert_eq!(series[0].consumed_grams, Decimal::ZERO);
        assert_eq!(series[1].date, d);
        assert_eq!(series[1].consumed_grams, Decimal::from(1000));
        assert_eq!(series[2].consumed_grams, Decimal::ZERO);
    }

    #[test]
    fn test_single_day_series() {
        let d = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
        let series = fill_daily_series(DateRange::new(d, d), &HashMap::new());
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].consumed_grams, Decimal::ZERO);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// The percentage always lands in [0, 100]
    #[test]
    fn percentage_stays_in_range(prepared in 0i64..=1_000_000, potential in 0i64..=1_000_000) {
        let pct = difference_percentage(prepared, potential);
        prop_assert!((0.0..=100.0).contains(&pct));
    }

    /// More served against the same potential never raises the percentage
    #[test]
    fn serving_more_never_raises_percentage(
        prepared in 0i64..=100_000,
        extra in 1i64..=100_000,
        potential in 0i64..=100_000,
    ) {
        let before = difference_percentage(prepared, potential);
        let after = difference_percentage(prepared + extra, potential);
        prop_assert!(after <= before + 0.01); // tolerance for 2-decimal rounding
    }

    /// The series covers every day of the range exactly once, in order
    #[test]
    fn series_covers_range(start_offset in 0i64..=3_000, len in 0i64..=60) {
        let base = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let start = base + chrono::Duration::days(start_offset);
        let end = start + chrono::Duration::days(len);

        let series = fill_daily_series(DateRange::new(start, end), &HashMap::new());
        prop_assert_eq!(series.len() as i64, len + 1);
        for (i, point) in series.iter().enumerate() {
            prop_assert_eq!(point.date, start + chrono::Duration::days(i as i64));
            prop_assert_eq!(point.consumed_grams, Decimal::ZERO);
        }
    }
}
