//! Reporting and alerts: low stock, monthly summaries, abuse signals, and
//! per-ingredient consumption series

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use uuid::Uuid;

use shared::models::{DailyConsumptionPoint, LowStockAlert, MonthlySummary, PotentialAbuseAlert};
use shared::types::DateRange;
use shared::validation::validate_month;

use crate::error::{AppError, AppResult};
use crate::services::portions::PortionService;

/// Default low-stock warning threshold
pub const DEFAULT_LOW_STOCK_THRESHOLD_GRAMS: i64 = 500;

/// The summary flags potential abuse above this unused-capacity percentage
pub const ABUSE_SIGNAL_THRESHOLD_PERCENT: f64 = 15.0;

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct LowStockRow {
    id: Uuid,
    name: String,
    quantity_grams: Decimal,
}

#[derive(Debug, FromRow)]
struct DailyTotalRow {
    day: NaiveDate,
    consumed_grams: Decimal,
}

/// Share of still-preparable portions in the theoretical total, as a
/// percentage rounded to two decimals. Zero when nothing was prepared and
/// nothing is preparable.
pub fn difference_percentage(prepared: i64, potential: i64) -> f64 {
    let total = prepared + potential;
    if total <= 0 {
        return 0.0;
    }
    let pct = potential as f64 / total as f64 * 100.0;
    (pct * 100.0).round() / 100.0
}

/// UTC month key in `YYYY-MM` form
pub fn month_key(year: i32, month: u32) -> String {
    format!("{year}-{month:02}")
}

/// Half-open UTC bounds `[start, end)` of a calendar month
pub fn month_bounds(year: i32, month: u32) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((
        Utc.from_utc_datetime(&start.and_hms_opt(0, 0, 0)?),
        Utc.from_utc_datetime(&end.and_hms_opt(0, 0, 0)?),
    ))
}

/// Expand per-day totals into one point per calendar day of the inclusive
/// range; days without servings yield zero grams
pub fn fill_daily_series(
    range: DateRange,
    totals: &HashMap<NaiveDate, Decimal>,
) -> Vec<DailyConsumptionPoint> {
    let mut series = Vec::with_capacity(range.num_days().max(0) as usize);
    let mut day = range.start;
    while day <= range.end {
        series.push(DailyConsumptionPoint {
            date: day,
            consumed_grams: totals.get(&day).copied().unwrap_or(Decimal::ZERO),
        });
        day = match day.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }
    series
}

impl ReportingService {
    /// Create a new ReportingService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Every product whose stock sits below the threshold
    pub async fn low_stock_alerts(
        &self,
        threshold_grams: Decimal,
    ) -> AppResult<Vec<LowStockAlert>> {
        let rows = sqlx::query_as::<_, LowStockRow>(
            "SELECT id, name, quantity_grams FROM products WHERE quantity_grams < $1 ORDER BY quantity_grams",
        )
        .bind(threshold_grams)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| LowStockAlert {
                product_id: r.id,
                message: format!(
                    "'{}' is running low ({}g). Minimum: {}g.",
                    r.name, r.quantity_grams, threshold_grams
                ),
                product_name: r.name,
                current_quantity_grams: r.quantity_grams,
            })
            .collect())
    }

    /// Monthly serving summary.
    ///
    /// Prepared portions are summed over the UTC calendar month; the
    /// potential-portion figure reflects current live stock regardless of
    /// which month is queried. That mix of historical and live data is a
    /// known approximation.
    pub async fn monthly_summary(&self, year: i32, month: u32) -> AppResult<MonthlySummary> {
        validate_month(month).map_err(|msg| AppError::Validation {
            field: "month".to_string(),
            message: msg.to_string(),
        })?;
        let (start, end) = month_bounds(year, month).ok_or_else(|| AppError::Validation {
            field: "year".to_string(),
            message: "Year/month out of range".to_string(),
        })?;

        let prepared: i64 = sqlx::query_scalar::<_, Option<i64>>(
            r#"
            SELECT SUM(portions_served)::bigint
            FROM serving_records
            WHERE serving_time >= $1 AND serving_time < $2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.db)
        .await?
        .unwrap_or(0);

        let potential: i64 = PortionService::new(self.db.clone())
            .calculable_portions_for_all_meals()
            .await?
            .iter()
            .map(|p| p.calculable_portions)
            .sum();

        let pct = difference_percentage(prepared, potential);

        Ok(MonthlySummary {
            month: month_key(year, month),
            total_prepared_portions: prepared,
            potential_portions_at_month_end: potential,
            difference_percentage: pct,
            abuse_signal: pct > ABUSE_SIGNAL_THRESHOLD_PERCENT,
        })
    }

    /// Potential-abuse alert for a month.
    ///
    /// Fires only when the built-in summary signal is set AND the percentage
    /// exceeds the caller-supplied threshold; otherwise `None`.
    pub async fn potential_abuse_alert(
        &self,
        year: i32,
        month: u32,
        threshold_percentage: f64,
    ) -> AppResult<Option<PotentialAbuseAlert>> {
        let summary = self.monthly_summary(year, month).await?;

        if summary.abuse_signal && summary.difference_percentage > threshold_percentage {
            Ok(Some(PotentialAbuseAlert {
                message: format!(
                    "Potential resource misuse in {}. Unused potential: {:.2}% (Threshold: {}%)",
                    summary.month, summary.difference_percentage, threshold_percentage
                ),
                month: summary.month,
                prepared_portions: summary.total_prepared_portions,
                potential_portions_at_month_end: summary.potential_portions_at_month_end,
                difference_percentage: summary.difference_percentage,
            }))
        } else {
            Ok(None)
        }
    }

    /// Grams of one product consumed per calendar day over an inclusive
    /// range, zero-filled for days without servings.
    ///
    /// Consumption joins serving records against the *current* recipe
    /// requirements; editing a recipe rewrites history accordingly.
    pub async fn ingredient_consumption_series(
        &self,
        product_id: Uuid,
        range: DateRange,
    ) -> AppResult<Vec<DailyConsumptionPoint>> {
        if !range.is_valid() {
            return Err(AppError::Validation {
                field: "start_date".to_string(),
                message: "Start date cannot be after end date".to_string(),
            });
        }

        let product_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)")
                .bind(product_id)
                .fetch_one(&self.db)
                .await?;
        if !product_exists {
            return Err(AppError::NotFound("Product".to_string()));
        }

        let start = Utc.from_utc_datetime(&range.start.and_hms_opt(0, 0, 0).unwrap_or_default());
        let end_exclusive = range
            .end
            .succ_opt()
            .map(|d| Utc.from_utc_datetime(&d.and_hms_opt(0, 0, 0).unwrap_or_default()));

        let rows = sqlx::query_as::<_, DailyTotalRow>(
            r#"
            SELECT (sr.serving_time AT TIME ZONE 'UTC')::date AS day,
                   SUM(sr.portions_served * mi.required_grams) AS consumed_grams
            FROM serving_records sr
            JOIN meal_ingredients mi ON mi.meal_id = sr.meal_id
            WHERE mi.product_id = $1
              AND sr.serving_time >= $2
              AND ($3::timestamptz IS NULL OR sr.serving_time < $3)
            GROUP BY day
            "#,
        )
        .bind(product_id)
        .bind(start)
        .bind(end_exclusive)
        .fetch_all(&self.db)
        .await?;

        let totals: HashMap<NaiveDate, Decimal> = rows
            .into_iter()
            .map(|r| (r.day, r.consumed_grams))
            .collect();

        Ok(fill_daily_series(range, &totals))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_is_zero_when_nothing_exists() {
        assert_eq!(difference_percentage(0, 0), 0.0);
    }

    #[test]
    fn all_prepared_means_zero_unused() {
        assert_eq!(difference_percentage(100, 0), 0.0);
    }

    #[test]
    fn all_potential_means_full_unused() {
        assert_eq!(difference_percentage(0, 100), 100.0);
    }

    #[test]
    fn percentage_rounds_to_two_decimals() {
        // 1 / 3 * 100 = 33.333... -> 33.33
        assert_eq!(difference_percentage(2, 1), 33.33);
    }

    #[test]
    fn month_key_is_zero_padded() {
        assert_eq!(month_key(2024, 5), "2024-05");
        assert_eq!(month_key(2024, 11), "2024-11");
    }

    #[test]
    fn month_bounds_cover_december_rollover() {
        let (start, end) = month_bounds(2023, 12).unwrap();
        assert_eq!(start.date_naive(), NaiveDate::from_ymd_opt(2023, 12, 1).unwrap());
        assert_eq!(end.date_naive(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert!(month_bounds(2024, 13).is_none());
    }

    #[test]
    fn series_zero_fills_missing_days() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 3).unwrap(),
        );
        let mut totals = HashMap::new();
        totals.insert(
            NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            Decimal::from(1000),
        );

        let series = fill_daily_series(range, &totals);
        assert_eq!(series.len(), 3);
        assert_eq!(series[0].consumed_grams, Decimal::ZERO);
        assert_eq!(series[1].consumed_grams, Decimal::from(1000));
        assert_eq!(series[2].consumed_grams, Decimal::ZERO);
    }
}
