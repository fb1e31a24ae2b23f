//! GTFS service-day resolution.
//!
//! Which services run on a given date = the calendar entries whose
//! weekday flag is set and whose validity range contains the date,
//! overridden by calendar_dates exceptions for that exact date.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};

use crate::domain::ServiceId;

use super::rows::ExceptionRow;
use super::{GtfsStore, StoreError};

/// GTFS weekday flag columns, indexed by `Weekday::num_days_from_monday`.
const WEEKDAY_COLUMNS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// A calendar_dates row adding the service on one date.
const EXCEPTION_ADDED: i64 = 1;
/// A calendar_dates row removing the service on one date.
const EXCEPTION_REMOVED: i64 = 2;

/// Format a date the way GTFS stores it: fixed-width YYYYMMDD.
/// Fixed width is what makes lexicographic range comparison valid.
pub(crate) fn gtfs_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

impl GtfsStore {
    /// The set of service ids active on `date`.
    ///
    /// Computed fresh per query; active sets are never cached across
    /// dates. A service with no calendar row at all can still be
    /// activated by an Added exception (holiday-only services).
    pub async fn active_service_ids(
        &self,
        date: NaiveDate,
    ) -> Result<HashSet<ServiceId>, StoreError> {
        let date_str = gtfs_date(date);
        let weekday_col = WEEKDAY_COLUMNS[date.weekday().num_days_from_monday() as usize];

        // The column name comes from the fixed array above, never from
        // input.
        let sql = format!(
            "SELECT service_id FROM calendar \
             WHERE ? BETWEEN start_date AND end_date AND {weekday_col} = 1"
        );
        let base: Vec<(String,)> = sqlx::query_as(&sql)
            .bind(&date_str)
            .fetch_all(self.pool())
            .await?;

        let mut services: HashSet<ServiceId> =
            base.into_iter().map(|(id,)| ServiceId::new(id)).collect();

        let exceptions: Vec<ExceptionRow> = sqlx::query_as(
            "SELECT service_id, exception_type FROM calendar_dates WHERE date = ?",
        )
        .bind(&date_str)
        .fetch_all(self.pool())
        .await?;

        for row in exceptions {
            let service = ServiceId::new(row.service_id);
            match row.exception_type {
                EXCEPTION_REMOVED => {
                    services.remove(&service);
                }
                EXCEPTION_ADDED => {
                    services.insert(service);
                }
                _ => {}
            }
        }

        tracing::debug!(date = %date_str, count = services.len(), "resolved active services");

        Ok(services)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testutil::{fixture_store, insert_calendar, insert_calendar_date};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn gtfs_date_is_fixed_width() {
        assert_eq!(gtfs_date(date(2025, 1, 8)), "20250108");
        assert_eq!(gtfs_date(date(2025, 11, 30)), "20251130");
    }

    #[tokio::test]
    async fn weekday_service_active_on_wednesday() {
        let store = fixture_store().await;
        insert_calendar(&store, "WEEKDAY", [1, 1, 1, 1, 1, 0, 0], "20240101", "20261231").await;

        // 2025-01-08 is a Wednesday.
        let active = store.active_service_ids(date(2025, 1, 8)).await.unwrap();
        assert!(active.contains(&ServiceId::new("WEEKDAY")));
    }

    #[tokio::test]
    async fn weekday_service_inactive_on_saturday() {
        let store = fixture_store().await;
        insert_calendar(&store, "WEEKDAY", [1, 1, 1, 1, 1, 0, 0], "20240101", "20261231").await;

        // 2025-01-11 is a Saturday.
        let active = store.active_service_ids(date(2025, 1, 11)).await.unwrap();
        assert!(!active.contains(&ServiceId::new("WEEKDAY")));
    }

    #[tokio::test]
    async fn date_range_bounds_are_inclusive() {
        let store = fixture_store().await;
        // Monday-only service valid exactly one Monday.
        insert_calendar(&store, "ONE_DAY", [1, 0, 0, 0, 0, 0, 0], "20250106", "20250106").await;

        let active = store.active_service_ids(date(2025, 1, 6)).await.unwrap();
        assert!(active.contains(&ServiceId::new("ONE_DAY")));

        let active = store.active_service_ids(date(2025, 1, 13)).await.unwrap();
        assert!(!active.contains(&ServiceId::new("ONE_DAY")));
    }

    #[tokio::test]
    async fn removed_exception_overrides_calendar() {
        let store = fixture_store().await;
        insert_calendar(&store, "WEEKDAY", [1, 1, 1, 1, 1, 0, 0], "20240101", "20261231").await;
        // Remove on Monday 2025-01-06 (a holiday, say).
        insert_calendar_date(&store, "WEEKDAY", "20250106", 2).await;

        let active = store.active_service_ids(date(2025, 1, 6)).await.unwrap();
        assert!(!active.contains(&ServiceId::new("WEEKDAY")));

        // The following Monday is unaffected.
        let active = store.active_service_ids(date(2025, 1, 13)).await.unwrap();
        assert!(active.contains(&ServiceId::new("WEEKDAY")));
    }

    #[tokio::test]
    async fn added_exception_activates_uncalendared_service() {
        let store = fixture_store().await;
        // No calendar row at all for HOLIDAY.
        insert_calendar_date(&store, "HOLIDAY", "20250101", 1).await;

        let active = store.active_service_ids(date(2025, 1, 1)).await.unwrap();
        assert!(active.contains(&ServiceId::new("HOLIDAY")));

        let active = store.active_service_ids(date(2025, 1, 2)).await.unwrap();
        assert!(active.is_empty());
    }

    #[tokio::test]
    async fn unknown_exception_type_is_ignored() {
        let store = fixture_store().await;
        insert_calendar(&store, "WEEKDAY", [1, 1, 1, 1, 1, 0, 0], "20240101", "20261231").await;
        insert_calendar_date(&store, "WEEKDAY", "20250106", 9).await;

        let active = store.active_service_ids(date(2025, 1, 6)).await.unwrap();
        assert!(active.contains(&ServiceId::new("WEEKDAY")));
    }

    #[tokio::test]
    async fn no_services_is_an_empty_set() {
        let store = fixture_store().await;
        let active = store.active_service_ids(date(2025, 1, 8)).await.unwrap();
        assert!(active.is_empty());
    }
}
