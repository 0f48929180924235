//! Holiday repository for database operations.

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::entities::HolidayEntity;
use crate::metrics::QueryTimer;

/// Repository for holiday database operations.
#[derive(Clone)]
pub struct HolidayRepository {
    pool: PgPool,
}

impl HolidayRepository {
    /// Creates a new HolidayRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a holiday. A duplicate date violates the unique constraint.
    pub async fn create(
        &self,
        holiday_date: NaiveDate,
        name: &str,
    ) -> Result<HolidayEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_holiday");
        let result = sqlx::query_as::<_, HolidayEntity>(
            r#"
            INSERT INTO holidays (holiday_date, name)
            VALUES ($1, $2)
            RETURNING id, holiday_date, name, created_at
            "#,
        )
        .bind(holiday_date)
        .bind(name)
        .fetch_one(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Holidays between two dates (inclusive), in date order.
    pub async fn find_in_range(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<HolidayEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_holidays_in_range");
        let result = sqlx::query_as::<_, HolidayEntity>(
            r#"
            SELECT id, holiday_date, name, created_at
            FROM holidays
            WHERE holiday_date BETWEEN $1 AND $2
            ORDER BY holiday_date ASC
            "#,
        )
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// All holidays, optionally restricted to one year.
    pub async fn list(&self, year: Option<i32>) -> Result<Vec<HolidayEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_holidays");
        let result = sqlx::query_as::<_, HolidayEntity>(
            r#"
            SELECT id, holiday_date, name, created_at
            FROM holidays
            WHERE ($1::int IS NULL OR EXTRACT(YEAR FROM holiday_date)::int = $1)
            ORDER BY holiday_date ASC
            "#,
        )
        .bind(year)
        .fetch_all(&self.pool)
        .await;
        timer.finish(&result);
        result
    }
}
