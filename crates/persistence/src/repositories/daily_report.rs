//! Daily report repository for database operations.

use chrono::NaiveDate;
use sqlx::types::Json;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::entities::DailyReportEntity;
use crate::metrics::QueryTimer;

/// Repository for daily report database operations.
#[derive(Clone)]
pub struct DailyReportRepository {
    pool: PgPool,
}

impl DailyReportRepository {
    /// Creates a new DailyReportRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a report, replacing the values of an existing report for the same date.
    pub async fn upsert(
        &self,
        employee_id: Uuid,
        report_date: NaiveDate,
        parameter_values: &HashMap<String, f64>,
    ) -> Result<DailyReportEntity, sqlx::Error> {
        let timer = QueryTimer::new("upsert_daily_report");
        let result = sqlx::query_as::<_, DailyReportEntity>(
            r#"
            INSERT INTO daily_reports (employee_id, report_date, parameter_values)
            VALUES ($1, $2, $3)
            ON CONFLICT (employee_id, report_date)
            DO UPDATE SET parameter_values = EXCLUDED.parameter_values,
                          updated_at = NOW()
            RETURNING id, employee_id, report_date, parameter_values, created_at, updated_at
            "#,
        )
        .bind(employee_id)
        .bind(report_date)
        .bind(Json(parameter_values))
        .fetch_one(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Reports of the given employees between two dates (inclusive), oldest first.
    pub async fn find_in_range(
        &self,
        employee_ids: &[Uuid],
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<DailyReportEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_daily_reports_in_range");
        let result = sqlx::query_as::<_, DailyReportEntity>(
            r#"
            SELECT id, employee_id, report_date, parameter_values, created_at, updated_at
            FROM daily_reports
            WHERE employee_id = ANY($1)
              AND report_date BETWEEN $2 AND $3
            ORDER BY report_date ASC, employee_id ASC
            "#,
        )
        .bind(employee_ids)
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.pool)
        .await;
        timer.finish(&result);
        result
    }
}
