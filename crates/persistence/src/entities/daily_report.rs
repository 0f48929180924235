//! Daily report entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::types::Json;
use sqlx::FromRow;
use std::collections::HashMap;
use uuid::Uuid;

/// Database row mapping for the daily_reports table.
#[derive(Debug, Clone, FromRow)]
pub struct DailyReportEntity {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub report_date: NaiveDate,
    pub parameter_values: Json<HashMap<String, f64>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DailyReportEntity> for domain::models::DailyReport {
    fn from(entity: DailyReportEntity) -> Self {
        Self {
            id: entity.id,
            employee_id: entity.employee_id,
            report_date: entity.report_date,
            parameter_values: entity.parameter_values.0,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
