//! Holiday entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the holidays table.
#[derive(Debug, Clone, FromRow)]
pub struct HolidayEntity {
    pub id: Uuid,
    pub holiday_date: NaiveDate,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<HolidayEntity> for domain::models::Holiday {
    fn from(entity: HolidayEntity) -> Self {
        Self {
            id: entity.id,
            holiday_date: entity.holiday_date,
            name: entity.name,
            created_at: entity.created_at,
        }
    }
}
