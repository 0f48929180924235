//! Target entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{TargetParameter, TargetStatus};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the targets table.
#[derive(Debug, Clone, FromRow)]
pub struct TargetEntity {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub target_month: String,
    pub target_data: Json<Vec<TargetParameter>>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub set_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TargetEntity> for domain::models::Target {
    fn from(entity: TargetEntity) -> Self {
        Self {
            id: entity.id,
            employee_id: entity.employee_id,
            target_month: entity.target_month,
            target_data: entity.target_data.0,
            notes: entity.notes,
            status: TargetStatus::from_active_flag(entity.is_active),
            set_by: entity.set_by,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
