//! Employee entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::EmployeeRole;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for employee_role that maps to PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "employee_role", rename_all = "lowercase")]
pub enum EmployeeRoleDb {
    Admin,
    Hr,
    Manager,
    Employee,
}

impl From<EmployeeRoleDb> for EmployeeRole {
    fn from(db_role: EmployeeRoleDb) -> Self {
        match db_role {
            EmployeeRoleDb::Admin => EmployeeRole::Admin,
            EmployeeRoleDb::Hr => EmployeeRole::Hr,
            EmployeeRoleDb::Manager => EmployeeRole::Manager,
            EmployeeRoleDb::Employee => EmployeeRole::Employee,
        }
    }
}

impl From<EmployeeRole> for EmployeeRoleDb {
    fn from(role: EmployeeRole) -> Self {
        match role {
            EmployeeRole::Admin => EmployeeRoleDb::Admin,
            EmployeeRole::Hr => EmployeeRoleDb::Hr,
            EmployeeRole::Manager => EmployeeRoleDb::Manager,
            EmployeeRole::Employee => EmployeeRoleDb::Employee,
        }
    }
}

/// Database row mapping for the employees table.
#[derive(Debug, Clone, FromRow)]
pub struct EmployeeEntity {
    pub id: Uuid,
    pub employee_code: String,
    pub full_name: String,
    pub email: String,
    pub role: EmployeeRoleDb,
    pub manager_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EmployeeEntity> for domain::models::Employee {
    fn from(entity: EmployeeEntity) -> Self {
        Self {
            id: entity.id,
            employee_code: entity.employee_code,
            full_name: entity.full_name,
            email: entity.email,
            role: entity.role.into(),
            manager_id: entity.manager_id,
            is_active: entity.is_active,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
