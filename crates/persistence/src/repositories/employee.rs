//! Employee repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{EmployeeEntity, EmployeeRoleDb};
use crate::metrics::QueryTimer;

/// Repository for employee database operations.
#[derive(Clone)]
pub struct EmployeeRepository {
    pool: PgPool,
}

impl EmployeeRepository {
    /// Creates a new EmployeeRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new employee.
    pub async fn create(
        &self,
        employee_code: &str,
        full_name: &str,
        email: &str,
        role: EmployeeRoleDb,
        manager_id: Option<Uuid>,
    ) -> Result<EmployeeEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_employee");
        let result = sqlx::query_as::<_, EmployeeEntity>(
            r#"
            INSERT INTO employees (employee_code, full_name, email, role, manager_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, employee_code, full_name, email, role, manager_id,
                      is_active, created_at, updated_at
            "#,
        )
        .bind(employee_code)
        .bind(full_name)
        .bind(email)
        .bind(role)
        .bind(manager_id)
        .fetch_one(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Find an employee by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<EmployeeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_employee_by_id");
        let result = sqlx::query_as::<_, EmployeeEntity>(
            r#"
            SELECT id, employee_code, full_name, email, role, manager_id,
                   is_active, created_at, updated_at
            FROM employees
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Active direct reports of a manager, ordered by name.
    pub async fn find_direct_reports(
        &self,
        manager_id: Uuid,
    ) -> Result<Vec<EmployeeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_direct_reports");
        let result = sqlx::query_as::<_, EmployeeEntity>(
            r#"
            SELECT id, employee_code, full_name, email, role, manager_id,
                   is_active, created_at, updated_at
            FROM employees
            WHERE manager_id = $1 AND is_active = true
            ORDER BY full_name ASC, id ASC
            "#,
        )
        .bind(manager_id)
        .fetch_all(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Check whether `employee_id` reports directly to `manager_id`.
    pub async fn is_direct_report(
        &self,
        manager_id: Uuid,
        employee_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("is_direct_report");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM employees
                WHERE id = $1 AND manager_id = $2
            )
            "#,
        )
        .bind(employee_id)
        .bind(manager_id)
        .fetch_one(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Returns the subset of `ids` that exist.
    pub async fn find_existing_ids(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, sqlx::Error> {
        let timer = QueryTimer::new("find_existing_employee_ids");
        let result = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id FROM employees
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// List employees filtered by role and manager.
    pub async fn list(
        &self,
        role: Option<EmployeeRoleDb>,
        manager_id: Option<Uuid>,
    ) -> Result<Vec<EmployeeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_employees");
        let result = sqlx::query_as::<_, EmployeeEntity>(
            r#"
            SELECT id, employee_code, full_name, email, role, manager_id,
                   is_active, created_at, updated_at
            FROM employees
            WHERE ($1::employee_role IS NULL OR role = $1)
              AND ($2::uuid IS NULL OR manager_id = $2)
            ORDER BY full_name ASC, id ASC
            "#,
        )
        .bind(role)
        .bind(manager_id)
        .fetch_all(&self.pool)
        .await;
        timer.finish(&result);
        result
    }
}
