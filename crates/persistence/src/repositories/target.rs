//! Target repository for database operations.

use domain::models::TargetParameter;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::TargetEntity;
use crate::metrics::QueryTimer;

/// Filters for listing active targets. All filters are optional.
#[derive(Debug, Clone, Default)]
pub struct TargetFilter {
    pub employee_id: Option<Uuid>,
    pub target_month: Option<String>,
    /// Restricts results to these employees when set.
    pub employee_ids: Option<Vec<Uuid>>,
}

/// Repository for target database operations.
#[derive(Clone)]
pub struct TargetRepository {
    pool: PgPool,
}

impl TargetRepository {
    /// Creates a new TargetRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new active target.
    ///
    /// A second active target for the same employee and month violates
    /// `uq_targets_employee_month_active`.
    pub async fn create(
        &self,
        employee_id: Uuid,
        target_month: &str,
        target_data: &[TargetParameter],
        notes: Option<&str>,
        set_by: Uuid,
    ) -> Result<TargetEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_target");
        let result = sqlx::query_as::<_, TargetEntity>(
            r#"
            INSERT INTO targets (employee_id, target_month, target_data, notes, set_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, employee_id, target_month, target_data, notes, is_active,
                      set_by, created_at, updated_at
            "#,
        )
        .bind(employee_id)
        .bind(target_month)
        .bind(Json(target_data))
        .bind(notes)
        .bind(set_by)
        .fetch_one(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Find a target by ID regardless of status.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<TargetEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_target_by_id");
        let result = sqlx::query_as::<_, TargetEntity>(
            r#"
            SELECT id, employee_id, target_month, target_data, notes, is_active,
                   set_by, created_at, updated_at
            FROM targets
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Find the active target of an employee for a month.
    pub async fn find_by_employee_and_month(
        &self,
        employee_id: Uuid,
        target_month: &str,
    ) -> Result<Option<TargetEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_target_by_employee_and_month");
        let result = sqlx::query_as::<_, TargetEntity>(
            r#"
            SELECT id, employee_id, target_month, target_data, notes, is_active,
                   set_by, created_at, updated_at
            FROM targets
            WHERE employee_id = $1 AND target_month = $2 AND is_active = true
            "#,
        )
        .bind(employee_id)
        .bind(target_month)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// List active targets, newest month first.
    pub async fn find_all(&self, filter: &TargetFilter) -> Result<Vec<TargetEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_targets");
        let result = sqlx::query_as::<_, TargetEntity>(
            r#"
            SELECT id, employee_id, target_month, target_data, notes, is_active,
                   set_by, created_at, updated_at
            FROM targets
            WHERE is_active = true
              AND ($1::uuid IS NULL OR employee_id = $1)
              AND ($2::text IS NULL OR target_month = $2)
              AND ($3::uuid[] IS NULL OR employee_id = ANY($3))
            ORDER BY target_month DESC, created_at DESC
            "#,
        )
        .bind(filter.employee_id)
        .bind(filter.target_month.as_deref())
        .bind(filter.employee_ids.as_deref())
        .fetch_all(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Active targets of the given employees for months in `[from_month, to_month]`.
    pub async fn find_for_employees_in_months(
        &self,
        employee_ids: &[Uuid],
        from_month: &str,
        to_month: &str,
    ) -> Result<Vec<TargetEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_targets_for_employees_in_months");
        let result = sqlx::query_as::<_, TargetEntity>(
            r#"
            SELECT id, employee_id, target_month, target_data, notes, is_active,
                   set_by, created_at, updated_at
            FROM targets
            WHERE employee_id = ANY($1)
              AND is_active = true
              AND target_month BETWEEN $2 AND $3
            ORDER BY target_month ASC
            "#,
        )
        .bind(employee_ids)
        .bind(from_month)
        .bind(to_month)
        .fetch_all(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Partially update a target. `None` fields keep their stored value.
    ///
    /// `set_by` is always re-stamped. Returns `None` if the target does not exist.
    pub async fn update(
        &self,
        id: Uuid,
        target_data: Option<&[TargetParameter]>,
        notes: Option<&str>,
        is_active: Option<bool>,
        set_by: Uuid,
    ) -> Result<Option<TargetEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_target");
        let result = sqlx::query_as::<_, TargetEntity>(
            r#"
            UPDATE targets
            SET target_data = COALESCE($2, target_data),
                notes = COALESCE($3, notes),
                is_active = COALESCE($4, is_active),
                set_by = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, employee_id, target_month, target_data, notes, is_active,
                      set_by, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(target_data.map(Json))
        .bind(notes)
        .bind(is_active)
        .bind(set_by)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Mark an active target deleted. Returns the number of rows changed.
    pub async fn soft_delete(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("soft_delete_target");
        let result = sqlx::query(
            r#"
            UPDATE targets
            SET is_active = false, updated_at = NOW()
            WHERE id = $1 AND is_active = true
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await;
        timer.finish(&result);
        Ok(result?.rows_affected())
    }

    /// Permanently remove a target. Returns the number of rows removed.
    pub async fn hard_delete(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("hard_delete_target");
        let result = sqlx::query(
            r#"
            DELETE FROM targets
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await;
        timer.finish(&result);
        Ok(result?.rows_affected())
    }

    /// Number of a manager's active direct reports holding an active target for the month.
    pub async fn count_team_members_with_target(
        &self,
        manager_id: Uuid,
        target_month: &str,
    ) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_team_members_with_target");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(DISTINCT t.employee_id)
            FROM targets t
            JOIN employees e ON e.id = t.employee_id
            WHERE e.manager_id = $1
              AND e.is_active = true
              AND t.target_month = $2
              AND t.is_active = true
            "#,
        )
        .bind(manager_id)
        .bind(target_month)
        .fetch_one(&self.pool)
        .await;
        timer.finish(&result);
        result
    }
}
