//! Feedback repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{FeedbackEntity, FeedbackSubjectDb, SubjectCountEntity};
use crate::metrics::QueryTimer;

/// Filters for listing feedback. All filters are optional.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeedbackFilter {
    pub subject: Option<FeedbackSubjectDb>,
    pub from_id: Option<Uuid>,
    pub to_id: Option<Uuid>,
}

/// Repository for feedback database operations.
#[derive(Clone)]
pub struct FeedbackRepository {
    pool: PgPool,
}

impl FeedbackRepository {
    /// Creates a new FeedbackRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a feedback record.
    pub async fn create(
        &self,
        from_id: Uuid,
        to_id: Option<Uuid>,
        subject: FeedbackSubjectDb,
        content: &str,
        is_confidential: bool,
    ) -> Result<FeedbackEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_feedback");
        let result = sqlx::query_as::<_, FeedbackEntity>(
            r#"
            INSERT INTO feedback (from_id, to_id, subject, content, is_confidential)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, from_id, to_id, subject, content, is_confidential, created_at
            "#,
        )
        .bind(from_id)
        .bind(to_id)
        .bind(subject)
        .bind(content)
        .bind(is_confidential)
        .fetch_one(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Find a feedback record by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<FeedbackEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_feedback_by_id");
        let result = sqlx::query_as::<_, FeedbackEntity>(
            r#"
            SELECT id, from_id, to_id, subject, content, is_confidential, created_at
            FROM feedback
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// One page of feedback, newest first.
    pub async fn find_all(
        &self,
        filter: FeedbackFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FeedbackEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_feedback");
        let result = sqlx::query_as::<_, FeedbackEntity>(
            r#"
            SELECT id, from_id, to_id, subject, content, is_confidential, created_at
            FROM feedback
            WHERE ($1::feedback_subject IS NULL OR subject = $1)
              AND ($2::uuid IS NULL OR from_id = $2)
              AND ($3::uuid IS NULL OR to_id = $3)
            ORDER BY created_at DESC, id DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(filter.subject)
        .bind(filter.from_id)
        .bind(filter.to_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Count feedback matching a filter.
    pub async fn count(&self, filter: FeedbackFilter) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_feedback");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM feedback
            WHERE ($1::feedback_subject IS NULL OR subject = $1)
              AND ($2::uuid IS NULL OR from_id = $2)
              AND ($3::uuid IS NULL OR to_id = $3)
            "#,
        )
        .bind(filter.subject)
        .bind(filter.from_id)
        .bind(filter.to_id)
        .fetch_one(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Count of confidential feedback.
    pub async fn count_confidential(&self) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_confidential_feedback");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM feedback WHERE is_confidential = true
            "#,
        )
        .fetch_one(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Feedback counts grouped by subject.
    pub async fn count_by_subject(&self) -> Result<Vec<SubjectCountEntity>, sqlx::Error> {
        let timer = QueryTimer::new("count_feedback_by_subject");
        let result = sqlx::query_as::<_, SubjectCountEntity>(
            r#"
            SELECT subject, COUNT(*) AS count
            FROM feedback
            GROUP BY subject
            ORDER BY subject ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Non-confidential feedback addressed to an employee, newest first.
    pub async fn find_received(
        &self,
        employee_id: Uuid,
    ) -> Result<Vec<FeedbackEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_received_feedback");
        let result = sqlx::query_as::<_, FeedbackEntity>(
            r#"
            SELECT id, from_id, to_id, subject, content, is_confidential, created_at
            FROM feedback
            WHERE to_id = $1 AND is_confidential = false
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Permanently remove a feedback record. Returns the number of rows removed.
    pub async fn delete(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_feedback");
        let result = sqlx::query(
            r#"
            DELETE FROM feedback WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await;
        timer.finish(&result);
        Ok(result?.rows_affected())
    }
}
