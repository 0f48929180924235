//! Feedback intake and HR messages.

use domain::models::feedback::{
    BulkFeedbackResult, BulkHrFeedbackRequest, CreateFeedbackRequest, CreateHrFeedbackRequest,
    ListFeedbackQuery, SubjectCount, RECENT_FEEDBACK_LIMIT,
};
use domain::models::{Feedback, FeedbackStatistics};
use persistence::entities::FeedbackSubjectDb;
use persistence::repositories::{EmployeeRepository, FeedbackFilter, FeedbackRepository};
use shared::pagination::{PageRequest, Paginated};
use sqlx::PgPool;
use std::collections::HashSet;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("Employee {0} not found")]
    RecipientNotFound(Uuid),

    #[error("Feedback {0} not found")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Clone)]
pub struct FeedbackService {
    feedback: FeedbackRepository,
    employees: EmployeeRepository,
}

impl FeedbackService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            feedback: FeedbackRepository::new(pool.clone()),
            employees: EmployeeRepository::new(pool),
        }
    }

    /// Stores feedback from any employee. Confidential unless stated otherwise.
    pub async fn create(
        &self,
        from_id: Uuid,
        request: &CreateFeedbackRequest,
    ) -> Result<Feedback, FeedbackError> {
        if let Some(to_id) = request.to_id {
            self.ensure_employee(to_id).await?;
        }

        let feedback: Feedback = self
            .feedback
            .create(
                from_id,
                request.to_id,
                request.subject.into(),
                &request.content,
                request.is_confidential,
            )
            .await?
            .into();

        info!(
            feedback_id = %feedback.id,
            from_id = %from_id,
            subject = %feedback.subject,
            confidential = feedback.is_confidential,
            "Feedback submitted"
        );
        Ok(feedback)
    }

    /// HR message to one employee. Never confidential so the recipient can read it.
    pub async fn create_hr_feedback(
        &self,
        from_id: Uuid,
        request: &CreateHrFeedbackRequest,
    ) -> Result<Feedback, FeedbackError> {
        self.ensure_employee(request.to_id).await?;

        let feedback: Feedback = self
            .feedback
            .create(
                from_id,
                Some(request.to_id),
                request.subject.into(),
                &request.content,
                false,
            )
            .await?
            .into();

        info!(feedback_id = %feedback.id, to_id = %request.to_id, "HR feedback sent");
        Ok(feedback)
    }

    /// Same HR message to many employees.
    ///
    /// Unknown ids are reported in `invalid_employee_ids`; each valid recipient
    /// gets its own record and one failed insert does not stop the rest.
    pub async fn create_bulk_hr_feedback(
        &self,
        from_id: Uuid,
        request: &BulkHrFeedbackRequest,
    ) -> Result<BulkFeedbackResult, FeedbackError> {
        let mut unique = Vec::with_capacity(request.to_ids.len());
        let mut seen = HashSet::new();
        for id in &request.to_ids {
            if seen.insert(*id) {
                unique.push(*id);
            }
        }

        let existing: HashSet<Uuid> = self
            .employees
            .find_existing_ids(&unique)
            .await?
            .into_iter()
            .collect();
        let (valid, invalid): (Vec<Uuid>, Vec<Uuid>) =
            unique.into_iter().partition(|id| existing.contains(id));

        let mut result = BulkFeedbackResult::with_invalid(invalid);
        let subject: FeedbackSubjectDb = request.subject.into();

        for to_id in valid {
            match self
                .feedback
                .create(from_id, Some(to_id), subject, &request.content, false)
                .await
            {
                Ok(entity) => result.record_sent(entity.into()),
                Err(e) => {
                    warn!(to_id = %to_id, error = %e, "Bulk HR feedback insert failed");
                    result.record_failed();
                }
            }
        }

        info!(
            from_id = %from_id,
            sent = result.sent,
            failed = result.failed,
            "Bulk HR feedback finished"
        );
        Ok(result)
    }

    /// One page of feedback, newest first.
    pub async fn find_all(
        &self,
        query: &ListFeedbackQuery,
        max_page_size: i64,
    ) -> Result<Paginated<Feedback>, FeedbackError> {
        let page = PageRequest::new(query.page, query.limit, max_page_size);
        let filter = FeedbackFilter {
            subject: query.subject.map(FeedbackSubjectDb::from),
            from_id: query.from_id,
            to_id: query.to_id,
        };

        let total = self.feedback.count(filter).await?;
        let data = self
            .feedback
            .find_all(filter, page.limit, page.offset())
            .await?
            .into_iter()
            .map(Feedback::from)
            .collect();

        Ok(Paginated {
            data,
            meta: page.meta(total),
        })
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Feedback, FeedbackError> {
        self.feedback
            .find_by_id(id)
            .await?
            .map(Feedback::from)
            .ok_or(FeedbackError::NotFound(id))
    }

    /// Non-confidential feedback addressed to the employee.
    pub async fn find_received(&self, employee_id: Uuid) -> Result<Vec<Feedback>, FeedbackError> {
        Ok(self
            .feedback
            .find_received(employee_id)
            .await?
            .into_iter()
            .map(Feedback::from)
            .collect())
    }

    pub async fn statistics(&self) -> Result<FeedbackStatistics, FeedbackError> {
        let all = FeedbackFilter::default();
        let total = self.feedback.count(all).await?;
        let confidential = self.feedback.count_confidential().await?;
        let by_subject = self
            .feedback
            .count_by_subject()
            .await?
            .into_iter()
            .map(SubjectCount::from)
            .collect();
        let recent = self
            .feedback
            .find_all(all, RECENT_FEEDBACK_LIMIT, 0)
            .await?
            .into_iter()
            .map(Feedback::from)
            .collect();

        Ok(FeedbackStatistics {
            total,
            by_subject,
            confidential,
            recent,
        })
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), FeedbackError> {
        if self.feedback.delete(id).await? == 0 {
            return Err(FeedbackError::NotFound(id));
        }
        info!(feedback_id = %id, "Feedback deleted");
        Ok(())
    }

    async fn ensure_employee(&self, id: Uuid) -> Result<(), FeedbackError> {
        match self.employees.find_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(FeedbackError::RecipientNotFound(id)),
        }
    }
}
