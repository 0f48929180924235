//! Feedback entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::FeedbackSubject;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for feedback_subject that maps to PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "feedback_subject", rename_all = "lowercase")]
pub enum FeedbackSubjectDb {
    Company,
    Manager,
    Colleague,
    Policy,
    Workplace,
    Process,
    Other,
}

impl From<FeedbackSubjectDb> for FeedbackSubject {
    fn from(db: FeedbackSubjectDb) -> Self {
        match db {
            FeedbackSubjectDb::Company => FeedbackSubject::Company,
            FeedbackSubjectDb::Manager => FeedbackSubject::Manager,
            FeedbackSubjectDb::Colleague => FeedbackSubject::Colleague,
            FeedbackSubjectDb::Policy => FeedbackSubject::Policy,
            FeedbackSubjectDb::Workplace => FeedbackSubject::Workplace,
            FeedbackSubjectDb::Process => FeedbackSubject::Process,
            FeedbackSubjectDb::Other => FeedbackSubject::Other,
        }
    }
}

impl From<FeedbackSubject> for FeedbackSubjectDb {
    fn from(subject: FeedbackSubject) -> Self {
        match subject {
            FeedbackSubject::Company => FeedbackSubjectDb::Company,
            FeedbackSubject::Manager => FeedbackSubjectDb::Manager,
            FeedbackSubject::Colleague => FeedbackSubjectDb::Colleague,
            FeedbackSubject::Policy => FeedbackSubjectDb::Policy,
            FeedbackSubject::Workplace => FeedbackSubjectDb::Workplace,
            FeedbackSubject::Process => FeedbackSubjectDb::Process,
            FeedbackSubject::Other => FeedbackSubjectDb::Other,
        }
    }
}

/// Database row mapping for the feedback table.
#[derive(Debug, Clone, FromRow)]
pub struct FeedbackEntity {
    pub id: Uuid,
    pub from_id: Uuid,
    pub to_id: Option<Uuid>,
    pub subject: FeedbackSubjectDb,
    pub content: String,
    pub is_confidential: bool,
    pub created_at: DateTime<Utc>,
}

impl From<FeedbackEntity> for domain::models::Feedback {
    fn from(entity: FeedbackEntity) -> Self {
        Self {
            id: entity.id,
            from_id: entity.from_id,
            to_id: entity.to_id,
            subject: entity.subject.into(),
            content: entity.content,
            is_confidential: entity.is_confidential,
            created_at: entity.created_at,
        }
    }
}

/// Row of a count-by-subject query.
#[derive(Debug, Clone, FromRow)]
pub struct SubjectCountEntity {
    pub subject: FeedbackSubjectDb,
    pub count: i64,
}

impl From<SubjectCountEntity> for domain::models::feedback::SubjectCount {
    fn from(entity: SubjectCountEntity) -> Self {
        Self {
            subject: entity.subject.into(),
            count: entity.count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_conversion_roundtrip() {
        for subject in FeedbackSubject::ALL {
            let db: FeedbackSubjectDb = subject.into();
            assert_eq!(FeedbackSubject::from(db), subject);
        }
    }
}
