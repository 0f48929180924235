//! Feedback domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// What a piece of feedback is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FeedbackSubject {
    Company,
    Manager,
    Colleague,
    Policy,
    Workplace,
    Process,
    Other,
}

impl FeedbackSubject {
    pub const ALL: [FeedbackSubject; 7] = [
        FeedbackSubject::Company,
        FeedbackSubject::Manager,
        FeedbackSubject::Colleague,
        FeedbackSubject::Policy,
        FeedbackSubject::Workplace,
        FeedbackSubject::Process,
        FeedbackSubject::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackSubject::Company => "Company",
            FeedbackSubject::Manager => "Manager",
            FeedbackSubject::Colleague => "Colleague",
            FeedbackSubject::Policy => "Policy",
            FeedbackSubject::Workplace => "Workplace",
            FeedbackSubject::Process => "Process",
            FeedbackSubject::Other => "Other",
        }
    }
}

impl FromStr for FeedbackSubject {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FeedbackSubject::ALL
            .iter()
            .find(|subject| subject.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("Invalid feedback subject: {}", s))
    }
}

impl fmt::Display for FeedbackSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A feedback record. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Feedback {
    pub id: Uuid,
    pub from_id: Uuid,
    pub to_id: Option<Uuid>,
    pub subject: FeedbackSubject,
    pub content: String,
    pub is_confidential: bool,
    pub created_at: DateTime<Utc>,
}

fn default_confidential() -> bool {
    true
}

/// Request payload for submitting feedback.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateFeedbackRequest {
    pub subject: FeedbackSubject,

    #[validate(length(
        min = 1,
        max = 5000,
        message = "Content must be between 1 and 5000 characters"
    ))]
    pub content: String,

    pub to_id: Option<Uuid>,

    #[serde(default = "default_confidential")]
    pub is_confidential: bool,
}

/// Request payload for HR feedback addressed to one employee.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateHrFeedbackRequest {
    pub to_id: Uuid,

    pub subject: FeedbackSubject,

    #[validate(length(
        min = 1,
        max = 5000,
        message = "Content must be between 1 and 5000 characters"
    ))]
    pub content: String,
}

/// Request payload for HR feedback sent to many employees.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct BulkHrFeedbackRequest {
    #[validate(length(min = 1, max = 500, message = "to_ids must contain 1-500 items"))]
    pub to_ids: Vec<Uuid>,

    pub subject: FeedbackSubject,

    #[validate(length(
        min = 1,
        max = 5000,
        message = "Content must be between 1 and 5000 characters"
    ))]
    pub content: String,
}

/// Result of a bulk HR feedback send.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct BulkFeedbackResult {
    pub sent: usize,
    pub failed: usize,
    pub feedbacks: Vec<Feedback>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invalid_employee_ids: Option<Vec<Uuid>>,
}

impl BulkFeedbackResult {
    /// Starts a result with the ids that did not resolve to an employee.
    pub fn with_invalid(invalid: Vec<Uuid>) -> Self {
        Self {
            failed: invalid.len(),
            invalid_employee_ids: if invalid.is_empty() {
                None
            } else {
                Some(invalid)
            },
            ..Default::default()
        }
    }

    pub fn record_sent(&mut self, feedback: Feedback) {
        self.sent += 1;
        self.feedbacks.push(feedback);
    }

    pub fn record_failed(&mut self) {
        self.failed += 1;
    }
}

/// Query parameters for listing feedback.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub struct ListFeedbackQuery {
    pub subject: Option<FeedbackSubject>,
    pub from_id: Option<Uuid>,
    pub to_id: Option<Uuid>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Feedback count for one subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SubjectCount {
    pub subject: FeedbackSubject,
    pub count: i64,
}

/// Number of recent records included in statistics.
pub const RECENT_FEEDBACK_LIMIT: i64 = 5;

/// Aggregate feedback statistics.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FeedbackStatistics {
    pub total: i64,
    pub by_subject: Vec<SubjectCount>,
    pub confidential: i64,
    pub recent: Vec<Feedback>,
}

/// Response for listing received feedback.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListFeedbackResponse {
    pub data: Vec<Feedback>,
    pub count: usize,
}
