//! Monthly target domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;
use validator::Validate;

use super::employee::EmployeeSummary;

/// One numeric goal inside a monthly target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct TargetParameter {
    #[validate(custom(function = "shared::validation::validate_parameter_name"))]
    pub name: String,

    #[validate(custom(function = "shared::validation::validate_metric_value"))]
    pub value: f64,

    #[validate(length(max = 32, message = "Unit must be at most 32 characters"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// Lifecycle status of a target record.
///
/// Persisted as the `is_active` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetStatus {
    Active,
    Deleted,
}

impl TargetStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, TargetStatus::Active)
    }

    pub fn from_active_flag(is_active: bool) -> Self {
        if is_active {
            TargetStatus::Active
        } else {
            TargetStatus::Deleted
        }
    }
}

/// A set of numeric goals for one employee in one calendar month.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Target {
    pub id: Uuid,
    pub employee_id: Uuid,
    /// Month in `YYYY-MM` form.
    pub target_month: String,
    pub target_data: Vec<TargetParameter>,
    pub notes: Option<String>,
    pub status: TargetStatus,
    pub set_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Target {
    /// Looks up a parameter value by name.
    pub fn parameter_value(&self, name: &str) -> Option<f64> {
        self.target_data
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value)
    }
}

/// Rejects duplicate parameter names within one target.
pub fn validate_unique_parameter_names(
    parameters: &[TargetParameter],
) -> Result<(), validator::ValidationError> {
    let mut seen = HashSet::new();
    for parameter in parameters {
        if !seen.insert(parameter.name.as_str()) {
            let mut err = validator::ValidationError::new("duplicate_parameter");
            err.message = Some(format!("Duplicate parameter name: {}", parameter.name).into());
            return Err(err);
        }
    }
    Ok(())
}

/// Request payload for creating a target.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateTargetRequest {
    pub employee_id: Uuid,

    #[validate(custom(function = "shared::validation::validate_target_month"))]
    pub target_month: String,

    #[validate(length(min = 1, max = 50, message = "Targets need 1 to 50 parameters"))]
    #[validate(custom(function = "validate_unique_parameter_names"))]
    #[validate(nested)]
    pub target_data: Vec<TargetParameter>,

    #[validate(length(max = 2000, message = "Notes must be at most 2000 characters"))]
    pub notes: Option<String>,
}

/// Request payload for assigning one target to many employees.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct BulkCreateTargetRequest {
    #[validate(custom(function = "shared::validation::validate_target_month"))]
    pub target_month: String,

    #[validate(length(min = 1, max = 500, message = "employee_ids must contain 1-500 items"))]
    pub employee_ids: Vec<Uuid>,

    #[validate(length(min = 1, max = 50, message = "Targets need 1 to 50 parameters"))]
    #[validate(custom(function = "validate_unique_parameter_names"))]
    #[validate(nested)]
    pub target_data: Vec<TargetParameter>,

    #[validate(length(max = 2000, message = "Notes must be at most 2000 characters"))]
    pub notes: Option<String>,
}

/// Request payload for a partial target update.
///
/// Only provided fields are changed.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateTargetRequest {
    #[validate(length(min = 1, max = 50, message = "Targets need 1 to 50 parameters"))]
    #[validate(custom(function = "validate_unique_parameter_names"))]
    #[validate(nested)]
    pub target_data: Option<Vec<TargetParameter>>,

    #[validate(length(max = 2000, message = "Notes must be at most 2000 characters"))]
    pub notes: Option<String>,

    pub is_active: Option<bool>,
}

impl UpdateTargetRequest {
    pub fn is_empty(&self) -> bool {
        self.target_data.is_none() && self.notes.is_none() && self.is_active.is_none()
    }
}

/// Outcome for one employee in a bulk assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkTargetAction {
    Created,
    Updated,
}

/// Successful item of a bulk assignment.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct BulkTargetSuccess {
    pub employee_id: Uuid,
    pub action: BulkTargetAction,
    pub target: Target,
}

/// Failed item of a bulk assignment.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct BulkTargetFailure {
    pub employee_id: Uuid,
    pub error: String,
}

/// Combined result of a bulk assignment. Partial failure is expected.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct BulkTargetResult {
    pub created: usize,
    pub updated: usize,
    pub failed: usize,
    pub results: Vec<BulkTargetSuccess>,
    pub errors: Vec<BulkTargetFailure>,
}

impl BulkTargetResult {
    pub fn record_success(&mut self, success: BulkTargetSuccess) {
        match success.action {
            BulkTargetAction::Created => self.created += 1,
            BulkTargetAction::Updated => self.updated += 1,
        }
        self.results.push(success);
    }

    pub fn record_failure(&mut self, employee_id: Uuid, error: impl Into<String>) {
        self.failed += 1;
        self.errors.push(BulkTargetFailure {
            employee_id,
            error: error.into(),
        });
    }
}

/// Query parameters for listing targets.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub struct ListTargetsQuery {
    pub employee_id: Option<Uuid>,
    pub target_month: Option<String>,
    pub manager_id: Option<Uuid>,
}

/// Query parameters for team target endpoints.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub struct TeamTargetsQuery {
    /// Defaults to the caller when omitted.
    pub manager_id: Option<Uuid>,
    pub target_month: Option<String>,
}

/// Response for listing targets.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListTargetsResponse {
    pub data: Vec<Target>,
    pub count: usize,
}

/// A direct report together with their active targets.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TeamMemberTargets {
    pub employee: EmployeeSummary,
    pub targets: Vec<Target>,
    /// The target whose month equals the requested month, if any.
    pub current_target: Option<Target>,
}

/// Response for a manager's team targets.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TeamTargetsResponse {
    pub manager_id: Uuid,
    pub target_month: Option<String>,
    pub members: Vec<TeamMemberTargets>,
}

/// Target coverage of a manager's team for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TeamTargetStats {
    pub manager_id: Uuid,
    pub target_month: String,
    pub total_team_members: i64,
    pub members_with_targets: i64,
    pub members_without_targets: i64,
}

impl TeamTargetStats {
    /// Builds stats from team size and the number of members holding a target.
    ///
    /// `members_with_targets` is capped at the team size so the counts always add up.
    pub fn new(
        manager_id: Uuid,
        target_month: String,
        total_team_members: i64,
        members_with_targets: i64,
    ) -> Self {
        let with = members_with_targets.clamp(0, total_team_members.max(0));
        Self {
            manager_id,
            target_month,
            total_team_members,
            members_with_targets: with,
            members_without_targets: total_team_members.max(0) - with,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parameter(name: &str, value: f64) -> TargetParameter {
        TargetParameter {
            name: name.to_string(),
            value,
            unit: None,
        }
    }

    fn create_request(target_data: Vec<TargetParameter>) -> CreateTargetRequest {
        CreateTargetRequest {
            employee_id: Uuid::new_v4(),
            target_month: "2024-03".to_string(),
            target_data,
            notes: None,
        }
    }

    #[test]
    fn test_create_request_valid() {
        let request = create_request(vec![parameter("calls", 100.0)]);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_request_rejects_bad_month() {
        let mut request = create_request(vec![parameter("calls", 100.0)]);
        request.target_month = "2024/03".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_request_rejects_empty_parameters() {
        let request = create_request(vec![]);
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_request_rejects_negative_value() {
        let request = create_request(vec![parameter("calls", -5.0)]);
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_request_rejects_duplicate_names() {
        let request = create_request(vec![parameter("calls", 1.0), parameter("calls", 2.0)]);
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("target_data"));
    }

    #[test]
    fn test_update_request_is_empty() {
        assert!(UpdateTargetRequest::default().is_empty());
        let request = UpdateTargetRequest {
            notes: Some("revised".to_string()),
            ..Default::default()
        };
        assert!(!request.is_empty());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_target_status_flag_roundtrip() {
        assert_eq!(TargetStatus::from_active_flag(true), TargetStatus::Active);
        assert_eq!(TargetStatus::from_active_flag(false), TargetStatus::Deleted);
        assert!(TargetStatus::Active.is_active());
        assert!(!TargetStatus::Deleted.is_active());
    }

    #[test]
    fn test_parameter_value_lookup() {
        let target = Target {
            id: Uuid::new_v4(),
            employee_id: Uuid::new_v4(),
            target_month: "2024-03".to_string(),
            target_data: vec![parameter("calls", 100.0), parameter("meetings", 12.0)],
            notes: None,
            status: TargetStatus::Active,
            set_by: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(target.parameter_value("meetings"), Some(12.0));
        assert_eq!(target.parameter_value("emails"), None);
    }

    #[test]
    fn test_bulk_result_counts() {
        let mut result = BulkTargetResult::default();
        result.record_failure(Uuid::new_v4(), "Employee not found");
        assert_eq!(result.failed, 1);
        assert_eq!(result.created + result.updated, 0);
        assert_eq!(result.errors[0].error, "Employee not found");
    }

    #[test]
    fn test_team_stats_sum_invariant() {
        let manager = Uuid::new_v4();
        for (total, with) in [(0, 0), (5, 0), (5, 3), (5, 5), (3, 7)] {
            let stats = TeamTargetStats::new(manager, "2024-03".to_string(), total, with);
            assert_eq!(
                stats.members_with_targets + stats.members_without_targets,
                stats.total_team_members
            );
        }
    }
}
