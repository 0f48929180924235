//! Monthly target assignment.

use domain::models::target::{
    BulkCreateTargetRequest, BulkTargetAction, BulkTargetResult, BulkTargetSuccess,
    CreateTargetRequest, TeamMemberTargets, TeamTargetStats, TeamTargetsResponse,
    UpdateTargetRequest,
};
use domain::models::{Employee, EmployeeSummary, Target, TargetParameter};
use persistence::repositories::{EmployeeRepository, TargetFilter, TargetRepository};
use sqlx::PgPool;
use std::collections::HashSet;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use super::is_unique_violation;

#[derive(Debug, Error)]
pub enum TargetError {
    #[error("Employee {0} not found")]
    EmployeeNotFound(Uuid),

    #[error("Target {0} not found")]
    TargetNotFound(Uuid),

    #[error("Target already exists for employee {employee_id} in {target_month}")]
    AlreadyExists {
        employee_id: Uuid,
        target_month: String,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Listing filter as understood by the service.
#[derive(Debug, Clone, Default)]
pub struct TargetQuery {
    pub employee_id: Option<Uuid>,
    pub target_month: Option<String>,
    /// Restricts results to this manager's direct reports.
    pub manager_id: Option<Uuid>,
}

#[derive(Clone)]
pub struct TargetService {
    targets: TargetRepository,
    employees: EmployeeRepository,
}

impl TargetService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            targets: TargetRepository::new(pool.clone()),
            employees: EmployeeRepository::new(pool),
        }
    }

    /// Creates the target for one employee and month.
    ///
    /// The pre-check gives a friendly error; a concurrent insert that wins the
    /// race still surfaces as `AlreadyExists` through the unique index.
    pub async fn create(
        &self,
        request: &CreateTargetRequest,
        actor: Uuid,
    ) -> Result<Target, TargetError> {
        if self.employees.find_by_id(request.employee_id).await?.is_none() {
            return Err(TargetError::EmployeeNotFound(request.employee_id));
        }

        if self
            .targets
            .find_by_employee_and_month(request.employee_id, &request.target_month)
            .await?
            .is_some()
        {
            return Err(already_exists(request.employee_id, &request.target_month));
        }

        let target = self
            .insert(
                request.employee_id,
                &request.target_month,
                &request.target_data,
                request.notes.as_deref(),
                actor,
            )
            .await?;

        info!(
            target_id = %target.id,
            employee_id = %target.employee_id,
            target_month = %target.target_month,
            set_by = %actor,
            "Target created"
        );
        Ok(target)
    }

    /// Assigns the same target to many employees.
    ///
    /// Each employee is handled on its own: an existing target for the month is
    /// updated, otherwise one is created. Failures are collected, never fatal.
    /// With `team` set, employees outside it are recorded as failures.
    pub async fn bulk_create(
        &self,
        request: &BulkCreateTargetRequest,
        team: Option<&HashSet<Uuid>>,
        actor: Uuid,
    ) -> Result<BulkTargetResult, TargetError> {
        let existing: HashSet<Uuid> = self
            .employees
            .find_existing_ids(&request.employee_ids)
            .await?
            .into_iter()
            .collect();

        let mut result = BulkTargetResult::default();
        let mut seen = HashSet::new();

        for &employee_id in &request.employee_ids {
            if !seen.insert(employee_id) {
                result.record_failure(employee_id, "Duplicate employee id in request");
                continue;
            }
            if !existing.contains(&employee_id) {
                result.record_failure(employee_id, "Employee not found");
                continue;
            }
            if team.is_some_and(|team| !team.contains(&employee_id)) {
                result.record_failure(employee_id, "Employee is not in your team");
                continue;
            }

            match self.upsert_one(employee_id, request, actor).await {
                Ok((action, target)) => result.record_success(BulkTargetSuccess {
                    employee_id,
                    action,
                    target,
                }),
                Err(e) => {
                    warn!(employee_id = %employee_id, error = %e, "Bulk target assignment failed");
                    result.record_failure(employee_id, e.to_string());
                }
            }
        }

        info!(
            target_month = %request.target_month,
            created = result.created,
            updated = result.updated,
            failed = result.failed,
            set_by = %actor,
            "Bulk target assignment finished"
        );
        Ok(result)
    }

    async fn upsert_one(
        &self,
        employee_id: Uuid,
        request: &BulkCreateTargetRequest,
        actor: Uuid,
    ) -> Result<(BulkTargetAction, Target), TargetError> {
        let current = self
            .targets
            .find_by_employee_and_month(employee_id, &request.target_month)
            .await?;

        match current {
            Some(current) => {
                let updated = self
                    .targets
                    .update(
                        current.id,
                        Some(request.target_data.as_slice()),
                        request.notes.as_deref(),
                        None,
                        actor,
                    )
                    .await?
                    .ok_or(TargetError::TargetNotFound(current.id))?;
                Ok((BulkTargetAction::Updated, updated.into()))
            }
            None => {
                let created = self
                    .insert(
                        employee_id,
                        &request.target_month,
                        &request.target_data,
                        request.notes.as_deref(),
                        actor,
                    )
                    .await?;
                Ok((BulkTargetAction::Created, created))
            }
        }
    }

    async fn insert(
        &self,
        employee_id: Uuid,
        target_month: &str,
        target_data: &[TargetParameter],
        notes: Option<&str>,
        actor: Uuid,
    ) -> Result<Target, TargetError> {
        self.targets
            .create(employee_id, target_month, target_data, notes, actor)
            .await
            .map(Target::from)
            .map_err(|e| {
                if is_unique_violation(&e) {
                    already_exists(employee_id, target_month)
                } else {
                    TargetError::Database(e)
                }
            })
    }

    /// Active targets, newest month first.
    pub async fn find_all(&self, query: TargetQuery) -> Result<Vec<Target>, TargetError> {
        let employee_ids = match query.manager_id {
            Some(manager_id) => {
                let team = self.employees.find_direct_reports(manager_id).await?;
                if team.is_empty() {
                    return Ok(Vec::new());
                }
                Some(team.into_iter().map(|e| e.id).collect())
            }
            None => None,
        };

        let filter = TargetFilter {
            employee_id: query.employee_id,
            target_month: query.target_month,
            employee_ids,
        };

        Ok(self
            .targets
            .find_all(&filter)
            .await?
            .into_iter()
            .map(Target::from)
            .collect())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Target, TargetError> {
        self.targets
            .find_by_id(id)
            .await?
            .map(Target::from)
            .ok_or(TargetError::TargetNotFound(id))
    }

    /// The active target for an employee and month; `None` is not an error.
    pub async fn find_by_employee_and_month(
        &self,
        employee_id: Uuid,
        target_month: &str,
    ) -> Result<Option<Target>, TargetError> {
        Ok(self
            .targets
            .find_by_employee_and_month(employee_id, target_month)
            .await?
            .map(Target::from))
    }

    /// Every direct report with their active targets.
    ///
    /// With `target_month` the list is filtered to that month and
    /// `current_target` holds the matching record.
    pub async fn team_targets(
        &self,
        manager_id: Uuid,
        target_month: Option<String>,
    ) -> Result<TeamTargetsResponse, TargetError> {
        let team: Vec<Employee> = self
            .employees
            .find_direct_reports(manager_id)
            .await?
            .into_iter()
            .map(Employee::from)
            .collect();

        let targets: Vec<Target> = if team.is_empty() {
            Vec::new()
        } else {
            let filter = TargetFilter {
                employee_id: None,
                target_month: target_month.clone(),
                employee_ids: Some(team.iter().map(|e| e.id).collect()),
            };
            self.targets
                .find_all(&filter)
                .await?
                .into_iter()
                .map(Target::from)
                .collect()
        };

        let members = team
            .iter()
            .map(|employee| {
                let own: Vec<Target> = targets
                    .iter()
                    .filter(|t| t.employee_id == employee.id)
                    .cloned()
                    .collect();
                let current_target = target_month
                    .as_deref()
                    .and_then(|month| own.iter().find(|t| t.target_month == month).cloned());
                TeamMemberTargets {
                    employee: EmployeeSummary::from(employee),
                    targets: own,
                    current_target,
                }
            })
            .collect();

        Ok(TeamTargetsResponse {
            manager_id,
            target_month,
            members,
        })
    }

    /// Applies the provided fields only and re-stamps `set_by`.
    pub async fn update(
        &self,
        id: Uuid,
        request: &UpdateTargetRequest,
        actor: Uuid,
    ) -> Result<Target, TargetError> {
        let current = self.find_by_id(id).await?;

        let updated = self
            .targets
            .update(
                id,
                request.target_data.as_deref(),
                request.notes.as_deref(),
                request.is_active,
                actor,
            )
            .await
            .map_err(|e| {
                // Reactivating a deleted target while another is active.
                if is_unique_violation(&e) {
                    already_exists(current.employee_id, &current.target_month)
                } else {
                    TargetError::Database(e)
                }
            })?
            .ok_or(TargetError::TargetNotFound(id))?;

        info!(target_id = %id, set_by = %actor, "Target updated");
        Ok(updated.into())
    }

    /// Soft delete. Only active targets can be removed.
    pub async fn remove(&self, id: Uuid) -> Result<(), TargetError> {
        if self.targets.soft_delete(id).await? == 0 {
            return Err(TargetError::TargetNotFound(id));
        }
        info!(target_id = %id, "Target deactivated");
        Ok(())
    }

    /// Permanent delete of an active or deleted target.
    pub async fn hard_delete(&self, id: Uuid) -> Result<(), TargetError> {
        if self.targets.find_by_id(id).await?.is_none() {
            return Err(TargetError::TargetNotFound(id));
        }
        if self.targets.hard_delete(id).await? == 0 {
            return Err(TargetError::TargetNotFound(id));
        }
        info!(target_id = %id, "Target permanently deleted");
        Ok(())
    }

    pub async fn team_stats(
        &self,
        manager_id: Uuid,
        target_month: String,
    ) -> Result<TeamTargetStats, TargetError> {
        let total = self.employees.find_direct_reports(manager_id).await?.len() as i64;
        let with_target = self
            .targets
            .count_team_members_with_target(manager_id, &target_month)
            .await?;
        Ok(TeamTargetStats::new(
            manager_id,
            target_month,
            total,
            with_target,
        ))
    }

    /// Ids of a manager's active direct reports.
    pub async fn team_ids(&self, manager_id: Uuid) -> Result<HashSet<Uuid>, TargetError> {
        Ok(self
            .employees
            .find_direct_reports(manager_id)
            .await?
            .into_iter()
            .map(|e| e.id)
            .collect())
    }

    /// Direct-report check used for manager scoping.
    pub async fn is_direct_report(
        &self,
        manager_id: Uuid,
        employee_id: Uuid,
    ) -> Result<bool, TargetError> {
        Ok(self
            .employees
            .is_direct_report(manager_id, employee_id)
            .await?)
    }
}

fn already_exists(employee_id: Uuid, target_month: &str) -> TargetError {
    TargetError::AlreadyExists {
        employee_id,
        target_month: target_month.to_string(),
    }
}
