//! Employee domain models and role hierarchy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Role of an employee within the HR system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeRole {
    Admin,
    Hr,
    Manager,
    Employee,
}

impl EmployeeRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeRole::Admin => "admin",
            EmployeeRole::Hr => "hr",
            EmployeeRole::Manager => "manager",
            EmployeeRole::Employee => "employee",
        }
    }

    /// Admin and HR see and manage every employee.
    pub fn is_hr_or_admin(&self) -> bool {
        matches!(self, EmployeeRole::Admin | EmployeeRole::Hr)
    }

    /// Roles allowed to assign targets and view team performance.
    pub fn can_manage_targets(&self) -> bool {
        matches!(
            self,
            EmployeeRole::Admin | EmployeeRole::Hr | EmployeeRole::Manager
        )
    }

    /// Returns true if the role is one of `allowed`.
    pub fn is_one_of(&self, allowed: &[EmployeeRole]) -> bool {
        allowed.contains(self)
    }
}

impl FromStr for EmployeeRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(EmployeeRole::Admin),
            "hr" => Ok(EmployeeRole::Hr),
            "manager" => Ok(EmployeeRole::Manager),
            "employee" => Ok(EmployeeRole::Employee),
            _ => Err(format!("Invalid employee role: {}", s)),
        }
    }
}

impl fmt::Display for EmployeeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An employee record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Employee {
    pub id: Uuid,
    pub employee_code: String,
    pub full_name: String,
    pub email: String,
    pub role: EmployeeRole,
    pub manager_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Compact employee info embedded in team responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EmployeeSummary {
    pub id: Uuid,
    pub employee_code: String,
    pub full_name: String,
    pub email: String,
}

impl From<&Employee> for EmployeeSummary {
    fn from(employee: &Employee) -> Self {
        Self {
            id: employee.id,
            employee_code: employee.employee_code.clone(),
            full_name: employee.full_name.clone(),
            email: employee.email.clone(),
        }
    }
}

/// Request payload for creating an employee.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateEmployeeRequest {
    #[validate(length(
        min = 1,
        max = 32,
        message = "Employee code must be between 1 and 32 characters"
    ))]
    pub employee_code: String,

    #[validate(length(
        min = 1,
        max = 120,
        message = "Full name must be between 1 and 120 characters"
    ))]
    pub full_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub role: EmployeeRole,

    pub manager_id: Option<Uuid>,
}

/// Query parameters for listing employees.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub struct ListEmployeesQuery {
    pub role: Option<EmployeeRole>,
    pub manager_id: Option<Uuid>,
}

/// Response for listing employees.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListEmployeesResponse {
    pub data: Vec<Employee>,
    pub count: usize,
}
