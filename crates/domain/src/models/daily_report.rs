//! Daily report models.
//!
//! A daily report holds the actual values an employee achieved for their
//! tracked parameters on one date. Reports feed the performance aggregation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;
use validator::Validate;

/// A submitted daily report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DailyReport {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub report_date: NaiveDate,
    pub parameter_values: HashMap<String, f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validates every submitted value is a finite, non-negative number.
pub fn validate_parameter_values(
    values: &HashMap<String, f64>,
) -> Result<(), validator::ValidationError> {
    for (name, value) in values {
        shared::validation::validate_parameter_name(name)?;
        shared::validation::validate_metric_value(*value)?;
    }
    Ok(())
}

/// Request payload for submitting a daily report.
///
/// Submitting twice for the same date replaces the earlier values.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct SubmitDailyReportRequest {
    pub report_date: NaiveDate,

    #[validate(length(min = 1, max = 50, message = "Reports need 1 to 50 values"))]
    #[validate(custom(function = "validate_parameter_values"))]
    pub parameter_values: HashMap<String, f64>,
}

/// Query parameters for listing daily reports.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub struct ListDailyReportsQuery {
    pub employee_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Response for listing daily reports.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListDailyReportsResponse {
    pub data: Vec<DailyReport>,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_request_valid() {
        let request = SubmitDailyReportRequest {
            report_date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            parameter_values: HashMap::from([("calls".to_string(), 12.0)]),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_submit_request_rejects_negative_values() {
        let request = SubmitDailyReportRequest {
            report_date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            parameter_values: HashMap::from([("calls".to_string(), -1.0)]),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_submit_request_rejects_empty_values() {
        let request = SubmitDailyReportRequest {
            report_date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            parameter_values: HashMap::new(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_deserialize_request() {
        let request: SubmitDailyReportRequest = serde_json::from_str(
            r#"{"report_date": "2024-03-05", "parameter_values": {"calls": 9, "meetings": 2.5}}"#,
        )
        .unwrap();
        assert_eq!(request.parameter_values["calls"], 9.0);
        assert_eq!(request.parameter_values["meetings"], 2.5);
    }
}
