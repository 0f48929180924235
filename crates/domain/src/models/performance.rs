//! Performance report models.
//!
//! Everything in this module is derived on request from targets and daily
//! reports. Nothing here is persisted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Reporting period requested by the client.
///
/// The period picks both the default date window and the bucket granularity:
/// weekly reports bucket by day, monthly by ISO week, quarterly and annual by month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    Weekly,
    #[default]
    Monthly,
    Quarterly,
    Annual,
}

impl ReportPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportPeriod::Weekly => "weekly",
            ReportPeriod::Monthly => "monthly",
            ReportPeriod::Quarterly => "quarterly",
            ReportPeriod::Annual => "annual",
        }
    }
}

impl FromStr for ReportPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "weekly" => Ok(ReportPeriod::Weekly),
            "monthly" => Ok(ReportPeriod::Monthly),
            "quarterly" => Ok(ReportPeriod::Quarterly),
            "annual" => Ok(ReportPeriod::Annual),
            _ => Err(format!("Invalid report period: {}", s)),
        }
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Query parameters for employee performance endpoints.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub struct PerformanceQuery {
    #[serde(default)]
    pub period: ReportPeriod,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Query parameters for the team performance endpoint.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub struct TeamPerformanceQuery {
    /// Defaults to the caller when omitted.
    pub manager_id: Option<Uuid>,
    #[serde(default)]
    pub period: ReportPeriod,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl TeamPerformanceQuery {
    pub fn performance_query(&self) -> PerformanceQuery {
        PerformanceQuery {
            period: self.period,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

/// An inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a range; `None` when `end` is before `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of calendar days, both ends included.
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Iterates every date in the range.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

/// Whole-period performance for one tracked parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ParameterPerformance {
    pub param_key: String,
    pub param_label: String,
    pub param_type: String,
    /// Monthly target figure from the latest target in range.
    pub target: f64,
    pub total_target: f64,
    pub total_actual: f64,
    pub achievement_pct: f64,
    pub average_daily: f64,
    pub days_reported: u32,
}

/// One parameter inside a time bucket.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct BucketParameter {
    pub actual: f64,
    pub target: f64,
    pub achievement_pct: f64,
}

/// A sub-interval of the reporting range.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TimeBucketData {
    pub bucket_label: String,
    pub bucket_start: NaiveDate,
    pub bucket_end: NaiveDate,
    pub parameters: BTreeMap<String, BucketParameter>,
    pub submission_count: u32,
    pub expected_submissions: u32,
}

/// Short reference to the best or worst parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ParameterHighlight {
    pub param_key: String,
    pub param_label: String,
    pub achievement_pct: f64,
}

impl From<&ParameterPerformance> for ParameterHighlight {
    fn from(p: &ParameterPerformance) -> Self {
        Self {
            param_key: p.param_key.clone(),
            param_label: p.param_label.clone(),
            achievement_pct: p.achievement_pct,
        }
    }
}

/// Performance of one employee over a period.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EmployeeReportPerformance {
    pub employee_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_name: Option<String>,
    pub period: ReportPeriod,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub parameters: Vec<ParameterPerformance>,
    pub buckets: Vec<TimeBucketData>,
    pub overall_achievement_pct: f64,
    /// Percentage of expected working-day reports actually submitted.
    pub submission_rate: f64,
    pub total_submissions: u32,
    pub expected_submissions: u32,
    pub best_parameter: Option<ParameterHighlight>,
    pub worst_parameter: Option<ParameterHighlight>,
}

/// Team mean for one parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ParameterAverage {
    pub param_key: String,
    pub param_label: String,
    pub average_achievement_pct: f64,
    /// Number of employees tracking this parameter.
    pub employee_count: u32,
}

/// Performance of a manager's team over a period.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TeamReportPerformance {
    pub manager_id: Uuid,
    pub period: ReportPeriod,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub employees: Vec<EmployeeReportPerformance>,
    pub team_average_achievement: f64,
    pub team_average_submission_rate: f64,
    pub parameter_averages: Vec<ParameterAverage>,
}
