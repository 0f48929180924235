//! Domain models for the HR backend.

pub mod daily_report;
pub mod employee;
pub mod feedback;
pub mod holiday;
pub mod performance;
pub mod target;

pub use daily_report::{DailyReport, SubmitDailyReportRequest};
pub use employee::{Employee, EmployeeRole, EmployeeSummary};
pub use feedback::{Feedback, FeedbackStatistics, FeedbackSubject};
pub use holiday::Holiday;
pub use performance::{
    DateRange, EmployeeReportPerformance, ParameterPerformance, ReportPeriod,
    TeamReportPerformance, TimeBucketData,
};
pub use target::{Target, TargetParameter, TargetStatus};
