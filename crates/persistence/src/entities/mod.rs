//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod daily_report;
pub mod employee;
pub mod feedback;
pub mod holiday;
pub mod target;

pub use daily_report::DailyReportEntity;
pub use employee::{EmployeeEntity, EmployeeRoleDb};
pub use feedback::{FeedbackEntity, FeedbackSubjectDb, SubjectCountEntity};
pub use holiday::HolidayEntity;
pub use target::TargetEntity;
