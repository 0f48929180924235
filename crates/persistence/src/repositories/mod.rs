//! Repository implementations for database operations.

pub mod daily_report;
pub mod employee;
pub mod feedback;
pub mod holiday;
pub mod target;

pub use daily_report::DailyReportRepository;
pub use employee::EmployeeRepository;
pub use feedback::{FeedbackFilter, FeedbackRepository};
pub use holiday::HolidayRepository;
pub use target::{TargetFilter, TargetRepository};
