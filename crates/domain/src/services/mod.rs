//! Domain services for the HR backend.
//!
//! Services contain business logic that operates on domain models.

pub mod calendar;
pub mod performance;

pub use calendar::WorkingCalendar;

pub use performance::{
    aggregate_employee, aggregate_team, build_buckets, covering_months, resolve_range,
    AggregationError, AggregationOptions, OverallWeighting, ProrationMode, MAX_RANGE_DAYS,
};
