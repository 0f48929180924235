//! Application services.
//!
//! Services sit between the route handlers and the repositories. They own the
//! rules that need more than one query (existence checks, bulk loops, loading
//! aggregation inputs); access control stays in the handlers.

pub mod feedback;
pub mod performance;
pub mod targets;

pub use feedback::{FeedbackError, FeedbackService};
pub use performance::{PerformanceError, PerformanceService};
pub use targets::{TargetError, TargetService};

/// True when the error is a unique-constraint violation (SQLSTATE 23505).
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}
