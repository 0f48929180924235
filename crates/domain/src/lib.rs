//! Domain layer for the HR Manager backend.
//!
//! This crate contains:
//! - Domain models (Employee, Target, DailyReport, Holiday, Feedback)
//! - Performance aggregation over targets and daily reports
//! - Working-day calendar logic

pub mod models;
pub mod services;
