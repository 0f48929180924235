//! Shared utilities and common types for the HR Manager backend.
//!
//! This crate provides common functionality used across all other crates:
//! - JWT access token validation (RS256)
//! - Offset pagination helpers
//! - Common validation logic

pub mod jwt;
pub mod pagination;
pub mod validation;
