//! Row models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - Create DTOs for inserts
//! - Update DTOs (all `Option` fields) for patches

pub mod activity;
pub mod admin_stats;
pub mod list;
pub mod movie;
pub mod review;
pub mod session;
pub mod user;
