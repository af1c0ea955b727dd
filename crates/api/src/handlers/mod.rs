//! Request handlers.
//!
//! Each submodule provides the async handler functions for one resource.
//! Handlers delegate to the repositories in `moviehub_db` and map errors via
//! [`AppError`](crate::error::AppError).

pub mod admin;
pub mod lists;
pub mod movies;
pub mod oauth;
pub mod reviews;
pub mod users;
