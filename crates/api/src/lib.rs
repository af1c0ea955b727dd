//! Movie catalog API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes, admin
//! analytics) so integration tests and the binary entrypoint can both access
//! them.

pub mod admin_stats;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod router;
pub mod routes;
pub mod state;
