//! Authentication, authorization and activity-recording middleware.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`auth::MaybeAuthUser`] -- Same, but optional for public endpoints.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role.
//! - [`activity::record_activity`] -- Page-view and error-log recording.

pub mod activity;
pub mod auth;
pub mod rbac;
