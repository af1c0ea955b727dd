//! Well-known role names and the ownership rule applied to user-owned
//! resources (reviews, lists).
//!
//! These must match the `CHECK` constraint in
//! `20260301000001_create_users_table.sql`.

use crate::error::CoreError;
use crate::types::DbId;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

/// Every role a user row may carry.
pub const VALID_ROLES: &[&str] = &[ROLE_USER, ROLE_ADMIN];

pub fn is_admin(role: &str) -> bool {
    role == ROLE_ADMIN
}

/// Validate a role name supplied by an admin when changing a user's role.
pub fn validate_role(role: &str) -> Result<(), CoreError> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown role '{role}'. Expected one of: {}",
            VALID_ROLES.join(", ")
        )))
    }
}

/// Allow the action when the actor owns the resource or is an admin.
///
/// `action` is used in the error message, e.g. "update this review".
pub fn ensure_owner_or_admin(
    owner_id: DbId,
    actor_id: DbId,
    actor_role: &str,
    action: &str,
) -> Result<(), CoreError> {
    if owner_id == actor_id || is_admin(actor_role) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!("Not enough permissions to {action}")))
    }
}
