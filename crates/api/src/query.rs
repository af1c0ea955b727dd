//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Generic pagination parameters (`?skip=&limit=`).
///
/// Values are clamped in the handler via `clamp_limit` / `clamp_offset`.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}
