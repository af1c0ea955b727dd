//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod activity_repo;
pub mod admin_stats_repo;
pub mod list_repo;
pub mod movie_repo;
pub mod review_repo;
pub mod session_repo;
pub mod user_repo;

pub use activity_repo::ActivityLogRepo;
pub use admin_stats_repo::AdminStatsRepo;
pub use list_repo::ListRepo;
pub use movie_repo::MovieRepo;
pub use review_repo::ReviewRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
