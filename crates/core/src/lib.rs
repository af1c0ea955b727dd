//! Domain types and rules shared by the database layer, the HTTP API and the
//! admin bot. Nothing in this crate performs I/O.

pub mod analytics;
pub mod error;
pub mod lists;
pub mod rating;
pub mod roles;
pub mod search;
pub mod types;
