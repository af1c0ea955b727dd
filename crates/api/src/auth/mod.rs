//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT access-token generation, validation, and refresh-token helpers.
//! - [`yandex`] -- Yandex OAuth authorization-code client.

pub mod jwt;
pub mod password;
pub mod yandex;
