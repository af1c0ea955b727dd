//! Telegram admin bot for the MovieHub backend.
//!
//! Long-polls the Telegram Bot API, answers allow-listed administrators by
//! calling the backend's `/admin/*` endpoints and rendering the JSON reports
//! as chat messages.

pub mod admin_api;
pub mod bot;
pub mod commands;
pub mod config;
pub mod format;
pub mod telegram;
