//! Admin analytics: report aggregation and the LLM-written summary.

pub mod llm;
pub mod report;
pub mod service;

pub use service::{AdminStatsService, FrontendProbe};
