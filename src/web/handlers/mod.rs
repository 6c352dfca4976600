//! # Web API Handlers
//!
//! Thin axum handlers: probes read the shared health flags, prediction runs
//! validation then inference and maps failures onto [`ApiError`](super::response_types::ApiError).

pub mod health;
pub mod predict;
