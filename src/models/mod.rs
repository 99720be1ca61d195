//! Request-scoped models and configuration.

pub mod auth;
pub mod config;
