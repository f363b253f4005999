//! Shared utilities for agent-rs
//!
//! This crate provides common functionality used across the agent-rs workspace:
//! tracing setup and configuration lookup.

pub mod config;
pub mod logging;

pub use config::{ConfigError, Settings};
pub use logging::{init_tracing, init_tracing_json};
