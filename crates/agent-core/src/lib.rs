//! Core abstractions shared across agent-rs
//!
//! This crate defines the call context handed to tools and the error type
//! that every tool invocation reports through.

pub mod context;
pub mod error;

pub use context::Context;
pub use error::{Error, Result};
