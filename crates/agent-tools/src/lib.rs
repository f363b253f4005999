//! Tool management and execution framework for agent-rs
//!
//! This crate provides the contract a tool implements, the per-invocation
//! run handle carrying context and progress callbacks, and a registry that
//! dispatches calls by name in either blocking or async mode.

pub mod blocking;
pub mod callbacks;
pub mod registry;
pub mod tool;

pub use callbacks::{ToolCallbacks, ToolRun, TracingCallbacks};
pub use registry::ToolRegistry;
pub use tool::Tool;
