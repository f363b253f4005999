//! Tool trait definition

use crate::ToolRun;
use agent_core::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Trait for tools that agents can execute
///
/// Tools are named capabilities an agent can call. Each tool provides a name,
/// a description that tells the model when to use it, and a JSON schema for
/// its input. Tools can be driven from async code with [`Tool::execute`] or
/// from synchronous code with [`Tool::execute_blocking`]; both must produce
/// the same result for the same input.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Execute the tool with given parameters
    ///
    /// # Arguments
    ///
    /// * `params` - Tool input as JSON value (should match input_schema)
    /// * `run` - Call metadata and optional progress callbacks
    async fn execute(&self, params: Value, run: &ToolRun) -> Result<Value>;

    /// Execute the tool, blocking the calling thread until it finishes
    ///
    /// The default drives [`Tool::execute`] on a dedicated runtime.
    fn execute_blocking(&self, params: Value, run: &ToolRun) -> Result<Value> {
        crate::blocking::block_on(self.execute(params, run))?
    }

    /// Get the tool's name
    ///
    /// Must be unique within a ToolRegistry
    fn name(&self) -> &str;

    /// Get the tool's description
    fn description(&self) -> &str;

    /// Get the tool's input schema (JSON Schema format)
    fn input_schema(&self) -> Value;
}
