//! Per-invocation run handle and progress callbacks

use agent_core::{Context, Error, Result};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Receives progress events while a tool runs
///
/// Every method has a no-op default, so implementors only override what
/// they care about. Callbacks are synchronous and are invoked from both the
/// blocking and the async call paths.
pub trait ToolCallbacks: Send + Sync {
    /// Called before the tool starts
    fn on_tool_start(&self, _tool: &str, _input: &Value) {}

    /// Called when the tool reports intermediate progress
    fn on_text(&self, _tool: &str, _text: &str) {}

    /// Called after the tool returns successfully
    fn on_tool_end(&self, _tool: &str, _output: &Value, _elapsed: Duration) {}

    /// Called after the tool fails
    fn on_tool_error(&self, _tool: &str, _error: &Error, _elapsed: Duration) {}
}

/// Callbacks that forward every event to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingCallbacks;

impl ToolCallbacks for TracingCallbacks {
    fn on_tool_start(&self, tool: &str, _input: &Value) {
        info!(tool, "Tool started");
    }

    fn on_text(&self, tool: &str, text: &str) {
        info!(tool, "{text}");
    }

    fn on_tool_end(&self, tool: &str, _output: &Value, elapsed: Duration) {
        info!(tool, elapsed_ms = elapsed.as_millis() as u64, "Tool finished");
    }

    fn on_tool_error(&self, tool: &str, error: &Error, elapsed: Duration) {
        warn!(tool, elapsed_ms = elapsed.as_millis() as u64, %error, "Tool failed");
    }
}

/// Everything a tool gets besides its parameters
///
/// Carries the caller's [`Context`] and, optionally, a progress reporter.
#[derive(Clone, Default)]
pub struct ToolRun {
    context: Context,
    callbacks: Option<Arc<dyn ToolCallbacks>>,
}

impl ToolRun {
    /// Create a run handle for `context` with no callbacks
    pub fn new(context: Context) -> Self {
        Self {
            context,
            callbacks: None,
        }
    }

    /// Attach a progress reporter
    pub fn with_callbacks(mut self, callbacks: Arc<dyn ToolCallbacks>) -> Self {
        self.callbacks = Some(callbacks);
        self
    }

    /// Call metadata
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// The attached progress reporter, if any
    pub fn callbacks(&self) -> Option<&Arc<dyn ToolCallbacks>> {
        self.callbacks.as_ref()
    }

    /// Report intermediate progress for `tool`
    pub fn report(&self, tool: &str, text: &str) {
        debug!(tool, "{text}");
        if let Some(callbacks) = &self.callbacks {
            callbacks.on_text(tool, text);
        }
    }

    pub(crate) fn start(&self, tool: &str, input: &Value) {
        if let Some(callbacks) = &self.callbacks {
            callbacks.on_tool_start(tool, input);
        }
    }

    pub(crate) fn finish(&self, tool: &str, result: &Result<Value>, elapsed: Duration) {
        let Some(callbacks) = &self.callbacks else {
            return;
        };
        match result {
            Ok(output) => callbacks.on_tool_end(tool, output, elapsed),
            Err(error) => callbacks.on_tool_error(tool, error, elapsed),
        }
    }
}

impl fmt::Debug for ToolRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRun")
            .field("context", &self.context)
            .field("callbacks", &self.callbacks.is_some())
            .finish()
    }
}
