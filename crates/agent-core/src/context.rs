//! Call metadata handed to tools
//!
//! A `Context` is a small key-value bag that travels with a single tool
//! invocation. The hosting framework fills it in; tools only read from it.

use std::collections::HashMap;

/// Well-known context keys
pub mod keys {
    /// Identifier of the calling agent, forwarded to the inference engine
    pub const AGENT_ID: &str = "agent_id";
    /// Session ID for tracking
    pub const SESSION_ID: &str = "session_id";
}

/// Metadata for one tool invocation
///
/// # Example
///
/// ```
/// use agent_core::Context;
///
/// let ctx = Context::new()
///     .with_agent_id("agent-7")
///     .with_session_id("session-123");
///
/// assert_eq!(ctx.agent_id(), Some("agent-7"));
/// assert_eq!(ctx.session_id(), Some("session-123"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    data: HashMap<String, serde_json::Value>,
}

impl Context {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the agent ID
    pub fn with_agent_id(mut self, agent_id: impl Into<String>) -> Self {
        self.insert(keys::AGENT_ID, serde_json::json!(agent_id.into()));
        self
    }

    /// Set the session ID
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.insert(keys::SESSION_ID, serde_json::json!(session_id.into()));
        self
    }

    /// Get the agent ID, if one was supplied and is a non-empty string
    pub fn agent_id(&self) -> Option<&str> {
        self.get_str(keys::AGENT_ID).filter(|id| !id.is_empty())
    }

    /// Get the session ID
    pub fn session_id(&self) -> Option<&str> {
        self.get_str(keys::SESSION_ID)
    }

    /// Insert a value into the context
    pub fn insert(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.data.insert(key.into(), value);
    }

    /// Get a value from the context
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    /// Get a string value from the context
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_id() {
        let ctx = Context::new().with_agent_id("agent-1");
        assert_eq!(ctx.agent_id(), Some("agent-1"));
        assert_eq!(ctx.get(keys::AGENT_ID), Some(&serde_json::json!("agent-1")));
    }

    #[test]
    fn test_empty_agent_id_is_absent() {
        let ctx = Context::new().with_agent_id("");
        assert_eq!(ctx.agent_id(), None);

        let mut ctx = Context::new();
        ctx.insert(keys::AGENT_ID, serde_json::json!(42));
        assert_eq!(ctx.agent_id(), None);
    }

    #[test]
    fn test_builder_chain() {
        let ctx = Context::new()
            .with_agent_id("agent-1")
            .with_session_id("sess-123");

        assert_eq!(ctx.agent_id(), Some("agent-1"));
        assert_eq!(ctx.session_id(), Some("sess-123"));
        assert_eq!(ctx.get_str("missing"), None);
    }
}
