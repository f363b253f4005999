//! Tool registry for managing and invoking tools

use crate::{Tool, ToolRun};
use agent_core::{Error, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;
use tracing::debug;

/// Registry for managing tools
#[derive(Default)]
pub struct ToolRegistry {
    tools: RwLock<HashMap<String, Arc<dyn Tool>>>,
}

impl ToolRegistry {
    /// Create a new tool registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any tool with the same name
    pub fn register(&self, tool: Arc<dyn Tool>) {
        let mut tools = self.tools.write().unwrap_or_else(PoisonError::into_inner);
        tools.insert(tool.name().to_string(), tool);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        let tools = self.tools.read().unwrap_or_else(PoisonError::into_inner);
        tools.get(name).cloned()
    }

    /// List all registered tools
    pub fn list_tools(&self) -> Vec<Arc<dyn Tool>> {
        let tools = self.tools.read().unwrap_or_else(PoisonError::into_inner);
        tools.values().cloned().collect()
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Invoke a tool by name from async code
    ///
    /// Fires `on_tool_start` before the call and `on_tool_end` or
    /// `on_tool_error` after it. The tool's result is returned unchanged.
    pub async fn invoke(&self, name: &str, params: Value, run: &ToolRun) -> Result<Value> {
        let tool = self.lookup(name, run)?;

        run.start(name, &params);
        let started = Instant::now();
        let result = tool.execute(params, run).await;
        run.finish(name, &result, started.elapsed());

        result
    }

    /// Invoke a tool by name, blocking the calling thread
    pub fn invoke_blocking(&self, name: &str, params: Value, run: &ToolRun) -> Result<Value> {
        let tool = self.lookup(name, run)?;

        run.start(name, &params);
        let started = Instant::now();
        let result = tool.execute_blocking(params, run);
        run.finish(name, &result, started.elapsed());

        result
    }

    fn lookup(&self, name: &str, run: &ToolRun) -> Result<Arc<dyn Tool>> {
        let context = run.context();
        debug!(
            tool = name,
            agent_id = context.agent_id(),
            session_id = context.session_id(),
            "Dispatching tool call"
        );
        self.get(name)
            .ok_or_else(|| Error::ToolNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ToolCallbacks;
    use agent_core::Context;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;
    use std::time::Duration;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        async fn execute(&self, params: Value, run: &ToolRun) -> Result<Value> {
            run.report(self.name(), "echoing");
            Ok(json!({
                "echo": params,
                "agent_id": run.context().agent_id(),
            }))
        }

        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Returns its input"
        }

        fn input_schema(&self) -> Value {
            json!({ "type": "object" })
        }
    }

    struct FailingTool;

    #[async_trait]
    impl Tool for FailingTool {
        async fn execute(&self, _params: Value, _run: &ToolRun) -> Result<Value> {
            Err(Error::Upstream("engine unavailable".to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }

        fn description(&self) -> &str {
            "Always fails"
        }

        fn input_schema(&self) -> Value {
            json!({ "type": "object" })
        }
    }

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    impl ToolCallbacks for Recorder {
        fn on_tool_start(&self, tool: &str, _input: &Value) {
            self.events.lock().unwrap().push(format!("start:{tool}"));
        }

        fn on_text(&self, tool: &str, text: &str) {
            self.events.lock().unwrap().push(format!("text:{tool}:{text}"));
        }

        fn on_tool_end(&self, tool: &str, _output: &Value, _elapsed: Duration) {
            self.events.lock().unwrap().push(format!("end:{tool}"));
        }

        fn on_tool_error(&self, tool: &str, error: &Error, _elapsed: Duration) {
            self.events.lock().unwrap().push(format!("error:{tool}:{error}"));
        }
    }

    fn registry() -> ToolRegistry {
        let registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));
        registry.register(Arc::new(FailingTool));
        registry
    }

    #[test]
    fn test_register_and_list() {
        let registry = registry();
        assert_eq!(registry.len(), 2);
        assert!(!registry.is_empty());
        assert!(registry.get("echo").is_some());
        assert!(registry.get("missing").is_none());
        assert_eq!(registry.list_tools().len(), 2);
    }

    #[tokio::test]
    async fn test_invoke_fires_callbacks() {
        let recorder = Arc::new(Recorder::default());
        let run = ToolRun::new(Context::new().with_agent_id("agent-1").with_session_id("sess-1"))
            .with_callbacks(recorder.clone());

        let output = registry()
            .invoke("echo", json!({ "x": 1 }), &run)
            .await
            .unwrap();

        assert_eq!(output["echo"], json!({ "x": 1 }));
        assert_eq!(output["agent_id"], "agent-1");
        assert_eq!(
            recorder.events(),
            vec!["start:echo", "text:echo:echoing", "end:echo"]
        );
    }

    #[tokio::test]
    async fn test_invoke_reports_errors() {
        let recorder = Arc::new(Recorder::default());
        let run = ToolRun::default().with_callbacks(recorder.clone());

        let result = registry().invoke("failing", json!({}), &run).await;

        assert!(matches!(result, Err(Error::Upstream(_))));
        assert_eq!(
            recorder.events(),
            vec!["start:failing", "error:failing:Upstream error: engine unavailable"]
        );
    }

    #[test]
    fn test_invoke_unknown_tool() {
        let recorder = Arc::new(Recorder::default());
        let run = ToolRun::default().with_callbacks(recorder.clone());

        let result = registry().invoke_blocking("missing", json!({}), &run);

        assert!(matches!(result, Err(Error::ToolNotFound(name)) if name == "missing"));
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn test_blocking_matches_async() {
        let registry = registry();
        let run = ToolRun::new(Context::new().with_agent_id("agent-1"));
        let params = json!({ "question": "same" });

        let blocking = registry.invoke_blocking("echo", params.clone(), &run).unwrap();
        let suspended = tokio_test::block_on(registry.invoke("echo", params, &run)).unwrap();

        assert_eq!(blocking, suspended);
    }
}
