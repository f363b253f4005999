//! The datasource tool

use crate::config::DatasourceConfig;
use crate::error::{DatasourceError, Result};
use agent_core::Result as AgentResult;
use agent_llm::providers::LaminiFactory;
use agent_llm::{Answer, EngineFactory, EngineSettings, LlmType, Question, TypedEngine};
use agent_tools::{Tool, ToolRun};
use agent_utils::Settings;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Name the tool is registered under
pub const TOOL_NAME: &str = "datasource";

const TOOL_DESCRIPTION: &str = "useful for when you need to answer questions";

/// Answers a question by asking a hosted LLM engine
///
/// The API key is looked up on every call, so rotating it does not require
/// rebuilding the tool. The question is forwarded verbatim; the answer is
/// returned verbatim.
///
/// # Example
///
/// ```no_run
/// use agent_core::Context;
/// use agent_datasource::DatasourceTool;
/// use agent_tools::ToolRun;
///
/// # async fn example() -> agent_datasource::Result<()> {
/// let tool = DatasourceTool::from_env()?;
/// let run = ToolRun::new(Context::new().with_agent_id("agent-1"));
///
/// let answer = tool.ask("What is the capital of France?", &run).await?;
/// println!("{answer}");
/// # Ok(())
/// # }
/// ```
pub struct DatasourceTool {
    factory: Arc<dyn EngineFactory>,
    settings: Settings,
    config: DatasourceConfig,
}

impl DatasourceTool {
    /// Create a tool that builds engines with `factory`
    ///
    /// Reads the API key from the process environment and `./.env`.
    pub fn new(factory: Arc<dyn EngineFactory>) -> Self {
        Self {
            factory,
            settings: Settings::new(),
            config: DatasourceConfig::default(),
        }
    }

    /// Create a tool backed by the Lamini HTTP engine, configured from the environment
    pub fn from_env() -> Result<Self> {
        let factory = LaminiFactory::from_env()?;
        Ok(Self::new(Arc::new(factory)))
    }

    /// Use a custom configuration
    pub fn with_config(mut self, config: DatasourceConfig) -> Self {
        self.config = config;
        self
    }

    /// Look the API key up in `settings` instead of the environment
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Get the current configuration
    pub fn config(&self) -> &DatasourceConfig {
        &self.config
    }

    /// Ask a question without blocking the caller's thread
    #[instrument(skip(self, question, run), fields(model = %self.config.model_name))]
    pub async fn ask(&self, question: &str, run: &ToolRun) -> Result<String> {
        let engine = self.connect(run)?;

        run.report(TOOL_NAME, &format!("Asking {}", engine.model_name()));
        let answer: Answer = engine.call(&Question::new(question)).await?;

        debug!(answer_len = answer.answer.len(), "Received answer");
        Ok(answer.answer)
    }

    /// Ask a question, blocking the caller's thread until the engine answers
    pub fn ask_blocking(&self, question: &str, run: &ToolRun) -> Result<String> {
        agent_tools::blocking::block_on(self.ask(question, run))
            .map_err(|e| DatasourceError::Runtime(e.to_string()))?
    }

    /// Resolve per-call settings and open an engine
    ///
    /// Shared by both call paths. Fails before any request is sent when the
    /// agent id or API key is missing.
    fn connect(&self, run: &ToolRun) -> Result<TypedEngine> {
        let agent_id = run
            .context()
            .agent_id()
            .or(self.config.default_agent_id.as_deref())
            .ok_or_else(|| {
                DatasourceError::Configuration(
                    "no agent id in the call context and no default configured".to_string(),
                )
            })?;

        let api_key = self.settings.require(&self.config.api_key_var)?;

        let engine = self.factory.connect(EngineSettings::new(
            agent_id,
            &self.config.model_name,
            api_key,
        ))?;
        Ok(engine)
    }
}

/// Read the question out of tool parameters
///
/// Accepts `{"question": "..."}` or a bare JSON string.
fn parse_question(params: Value) -> Result<String> {
    match params {
        Value::String(question) => Ok(question),
        other => serde_json::from_value::<Question>(other)
            .map(|q| q.question)
            .map_err(|e| DatasourceError::InvalidInput(format!("expected a question: {e}"))),
    }
}

#[async_trait]
impl Tool for DatasourceTool {
    async fn execute(&self, params: Value, run: &ToolRun) -> AgentResult<Value> {
        let question = parse_question(params)?;
        let answer = self.ask(&question, run).await?;
        Ok(Value::String(answer))
    }

    fn execute_blocking(&self, params: Value, run: &ToolRun) -> AgentResult<Value> {
        let question = parse_question(params)?;
        let answer = self.ask_blocking(&question, run)?;
        Ok(Value::String(answer))
    }

    fn name(&self) -> &str {
        TOOL_NAME
    }

    fn description(&self) -> &str {
        TOOL_DESCRIPTION
    }

    fn input_schema(&self) -> Value {
        Question::json_schema()
    }
}
