//! Configuration for the datasource tool

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "chat/gpt-3.5-turbo";

/// Setting that holds the engine API key
pub const DEFAULT_API_KEY_VAR: &str = "LAMINI_API_KEY";

/// Configuration for [`DatasourceTool`](crate::DatasourceTool)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasourceConfig {
    /// Model the question is sent to
    pub model_name: String,

    /// Name of the setting holding the API key, read on every call
    pub api_key_var: String,

    /// Agent id used when the call context does not carry one
    pub default_agent_id: Option<String>,
}

impl Default for DatasourceConfig {
    fn default() -> Self {
        Self {
            model_name: DEFAULT_MODEL.to_string(),
            api_key_var: DEFAULT_API_KEY_VAR.to_string(),
            default_agent_id: None,
        }
    }
}

impl DatasourceConfig {
    /// Create a config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different model
    pub fn with_model(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    /// Read the API key from a different setting
    pub fn with_api_key_var(mut self, var: impl Into<String>) -> Self {
        self.api_key_var = var.into();
        self
    }

    /// Fall back to this agent id when the context has none
    pub fn with_default_agent_id(mut self, agent_id: impl Into<String>) -> Self {
        self.default_agent_id = Some(agent_id.into());
        self
    }
}
