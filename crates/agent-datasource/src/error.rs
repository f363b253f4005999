//! Error types for the datasource tool

use agent_llm::LLMError;
use agent_utils::ConfigError;
use thiserror::Error;

/// Datasource tool errors
#[derive(Debug, Error)]
pub enum DatasourceError {
    /// Required configuration is missing; nothing was sent
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The engine failed, timed out, or returned an unreadable answer
    #[error("Upstream error: {0}")]
    Upstream(#[source] LLMError),

    /// Tool parameters could not be read as a question
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The blocking call path could not drive the request
    #[error("Runtime error: {0}")]
    Runtime(String),
}

/// Result type alias for datasource operations
pub type Result<T> = std::result::Result<T, DatasourceError>;

impl From<LLMError> for DatasourceError {
    fn from(err: LLMError) -> Self {
        match err {
            LLMError::ConfigurationError(msg) => DatasourceError::Configuration(msg),
            other => DatasourceError::Upstream(other),
        }
    }
}

impl From<ConfigError> for DatasourceError {
    fn from(err: ConfigError) -> Self {
        DatasourceError::Configuration(err.to_string())
    }
}

/// Convert DatasourceError to agent_core::Error
impl From<DatasourceError> for agent_core::Error {
    fn from(err: DatasourceError) -> Self {
        match err {
            DatasourceError::Configuration(msg) => agent_core::Error::Configuration(msg),
            DatasourceError::Upstream(source) => agent_core::Error::Upstream(source.to_string()),
            DatasourceError::InvalidInput(msg) => agent_core::Error::InvalidInput(msg),
            DatasourceError::Runtime(msg) => agent_core::Error::ProcessingFailed(msg),
        }
    }
}
