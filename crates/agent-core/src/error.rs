//! Error types for agent-core

use thiserror::Error;

/// Result type alias for agent-core
pub type Result<T> = std::result::Result<T, Error>;

/// Error type shared by tools and the code that invokes them
#[derive(Error, Debug)]
pub enum Error {
    /// A required setting is missing or unusable
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The remote service failed, timed out, or answered with something unreadable
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Tool parameters did not match the tool's input schema
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No tool with this name is registered
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Processing failed for another reason
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

impl Error {
    /// Whether this error came from local configuration rather than the remote side
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Whether this error came from the remote service
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream(_))
    }
}
