//! Inference engine boundary
//!
//! [`InferenceEngine`] is the transport: one JSON request in, one JSON object
//! out. [`TypedEngine`] binds a transport to an agent id and a model name and
//! maps typed records onto it. [`EngineFactory`] is the only place engines are
//! built, so blocking and async callers share the same construction path.

use crate::{LLMError, LlmType, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// One request to the inference engine
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InferenceRequest {
    /// Identifier of the calling agent
    pub id: String,
    /// Model to run
    pub model_name: String,
    /// Serialized input record
    pub in_value: Value,
    /// Expected output shape (`{field: type_tag}`)
    pub out_type: Map<String, Value>,
}

impl InferenceRequest {
    /// Build a request from a typed input and the output record type `O`
    pub fn typed<I: LlmType, O: LlmType>(
        id: impl Into<String>,
        model_name: impl Into<String>,
        input: &I,
    ) -> Result<Self> {
        Ok(Self {
            id: id.into(),
            model_name: model_name.into(),
            in_value: serde_json::to_value(input)?,
            out_type: O::output_type(),
        })
    }
}

/// Transport to a hosted inference engine
#[async_trait]
pub trait InferenceEngine: Send + Sync {
    /// Send one request and return the engine's raw JSON output
    async fn infer(&self, request: InferenceRequest) -> Result<Value>;
}

/// Everything needed to open an engine for one call
#[derive(Clone)]
pub struct EngineSettings {
    /// Identifier of the calling agent
    pub id: String,
    /// Model to run
    pub model_name: String,
    /// Secret used to authenticate with the engine
    pub api_key: String,
}

impl EngineSettings {
    /// Create settings for one call
    pub fn new(
        id: impl Into<String>,
        model_name: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            model_name: model_name.into(),
            api_key: api_key.into(),
        }
    }
}

impl fmt::Debug for EngineSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineSettings")
            .field("id", &self.id)
            .field("model_name", &self.model_name)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Builds engines from per-call settings
pub trait EngineFactory: Send + Sync {
    /// Open an engine bound to `settings`
    ///
    /// Must not contact the remote service; failures here are configuration
    /// errors.
    fn connect(&self, settings: EngineSettings) -> Result<TypedEngine>;
}

/// An engine bound to one agent id and model
#[derive(Clone)]
pub struct TypedEngine {
    transport: Arc<dyn InferenceEngine>,
    id: String,
    model_name: String,
}

impl TypedEngine {
    /// Bind a transport to an agent id and model
    pub fn new(
        transport: Arc<dyn InferenceEngine>,
        id: impl Into<String>,
        model_name: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            id: id.into(),
            model_name: model_name.into(),
        }
    }

    /// Agent id sent with every request
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Model sent with every request
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Run the model on `input` and decode the reply as `O`
    ///
    /// Issues exactly one request. A reply that does not match `O` is an
    /// [`LLMError::UnexpectedResponse`].
    pub async fn call<I: LlmType, O: LlmType>(&self, input: &I) -> Result<O> {
        let request = InferenceRequest::typed::<I, O>(&self.id, &self.model_name, input)?;
        let output = self.transport.infer(request).await?;

        debug!(model = %self.model_name, "Decoding engine output");

        serde_json::from_value(output.clone()).map_err(|e| {
            LLMError::UnexpectedResponse(format!(
                "output does not match the expected type: {e} (got {output})"
            ))
        })
    }
}

impl fmt::Debug for TypedEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedEngine")
            .field("id", &self.id)
            .field("model_name", &self.model_name)
            .finish_non_exhaustive()
    }
}
