//! Lamini inference engine over HTTP
//!
//! Requests are sent to `{api_base}/v1/completions` as
//! `{"id", "model_name", "in_value", "out_type"}` with a bearer token, and the
//! engine answers with a JSON object shaped like `out_type`.
//!
//! # Example
//!
//! ```no_run
//! use agent_llm::providers::LaminiFactory;
//! use agent_llm::{Answer, EngineFactory, EngineSettings, Question};
//!
//! # async fn example() -> agent_llm::Result<()> {
//! let factory = LaminiFactory::from_env()?;
//! let engine = factory.connect(EngineSettings::new(
//!     "agent-1",
//!     "chat/gpt-3.5-turbo",
//!     "my-api-key",
//! ))?;
//!
//! let answer: Answer = engine.call(&Question::new("What is Rust?")).await?;
//! println!("{}", answer.answer);
//! # Ok(())
//! # }
//! ```

use crate::{
    EngineFactory, EngineSettings, InferenceEngine, InferenceRequest, LLMError, Result,
    TypedEngine,
};
use agent_utils::Settings;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_LAMINI_API_BASE: &str = "https://api.lamini.ai";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Setting that overrides the API base URL
pub const API_URL_VAR: &str = "LAMINI_API_URL";
/// Setting that overrides the request timeout, in seconds
pub const TIMEOUT_VAR: &str = "LAMINI_TIMEOUT_SECS";

/// Configuration for the Lamini HTTP client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaminiConfig {
    /// Base URL of the engine (default: "https://api.lamini.ai")
    pub api_base: String,

    /// Request timeout in seconds (default: 120)
    pub timeout_secs: u64,
}

impl Default for LaminiConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_LAMINI_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl LaminiConfig {
    /// Create a config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Read optional overrides from the environment and `.env`
    pub fn from_env() -> Result<Self> {
        Self::from_settings(&Settings::new())
    }

    /// Read optional overrides from `settings`
    ///
    /// Uses `LAMINI_API_URL` and `LAMINI_TIMEOUT_SECS` when present.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_base = settings.get_or(API_URL_VAR, DEFAULT_LAMINI_API_BASE)?;
        let timeout_secs = settings
            .get_parsed::<u64>(TIMEOUT_VAR)?
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            api_base,
            timeout_secs,
        })
    }

    /// Set a custom API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    fn completions_url(&self) -> String {
        format!("{}/v1/completions", self.api_base.trim_end_matches('/'))
    }
}

/// Builds [`LaminiEngine`]s that share one HTTP client
#[derive(Debug, Clone)]
pub struct LaminiFactory {
    client: Client,
    config: LaminiConfig,
}

impl LaminiFactory {
    /// Create a factory with custom configuration
    pub fn with_config(config: LaminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a factory with default settings
    pub fn new() -> Result<Self> {
        Self::with_config(LaminiConfig::default())
    }

    /// Create a factory configured from the environment
    pub fn from_env() -> Result<Self> {
        Self::with_config(LaminiConfig::from_env()?)
    }

    /// Get the current configuration
    pub fn config(&self) -> &LaminiConfig {
        &self.config
    }
}

impl EngineFactory for LaminiFactory {
    fn connect(&self, settings: EngineSettings) -> Result<TypedEngine> {
        if settings.api_key.trim().is_empty() {
            return Err(LLMError::ConfigurationError(
                "Lamini API key is empty".to_string(),
            ));
        }

        let engine = LaminiEngine {
            client: self.client.clone(),
            url: self.config.completions_url(),
            api_key: settings.api_key,
        };

        Ok(TypedEngine::new(
            Arc::new(engine),
            settings.id,
            settings.model_name,
        ))
    }
}

/// One authenticated connection to the Lamini completions endpoint
pub struct LaminiEngine {
    client: Client,
    url: String,
    api_key: String,
}

#[async_trait]
impl InferenceEngine for LaminiEngine {
    #[instrument(skip(self, request), fields(model = %request.model_name, id = %request.id))]
    async fn infer(&self, request: InferenceRequest) -> Result<Value> {
        debug!("Sending request to Lamini at {}", self.url);

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(transport_error)?;

        if !status.is_success() {
            let error_text = String::from_utf8_lossy(&body).into_owned();

            return Err(match status.as_u16() {
                401 | 403 => LLMError::AuthenticationFailed,
                429 => LLMError::RateLimitExceeded(error_text),
                400 => LLMError::InvalidRequest(error_text),
                404 => LLMError::ModelNotFound(request.model_name),
                _ => LLMError::RequestFailed(format!("HTTP {status}: {error_text}")),
            });
        }

        let output: Value = serde_json::from_slice(&body).map_err(|e| {
            LLMError::UnexpectedResponse(format!("Failed to parse response: {e}"))
        })?;

        debug!("Received response from Lamini");

        Ok(output)
    }
}

/// The client timeout also covers reading the body, so both reads go through here
fn transport_error(err: reqwest::Error) -> LLMError {
    if err.is_timeout() {
        LLMError::Timeout(err.to_string())
    } else {
        LLMError::HttpError(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Answer, Question};
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::{IntoResponse, Response};
    use axum::{Json, Router, routing::post};
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    async fn spawn_stub(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{addr}")
    }

    async fn echo_completion(headers: HeaderMap, Json(body): Json<Value>) -> Response {
        let auth = headers.get("authorization").and_then(|v| v.to_str().ok());
        if auth != Some("Bearer test-key") {
            return (StatusCode::UNAUTHORIZED, "bad key").into_response();
        }
        if body["out_type"] != json!({ "answer": "str" }) {
            return (StatusCode::BAD_REQUEST, "unexpected out_type").into_response();
        }

        let answer = format!(
            "{}|{}|{}",
            body["id"].as_str().unwrap_or_default(),
            body["model_name"].as_str().unwrap_or_default(),
            body["in_value"]["question"].as_str().unwrap_or_default(),
        );
        Json(json!({ "answer": answer })).into_response()
    }

    async fn factory_for(app: Router) -> LaminiFactory {
        let base = spawn_stub(app).await;
        LaminiFactory::with_config(LaminiConfig::new().with_api_base(base).with_timeout(1)).unwrap()
    }

    fn settings(api_key: &str) -> EngineSettings {
        EngineSettings::new("agent-1", "chat/gpt-3.5-turbo", api_key)
    }

    #[test]
    fn test_config_defaults() {
        let factory = LaminiFactory::new().unwrap();
        assert_eq!(factory.config().api_base, "https://api.lamini.ai");
        assert_eq!(factory.config().timeout_secs, 120);
    }

    #[test]
    fn test_config_from_settings() {
        let settings = Settings::isolated()
            .with_override(API_URL_VAR, "http://localhost:5001/")
            .with_override(TIMEOUT_VAR, "15");

        let config = LaminiConfig::from_settings(&settings).unwrap();
        assert_eq!(config.api_base, "http://localhost:5001/");
        assert_eq!(config.timeout_secs, 15);
        assert_eq!(config.completions_url(), "http://localhost:5001/v1/completions");
    }

    #[test]
    fn test_config_rejects_bad_timeout() {
        let settings = Settings::isolated().with_override(TIMEOUT_VAR, "soon");
        let result = LaminiConfig::from_settings(&settings);
        assert!(matches!(result, Err(LLMError::ConfigurationError(_))));
    }

    #[test]
    fn test_connect_requires_key() {
        let factory = LaminiFactory::new().unwrap();
        let result = factory.connect(settings(""));
        assert!(matches!(result, Err(LLMError::ConfigurationError(_))));

        let engine = factory.connect(settings("k")).unwrap();
        assert_eq!(engine.id(), "agent-1");
        assert_eq!(engine.model_name(), "chat/gpt-3.5-turbo");
    }

    #[tokio::test]
    async fn test_round_trip_against_stub() {
        let app = Router::new().route("/v1/completions", post(echo_completion));
        let factory = factory_for(app).await;

        let engine = factory.connect(settings("test-key")).unwrap();
        let answer: Answer = engine.call(&Question::new("Why?")).await.unwrap();

        assert_eq!(answer.answer, "agent-1|chat/gpt-3.5-turbo|Why?");
    }

    #[tokio::test]
    async fn test_wrong_key_is_authentication_failure() {
        let app = Router::new().route("/v1/completions", post(echo_completion));
        let factory = factory_for(app).await;

        let engine = factory.connect(settings("other-key")).unwrap();
        let result = engine.call::<Question, Answer>(&Question::new("q")).await;

        assert!(matches!(result, Err(LLMError::AuthenticationFailed)));
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let app = Router::new()
            .route(
                "/busy/v1/completions",
                post(|| async { (StatusCode::TOO_MANY_REQUESTS, "slow down") }),
            )
            .route(
                "/broken/v1/completions",
                post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
            )
            .route(
                "/missing/v1/completions",
                post(|| async { (StatusCode::NOT_FOUND, "no such model") }),
            );
        let base = spawn_stub(app).await;

        let call = |path: &'static str| {
            let config = LaminiConfig::new().with_api_base(format!("{base}/{path}"));
            let factory = LaminiFactory::with_config(config).unwrap();
            let engine = factory.connect(settings("test-key")).unwrap();
            async move { engine.call::<Question, Answer>(&Question::new("q")).await }
        };

        assert!(matches!(
            call("busy").await,
            Err(LLMError::RateLimitExceeded(body)) if body == "slow down"
        ));
        assert!(matches!(
            call("broken").await,
            Err(LLMError::RequestFailed(msg)) if msg.contains("500") && msg.contains("boom")
        ));
        assert!(matches!(
            call("missing").await,
            Err(LLMError::ModelNotFound(model)) if model == "chat/gpt-3.5-turbo"
        ));
    }

    #[tokio::test]
    async fn test_non_json_body_is_unexpected_response() {
        let app = Router::new().route("/v1/completions", post(|| async { "not json" }));
        let factory = factory_for(app).await;

        let engine = factory.connect(settings("test-key")).unwrap();
        let result = engine.call::<Question, Answer>(&Question::new("q")).await;

        assert!(matches!(result, Err(LLMError::UnexpectedResponse(_))));
    }

    #[tokio::test]
    async fn test_slow_engine_times_out() {
        let app = Router::new().route(
            "/v1/completions",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({ "answer": "late" }))
            }),
        );
        let factory = factory_for(app).await;

        let engine = factory.connect(settings("test-key")).unwrap();
        let result = engine.call::<Question, Answer>(&Question::new("q")).await;

        assert!(matches!(result, Err(LLMError::Timeout(_))));
    }

    /// Serves every connection by writing `head`, then holding the socket open
    async fn spawn_stalling_stub(head: &'static str) -> String {
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            loop {
                let (mut socket, _) = listener.accept().await.unwrap();
                tokio::spawn(async move {
                    let mut buf = vec![0u8; 8192];
                    let _ = socket.read(&mut buf).await;
                    socket.write_all(head.as_bytes()).await.unwrap();
                    socket.flush().await.unwrap();
                    tokio::time::sleep(Duration::from_secs(10)).await;
                });
            }
        });

        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_stalled_body_times_out() {
        let base = spawn_stalling_stub(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 100\r\n\r\n{\"ans",
        )
        .await;
        let factory =
            LaminiFactory::with_config(LaminiConfig::new().with_api_base(base).with_timeout(1))
                .unwrap();

        let engine = factory.connect(settings("test-key")).unwrap();
        let result = engine.call::<Question, Answer>(&Question::new("q")).await;

        assert!(matches!(result, Err(LLMError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_stalled_error_body_times_out() {
        let base = spawn_stalling_stub(
            "HTTP/1.1 500 Internal Server Error\r\ncontent-length: 100\r\n\r\nbo",
        )
        .await;
        let factory =
            LaminiFactory::with_config(LaminiConfig::new().with_api_base(base).with_timeout(1))
                .unwrap();

        let engine = factory.connect(settings("test-key")).unwrap();
        let result = engine.call::<Question, Answer>(&Question::new("q")).await;

        assert!(matches!(result, Err(LLMError::Timeout(_))));
    }
}
