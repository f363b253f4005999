//! Typed LLM inference client for agent-rs
//!
//! This crate talks to a hosted inference engine using strongly-typed
//! request/response records. It includes:
//!
//! - [`LlmType`] records that describe their own fields ([`Question`], [`Answer`])
//! - the [`InferenceEngine`] transport trait and the [`TypedEngine`] wrapper
//! - [`EngineFactory`], the one place engines are built
//! - a Lamini HTTP implementation in [`providers`]

pub mod engine;
pub mod error;
pub mod providers;
pub mod types;

// Re-export main types
pub use engine::{EngineFactory, EngineSettings, InferenceEngine, InferenceRequest, TypedEngine};
pub use error::{LLMError, Result};
pub use types::{Answer, Field, FieldKind, LlmType, Question};
