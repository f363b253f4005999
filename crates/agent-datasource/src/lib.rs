//! Datasource tool for agent-rs
//!
//! [`DatasourceTool`] turns one natural-language question into one
//! natural-language answer by sending a typed `Question` to a hosted LLM
//! engine and reading back a typed `Answer`. It is registered with agents
//! under the name `"datasource"`.

pub mod config;
pub mod error;
pub mod tool;

pub use config::DatasourceConfig;
pub use error::{DatasourceError, Result};
pub use tool::DatasourceTool;
