//! Configuration lookup
//!
//! Settings are resolved at the moment they are asked for, in this order:
//! explicit overrides, the process environment, then a `.env` file. The
//! `.env` file is parsed on each lookup and never written into the process
//! environment.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

const DEFAULT_DOTENV: &str = ".env";

/// Errors raised while looking up settings
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required key has no value anywhere
    #[error("{0} is not set")]
    Missing(String),

    /// A value exists but cannot be used
    #[error("invalid value for {key}: {reason}")]
    Invalid {
        /// Offending key
        key: String,
        /// Why the value was rejected
        reason: String,
    },

    /// The `.env` file exists but could not be parsed
    #[error("failed to read {}: {source}", .path.display())]
    Dotenv {
        /// Path of the file
        path: PathBuf,
        /// Parser error
        #[source]
        source: dotenvy::Error,
    },
}

/// Result type for configuration lookups
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Layered key/value settings
#[derive(Debug, Clone)]
pub struct Settings {
    overrides: HashMap<String, String>,
    use_process_env: bool,
    dotenv_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            overrides: HashMap::new(),
            use_process_env: true,
            dotenv_path: Some(PathBuf::from(DEFAULT_DOTENV)),
        }
    }
}

impl Settings {
    /// Settings backed by the process environment and `./.env`
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings that only see explicit overrides
    ///
    /// Nothing from the process environment or any `.env` file leaks in,
    /// which keeps tests independent of the machine they run on.
    pub fn isolated() -> Self {
        Self {
            overrides: HashMap::new(),
            use_process_env: false,
            dotenv_path: None,
        }
    }

    /// Read the given file instead of `./.env`
    pub fn with_dotenv(mut self, path: impl Into<PathBuf>) -> Self {
        self.dotenv_path = Some(path.into());
        self
    }

    /// Pin a key to a value, taking precedence over every other source
    pub fn with_override(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.overrides.insert(key.into(), value.into());
        self
    }

    /// Look up a key, returning `None` if no source has it
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        if let Some(value) = self.overrides.get(key) {
            return Ok(Some(value.clone()));
        }

        if self.use_process_env {
            if let Ok(value) = std::env::var(key) {
                return Ok(Some(value));
            }
        }

        match &self.dotenv_path {
            Some(path) => read_dotenv(path, key),
            None => Ok(None),
        }
    }

    /// Look up a key that must be present and non-empty
    pub fn require(&self, key: &str) -> Result<String> {
        match self.get(key)? {
            Some(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(ConfigError::Missing(key.to_string())),
        }
    }

    /// Look up a key, falling back to `default` when it is absent
    pub fn get_or(&self, key: &str, default: &str) -> Result<String> {
        Ok(self.get(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// Look up and parse a key
    pub fn get_parsed<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get(key)?
            .map(|raw| {
                raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
                    key: key.to_string(),
                    reason: e.to_string(),
                })
            })
            .transpose()
    }
}

fn read_dotenv(path: &Path, key: &str) -> Result<Option<String>> {
    if !path.is_file() {
        return Ok(None);
    }

    let to_error = |source: dotenvy::Error| ConfigError::Dotenv {
        path: path.to_path_buf(),
        source,
    };

    for item in dotenvy::from_path_iter(path).map_err(to_error)? {
        let (name, value) = item.map_err(to_error)?;
        if name == key {
            debug!(key, path = %path.display(), "Setting resolved from dotenv file");
            return Ok(Some(value));
        }
    }

    Ok(None)
}
