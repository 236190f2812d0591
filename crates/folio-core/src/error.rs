#![forbid(unsafe_code)]

//! Error types.
//!
//! Page behaviours never surface errors to the visitor; missing hooks and
//! malformed attributes degrade to inert UI. The only fallible surface is
//! configuration loading.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Configuration decoding or validation failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {}", problems.join("; "))]
    Invalid { problems: Vec<String> },
}

impl ConfigError {
    #[must_use]
    pub fn invalid(problems: Vec<String>) -> Self {
        Self::Invalid { problems }
    }
}
