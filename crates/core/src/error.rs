//! Configuration error model.

use thiserror::Error;

/// Result type used when building gate configuration.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration error.
///
/// Raised at startup only. Request-time failures never surface as errors;
/// the gate collapses them into a redirect.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required setting was not provided.
    #[error("missing required setting {0}")]
    Missing(&'static str),

    /// A setting was provided but failed validation.
    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

impl ConfigError {
    pub fn missing(key: &'static str) -> Self {
        Self::Missing(key)
    }

    pub fn invalid(key: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            message: message.into(),
        }
    }

    /// Name of the offending setting.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Missing(key) => key,
            Self::Invalid { key, .. } => key,
        }
    }
}
