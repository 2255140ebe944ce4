//! Gate configuration.

use std::time::Duration;

use crate::error::{ConfigError, ConfigResult};
use crate::prefix::ProtectedPrefix;

pub const DEFAULT_SIGN_IN_PATH: &str = "/sign-in";
pub const DEFAULT_SESSION_COOKIE: &str = "__session";
pub const DEFAULT_VERIFY_TIMEOUT: Duration = Duration::from_secs(5);

/// Process-wide gate configuration, passed to the gate at construction.
///
/// The signing key is deliberately not part of this value: it is secret
/// material and is parsed by the auth layer into a verification key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfig {
    protected_prefix: ProtectedPrefix,
    sign_in_path: String,
    session_cookie: String,
    verify_timeout: Duration,
}

impl GateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_protected_prefix(mut self, prefix: impl Into<String>) -> ConfigResult<Self> {
        self.protected_prefix = ProtectedPrefix::new(prefix.into())?;
        Ok(self)
    }

    pub fn with_sign_in_path(mut self, path: impl Into<String>) -> ConfigResult<Self> {
        let path = path.into();
        if !path.starts_with('/') || path.starts_with("//") {
            return Err(ConfigError::invalid(
                "sign_in_path",
                format!("'{path}' must be an absolute path on the same origin"),
            ));
        }
        self.sign_in_path = path;
        Ok(self)
    }

    pub fn with_session_cookie(mut self, name: impl Into<String>) -> ConfigResult<Self> {
        let name = name.into();
        let bad_char = name
            .chars()
            .find(|c| *c == '=' || *c == ';' || c.is_whitespace() || c.is_control());
        if name.is_empty() || bad_char.is_some() {
            return Err(ConfigError::invalid(
                "session_cookie",
                format!("'{name}' is not a valid cookie name"),
            ));
        }
        self.session_cookie = name;
        Ok(self)
    }

    pub fn with_verify_timeout(mut self, timeout: Duration) -> ConfigResult<Self> {
        if timeout.is_zero() {
            return Err(ConfigError::invalid(
                "verify_timeout",
                "must be greater than zero",
            ));
        }
        self.verify_timeout = timeout;
        Ok(self)
    }

    pub fn protected_prefix(&self) -> &ProtectedPrefix {
        &self.protected_prefix
    }

    pub fn sign_in_path(&self) -> &str {
        &self.sign_in_path
    }

    pub fn session_cookie(&self) -> &str {
        &self.session_cookie
    }

    /// Upper bound on a single verification call.
    pub fn verify_timeout(&self) -> Duration {
        self.verify_timeout
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            protected_prefix: ProtectedPrefix::default(),
            sign_in_path: DEFAULT_SIGN_IN_PATH.to_string(),
            session_cookie: DEFAULT_SESSION_COOKIE.to_string(),
            verify_timeout: DEFAULT_VERIFY_TIMEOUT,
        }
    }
}
