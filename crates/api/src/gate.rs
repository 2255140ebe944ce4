//! Request gate: the single authorization checkpoint for the protected namespace.
//!
//! The gate maps a request to [`Decision::Allow`] or [`Decision::Deny`]. It never
//! fails: a missing credential, a rejected token, a verifier error, a verifier
//! timeout and a verifier panic all end up as the same redirect to sign-in.

use std::str::FromStr;
use std::sync::Arc;

use axum::http::{HeaderMap, Uri, header, uri::Authority};
use tracing::debug;

use sitegate_auth::{
    Credential, CredentialSource, SessionClaims, SigningKey, TokenVerifier, VerificationError,
    extract_credential,
};
use sitegate_core::GateConfig;

/// Outcome of the gate for one request. Never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Forward the request to the asset layer.
    Allow,
    /// Redirect (302) to `location`.
    Deny { location: String },
}

/// Why the gate decided what it did (diagnostics only).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Public,
    Authenticated {
        source: CredentialSource,
        claims: SessionClaims,
    },
    NoCredential,
    Rejected {
        source: CredentialSource,
        error: VerificationError,
    },
}

#[derive(Clone)]
pub struct RequestGate {
    config: GateConfig,
    key: Arc<SigningKey>,
    verifier: Arc<dyn TokenVerifier>,
}

impl RequestGate {
    pub fn new(config: GateConfig, key: SigningKey, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self {
            config,
            key: Arc::new(key),
            verifier,
        }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Decide whether a request may reach the asset layer.
    ///
    /// Only the path, `Authorization` and `Cookie` are consulted for the
    /// decision; `Host` and `X-Forwarded-Proto` only shape the redirect target.
    pub async fn decide(&self, uri: &Uri, headers: &HeaderMap) -> Decision {
        let outcome = self.evaluate(uri, headers).await;

        match &outcome {
            Outcome::Public => Decision::Allow,
            Outcome::Authenticated { source, claims } => {
                debug!(
                    path = uri.path(),
                    source = source.as_str(),
                    subject = %claims.sub,
                    "request allowed"
                );
                Decision::Allow
            }
            Outcome::NoCredential => {
                debug!(path = uri.path(), reason = "no_credential", "request denied");
                self.deny(uri, headers)
            }
            Outcome::Rejected { source, error } => {
                debug!(
                    path = uri.path(),
                    source = source.as_str(),
                    reason = error.kind(),
                    error = %error,
                    "request denied"
                );
                self.deny(uri, headers)
            }
        }
    }

    /// Classify the request and, for protected paths, verify its credential.
    pub async fn evaluate(&self, uri: &Uri, headers: &HeaderMap) -> Outcome {
        if !self.config.protected_prefix().matches(uri.path()) {
            return Outcome::Public;
        }

        let Some(credential) = self.credential(headers) else {
            return Outcome::NoCredential;
        };

        let source = credential.source();
        match self.verify(credential).await {
            Ok(claims) => Outcome::Authenticated { source, claims },
            Err(error) => Outcome::Rejected { source, error },
        }
    }

    fn credential(&self, headers: &HeaderMap) -> Option<Credential> {
        let authorization = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        // HTTP/2 clients may split cookies over several header fields.
        let cookies: Vec<&str> = headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect();
        let cookie = (!cookies.is_empty()).then(|| cookies.join("; "));

        extract_credential(authorization, cookie.as_deref(), self.config.session_cookie())
    }

    async fn verify(&self, credential: Credential) -> Result<SessionClaims, VerificationError> {
        let verifier = Arc::clone(&self.verifier);
        let key = Arc::clone(&self.key);

        // Run on its own task so a panicking verifier becomes a JoinError.
        let mut task =
            tokio::spawn(async move { verifier.verify(credential.token(), &key).await });

        match tokio::time::timeout(self.config.verify_timeout(), &mut task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(VerificationError::Unavailable(join_error.to_string())),
            Err(_elapsed) => {
                task.abort();
                Err(VerificationError::TimedOut)
            }
        }
    }

    fn deny(&self, uri: &Uri, headers: &HeaderMap) -> Decision {
        Decision::Deny {
            location: self.sign_in_location(uri, headers),
        }
    }

    /// Sign-in path resolved against the request origin.
    fn sign_in_location(&self, uri: &Uri, headers: &HeaderMap) -> String {
        let path = self.config.sign_in_path();

        if let (Some(scheme), Some(authority)) = (uri.scheme_str(), uri.authority()) {
            return format!("{scheme}://{authority}{path}");
        }

        let host = headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .and_then(|h| Authority::from_str(h).ok())
            .filter(|a| !a.as_str().contains('@'));
        let Some(host) = host else {
            return path.to_string();
        };

        let scheme = headers
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|p| p.eq_ignore_ascii_case("https") || p.eq_ignore_ascii_case("http"))
            .map(str::to_ascii_lowercase)
            .unwrap_or_else(|| "http".to_string());

        format!("{scheme}://{host}{path}")
    }
}

impl core::fmt::Debug for RequestGate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RequestGate")
            .field("config", &self.config)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
