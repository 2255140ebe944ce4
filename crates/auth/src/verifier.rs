//! Token verification capability.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Validation, decode};

use crate::claims::{ClaimPolicy, SessionClaims, validate_claims};
use crate::error::VerificationError;
use crate::key::SigningKey;

/// Verifies a session token against a signing key.
///
/// Implementations may perform network IO; the caller bounds the call with a
/// timeout and treats every error the same way.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str, key: &SigningKey) -> Result<SessionClaims, VerificationError>;
}

/// Networkless JWT verifier (signature + time claims + authorized party).
#[derive(Debug, Clone, Default)]
pub struct JwtVerifier {
    policy: ClaimPolicy,
}

impl JwtVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_leeway(mut self, leeway: Duration) -> Self {
        self.policy.leeway = leeway;
        self
    }

    pub fn with_authorized_parties(mut self, parties: Vec<String>) -> Self {
        self.policy.authorized_parties = parties;
        self
    }

    pub fn policy(&self) -> &ClaimPolicy {
        &self.policy
    }

    /// Verify `token` as of `now`.
    pub fn verify_at(
        &self,
        token: &str,
        key: &SigningKey,
        now: DateTime<Utc>,
    ) -> Result<SessionClaims, VerificationError> {
        // Time claims are checked by `validate_claims` against the injected clock.
        let mut validation = Validation::new(key.algorithm());
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;

        let data = decode::<SessionClaims>(token, key.decoding_key(), &validation)
            .map_err(map_jwt_error)?;

        validate_claims(&data.claims, now, &self.policy)?;
        Ok(data.claims)
    }
}

#[async_trait]
impl TokenVerifier for JwtVerifier {
    async fn verify(&self, token: &str, key: &SigningKey) -> Result<SessionClaims, VerificationError> {
        self.verify_at(token, key, Utc::now())
    }
}

fn map_jwt_error(err: jsonwebtoken::errors::Error) -> VerificationError {
    match err.kind() {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
            VerificationError::InvalidSignature
        }
        ErrorKind::ExpiredSignature => VerificationError::Expired,
        ErrorKind::ImmatureSignature => VerificationError::NotYetValid,
        _ => VerificationError::Malformed(err.to_string()),
    }
}
