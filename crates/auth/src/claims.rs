use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::VerificationError;

/// Session token claims (transport-agnostic).
///
/// The subset of a session JWT the gate cares about once the signature has
/// been checked. Timestamps are seconds since the Unix epoch, as on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject / user identifier.
    pub sub: String,

    /// Session identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,

    /// Authorized party (the origin the token was minted for).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azp: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Expiration.
    pub exp: i64,

    /// Not-before.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,

    /// Issued-at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

impl SessionClaims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.iat.and_then(|iat| DateTime::from_timestamp(iat, 0))
    }
}

/// Rules applied to decoded claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimPolicy {
    /// Tolerated clock skew for `exp`, `nbf` and `iat`.
    pub leeway: Duration,

    /// Allowed `azp` values. Empty disables the check.
    pub authorized_parties: Vec<String>,
}

impl Default for ClaimPolicy {
    fn default() -> Self {
        Self {
            leeway: Duration::seconds(5),
            authorized_parties: Vec::new(),
        }
    }
}

/// Deterministically validate session claims against `now`.
///
/// Signature verification happens before this and is not repeated here.
pub fn validate_claims(
    claims: &SessionClaims,
    now: DateTime<Utc>,
    policy: &ClaimPolicy,
) -> Result<(), VerificationError> {
    if claims.sub.is_empty() {
        return Err(VerificationError::Malformed("empty subject".to_string()));
    }

    let now = now.timestamp();
    let leeway = policy.leeway.num_seconds();

    if now > claims.exp.saturating_add(leeway) {
        return Err(VerificationError::Expired);
    }
    if let Some(nbf) = claims.nbf {
        if nbf > now.saturating_add(leeway) {
            return Err(VerificationError::NotYetValid);
        }
    }
    if let Some(iat) = claims.iat {
        if iat > now.saturating_add(leeway) {
            return Err(VerificationError::NotYetValid);
        }
    }

    if let Some(azp) = claims.azp.as_deref() {
        if !policy.authorized_parties.is_empty()
            && !policy.authorized_parties.iter().any(|p| p == azp)
        {
            return Err(VerificationError::UnauthorizedParty(azp.to_string()));
        }
    }

    Ok(())
}
