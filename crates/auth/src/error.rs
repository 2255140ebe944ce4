use thiserror::Error;

/// Why a presented token was rejected.
///
/// The gate collapses every variant into the same redirect; the variant only
/// feeds diagnostics.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerificationError {
    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("token signature does not match the signing key")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token not yet valid")]
    NotYetValid,

    #[error("authorized party '{0}' is not allowed")]
    UnauthorizedParty(String),

    #[error("verification backend unavailable: {0}")]
    Unavailable(String),

    #[error("verification timed out")]
    TimedOut,
}

impl VerificationError {
    /// Short stable label, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Malformed(_) => "malformed",
            Self::InvalidSignature => "invalid_signature",
            Self::Expired => "expired",
            Self::NotYetValid => "not_yet_valid",
            Self::UnauthorizedParty(_) => "unauthorized_party",
            Self::Unavailable(_) => "unavailable",
            Self::TimedOut => "timed_out",
        }
    }
}

/// Signing key could not be loaded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("signing key is empty")]
    Empty,

    #[error("invalid PEM public key: {0}")]
    InvalidPem(String),
}
