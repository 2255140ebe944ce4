//! `sitegate-auth` — credential extraction and token verification.
//!
//! This crate is intentionally decoupled from HTTP: callers hand it raw header
//! values and get back credentials, claims and typed verification failures.

pub mod claims;
pub mod credential;
pub mod error;
pub mod key;
pub mod verifier;

pub use claims::{ClaimPolicy, SessionClaims, validate_claims};
pub use credential::{Credential, CredentialSource, bearer_token, cookie_value, extract_credential};
pub use error::{KeyError, VerificationError};
pub use key::SigningKey;
pub use verifier::{JwtVerifier, TokenVerifier};
