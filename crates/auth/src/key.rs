//! Signing key material used to verify session tokens.

use jsonwebtoken::{Algorithm, DecodingKey};

use crate::error::KeyError;

const PEM_MARKER: &str = "-----BEGIN";

/// A parsed verification key.
///
/// A PEM-encoded RSA public key verifies `RS256` tokens; any other value is
/// treated as a shared secret and verifies `HS256` tokens.
#[derive(Clone)]
pub struct SigningKey {
    decoding: DecodingKey,
    algorithm: Algorithm,
}

impl SigningKey {
    pub fn parse(raw: &str) -> Result<Self, KeyError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(KeyError::Empty);
        }

        if raw.contains(PEM_MARKER) {
            // Secret stores often flatten the PEM onto one line with literal "\n".
            let pem = raw.replace("\\n", "\n");
            let decoding = DecodingKey::from_rsa_pem(pem.as_bytes())
                .map_err(|e| KeyError::InvalidPem(e.to_string()))?;
            return Ok(Self {
                decoding,
                algorithm: Algorithm::RS256,
            });
        }

        Ok(Self::from_secret(raw.as_bytes()))
    }

    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            decoding: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.decoding
    }
}

impl core::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SigningKey")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}
