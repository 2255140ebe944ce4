//! Credential extraction from raw `Authorization` / `Cookie` header values.

/// Where a credential was found.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    Bearer,
    Cookie,
}

impl CredentialSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bearer => "bearer",
            Self::Cookie => "cookie",
        }
    }
}

/// Opaque session token presented by a client.
///
/// Built fresh per request and dropped once the decision is made. The token
/// text never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
    source: CredentialSource,
}

impl Credential {
    pub fn new(token: impl Into<String>, source: CredentialSource) -> Self {
        Self {
            token: token.into(),
            source,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn source(&self) -> CredentialSource {
        self.source
    }
}

impl core::fmt::Debug for Credential {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credential")
            .field("source", &self.source)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
///
/// The scheme is matched case-insensitively and must be followed by at least
/// one whitespace character; the remainder is returned verbatim. Any other
/// scheme, or an empty remainder, yields `None`.
pub fn bearer_token(header: &str) -> Option<&str> {
    let scheme = header.get(..6)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let rest = &header[6..];
    let token = rest.trim_start();
    if token.len() == rest.len() || token.is_empty() {
        return None;
    }

    Some(token)
}

/// Look up cookie `name` in a raw `Cookie` header value.
///
/// The name must start the header or follow a `;` (optionally padded with
/// whitespace) and be followed by `=`. The value runs to the next `;`, must be
/// non-empty, and is URL-decoded. The leftmost match wins; a value that fails
/// to decode yields `None` rather than falling through to a later duplicate.
pub fn cookie_value(header: &str, name: &str) -> Option<String> {
    for (index, pair) in header.split(';').enumerate() {
        let pair = if index == 0 { pair } else { pair.trim_start() };

        let Some(value) = pair
            .strip_prefix(name)
            .and_then(|rest| rest.strip_prefix('='))
        else {
            continue;
        };
        if value.is_empty() {
            continue;
        }

        return decode_component(value);
    }

    None
}

/// Pick the request credential: bearer header first, then the session cookie.
pub fn extract_credential(
    authorization: Option<&str>,
    cookie: Option<&str>,
    cookie_name: &str,
) -> Option<Credential> {
    if let Some(token) = authorization.and_then(bearer_token) {
        return Some(Credential::new(token, CredentialSource::Bearer));
    }

    cookie
        .and_then(|header| cookie_value(header, cookie_name))
        .map(|token| Credential::new(token, CredentialSource::Cookie))
}

fn decode_component(value: &str) -> Option<String> {
    let bytes = value.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let well_formed = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !well_formed {
                return None;
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    urlencoding::decode(value)
        .ok()
        .map(|decoded| decoded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ── bearer_token ────────────────────────────────────────────────

    #[test]
    fn bearer_prefix_is_case_insensitive() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("bearer abc"), Some("abc"));
        assert_eq!(bearer_token("BEARER\tabc"), Some("abc"));
        assert_eq!(bearer_token("Bearer    abc def "), Some("abc def "));
    }

    #[test]
    fn non_bearer_headers_yield_nothing() {
        assert_eq!(bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(bearer_token("Bearerabc"), None);
        assert_eq!(bearer_token("Bearer"), None);
        assert_eq!(bearer_token("Bearer   "), None);
        assert_eq!(bearer_token(""), None);
        assert_eq!(bearer_token("abc"), None);
    }

    // ── cookie_value ────────────────────────────────────────────────

    #[test]
    fn cookie_value_is_decoded() {
        let header = "a=1; __session=abc%20def; b=2";
        assert_eq!(cookie_value(header, "__session").as_deref(), Some("abc def"));
    }

    #[test]
    fn missing_cookie_is_absent() {
        assert_eq!(cookie_value("a=1; b=2", "__session"), None);
        assert_eq!(cookie_value("", "__session"), None);
    }

    #[test]
    fn cookie_name_must_match_a_whole_token() {
        assert_eq!(cookie_value("x__session=abc", "__session"), None);
        assert_eq!(cookie_value("__session_old=abc", "__session"), None);
        assert_eq!(cookie_value("a=1;__session=abc", "__session").as_deref(), Some("abc"));
        assert_eq!(cookie_value("__session=abc", "__session").as_deref(), Some("abc"));
    }

    #[test]
    fn leading_whitespace_is_only_allowed_after_a_separator() {
        assert_eq!(cookie_value(" __session=abc", "__session"), None);
        assert_eq!(cookie_value("a=1;   __session=abc", "__session").as_deref(), Some("abc"));
    }

    #[test]
    fn first_non_empty_match_wins() {
        assert_eq!(
            cookie_value("__session=first; __session=second", "__session").as_deref(),
            Some("first")
        );
        assert_eq!(
            cookie_value("__session=; __session=second", "__session").as_deref(),
            Some("second")
        );
    }

    #[test]
    fn malformed_encoding_is_absent() {
        assert_eq!(cookie_value("__session=abc%zz", "__session"), None);
        assert_eq!(cookie_value("__session=abc%2", "__session"), None);
        assert_eq!(cookie_value("__session=%ff%fe", "__session"), None);
    }

    // ── extract_credential ──────────────────────────────────────────

    #[test]
    fn bearer_takes_precedence_over_cookie() {
        let cred = extract_credential(Some("Bearer header-token"), Some("__session=cookie-token"), "__session")
            .unwrap();
        assert_eq!(cred.token(), "header-token");
        assert_eq!(cred.source(), CredentialSource::Bearer);
    }

    #[test]
    fn non_bearer_authorization_falls_through_to_cookie() {
        let cred = extract_credential(Some("Basic xyz"), Some("__session=cookie-token"), "__session")
            .unwrap();
        assert_eq!(cred.token(), "cookie-token");
        assert_eq!(cred.source(), CredentialSource::Cookie);
    }

    #[test]
    fn no_sources_means_no_credential() {
        assert!(extract_credential(None, None, "__session").is_none());
        assert!(extract_credential(Some("Basic xyz"), Some("other=1"), "__session").is_none());
    }

    #[test]
    fn debug_output_redacts_token() {
        let cred = Credential::new("super-secret", CredentialSource::Cookie);
        let rendered = format!("{cred:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("Cookie"));
    }

    proptest! {
        #[test]
        fn encoded_cookie_values_decode_back(value in "[ -~]{1,32}") {
            let encoded = urlencoding::encode(&value);
            let header = format!("theme=dark; __session={encoded}; lang=en");
            prop_assert_eq!(cookie_value(&header, "__session"), Some(value));
        }
    }
}
