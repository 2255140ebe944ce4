//! Protected path prefix: the URL namespace that requires a credential.

use std::borrow::Cow;

use crate::error::{ConfigError, ConfigResult};

/// Path prefix marking protected routes (e.g. `/members/`).
///
/// Compared by value. Matching is a plain `starts_with` on the raw request
/// path, extended to the normalised form of the path (see [`normalize_path`])
/// so that encoded or dot-segment spellings of a protected path are still
/// treated as protected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProtectedPrefix(Cow<'static, str>);

impl ProtectedPrefix {
    pub fn new(prefix: impl Into<Cow<'static, str>>) -> ConfigResult<Self> {
        let prefix = prefix.into();
        if !prefix.starts_with('/') {
            return Err(ConfigError::invalid(
                "protected_prefix",
                format!("'{prefix}' must start with '/'"),
            ));
        }
        Ok(Self(prefix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `path` falls inside the protected namespace.
    pub fn matches(&self, path: &str) -> bool {
        path.starts_with(self.as_str()) || normalize_path(path).starts_with(self.as_str())
    }
}

impl Default for ProtectedPrefix {
    fn default() -> Self {
        Self(Cow::Borrowed("/members/"))
    }
}

impl core::fmt::Display for ProtectedPrefix {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Percent-decode a request path and collapse empty, `.` and `..` segments.
///
/// The result always starts with `/`. A trailing slash is kept when the input
/// names a directory (ends in `/`, `/.` or `/..`) and the result is not the root.
pub fn normalize_path(path: &str) -> String {
    let bytes = urlencoding::decode_binary(path.as_bytes());
    let decoded = String::from_utf8_lossy(&bytes);

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    let names_directory =
        decoded.ends_with('/') || decoded.ends_with("/.") || decoded.ends_with("/..");

    let mut normalized = String::with_capacity(decoded.len() + 1);
    normalized.push('/');
    normalized.push_str(&segments.join("/"));
    if names_directory && !segments.is_empty() {
        normalized.push('/');
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn prefix_must_be_absolute() {
        assert!(ProtectedPrefix::new("members/").is_err());
        assert!(ProtectedPrefix::new("/members/").is_ok());
    }

    #[test]
    fn plain_paths_match_by_prefix() {
        let prefix = ProtectedPrefix::default();
        assert!(prefix.matches("/members/profile"));
        assert!(prefix.matches("/members/"));
        assert!(!prefix.matches("/members"));
        assert!(!prefix.matches("/"));
        assert!(!prefix.matches("/blog/members/x"));
    }

    #[test]
    fn encoded_and_dotted_spellings_are_protected() {
        let prefix = ProtectedPrefix::default();
        assert!(prefix.matches("/%6Dembers/profile"));
        assert!(prefix.matches("//members/profile"));
        assert!(prefix.matches("/./members/profile"));
        assert!(prefix.matches("/blog/../members/profile"));
        assert!(prefix.matches("/members%2Fprofile"));
    }

    #[test]
    fn normalize_keeps_directory_slash() {
        assert_eq!(normalize_path("/a/b/"), "/a/b/");
        assert_eq!(normalize_path("/a/b/."), "/a/b/");
        assert_eq!(normalize_path("/a/b/c/.."), "/a/b/");
        assert_eq!(normalize_path("/a/b"), "/a/b");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("/../.."), "/");
    }

    proptest! {
        #[test]
        fn normalized_path_is_absolute_and_has_no_dot_segments(path in "[a-z./%]{0,24}") {
            let normalized = normalize_path(&path);
            prop_assert!(normalized.starts_with('/'));
            prop_assert!(!normalized.contains("//"));
            prop_assert!(!normalized.split('/').any(|s| s == "." || s == ".."));
        }
    }
}
