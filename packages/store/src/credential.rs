//! The [`TokenStore`] capability.

/// Name of the slot the bearer token lives in.
pub const TOKEN_KEY: &str = "token";

/// Read/write access to a single bearer token.
///
/// Implementations are expected to be cheap to call: the API client reads the
/// token on every request rather than caching it, so a login or logout made
/// through one handle is visible to the next request made through any other.
pub trait TokenStore {
    /// Current token, or `None` when nobody is logged in.
    fn get(&self) -> Option<String>;

    /// Replace the stored token.
    fn set(&self, token: &str);

    /// Forget the stored token.
    fn clear(&self);
}

/// Normalise a raw stored value: surrounding whitespace is dropped and an
/// empty token reads as absent.
pub(crate) fn normalize(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_and_rejects_empty() {
        assert_eq!(normalize("  tok1\n"), Some("tok1".to_string()));
        assert_eq!(normalize(""), None);
        assert_eq!(normalize(" \n\t"), None);
    }
}
