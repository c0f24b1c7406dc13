//! Cookie-string parsing and browser-jar entry construction.
//!
//! Turns a raw `name=value; name2=value2` cookie header string into the
//! per-domain entries a browser cookie jar requires. Entries are emitted for
//! the folder URL's bare hostname and again for its wildcard parent domain
//! (`.hostname`), because the origin's session cookies may be scoped either
//! way and the jar only attaches cookies on an exact domain match.

use std::fmt;

use url::Url;

/// Origin hostname assumed when the folder URL cannot be parsed.
///
/// Guarantees the adapter never fails on malformed URLs at this stage; a bad
/// URL still surfaces later as a navigation failure with proper context.
const FALLBACK_ORIGIN_HOST: &str = "www.1024tera.com";

/// A single cookie entry scoped to one domain, ready for a browser jar.
///
/// The value field is redacted in `Debug` output to prevent accidental
/// logging of sensitive session data.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionCookie {
    /// Cookie name.
    pub name: String,
    /// Cookie value (sensitive — never log).
    value: String,
    /// The domain the entry is scoped to (bare host or `.host` wildcard).
    pub domain: String,
    /// The URL path scope for the cookie (always `/`).
    pub path: String,
}

impl SessionCookie {
    fn new(name: String, value: String, domain: &str) -> Self {
        Self {
            name,
            value,
            domain: domain.to_string(),
            path: "/".to_string(),
        }
    }

    /// Returns the cookie value.
    ///
    /// Cookie values are sensitive — avoid logging the return value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

// Custom Debug impl that redacts the cookie value.
impl fmt::Debug for SessionCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCookie")
            .field("name", &self.name)
            .field("value", &"[REDACTED]")
            .field("domain", &self.domain)
            .field("path", &self.path)
            .finish()
    }
}

/// Returns the hostname of `url`, or the hardcoded fallback origin when the
/// URL does not parse or has no host.
#[must_use]
pub fn guess_domain(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(std::string::ToString::to_string))
        .unwrap_or_else(|| FALLBACK_ORIGIN_HOST.to_string())
}

/// Splits a raw cookie header string into `(name, value)` pairs.
///
/// Pairs are separated by `;` and trimmed; each pair is split at the first
/// `=` only, so values may themselves contain `=`. A segment without `=`
/// becomes a name with an empty value. Empty segments are skipped. Purely
/// textual — no error conditions.
#[must_use]
pub fn split_cookie_pairs(cookie_str: &str) -> Vec<(String, String)> {
    cookie_str
        .split(';')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((name, value)) => (name.trim().to_string(), value.trim().to_string()),
            None => (pair.to_string(), String::new()),
        })
        .collect()
}

/// Builds the full credential-entry sequence for a folder URL.
///
/// Order is deterministic: one entry per cookie for the bare hostname first,
/// then a duplicate set scoped to the wildcard parent domain (`.hostname`).
#[must_use]
pub fn credential_entries(cookie_str: &str, folder_url: &str) -> Vec<SessionCookie> {
    let domain = guess_domain(folder_url);
    let wildcard = format!(".{domain}");
    let pairs = split_cookie_pairs(cookie_str);

    let mut entries = Vec::with_capacity(pairs.len() * 2);
    for (name, value) in &pairs {
        entries.push(SessionCookie::new(name.clone(), value.clone(), &domain));
    }
    for (name, value) in pairs {
        entries.push(SessionCookie::new(name, value, &wildcard));
    }
    entries
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_domain_valid_url() {
        assert_eq!(
            guess_domain("https://www.example.com/s/abc123"),
            "www.example.com"
        );
    }

    #[test]
    fn test_guess_domain_malformed_url_uses_fallback() {
        assert_eq!(guess_domain("not a url"), FALLBACK_ORIGIN_HOST);
        assert_eq!(guess_domain(""), FALLBACK_ORIGIN_HOST);
    }

    #[test]
    fn test_split_cookie_pairs_basic() {
        let pairs = split_cookie_pairs("a=1; b=2");
        assert_eq!(
            pairs,
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string())
            ]
        );
    }

    #[test]
    fn test_split_cookie_pairs_value_may_contain_equals() {
        let pairs = split_cookie_pairs("token=abc=def==; other=x");
        assert_eq!(pairs[0], ("token".to_string(), "abc=def==".to_string()));
    }

    #[test]
    fn test_split_cookie_pairs_skips_empty_segments() {
        let pairs = split_cookie_pairs("a=1;; ;b=2;");
        assert_eq!(pairs.len(), 2);
    }

    #[test]
    fn test_split_cookie_pairs_pair_without_equals_gets_empty_value() {
        let pairs = split_cookie_pairs("flag; a=1");
        assert_eq!(pairs[0], ("flag".to_string(), String::new()));
    }

    #[test]
    fn test_credential_entries_bare_then_wildcard_order() {
        let entries = credential_entries("a=1; b=2", "https://host.example.com/s/xyz");
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].domain, "host.example.com");
        assert_eq!(entries[1].domain, "host.example.com");
        assert_eq!(entries[2].domain, ".host.example.com");
        assert_eq!(entries[3].domain, ".host.example.com");
        // Same names repeated across the two scopes, in input order
        assert_eq!(entries[0].name, "a");
        assert_eq!(entries[1].name, "b");
        assert_eq!(entries[2].name, "a");
        assert_eq!(entries[3].name, "b");
    }

    #[test]
    fn test_credential_entries_all_paths_are_root() {
        let entries = credential_entries("a=1", "https://example.com/");
        assert!(entries.iter().all(|entry| entry.path == "/"));
    }

    #[test]
    fn test_credential_entries_malformed_url_scopes_to_fallback_origin() {
        let entries = credential_entries("a=1", "::bad::");
        assert_eq!(entries[0].domain, FALLBACK_ORIGIN_HOST);
        assert_eq!(entries[1].domain, format!(".{FALLBACK_ORIGIN_HOST}"));
    }

    #[test]
    fn test_session_cookie_debug_redacts_value() {
        let entries = credential_entries("session=secret_value", "https://example.com/");
        let debug_str = format!("{:?}", entries[0]);
        assert!(debug_str.contains("[REDACTED]"));
        assert!(!debug_str.contains("secret_value"));
    }
}
