//! Shared User-Agent string for probe and stream HTTP traffic.

/// Default User-Agent for upstream requests (identifies the tool).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("sharestream/{version}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_carries_crate_version() {
        let ua = default_user_agent();
        assert!(ua.starts_with("sharestream/"));
        assert!(ua.contains(env!("CARGO_PKG_VERSION")));
    }
}
