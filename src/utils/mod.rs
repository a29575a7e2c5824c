//! Utility functions and helpers.

pub mod html;
pub mod http;
pub mod time;

use url::Url;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Collapse every whitespace run to a single space and trim the ends.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_url() {
        let base = Url::parse("https://www.leg.state.nv.us/Session/80th2019/Reports/").unwrap();
        assert_eq!(
            resolve_url(&base, "history.cfm?ID=1"),
            "https://www.leg.state.nv.us/Session/80th2019/Reports/history.cfm?ID=1"
        );
        assert_eq!(
            resolve_url(&base, "/Session/80th2019/Bills/SB/SB1.pdf"),
            "https://www.leg.state.nv.us/Session/80th2019/Bills/SB/SB1.pdf"
        );
        assert_eq!(
            resolve_url(&base, "https://other.com/x"),
            "https://other.com/x"
        );
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(
            normalize_whitespace("  Read first\n time.\r\n\tReferred "),
            "Read first time. Referred"
        );
    }
}
