use regex::Regex;
use std::sync::LazyLock;

// Compiled once and reused for the life of the process; compiling on every
// call (as the source did) is the documented redesign-flag cost to avoid.
//
// The source's pattern relies on a negative lookahead, `(?!javascript:)`,
// to reject `javascript:` hrefs inline. Rust's `regex` crate is
// intentionally lookaround-free (it's what buys the linear-time
// guarantee), so the lookahead is pulled out: this pattern matches any
// href, and `process` below walks candidate matches in order, skipping
// `javascript:` ones, which is exactly what the lookahead-driven search
// did within a single `regex_search` call.
static HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<a[^>]+href=["'](?P<link>.*?)["']"#).expect("static regex")
});
static ABS_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:/[^/].*|/)$").expect("static regex"));
static PROTOCOL_RELATIVE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^//.*$").expect("static regex"));

/// A single normalized URL found in a response body, together with the
/// byte offset in the source body where its anchor tag matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub offset: usize,
    pub url: String,
}

/// Extracts hyperlinks from an HTTP response body.
///
/// The source derived `host_name` from the response body's first line,
/// which was only possible because it destructively overwrote the body's
/// status line with the request URL (see the resolved Open Question in
/// the design notes). This implementation keeps the body's real status
/// line intact and takes `host_name` as an explicit parameter, derived by
/// the caller from the request URL it already has on hand.
pub struct LinkExtractor;

impl LinkExtractor {
    /// Runs the full resolve loop over `body`, calling `emit` for every
    /// normalized URL found, in document order.
    pub fn resolve(body: &str, host_name: &str, mut emit: impl FnMut(Extracted)) -> usize {
        let mut pos = 0usize;
        let mut count = 0usize;

        while pos < body.len() {
            let (next_pos, found) = Self::process(body, pos, host_name);
            pos = next_pos;
            if let Some(extracted) = found {
                emit(extracted);
                count += 1;
            }
        }

        count
    }

    /// A single step of the resolve loop: finds the next anchor href past
    /// `pos`, normalizes it, and returns the advanced position plus the
    /// emission (if any). The no-match branch always advances `pos` to the
    /// start of the next char, which is what keeps the loop terminating
    /// without ever landing mid-codepoint (`pos` must stay a char boundary
    /// since it's used to slice `body` on the next call).
    fn process(body: &str, pos: usize, host_name: &str) -> (usize, Option<Extracted>) {
        let tail = &body[pos..];

        for m in HREF.captures_iter(tail) {
            let whole = m.get(0).expect("group 0 always matches");
            let raw = m.name("link").expect("named group always matches").as_str();

            if raw.starts_with("javascript:") {
                continue;
            }

            let normalized = Self::normalize(raw, host_name);
            let next_pos = pos + whole.end();
            return (next_pos, Some(Extracted { offset: pos, url: normalized }));
        }

        let step = tail.chars().next().map_or(1, char::len_utf8);
        (pos + step, None)
    }

    fn normalize(raw: &str, host_name: &str) -> String {
        if ABS_PATH.is_match(raw) {
            if raw == "/" {
                host_name.to_string()
            } else {
                format!("{host_name}{raw}")
            }
        } else if PROTOCOL_RELATIVE.is_match(raw) {
            let stripped = &raw[2..];
            stripped.strip_suffix('/').unwrap_or(stripped).to_string()
        } else if let Some(rest) = raw.strip_prefix("http://").or_else(|| raw.strip_prefix("https://")) {
            rest.to_string()
        } else {
            raw.to_string()
        }
    }
}

/// `true` when a resolved URL is safe to enqueue: not blank after trimming,
/// and free of control characters that would corrupt the tab-separated log.
pub fn is_valid_url(url: &str) -> bool {
    !url.trim().is_empty() && !url.contains(['\n', '\r', '\t'])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve_all(body: &str, host_name: &str) -> Vec<Extracted> {
        let mut out = Vec::new();
        LinkExtractor::resolve(body, host_name, |e| out.push(e));
        out
    }

    #[test]
    fn absolute_path_resolves_against_host() {
        let body = "HTTP/1.1 200 OK\r\n\r\n<a href=\"/page\">x</a>";
        let found = resolve_all(body, "host.test");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].url, "host.test/page");
    }

    #[test]
    fn root_path_resolves_to_bare_host() {
        let body = "HTTP/1.1 200 OK\r\n\r\n<a href=\"/\">home</a>";
        let found = resolve_all(body, "example.com");
        assert_eq!(found[0].url, "example.com");
    }

    #[test]
    fn protocol_relative_trims_trailing_slash() {
        let body = "HTTP/1.1 200 OK\r\n\r\n<a href=\"//cdn.example/x/\">asset</a>";
        let found = resolve_all(body, "host.test");
        assert_eq!(found[0].url, "cdn.example/x");
    }

    #[test]
    fn scheme_prefixed_link_drops_scheme() {
        let body = "HTTP/1.1 200 OK\r\n\r\n<a href=\"https://example.com/p\">y</a>";
        let found = resolve_all(body, "host.test");
        assert_eq!(found[0].url, "example.com/p");
    }

    #[test]
    fn javascript_scheme_is_skipped() {
        let body = "HTTP/1.1 200 OK\r\n\r\n<a href=\"javascript:void(0)\">nope</a>";
        assert!(resolve_all(body, "host.test").is_empty());
    }

    #[test]
    fn emits_in_document_order() {
        let body = "HTTP/1.1 200 OK\r\n\r\n<a href=\"/a\">a</a><a href=\"/b\">b</a><a href=\"/c\">c</a>";
        let found = resolve_all(body, "host.test");
        let urls: Vec<_> = found.iter().map(|e| e.url.as_str()).collect();
        assert_eq!(urls, ["host.test/a", "host.test/b", "host.test/c"]);
    }

    #[test]
    fn no_anchors_emits_nothing() {
        let body = "HTTP/1.1 200 OK\r\n\r\n<html>no links here</html>";
        assert!(resolve_all(body, "host.test").is_empty());
    }

    #[test]
    fn multibyte_tail_with_no_further_anchor_does_not_panic() {
        let body = "HTTP/1.1 200 OK\r\n\r\n<a href=\"/page\">x</a> caf\u{e9} \u{1f980}";
        let found = resolve_all(body, "host.test");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].url, "host.test/page");
    }

    #[test]
    fn body_with_only_multibyte_chars_and_no_anchors_does_not_panic() {
        let body = "caf\u{e9}";
        assert!(resolve_all(body, "host.test").is_empty());
    }

    #[test]
    fn embedded_tab_is_rejected_downstream() {
        assert!(!is_valid_url("bad\tlink"));
        assert!(is_valid_url("host.test/fine"));
    }

    #[test]
    fn blank_after_trim_is_rejected() {
        assert!(!is_valid_url("   "));
        assert!(!is_valid_url(""));
    }
}
