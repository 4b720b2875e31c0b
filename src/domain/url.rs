use std::sync::LazyLock;

use regex::Regex;

static TWEET_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?:https?://)?(?:www\.)?(?:twitter|x)\.com/",
        r"([^/?#\s]+)/status/(\d+)(?:[/?#]\S*)?$",
    ))
    .expect("tweet url pattern is valid")
});

/// Check that `url` is a canonical post URL:
/// `[http(s)://][www.](twitter|x).com/<handle>/status/<digits>`.
///
/// Purely syntactic, no network access.
pub fn is_valid_tweet_url(url: &str) -> bool {
    TWEET_URL_RE.is_match(url.trim())
}

/// The `@handle` segment of a post URL, if the URL is canonical.
pub fn author_handle(url: &str) -> Option<String> {
    TWEET_URL_RE
        .captures(url.trim())
        .map(|caps| format!("@{}", &caps[1]))
}

/// Make a scheme-less post URL navigable.
pub fn navigable_url(url: &str) -> String {
    let url = url.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_canonical_urls() {
        for url in [
            "https://x.com/nasa/status/123",
            "https://twitter.com/elonmusk/status/1686227187829968896",
            "http://www.twitter.com/NASA/status/1678143677359783936",
            "https://www.x.com/some_user/status/42",
            "x.com/nasa/status/123",
            "https://x.com/nasa/status/123?s=20",
            "https://x.com/nasa/status/123/photo/1",
        ] {
            assert!(is_valid_tweet_url(url), "should accept {url}");
        }
    }

    #[test]
    fn test_rejects_non_post_urls() {
        for url in [
            "https://x.com/nasa",
            "https://x.com/search?q=rust",
            "https://x.com/nasa/status/",
            "https://x.com/nasa/status/abc",
            "https://example.com/nasa/status/123",
            "https://mobile.x.com/nasa/status/123",
            "ftp://x.com/nasa/status/123",
            "https://x.com.evil.io/nasa/status/123",
            "",
        ] {
            assert!(!is_valid_tweet_url(url), "should reject {url}");
        }
    }

    #[test]
    fn test_author_handle() {
        assert_eq!(
            author_handle("https://twitter.com/NASA/status/1678143677359783936"),
            Some("@NASA".to_string())
        );
        assert_eq!(author_handle("https://x.com/nasa"), None);
    }

    #[test]
    fn test_navigable_url() {
        assert_eq!(navigable_url("x.com/a/status/1"), "https://x.com/a/status/1");
        assert_eq!(navigable_url("http://x.com/a/status/1"), "http://x.com/a/status/1");
    }
}
