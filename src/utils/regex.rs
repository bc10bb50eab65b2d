use regex::Regex;
use std::sync::LazyLock;

/// Compiled regex patterns that are reused across the codebase
pub struct RegexPatterns;

impl RegexPatterns {
    /// Direct media links (images, mp4/m3u8/mov video) anywhere in a string
    pub fn media_url() -> &'static Regex {
        static RE: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r#"(?i)https?://[^\s'"\\]+\.(?:jpe?g|png|webp|gif|mp4|m3u8|mov)(\?[^\s'"\\]*)?"#)
                .expect("Failed to compile media URL regex")
        });
        &RE
    }

    /// URLs that look like video streams (.mp4, .m3u8 or a `/v/` path segment)
    pub fn video_url() -> &'static Regex {
        static RE: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"(?i)\.mp4(\?|$)|\.m3u8(\?|$)|/v/")
                .expect("Failed to compile video URL regex")
        });
        &RE
    }

    /// Username segment of a pasted profile link (instagram.com/<name>)
    pub fn profile_link() -> &'static Regex {
        static RE: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"(?i)instagram\.com/([^/?#\s]+)")
                .expect("Failed to compile profile link regex")
        });
        &RE
    }
}
