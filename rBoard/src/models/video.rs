//! Video and image embedding.

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref YOUTUBE_ID_RE: Regex =
        Regex::new(r"^.*(youtu.be/|v/|u/\w/|embed/|watch\?v=|&v=)([^#&?]*).*").unwrap();
    static ref NAVER_ID_RE: Regex = Regex::new(r"/v/(\d+)").unwrap();
    static ref YOUTUBE_URL_RE: Regex =
        Regex::new(r"^(https?://)?(www\.)?(youtube\.com/watch\?v=|youtu\.be/)[\w-]{11}").unwrap();
    static ref NAVER_URL_RE: Regex =
        Regex::new(r"^(https?://)?(www\.)?tv\.naver\.com/v/\d+").unwrap();
    static ref IMAGE_URL_RE: Regex =
        RegexBuilder::new(r"^https?://.*\.(jpg|jpeg|png|gif|webp)(\?.*)?$")
            .case_insensitive(true)
            .build()
            .unwrap();
}

const YOUTUBE_ID_LEN: usize = 11;
const NAVER_MARKER: &str = "tv.naver.com/v/";

/// Extract a YouTube video ID from a URL.
///
/// Only 11-character IDs are accepted.
pub fn youtube_id(url: &str) -> Option<String> {
    let caps = YOUTUBE_ID_RE.captures(url)?;
    let id = caps.get(2)?.as_str();
    (id.chars().count() == YOUTUBE_ID_LEN).then(|| id.to_owned())
}

/// Extract a Naver TV video ID from a URL.
pub fn naver_id(url: &str) -> Option<String> {
    if !url.contains(NAVER_MARKER) {
        return None;
    }
    NAVER_ID_RE
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_owned())
}

/// Check a video URL the way the board accepts it. Empty is allowed.
pub fn is_valid_video_url(url: &str) -> bool {
    url.is_empty() || YOUTUBE_URL_RE.is_match(url) || NAVER_URL_RE.is_match(url)
}

/// Check an image URL the way the board accepts it. Empty is allowed.
pub fn is_valid_image_url(url: &str) -> bool {
    url.is_empty() || IMAGE_URL_RE.is_match(url)
}

/// Video hosting provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoProvider {
    /// YouTube.
    Youtube,
    /// Naver TV.
    Naver,
}

impl VideoProvider {
    /// Provider name.
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoProvider::Youtube => "youtube",
            VideoProvider::Naver => "naver",
        }
    }
}

/// An embeddable video detected from a URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoEmbed {
    /// Provider.
    pub provider: VideoProvider,
    /// Provider-specific video ID.
    pub id: String,
}

impl VideoEmbed {
    /// Detect an embeddable video in a URL.
    pub fn detect(url: &str) -> Option<Self> {
        if url.contains("youtube.com") || url.contains("youtu.be") {
            return youtube_id(url).map(|id| Self {
                provider: VideoProvider::Youtube,
                id,
            });
        }
        if url.contains(NAVER_MARKER) {
            return naver_id(url).map(|id| Self {
                provider: VideoProvider::Naver,
                id,
            });
        }
        None
    }

    /// Player URL for embedding.
    pub fn embed_url(&self) -> String {
        match self.provider {
            VideoProvider::Youtube => format!("https://www.youtube.com/embed/{}", self.id),
            VideoProvider::Naver => format!("https://tv.naver.com/embed/{}", self.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_youtube_id() {
        assert_eq!(
            youtube_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(youtube_id("https://youtu.be/dQw4w9WgXcQ").as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(
            youtube_id("https://www.youtube.com/embed/dQw4w9WgXcQ?start=30").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(youtube_id("https://www.youtube.com/watch?v=short"), None);
        assert_eq!(youtube_id("https://example.com/"), None);
    }

    #[test]
    fn test_naver_id() {
        assert_eq!(naver_id("https://tv.naver.com/v/12345678").as_deref(), Some("12345678"));
        assert_eq!(naver_id("https://example.com/v/123"), None);
        assert_eq!(naver_id("https://tv.naver.com/v/abc"), None);
    }

    #[test]
    fn test_detect() {
        let yt = VideoEmbed::detect("https://youtu.be/dQw4w9WgXcQ").unwrap();
        assert_eq!(yt.provider, VideoProvider::Youtube);
        assert_eq!(yt.embed_url(), "https://www.youtube.com/embed/dQw4w9WgXcQ");

        let nv = VideoEmbed::detect("https://tv.naver.com/v/987").unwrap();
        assert_eq!(nv.provider, VideoProvider::Naver);
        assert_eq!(nv.embed_url(), "https://tv.naver.com/embed/987");

        assert!(VideoEmbed::detect("https://vimeo.com/1234").is_none());
        assert!(VideoEmbed::detect("https://youtube.com/watch?v=bad").is_none());
    }

    #[test]
    fn test_url_validation() {
        assert!(is_valid_video_url(""));
        assert!(is_valid_video_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(is_valid_video_url("youtu.be/dQw4w9WgXcQ"));
        assert!(is_valid_video_url("http://tv.naver.com/v/42"));
        assert!(!is_valid_video_url("https://www.youtube.com/embed/dQw4w9WgXcQ"));
        assert!(!is_valid_video_url("https://vimeo.com/1"));

        assert!(is_valid_image_url(""));
        assert!(is_valid_image_url("https://cdn.example.com/a/b.PNG"));
        assert!(is_valid_image_url("http://x.org/cat.webp?size=large"));
        assert!(!is_valid_image_url("ftp://x.org/cat.png"));
        assert!(!is_valid_image_url("https://x.org/cat.bmp"));
    }
}
