//! Post and attachment models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{time, AttachmentId, Author, CommentTree, PostContent, PostId, UserId, VideoEmbed};

/// Maximum upload size accepted by the board.
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Extensions the board accepts, grouped by kind.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];
pub const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "txt", "xls", "xlsx", "ppt", "pptx"];
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov"];

/// A post row in the listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostSummary {
    /// Post ID.
    pub id: PostId,
    /// Title.
    pub title: String,
    /// Author.
    pub author: Author,
    /// Creation time.
    #[serde(rename = "createdAt", default, deserialize_with = "time::deserialize_opt")]
    pub created_at: Option<DateTime<Utc>>,
    /// View count.
    #[serde(rename = "view_cnt", alias = "views", default)]
    pub views: i64,
    /// Comment count.
    #[serde(rename = "commentCount", default)]
    pub comment_count: i64,
}

/// A post with its content, attachments and comments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Post {
    /// Post ID.
    pub id: PostId,
    /// Title.
    pub title: String,
    /// Rich-text content.
    #[serde(with = "content_html", default)]
    pub content: PostContent,
    /// Embedded video URL.
    #[serde(rename = "videoUrl", default)]
    pub video_url: Option<String>,
    /// Embedded image URL.
    #[serde(rename = "imgUrl", default)]
    pub image_url: Option<String>,
    /// Author.
    pub author: Author,
    /// Creation time.
    #[serde(rename = "createdAt", default, deserialize_with = "time::deserialize_opt")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    #[serde(rename = "updatedAt", default, deserialize_with = "time::deserialize_opt")]
    pub updated_at: Option<DateTime<Utc>>,
    /// View count.
    #[serde(rename = "view_cnt", alias = "views", default)]
    pub views: i64,
    /// Attachments.
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    /// Comments with their replies.
    #[serde(default)]
    pub comments: CommentTree,
}

impl Post {
    /// The embeddable video, if the video URL is recognized.
    pub fn video(&self) -> Option<VideoEmbed> {
        self.video_url.as_deref().and_then(VideoEmbed::detect)
    }

    /// Non-empty video URL.
    pub fn video_url(&self) -> Option<&str> {
        self.video_url.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// Non-empty image URL.
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// Check if the given user wrote this post.
    pub fn is_authored_by(&self, user: &UserId) -> bool {
        !user.is_empty() && self.author.id == *user
    }

    /// Posts with comments cannot be deleted.
    pub fn can_delete(&self) -> bool {
        self.comments.is_empty()
    }

    /// Whether the post was edited after creation.
    pub fn is_edited(&self) -> bool {
        match (self.created_at, self.updated_at) {
            (Some(c), Some(u)) => u > c,
            _ => false,
        }
    }
}

/// An uploaded file attached to a post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Attachment ID.
    pub id: AttachmentId,
    /// Stored filename.
    pub filename: String,
    /// Filename as uploaded.
    #[serde(default)]
    pub original_filename: Option<String>,
    /// Server path.
    #[serde(default)]
    pub file_path: String,
    /// Size in bytes.
    #[serde(default)]
    pub file_size: u64,
    /// MIME type.
    #[serde(default)]
    pub mime_type: String,
    /// Owning post, when listed outside a post.
    #[serde(rename = "post_no", default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<PostId>,
}

impl Attachment {
    /// Name to show and save the file under.
    pub fn display_name(&self) -> &str {
        self.original_filename
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.filename)
    }

    /// Attachment kind.
    pub fn kind(&self) -> AttachmentKind {
        AttachmentKind::detect(&self.mime_type, self.display_name())
    }

    /// Check if this is an image.
    pub fn is_image(&self) -> bool {
        self.kind() == AttachmentKind::Image
    }

    /// Human-readable size.
    pub fn human_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// Attachment type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttachmentKind {
    /// Image attachment.
    Image,
    /// Video attachment.
    Video,
    /// Office document or text.
    Document,
    /// Other file type.
    #[default]
    Other,
}

impl AttachmentKind {
    /// Determine attachment kind from extension.
    pub fn from_ext(ext: &str) -> Self {
        let ext = ext.trim_start_matches('.').to_lowercase();
        if IMAGE_EXTENSIONS.contains(&ext.as_str()) || ext == "webp" {
            AttachmentKind::Image
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            AttachmentKind::Video
        } else if DOCUMENT_EXTENSIONS.contains(&ext.as_str()) {
            AttachmentKind::Document
        } else {
            AttachmentKind::Other
        }
    }

    /// Determine attachment kind from MIME type, falling back to the filename.
    pub fn detect(mime: &str, filename: &str) -> Self {
        if mime.starts_with("image/") {
            return AttachmentKind::Image;
        }
        if mime.starts_with("video/") {
            return AttachmentKind::Video;
        }
        AttachmentKind::from_ext(extension(filename).unwrap_or(""))
    }
}

/// Lower-cased extension of a filename, without the dot.
pub fn extension(filename: &str) -> Option<&str> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext)
}

/// Check if the board accepts files with this name.
pub fn is_allowed_file(filename: &str) -> bool {
    let Some(ext) = extension(filename) else {
        return false;
    };
    let ext = ext.to_lowercase();
    [IMAGE_EXTENSIONS, DOCUMENT_EXTENSIONS, VIDEO_EXTENSIONS]
        .iter()
        .any(|group| group.contains(&ext.as_str()))
}

/// Format a byte count as `0 Bytes`, `1.5 KB`, `10 MB`, ...
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_owned();
    }

    let i = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
    let i = i.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(i as i32);
    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');

    format!("{} {}", trimmed, UNITS[i])
}

/// Post content travels as HTML.
mod content_html {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::models::PostContent;
    use crate::parser::parse_content;

    pub fn serialize<S: Serializer>(content: &PostContent, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&content.raw)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<PostContent, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        Ok(parse_content(raw.as_deref().unwrap_or("")))
    }
}
