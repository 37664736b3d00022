//! Data models for board entities.

mod comment;
mod content;
mod ids;
mod listing;
mod post;
mod time;
mod user;
mod video;

pub use comment::{Comment, CommentTree, CommentWindow, Walk, COMMENT_MAX_LEN, COMMENT_PAGE_STEP};
pub use content::{PostContent, Span, SpanKind};
pub use ids::{AttachmentId, CommentId, PostId, UserId};
pub use listing::{
    Pagination, PostQuery, SearchType, Sort, SortBy, SortOrder, PAGE_GROUP_SIZE, POSTS_PER_PAGE,
};
pub use post::{
    extension, format_file_size, is_allowed_file, Attachment, AttachmentKind, Post, PostSummary,
    DOCUMENT_EXTENSIONS, IMAGE_EXTENSIONS, MAX_FILE_SIZE, VIDEO_EXTENSIONS,
};
pub use time::{format_timestamp, parse_timestamp, BOARD_TZ};
pub use user::{Author, UNKNOWN_AUTHOR};
pub use video::{
    is_valid_image_url, is_valid_video_url, naver_id, youtube_id, VideoEmbed, VideoProvider,
};
