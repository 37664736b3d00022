//! Local validation of post forms and comments.

use thiserror::Error;

use crate::models::{
    is_allowed_file, is_valid_image_url, is_valid_video_url, COMMENT_MAX_LEN, MAX_FILE_SIZE,
};

use super::PostForm;

/// Maximum title length, in characters.
pub const TITLE_MAX_LEN: usize = 200;

/// Maximum content length, in text characters.
pub const CONTENT_MAX_LEN: usize = 2000;

/// A rule the form or comment broke.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("title is required")]
    TitleRequired,

    #[error("content is required")]
    ContentRequired,

    #[error("title cannot exceed {0} characters")]
    TitleTooLong(usize),

    #[error("content cannot exceed {0} characters")]
    ContentTooLong(usize),

    #[error("invalid video URL: {0}")]
    InvalidVideoUrl(String),

    #[error("invalid image URL: {0}")]
    InvalidImageUrl(String),

    #[error("file {name} is {size} bytes, the limit is {limit}")]
    FileTooLarge { name: String, size: u64, limit: u64 },

    #[error("file type not allowed: {0}")]
    FileTypeNotAllowed(String),

    #[error("comment is empty")]
    CommentEmpty,

    #[error("comment cannot exceed {0} characters")]
    CommentTooLong(usize),
}

impl FormError {
    /// Stable identifier, used as a message key by front ends.
    pub fn code(&self) -> &'static str {
        match self {
            FormError::TitleRequired => "title_required",
            FormError::ContentRequired => "content_required",
            FormError::TitleTooLong(_) => "title_too_long",
            FormError::ContentTooLong(_) => "content_too_long",
            FormError::InvalidVideoUrl(_) => "invalid_video_url",
            FormError::InvalidImageUrl(_) => "invalid_image_url",
            FormError::FileTooLarge { .. } => "file_too_large",
            FormError::FileTypeNotAllowed(_) => "file_type_not_allowed",
            FormError::CommentEmpty => "comment_empty",
            FormError::CommentTooLong(_) => "comment_too_long",
        }
    }
}

/// Check a form without touching its state. Rules run in a fixed order and
/// the first failure wins.
pub fn check(form: &PostForm) -> Result<(), FormError> {
    if form.title.trim().is_empty() {
        return Err(FormError::TitleRequired);
    }

    let text = form.text_content();
    if text.trim().is_empty() {
        return Err(FormError::ContentRequired);
    }
    if form.title.chars().count() > TITLE_MAX_LEN {
        return Err(FormError::TitleTooLong(TITLE_MAX_LEN));
    }
    if text.chars().count() > CONTENT_MAX_LEN {
        return Err(FormError::ContentTooLong(CONTENT_MAX_LEN));
    }

    if !is_valid_video_url(form.video_url.trim()) {
        return Err(FormError::InvalidVideoUrl(form.video_url.clone()));
    }
    if !is_valid_image_url(form.image_url.trim()) {
        return Err(FormError::InvalidImageUrl(form.image_url.clone()));
    }

    for file in &form.attachments {
        if file.size() > MAX_FILE_SIZE {
            return Err(FormError::FileTooLarge {
                name: file.name.clone(),
                size: file.size(),
                limit: MAX_FILE_SIZE,
            });
        }
        if !is_allowed_file(&file.name) {
            return Err(FormError::FileTypeNotAllowed(file.name.clone()));
        }
    }

    Ok(())
}

/// Check comment text and return it trimmed.
pub fn check_comment(content: &str) -> Result<&str, FormError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(FormError::CommentEmpty);
    }
    if content.chars().count() > COMMENT_MAX_LEN {
        return Err(FormError::CommentTooLong(COMMENT_MAX_LEN));
    }
    Ok(trimmed)
}
