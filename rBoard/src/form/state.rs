//! Post form state and its reducer.

use std::path::Path;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use reqwest::multipart::{Form, Part};

use crate::error::{Error, Result};
use crate::models::{format_file_size, Attachment, AttachmentId, Post, PostId, VideoEmbed};
use crate::parser::parse_content;

use super::draft::draft_key;
use super::validate::{check, FormError};

/// A local file queued for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// File name sent to the server.
    pub name: String,
    /// MIME type.
    pub mime: String,
    /// File contents.
    pub bytes: Bytes,
}

impl UploadFile {
    /// Create an upload, guessing the MIME type from the name.
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let name = name.into();
        let mime = mime_guess::from_path(&name)
            .first_or_octet_stream()
            .essence_str()
            .to_owned();
        Self {
            name,
            mime,
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::invalid(format!("not a file path: {}", path.display())))?
            .to_owned();
        let bytes = tokio::fs::read(path).await?;
        Ok(Self::new(name, bytes))
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }

    pub fn human_size(&self) -> String {
        format_file_size(self.size())
    }

    pub(crate) fn to_part(&self) -> Result<Part> {
        let part = Part::bytes(self.bytes.to_vec())
            .file_name(self.name.clone())
            .mime_str(&self.mime)?;
        Ok(part)
    }
}

/// Changes that can be applied to a [`PostForm`].
#[derive(Debug, Clone)]
pub enum PostFormAction {
    SetTitle(String),
    SetVideoUrl(String),
    /// Editor HTML.
    SetContent(String),
    SetImageUrl(String),
    SetAttachments(Vec<UploadFile>),
    AddAttachments(Vec<UploadFile>),
    /// Drop a queued upload by index.
    RemoveAttachment(usize),
    SetExistingAttachments(Vec<Attachment>),
    /// Stop keeping an attachment the post already has.
    RemoveExistingAttachment(AttachmentId),
    SetPreview(Option<VideoEmbed>),
    SetLastSaved(Option<DateTime<Utc>>),
    SetError(Option<String>),
    FocusTitle,
    BlurTitle,
}

/// State of the post create/edit form.
#[derive(Debug, Clone, Default)]
pub struct PostForm {
    /// Post being edited, `None` when creating.
    pub post_id: Option<PostId>,
    pub title: String,
    pub video_url: String,
    /// Content as editor HTML.
    pub content: String,
    pub image_url: String,
    /// New files to upload.
    pub attachments: Vec<UploadFile>,
    /// Attachments of the edited post that are kept.
    pub existing_attachments: Vec<Attachment>,
    /// Video preview for the current video URL.
    pub preview: Option<VideoEmbed>,
    /// When the draft was last saved.
    pub last_saved: Option<DateTime<Utc>>,
    /// Title error shown to the user.
    pub error: Option<String>,
    pub focus_title: bool,
    /// Set when submission failed because the content was blank.
    pub content_error: bool,
}

impl PostForm {
    /// Empty form for a new post.
    pub fn new() -> Self {
        Self::default()
    }

    /// Form pre-filled from an existing post.
    pub fn from_post(post: &Post) -> Self {
        let mut form = Self {
            post_id: Some(post.id),
            ..Self::default()
        };
        form.apply(PostFormAction::SetTitle(post.title.clone()));
        form.apply(PostFormAction::SetContent(post.content.raw.clone()));
        form.apply(PostFormAction::SetVideoUrl(
            post.video_url().unwrap_or_default().to_owned(),
        ));
        form.apply(PostFormAction::SetImageUrl(
            post.image_url().unwrap_or_default().to_owned(),
        ));
        form.apply(PostFormAction::SetExistingAttachments(post.attachments.clone()));
        form
    }

    /// Check if this form edits an existing post.
    pub fn is_edit(&self) -> bool {
        self.post_id.is_some()
    }

    /// Key the draft of this form is stored under.
    pub fn draft_key(&self) -> String {
        draft_key(self.post_id)
    }

    /// Apply an action.
    pub fn apply(&mut self, action: PostFormAction) {
        match action {
            PostFormAction::SetTitle(title) => {
                self.title = title;
                self.error = None;
            }
            PostFormAction::SetVideoUrl(url) => {
                self.preview = VideoEmbed::detect(&url);
                self.video_url = url;
            }
            PostFormAction::SetContent(html) => {
                self.content = html;
                if !self.text_content().trim().is_empty() {
                    self.content_error = false;
                }
            }
            PostFormAction::SetImageUrl(url) => self.image_url = url,
            PostFormAction::SetAttachments(files) => self.attachments = files,
            PostFormAction::AddAttachments(files) => self.attachments.extend(files),
            PostFormAction::RemoveAttachment(index) => {
                if index < self.attachments.len() {
                    self.attachments.remove(index);
                }
            }
            PostFormAction::SetExistingAttachments(list) => self.existing_attachments = list,
            PostFormAction::RemoveExistingAttachment(id) => {
                self.existing_attachments.retain(|a| a.id != id)
            }
            PostFormAction::SetPreview(preview) => self.preview = preview,
            PostFormAction::SetLastSaved(at) => self.last_saved = at,
            PostFormAction::SetError(error) => self.error = error,
            PostFormAction::FocusTitle => self.focus_title = true,
            PostFormAction::BlurTitle => self.focus_title = false,
        }
    }

    /// Text of the content as a browser's `textContent` would give it.
    pub fn text_content(&self) -> String {
        parse_content(&self.content).text_content()
    }

    /// Number of text characters in the content.
    pub fn content_len(&self) -> usize {
        self.text_content().chars().count()
    }

    /// Whether leaving the form would lose input.
    pub fn is_dirty(&self) -> bool {
        !self.title.is_empty() || !self.content.is_empty() || !self.video_url.is_empty()
    }

    /// Validate before submission, flagging the offending field.
    pub fn validate(&mut self) -> std::result::Result<(), FormError> {
        let result = check(self);
        match &result {
            Err(e @ FormError::TitleRequired) => {
                self.apply(PostFormAction::SetError(Some(e.to_string())));
                self.apply(PostFormAction::FocusTitle);
            }
            Err(FormError::ContentRequired) => self.content_error = true,
            _ => {}
        }
        result
    }

    /// Multipart body for `POST posts` or `PUT posts/{id}`.
    pub fn to_multipart(&self) -> Result<Form> {
        let mut form = Form::new()
            .text("title", self.title.clone())
            .text("content", self.content.clone());

        let video_url = self.video_url.trim();
        if !video_url.is_empty() {
            form = form.text("video_url", video_url.to_owned());
        }
        let image_url = self.image_url.trim();
        if !image_url.is_empty() {
            form = form.text("img_url", image_url.to_owned());
        }

        for attachment in &self.existing_attachments {
            form = form.text("existing_files", attachment.id.to_string());
        }
        for file in &self.attachments {
            form = form.part("files", file.to_part()?);
        }

        Ok(form)
    }
}
