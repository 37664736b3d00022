//! Attachment API.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use reqwest::{multipart::Form, Method};
use serde::{Deserialize, Serialize};

use crate::{
    client::BoardClientInner,
    error::{Error, Result},
    form::{FormError, UploadFile},
    models::{is_allowed_file, Attachment, AttachmentId, PostId, MAX_FILE_SIZE},
};

/// API for post attachments.
pub struct AttachmentApi {
    client: Arc<BoardClientInner>,
}

impl AttachmentApi {
    pub(crate) fn new(client: Arc<BoardClientInner>) -> Self {
        Self { client }
    }

    /// Attachments of a post.
    pub async fn list(&self, post_id: PostId) -> Result<Vec<Attachment>> {
        self.client
            .executor()
            .get_json(&format!("posts/{}/attachments", post_id), &[])
            .await
    }

    /// Download an attachment's contents.
    pub async fn download(&self, post_id: PostId, attachment_id: AttachmentId) -> Result<Bytes> {
        let (bytes, content_type) = self
            .client
            .executor()
            .get_bytes(&format!("posts/{}/attachments/{}", post_id, attachment_id))
            .await?;
        log::debug!(
            "downloaded attachment {} ({} bytes, {})",
            attachment_id,
            bytes.len(),
            content_type.as_deref().unwrap_or("unknown type")
        );
        Ok(bytes)
    }

    /// Download an attachment into `dir` under its display name.
    ///
    /// Returns the written path.
    pub async fn download_to(
        &self,
        post_id: PostId,
        attachment: &Attachment,
        dir: impl AsRef<Path>,
    ) -> Result<PathBuf> {
        let name = Path::new(attachment.display_name())
            .file_name()
            .ok_or_else(|| Error::invalid(format!("bad file name: {}", attachment.display_name())))?
            .to_owned();
        let bytes = self.download(post_id, attachment.id).await?;

        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(name);
        tokio::fs::write(&path, &bytes).await?;
        Ok(path)
    }

    /// Remove an attachment from a post.
    pub async fn remove(&self, post_id: PostId, attachment_id: AttachmentId) -> Result<()> {
        self.client
            .authed()?
            .send_empty(
                Method::PUT,
                &format!("posts/{}/attachments/{}/delete", post_id, attachment_id),
            )
            .await
    }

    /// Upload a single file to a post.
    pub async fn upload(&self, post_id: PostId, file: &UploadFile) -> Result<UploadedFile> {
        if file.size() > MAX_FILE_SIZE {
            return Err(FormError::FileTooLarge {
                name: file.name.clone(),
                size: file.size(),
                limit: MAX_FILE_SIZE,
            }
            .into());
        }
        if !is_allowed_file(&file.name) {
            return Err(FormError::FileTypeNotAllowed(file.name.clone()).into());
        }

        let form = Form::new().part("file", file.to_part()?);
        self.client
            .authed()?
            .send_multipart(Method::POST, &format!("posts/{}/files", post_id), form)
            .await
    }
}

/// Reply to an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    /// New attachment ID.
    pub id: AttachmentId,
    /// Stored file name.
    pub filename: String,
}
