//! Comment API.

use std::sync::Arc;

use reqwest::{multipart::Form, Method};
use serde::Deserialize;

use crate::{
    client::BoardClientInner,
    error::Result,
    form::check_comment,
    models::{CommentId, CommentTree, PostId},
};

/// API for comment operations.
pub struct CommentApi {
    client: Arc<BoardClientInner>,
}

impl CommentApi {
    pub(crate) fn new(client: Arc<BoardClientInner>) -> Self {
        Self { client }
    }

    /// Comments of a post with their replies, in display order.
    pub async fn list(&self, post_id: PostId) -> Result<CommentTree> {
        let mut tree: CommentTree = self
            .client
            .executor()
            .get_json(&format!("posts/{}/comments", post_id), &[])
            .await?;
        tree.sort_for_display();
        Ok(tree)
    }

    /// Add a top-level comment.
    pub async fn create(&self, post_id: PostId, content: &str) -> Result<CommentId> {
        self.send_new(post_id, CommentId::default(), content).await
    }

    /// Reply to a comment.
    pub async fn reply(
        &self,
        post_id: PostId,
        parent_id: CommentId,
        content: &str,
    ) -> Result<CommentId> {
        self.send_new(post_id, parent_id, content).await
    }

    /// Replace a comment's text.
    pub async fn update(&self, comment_id: CommentId, content: &str) -> Result<()> {
        let content = check_comment(content)?;
        let form = Form::new().text("content", content.to_owned());
        let _: serde_json::Value = self
            .client
            .authed()?
            .send_multipart(Method::PUT, &format!("comments/{}", comment_id), form)
            .await?;
        Ok(())
    }

    /// Delete a comment.
    pub async fn delete(&self, comment_id: CommentId) -> Result<()> {
        self.client
            .authed()?
            .send_empty(Method::DELETE, &format!("comments/{}", comment_id))
            .await
    }

    async fn send_new(
        &self,
        post_id: PostId,
        parent_id: CommentId,
        content: &str,
    ) -> Result<CommentId> {
        let content = check_comment(content)?;
        let form = Form::new()
            .text("content", content.to_owned())
            .text("parent_comment_id", parent_id.to_string());

        let response: CreatedComment = self
            .client
            .authed()?
            .send_multipart(Method::POST, &format!("posts/{}/comments", post_id), form)
            .await?;
        log::debug!("comment {} added to post {}", response.comment_id, post_id);
        Ok(response.comment_id)
    }
}

#[derive(Debug, Deserialize)]
struct CreatedComment {
    comment_id: CommentId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::form::FormError;
    use crate::BoardClient;

    #[tokio::test]
    async fn test_text_checked_before_auth() {
        let client = BoardClient::builder()
            .base_url("http://127.0.0.1:9/api/")
            .build()
            .unwrap();

        let err = client.comments().create(PostId(1), " ").await.unwrap_err();
        assert!(matches!(err, Error::Form(FormError::CommentEmpty)));

        let err = client
            .comments()
            .reply(PostId(1), CommentId(2), &"x".repeat(201))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Form(FormError::CommentTooLong(200))));

        let err = client.comments().create(PostId(1), "hi").await.unwrap_err();
        assert!(matches!(err, Error::AuthRequired));
    }
}
