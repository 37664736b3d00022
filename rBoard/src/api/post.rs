//! Post API.

use std::sync::Arc;

use reqwest::Method;
use serde::Deserialize;

use crate::{
    client::BoardClientInner,
    error::{Error, Result},
    form::{check, PostForm},
    models::{Pagination, Post, PostId, PostQuery, PostSummary, SearchType, Sort, UserId},
};

/// API for post operations.
pub struct PostApi {
    client: Arc<BoardClientInner>,
}

impl PostApi {
    pub(crate) fn new(client: Arc<BoardClientInner>) -> Self {
        Self { client }
    }

    /// List posts.
    pub fn list(&self) -> PostListBuilder {
        PostListBuilder {
            client: self.client.clone(),
            query: PostQuery::new(),
        }
    }

    /// Get a post with its attachments and comments. The server counts a view.
    pub async fn get(&self, id: PostId) -> Result<Post> {
        let mut post: Post = self
            .client
            .executor()
            .get_json(&format!("posts/{}", id), &[])
            .await?;
        post.comments.sort_for_display();
        Ok(post)
    }

    /// Create a post from a form.
    ///
    /// The form is validated first. On success the new-post draft is removed.
    pub async fn create(&self, form: &PostForm) -> Result<Post> {
        check(form)?;
        let http = self.client.authed()?;
        let post: Post = http
            .send_multipart(Method::POST, "posts", form.to_multipart()?)
            .await?;
        log::debug!("created post {}", post.id);
        self.client.drafts.discard(None).await;
        Ok(post)
    }

    /// Replace a post's fields from a form.
    ///
    /// Attachments not listed in the form's existing attachments are removed
    /// by the server. On success the post's draft is removed.
    pub async fn update(&self, id: PostId, form: &PostForm) -> Result<Post> {
        check(form)?;
        let http = self.client.authed()?;
        let post: Post = http
            .send_multipart(Method::PUT, &format!("posts/{}", id), form.to_multipart()?)
            .await?;
        log::debug!("updated post {}", id);
        self.client.drafts.discard(Some(id)).await;
        Ok(post)
    }

    /// Delete a post by ID.
    pub async fn delete(&self, id: PostId) -> Result<()> {
        self.client
            .authed()?
            .send_empty(Method::DELETE, &format!("posts/{}", id))
            .await
    }

    /// Delete a loaded post, refusing when it has comments.
    pub async fn delete_post(&self, post: &Post) -> Result<()> {
        if !post.can_delete() {
            return Err(Error::invalid(format!(
                "post {} has comments and cannot be deleted",
                post.id
            )));
        }
        self.delete(post.id).await
    }
}

/// Builder for listing posts.
pub struct PostListBuilder {
    client: Arc<BoardClientInner>,
    query: PostQuery,
}

impl PostListBuilder {
    /// Set the page number.
    pub fn page(mut self, page: u32) -> Self {
        self.query = self.query.with_page(page);
        self
    }

    /// Search for a term.
    pub fn search(mut self, term: &str, search_type: SearchType) -> Self {
        self.query = self.query.with_search(term, search_type);
        self
    }

    /// Only list posts by this author.
    pub fn author(mut self, author: impl Into<UserId>) -> Self {
        self.query = self.query.with_author(Some(author.into()));
        self
    }

    /// Set the sort order.
    pub fn sort(mut self, sort: Sort) -> Self {
        self.query = self.query.with_sort(sort);
        self
    }

    /// Use a prepared query.
    pub fn query(mut self, query: PostQuery) -> Self {
        self.query = query;
        self
    }

    /// Execute the request.
    pub async fn send(self) -> Result<PostListResult> {
        let response: PostListResponse = self
            .client
            .executor()
            .get_json("posts", &self.query.to_query_pairs())
            .await?;

        Ok(PostListResult {
            pagination: Pagination::new(self.query.page(), response.total),
            posts: response.posts,
            total: response.total,
            query: self.query,
        })
    }
}

#[derive(Debug, Deserialize)]
struct PostListResponse {
    #[serde(default)]
    posts: Vec<PostSummary>,
    #[serde(default)]
    total: u64,
}

/// Result of a post list request.
#[derive(Debug, Clone)]
pub struct PostListResult {
    /// Posts on this page.
    pub posts: Vec<PostSummary>,
    /// Number of posts matching the query.
    pub total: u64,
    /// Pager state for this page.
    pub pagination: Pagination,
    /// Query that produced this page.
    pub query: PostQuery,
}

impl PostListResult {
    /// Posts with their descending row numbers.
    pub fn numbered(&self) -> impl Iterator<Item = (i64, &PostSummary)> {
        self.posts
            .iter()
            .enumerate()
            .map(|(i, p)| (self.pagination.post_number(i), p))
    }
}
