//! Rust client library for the rBoard discussion board.
//!
//! ```no_run
//! # async fn demo() -> rboard::Result<()> {
//! use rboard::{BoardClient, SearchType};
//!
//! let login = BoardClient::builder().build()?.auth().login("hong", "secret").await?;
//! let client = BoardClient::builder().with_auth(login.into_auth()).build()?;
//!
//! let page = client.posts().list().search("rust", SearchType::Title).send().await?;
//! for (number, post) in page.numbered() {
//!     println!("{} {}", number, post.title);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cache;
pub mod client;
pub mod error;
pub mod form;
pub mod models;
pub mod parser;

// Re-export main types
pub use client::{AuthInfo, BoardClient, BoardClientBuilder, HttpConfig, TokenClaims};
pub use error::{Error, Result};

// Re-export commonly used models
pub use models::{
    format_file_size, format_timestamp, Attachment, AttachmentId, AttachmentKind, Author, Comment,
    CommentId, CommentTree, CommentWindow, Pagination, Post, PostContent, PostId, PostQuery,
    PostSummary, SearchType, Sort, SortBy, SortOrder, Span, SpanKind, UserId, VideoEmbed,
    VideoProvider,
};

// Re-export API and form types
pub use api::{LoginResult, PostListResult, UploadedFile};
pub use form::{Draft, DraftStore, FormError, PostForm, PostFormAction, UploadFile};
