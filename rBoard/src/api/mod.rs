//! API modules.

mod attachment;
mod auth;
mod comment;
mod post;

pub use attachment::{AttachmentApi, UploadedFile};
pub use auth::{AuthApi, LoginResult};
pub use comment::CommentApi;
pub use post::{PostApi, PostListBuilder, PostListResult};
