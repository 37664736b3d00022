//! Post handlers.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use rboard::models::*;
use rboard::BoardClient;
use rust_i18n::t;
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::comment::CommentsInfo;
use crate::output::{format_pager, format_time, PlainPrint, TableRow};

/// A row in the post list.
#[derive(Debug, Clone, Serialize)]
pub struct PostRowInfo {
    pub number: i64,
    pub id: i64,
    pub title: String,
    pub author: String,
    pub author_id: String,
    pub comments: i64,
    pub views: i64,
    pub created_at: String,
}

impl PostRowInfo {
    fn new(number: i64, p: &PostSummary) -> Self {
        Self {
            number,
            id: p.id.get(),
            title: p.title.clone(),
            author: p.author.display().to_string(),
            author_id: p.author.id.to_string(),
            comments: p.comment_count,
            views: p.views,
            created_at: format_time(p.created_at),
        }
    }
}

impl TableRow for PostRowInfo {
    fn headers() -> Vec<&'static str> {
        vec!["No.", "ID", "Title", "Author", "Date", "Views"]
    }
    fn row(&self) -> Vec<String> {
        let title = if self.comments > 0 {
            format!("{} [{}]", self.title, self.comments)
        } else {
            self.title.clone()
        };
        vec![
            self.number.to_string(),
            self.id.to_string(),
            title,
            self.author.clone(),
            self.created_at.clone(),
            self.views.to_string(),
        ]
    }
}

impl PlainPrint for PostRowInfo {
    fn plain_print(&self) {
        println!(
            "{} {}{}",
            format!("{:>4}", self.number).yellow(),
            self.title.bold(),
            if self.comments > 0 {
                format!(" [{}]", self.comments).cyan().to_string()
            } else {
                String::new()
            }
        );
        println!(
            "     {} | {} | {} | {}",
            t!("post_label", id = self.id).to_string().dimmed(),
            self.author.green(),
            self.created_at.dimmed(),
            t!("views_label", count = self.views)
        );
    }
}

/// One page of the post list.
#[derive(Debug, Clone, Serialize)]
pub struct PostListInfo {
    pub page: u32,
    pub total_pages: u32,
    pub total: u64,
    pub sort: String,
    pub search: Option<String>,
    pub pager: Option<String>,
    pub posts: Vec<PostRowInfo>,
}

/// Options for listing posts.
#[derive(Debug, Clone, Default)]
pub struct ListPostsOptions {
    pub page: u32,
    pub search: Option<String>,
    pub search_type: SearchType,
    pub sort: Sort,
    pub author: Option<String>,
}

/// List posts.
pub async fn list_posts(client: &BoardClient, options: &ListPostsOptions) -> Result<PostListInfo> {
    let mut query = PostQuery::new().with_sort(options.sort);
    if let Some(term) = &options.search {
        query = query.with_search(term, options.search_type);
    }
    query = query
        .with_author(options.author.as_deref().map(UserId::from))
        .with_page(options.page);

    let result = client.posts().list().query(query).send().await?;
    let pagination = result.pagination;

    Ok(PostListInfo {
        page: pagination.page,
        total_pages: pagination.total_pages(),
        total: result.total,
        sort: result.query.sort().to_string(),
        search: result.query.search().map(str::to_owned),
        pager: pagination.has_pager().then(|| format_pager(&pagination)),
        posts: result
            .numbered()
            .map(|(n, p)| PostRowInfo::new(n, p))
            .collect(),
    })
}

/// Attachment information.
#[derive(Debug, Clone, Serialize)]
pub struct AttachmentInfo {
    pub id: i64,
    pub name: String,
    pub kind: AttachmentKind,
    pub size: u64,
    pub human_size: String,
}

impl From<&Attachment> for AttachmentInfo {
    fn from(a: &Attachment) -> Self {
        Self {
            id: a.id.get(),
            name: a.display_name().to_string(),
            kind: a.kind(),
            size: a.file_size,
            human_size: a.human_size(),
        }
    }
}

impl TableRow for AttachmentInfo {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "File", "Size"]
    }
    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.human_size.clone(),
        ]
    }
}

impl PlainPrint for AttachmentInfo {
    fn plain_print(&self) {
        println!(
            "   {} {} {}",
            format!("[{}]", self.id).cyan(),
            self.name,
            format!("({})", self.human_size).dimmed()
        );
    }
}

/// Full post view.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetailInfo {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub author_id: String,
    pub created_at: String,
    pub updated_at: Option<String>,
    pub views: i64,
    pub video: Option<String>,
    pub image_url: Option<String>,
    pub content: String,
    pub images: Vec<String>,
    pub attachments: Vec<AttachmentInfo>,
    pub comments: CommentsInfo,
    pub can_edit: bool,
    pub can_delete: bool,
}

impl PostDetailInfo {
    /// Build the view of a loaded post. `me` is the logged-in user.
    pub fn new(post: &Post, window: CommentWindow, me: Option<&UserId>) -> Self {
        let mine = me.is_some_and(|me| post.is_authored_by(me));
        Self {
            id: post.id.get(),
            title: post.title.clone(),
            author: post.author.display().to_string(),
            author_id: post.author.id.to_string(),
            created_at: format_time(post.created_at),
            updated_at: post.is_edited().then(|| format_time(post.updated_at)),
            views: post.views,
            video: post.video().map(|v| v.embed_url()),
            image_url: post.image_url().map(str::to_owned),
            content: post.content.to_plain_text(),
            images: post.content.images().into_iter().map(str::to_owned).collect(),
            attachments: post.attachments.iter().map(AttachmentInfo::from).collect(),
            comments: CommentsInfo::from_tree(&post.comments, window),
            can_edit: mine,
            can_delete: mine && post.can_delete(),
        }
    }
}

/// Read a post with its comments.
pub async fn read_post(
    client: &BoardClient,
    id: PostId,
    window: CommentWindow,
) -> Result<PostDetailInfo> {
    let post = client.posts().get(id).await?;
    Ok(PostDetailInfo::new(&post, window, client.current_user_id()))
}

/// Result of a post change.
#[derive(Debug, Clone, Serialize)]
pub struct PostResultInfo {
    pub id: i64,
    pub title: String,
}

/// Load a post for deletion, refusing one that has comments.
pub async fn load_deletable(client: &BoardClient, id: PostId) -> Result<Post> {
    let post = client.posts().get(id).await?;
    ensure_deletable(&post)?;
    Ok(post)
}

fn ensure_deletable(post: &Post) -> Result<()> {
    if !post.can_delete() {
        bail!("{}", t!("post_has_comments", id = post.id));
    }
    Ok(())
}

/// Delete a post loaded with [`load_deletable`].
pub async fn delete_post(client: &BoardClient, post: Post) -> Result<PostResultInfo> {
    client.posts().delete_post(&post).await?;
    Ok(PostResultInfo {
        id: post.id.get(),
        title: post.title,
    })
}

/// Result of an attachment download.
#[derive(Debug, Clone, Serialize)]
pub struct DownloadInfo {
    pub attachment_id: i64,
    pub path: PathBuf,
    pub size: u64,
}

/// Find an attachment on a post.
async fn find_attachment(
    client: &BoardClient,
    post_id: PostId,
    attachment_id: AttachmentId,
) -> Result<Attachment> {
    client
        .attachments()
        .list(post_id)
        .await?
        .into_iter()
        .find(|a| a.id == attachment_id)
        .with_context(|| t!("attachment_not_found", id = attachment_id).to_string())
}

/// Download an attachment into `dir`.
pub async fn download_attachment(
    client: &BoardClient,
    post_id: PostId,
    attachment_id: AttachmentId,
    dir: &Path,
) -> Result<DownloadInfo> {
    let attachment = find_attachment(client, post_id, attachment_id).await?;
    let path = client
        .attachments()
        .download_to(post_id, &attachment, dir)
        .await?;
    Ok(DownloadInfo {
        attachment_id: attachment_id.get(),
        path,
        size: attachment.file_size,
    })
}

/// Remove an attachment from a post.
pub async fn remove_attachment(
    client: &BoardClient,
    post_id: PostId,
    attachment_id: AttachmentId,
) -> Result<AttachmentInfo> {
    let attachment = find_attachment(client, post_id, attachment_id).await?;
    client.attachments().remove(post_id, attachment_id).await?;
    Ok(AttachmentInfo::from(&attachment))
}

/// Tags that mark command-line text as ready-made HTML when they open it.
const LEADING_HTML_TAGS: &[&str] = &[
    "p", "div", "span", "br", "h1", "h2", "h3", "h4", "h5", "h6", "ul", "ol", "li",
    "blockquote", "pre", "a", "img", "strong", "b", "em", "i", "u", "s",
];

/// Whether `text` opens with one of [`LEADING_HTML_TAGS`].
fn starts_with_html_tag(text: &str) -> bool {
    let Some(body) = text.strip_prefix('<') else {
        return false;
    };
    let name_end = body
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(body.len());
    let name = body[..name_end].to_ascii_lowercase();
    let opens = body[name_end..].starts_with(|c: char| c == '>' || c == '/' || c.is_whitespace());
    opens && LEADING_HTML_TAGS.contains(&name.as_str()) && body.contains('>')
}

/// Turn command-line text into post HTML. Text that already opens with a
/// known tag is passed through; otherwise each line becomes a paragraph.
pub fn text_to_html(text: &str) -> String {
    let trimmed = text.trim();
    if starts_with_html_tag(trimmed) {
        return trimmed.to_string();
    }
    trimmed
        .lines()
        .map(|line| {
            if line.trim().is_empty() {
                "<p><br></p>".to_string()
            } else {
                format!("<p>{}</p>", html_escape::encode_text(line))
            }
        })
        .collect()
}
