//! Post commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use rboard::models::*;
use rboard::{BoardClient, DraftStore, PostForm, PostFormAction, UploadFile};
use rust_i18n::t;
use std::path::PathBuf;

use super::{confirm, form_error_message, localize};
use crate::config::{build_authed_client, build_client};
use crate::handlers::post::{self as handlers, ListPostsOptions, PostDetailInfo};
use crate::output::{print_indented, print_json, print_plain, print_success, print_table, OutputFormat};

#[derive(Subcommand)]
pub enum PostAction {
    /// List posts
    #[command(alias = "ls")]
    List {
        /// Page number
        #[arg(short, long, default_value = "1")]
        page: u32,
        /// Search term
        #[arg(short, long)]
        search: Option<String>,
        /// Search field: all, title, content, author
        #[arg(short = 't', long = "type", default_value = "all")]
        search_type: SearchType,
        /// Sort order, e.g. createdAt-desc, view_cnt-asc
        #[arg(long, default_value = "createdAt-desc")]
        sort: Sort,
        /// Only posts by this user ID
        #[arg(short, long)]
        author: Option<String>,
    },

    /// View a post with its attachments and comments
    #[command(alias = "view")]
    Show {
        /// Post ID
        id: PostId,
        /// Number of top-level comments to show
        #[arg(short, long, default_value_t = COMMENT_PAGE_STEP)]
        comments: usize,
    },

    /// Write a new post
    New {
        #[command(flatten)]
        fields: PostFields,
    },

    /// Edit a post
    Edit {
        /// Post ID
        id: PostId,
        #[command(flatten)]
        fields: PostFields,
        /// Remove an existing attachment (repeatable)
        #[arg(long = "drop-attachment")]
        drop_attachments: Vec<AttachmentId>,
    },

    /// Delete a post
    #[command(alias = "rm")]
    Delete {
        /// Post ID
        id: PostId,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Download an attachment
    Download {
        /// Post ID
        id: PostId,
        /// Attachment ID
        attachment: AttachmentId,
        /// Output directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },

    /// Remove an attachment from a post
    RmAttachment {
        /// Post ID
        id: PostId,
        /// Attachment ID
        attachment: AttachmentId,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

/// Fields shared by `new` and `edit`.
#[derive(Args, Debug, Default)]
pub struct PostFields {
    /// Title
    #[arg(long)]
    title: Option<String>,
    /// Content as text or HTML
    #[arg(long, conflicts_with = "content_file")]
    content: Option<String>,
    /// Read content from a file
    #[arg(long)]
    content_file: Option<PathBuf>,
    /// YouTube or Naver TV URL
    #[arg(long)]
    video: Option<String>,
    /// Image URL
    #[arg(long)]
    image: Option<String>,
    /// Attach a file (repeatable)
    #[arg(long = "file")]
    files: Vec<PathBuf>,
    /// Answer yes to every question
    #[arg(short, long)]
    yes: bool,
}

pub async fn handle(action: PostAction, format: OutputFormat, verbose: bool) -> Result<()> {
    match action {
        PostAction::List {
            page,
            search,
            search_type,
            sort,
            author,
        } => {
            let options = ListPostsOptions {
                page,
                search,
                search_type,
                sort,
                author,
            };
            list_posts(&options, format).await
        }
        PostAction::Show { id, comments } => show_post(id, comments, format, verbose).await,
        PostAction::New { fields } => write_post(None, fields, Vec::new(), format).await,
        PostAction::Edit {
            id,
            fields,
            drop_attachments,
        } => write_post(Some(id), fields, drop_attachments, format).await,
        PostAction::Delete { id, yes } => delete_post(id, yes, format).await,
        PostAction::Download { id, attachment, out } => {
            download(id, attachment, out, format).await
        }
        PostAction::RmAttachment {
            id,
            attachment,
            yes,
        } => remove_attachment(id, attachment, yes, format).await,
    }
}

async fn list_posts(options: &ListPostsOptions, format: OutputFormat) -> Result<()> {
    let client = build_client()?;
    let result = handlers::list_posts(&client, options).await?;

    if matches!(format, OutputFormat::Json) {
        print_json(&result);
        return Ok(());
    }

    if result.posts.is_empty() {
        println!("{}", t!("no_posts"));
        return Ok(());
    }

    if format.is_plain() {
        if let Some(term) = &result.search {
            println!("{}", t!("search_results", term = term).to_string().dimmed());
        }
    }

    print_table(result.posts, format);

    if let Some(pager) = &result.pager {
        println!("\n{}", pager);
    }
    println!(
        "{}",
        t!(
            "posts_total",
            total = result.total,
            page = result.page,
            pages = result.total_pages
        )
        .to_string()
        .dimmed()
    );
    Ok(())
}

async fn show_post(id: PostId, comments: usize, format: OutputFormat, verbose: bool) -> Result<()> {
    let client = build_client()?;
    let info = handlers::read_post(&client, id, CommentWindow::new(comments)).await?;

    if matches!(format, OutputFormat::Json) {
        print_json(&info);
        return Ok(());
    }

    print_post(&info, verbose);

    if !info.attachments.is_empty() {
        println!("\n{}", t!("attachments_count", count = info.attachments.len()).to_string().bold());
        print_table(info.attachments, format);
    }

    println!("\n{}", t!("comments_count", count = info.comments.total).to_string().bold());
    if info.comments.comments.is_empty() {
        println!("   {}", t!("no_comments").to_string().dimmed());
    } else {
        print_table(info.comments.comments, format);
    }
    if let Some(more) = &info.comments.more {
        println!(
            "{}",
            t!("more_comments", label = more, id = info.id).to_string().dimmed()
        );
    }
    Ok(())
}

fn print_post(info: &PostDetailInfo, verbose: bool) {
    println!("{} {}", format!("[{}]", info.id).cyan(), info.title.bold());
    println!(
        "{} | {} | {}",
        info.author.green(),
        info.created_at.dimmed(),
        t!("views_label", count = info.views)
    );
    if let Some(updated) = &info.updated_at {
        println!("{}", t!("updated_at", time = updated).to_string().dimmed());
    }
    if verbose {
        println!("{}", t!("uid_label", id = &info.author_id).to_string().dimmed());
    }
    println!();

    if let Some(video) = &info.video {
        println!("{} {}", t!("video_label").to_string().magenta(), video);
    }
    if let Some(image) = &info.image_url {
        println!("{} {}", t!("image_label").to_string().magenta(), image);
    }
    print_indented(&info.content, 0);
    for image in &info.images {
        println!("{} {}", t!("image_label").to_string().magenta(), image);
    }
}

/// Offer the saved draft and copy it into the form when accepted.
async fn offer_draft(drafts: &DraftStore, form: &mut PostForm, yes: bool) -> Result<()> {
    let Some(draft) = drafts.load(form.post_id).await else {
        return Ok(());
    };
    let prompt = t!(
        "draft_found",
        time = rboard::format_timestamp(&draft.last_saved)
    );
    if confirm(prompt, yes)? {
        DraftStore::restore_into(form, draft);
        println!("{}", t!("draft_restored").to_string().dimmed());
    } else {
        drafts.discard(form.post_id).await;
    }
    Ok(())
}

async fn apply_fields(form: &mut PostForm, fields: &PostFields) -> Result<()> {
    if let Some(title) = &fields.title {
        form.apply(PostFormAction::SetTitle(title.clone()));
    }
    let content = match (&fields.content, &fields.content_file) {
        (Some(text), _) => Some(text.clone()),
        (None, Some(path)) => Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?,
        ),
        (None, None) => None,
    };
    if let Some(content) = content {
        form.apply(PostFormAction::SetContent(handlers::text_to_html(&content)));
    }
    if let Some(video) = &fields.video {
        form.apply(PostFormAction::SetVideoUrl(video.clone()));
    }
    if let Some(image) = &fields.image {
        form.apply(PostFormAction::SetImageUrl(image.clone()));
    }

    let mut files = Vec::with_capacity(fields.files.len());
    for path in &fields.files {
        files.push(
            UploadFile::from_path(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?,
        );
    }
    if !files.is_empty() {
        form.apply(PostFormAction::AddAttachments(files));
    }
    Ok(())
}

async fn write_post(
    id: Option<PostId>,
    fields: PostFields,
    drop_attachments: Vec<AttachmentId>,
    format: OutputFormat,
) -> Result<()> {
    let client = build_authed_client()?;

    let mut form = match id {
        Some(id) => {
            let post = client.posts().get(id).await?;
            if !client.current_user_id().is_some_and(|me| post.is_authored_by(me)) {
                anyhow::bail!("{}", t!("not_your_post", id = id));
            }
            PostForm::from_post(&post)
        }
        None => PostForm::new(),
    };

    offer_draft(client.drafts(), &mut form, fields.yes).await?;
    apply_fields(&mut form, &fields).await?;

    for attachment_id in drop_attachments {
        let Some(existing) = form
            .existing_attachments
            .iter()
            .find(|a| a.id == attachment_id)
        else {
            anyhow::bail!("{}", t!("attachment_not_found", id = attachment_id));
        };
        if confirm(t!("confirm_drop_attachment", name = existing.display_name()), fields.yes)? {
            form.apply(PostFormAction::RemoveExistingAttachment(attachment_id));
        }
    }

    if let Err(e) = form.validate() {
        save_draft(client.drafts(), &form).await;
        anyhow::bail!(form_error_message(&e));
    }

    match submit(&client, &form).await {
        Ok(post) => {
            let result = handlers::PostResultInfo {
                id: post.id.get(),
                title: post.title,
            };
            if matches!(format, OutputFormat::Json) {
                print_json(&result);
            } else if form.is_edit() {
                print_success(t!("post_updated", id = result.id));
            } else {
                print_success(t!("post_created", id = result.id));
            }
            Ok(())
        }
        Err(e) => {
            save_draft(client.drafts(), &form).await;
            Err(localize(e))
        }
    }
}

async fn submit(client: &BoardClient, form: &PostForm) -> Result<Post> {
    let post = match form.post_id {
        Some(id) => client.posts().update(id, form).await?,
        None => client.posts().create(form).await?,
    };
    Ok(post)
}

async fn save_draft(drafts: &DraftStore, form: &PostForm) {
    match drafts.save(form).await {
        Ok(Some(at)) => eprintln!(
            "{}",
            t!("draft_saved", time = rboard::format_timestamp(&at))
                .to_string()
                .yellow()
        ),
        Ok(None) => {}
        Err(e) => tracing::warn!("could not save draft: {}", e),
    }
}

async fn delete_post(id: PostId, yes: bool, format: OutputFormat) -> Result<()> {
    let client = build_authed_client()?;
    let post = handlers::load_deletable(&client, id).await?;
    if !confirm(t!("confirm_delete_post", id = id), yes)? {
        println!("{}", t!("cancelled"));
        return Ok(());
    }

    let result = handlers::delete_post(&client, post).await?;
    if matches!(format, OutputFormat::Json) {
        print_json(&result);
    } else {
        print_success(t!("post_deleted", id = result.id));
    }
    Ok(())
}

async fn download(
    id: PostId,
    attachment: AttachmentId,
    out: PathBuf,
    format: OutputFormat,
) -> Result<()> {
    let client = build_client()?;
    let result = handlers::download_attachment(&client, id, attachment, &out).await?;

    if matches!(format, OutputFormat::Json) {
        print_json(&result);
    } else {
        print_success(t!(
            "downloaded",
            path = result.path.display(),
            size = format_file_size(result.size)
        ));
    }
    Ok(())
}

async fn remove_attachment(
    id: PostId,
    attachment: AttachmentId,
    yes: bool,
    format: OutputFormat,
) -> Result<()> {
    let client = build_authed_client()?;
    if !confirm(t!("confirm_remove_attachment", id = attachment), yes)? {
        println!("{}", t!("cancelled"));
        return Ok(());
    }

    let result = handlers::remove_attachment(&client, id, attachment).await?;
    match format {
        OutputFormat::Json => print_json(&result),
        _ => {
            print_success(t!("attachment_removed", name = &result.name));
            print_plain(&[result]);
        }
    }
    Ok(())
}
