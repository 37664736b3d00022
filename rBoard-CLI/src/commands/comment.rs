//! Comment commands.

use anyhow::Result;
use clap::Subcommand;
use rboard::models::*;
use rust_i18n::t;

use super::{confirm, localize};
use crate::config::{build_authed_client, build_client};
use crate::handlers::comment as handlers;
use crate::output::{print_json, print_success, print_table, OutputFormat};

#[derive(Subcommand)]
pub enum CommentAction {
    /// List comments on a post
    #[command(alias = "ls")]
    List {
        /// Post ID
        post: PostId,
        /// Number of top-level comments to show
        #[arg(long, default_value_t = COMMENT_PAGE_STEP)]
        limit: usize,
    },

    /// Comment on a post
    Add {
        /// Post ID
        post: PostId,
        /// Comment text
        text: String,
    },

    /// Reply to a comment
    Reply {
        /// Post ID
        post: PostId,
        /// Comment being replied to
        parent: CommentId,
        /// Reply text
        text: String,
    },

    /// Edit a comment
    Edit {
        /// Comment ID
        id: CommentId,
        /// New text
        text: String,
    },

    /// Delete a comment
    #[command(alias = "rm")]
    Delete {
        /// Comment ID
        id: CommentId,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn handle(action: CommentAction, format: OutputFormat, _verbose: bool) -> Result<()> {
    match action {
        CommentAction::List { post, limit } => list(post, limit, format).await,
        CommentAction::Add { post, text } => {
            let client = build_authed_client()?;
            let result = handlers::add_comment(&client, post, &text)
                .await
                .map_err(localize)?;
            if matches!(format, OutputFormat::Json) {
                print_json(&result);
            } else {
                print_success(t!("comment_added", id = result.comment_id));
            }
            Ok(())
        }
        CommentAction::Reply { post, parent, text } => {
            let client = build_authed_client()?;
            let result = handlers::reply_comment(&client, post, parent, &text)
                .await
                .map_err(localize)?;
            if matches!(format, OutputFormat::Json) {
                print_json(&result);
            } else {
                print_success(t!("reply_added", id = result.comment_id, parent = parent));
            }
            Ok(())
        }
        CommentAction::Edit { id, text } => {
            let client = build_authed_client()?;
            let result = handlers::edit_comment(&client, id, &text)
                .await
                .map_err(localize)?;
            if matches!(format, OutputFormat::Json) {
                print_json(&result);
            } else {
                print_success(t!("comment_updated", id = id));
            }
            Ok(())
        }
        CommentAction::Delete { id, yes } => {
            let client = build_authed_client()?;
            if !confirm(t!("confirm_delete_comment", id = id), yes)? {
                println!("{}", t!("cancelled"));
                return Ok(());
            }
            let result = handlers::delete_comment(&client, id).await?;
            if matches!(format, OutputFormat::Json) {
                print_json(&result);
            } else {
                print_success(t!("comment_deleted_ok", id = id));
            }
            Ok(())
        }
    }
}

async fn list(post: PostId, limit: usize, format: OutputFormat) -> Result<()> {
    let client = build_client()?;
    let result = handlers::list_comments(&client, post, CommentWindow::new(limit)).await?;

    if matches!(format, OutputFormat::Json) {
        print_json(&result);
        return Ok(());
    }

    if result.comments.is_empty() {
        println!("{}", t!("no_comments"));
        return Ok(());
    }

    if format.is_plain() {
        println!("{}\n", t!("comments_count", count = result.total));
    }
    let more = result.more.clone();
    print_table(result.comments, format);
    if let Some(more) = more {
        println!("{}", t!("more_comments", label = more, id = post));
    }
    Ok(())
}
