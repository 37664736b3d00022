//! Comment handlers.

use anyhow::Result;
use colored::Colorize;
use rboard::models::*;
use rboard::BoardClient;
use rust_i18n::t;
use serde::Serialize;

use crate::output::{format_time, print_indented, PlainPrint, TableRow};

/// Comment information, flattened with its nesting depth.
#[derive(Debug, Clone, Serialize)]
pub struct CommentInfo {
    pub id: i64,
    pub parent_id: i64,
    pub depth: usize,
    pub author: String,
    pub author_id: String,
    pub content: String,
    pub created_at: String,
    pub deleted: bool,
    pub edited: bool,
}

impl CommentInfo {
    fn new(depth: usize, c: &Comment) -> Self {
        Self {
            id: c.id.get(),
            parent_id: c.parent_id.get(),
            depth,
            author: c.author.display().to_string(),
            author_id: c.author.id.to_string(),
            content: if c.is_deleted {
                t!("comment_deleted").to_string()
            } else {
                c.content.clone()
            },
            created_at: format_time(c.created_at),
            deleted: c.is_deleted,
            edited: !c.is_deleted && c.updated_at.is_some() && c.updated_at != c.created_at,
        }
    }
}

impl TableRow for CommentInfo {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Author", "Comment", "Time"]
    }
    fn row(&self) -> Vec<String> {
        let indent = if self.depth > 0 { "└ " } else { "" };
        vec![
            self.id.to_string(),
            self.author.clone(),
            format!("{}{}", indent, self.content),
            self.created_at.clone(),
        ]
    }
}

impl PlainPrint for CommentInfo {
    fn plain_print(&self) {
        let pad = "    ".repeat(self.depth);
        println!(
            "{}{} {} {}{}",
            pad,
            format!("#{}", self.id).yellow(),
            self.author.green(),
            self.created_at.dimmed(),
            if self.edited {
                format!(" {}", t!("edited_label")).dimmed().to_string()
            } else {
                String::new()
            }
        );
        if self.deleted {
            println!("{}   {}", pad, self.content.dimmed());
        } else {
            print_indented(&self.content, pad.len() + 3);
        }
    }
}

/// The visible part of a comment tree.
#[derive(Debug, Clone, Serialize)]
pub struct CommentsInfo {
    pub total: usize,
    pub shown: usize,
    pub more: Option<String>,
    pub comments: Vec<CommentInfo>,
}

impl CommentsInfo {
    /// Flatten the first `window.visible` top-level comments and their replies.
    pub fn from_tree(tree: &CommentTree, window: CommentWindow) -> Self {
        let shown = CommentTree::new(tree.visible(window.visible).to_vec());
        Self {
            total: tree.len(),
            shown: shown.len(),
            more: window
                .has_more(tree.len())
                .then(|| window.label(tree.len())),
            comments: shown
                .walk()
                .map(|(depth, c)| CommentInfo::new(depth, c))
                .collect(),
        }
    }
}

/// Result of creating a comment.
#[derive(Debug, Clone, Serialize)]
pub struct CommentCreatedInfo {
    pub post_id: i64,
    pub comment_id: i64,
    pub parent_id: Option<i64>,
}

/// Result of changing a comment.
#[derive(Debug, Clone, Serialize)]
pub struct CommentResultInfo {
    pub comment_id: i64,
    pub success: bool,
}

/// List comments on a post.
pub async fn list_comments(
    client: &BoardClient,
    post_id: PostId,
    window: CommentWindow,
) -> Result<CommentsInfo> {
    let tree = client.comments().list(post_id).await?;
    Ok(CommentsInfo::from_tree(&tree, window))
}

/// Comment on a post.
pub async fn add_comment(
    client: &BoardClient,
    post_id: PostId,
    content: &str,
) -> Result<CommentCreatedInfo> {
    let id = client.comments().create(post_id, content).await?;
    Ok(CommentCreatedInfo {
        post_id: post_id.get(),
        comment_id: id.get(),
        parent_id: None,
    })
}

/// Reply to a top-level comment.
pub async fn reply_comment(
    client: &BoardClient,
    post_id: PostId,
    parent_id: CommentId,
    content: &str,
) -> Result<CommentCreatedInfo> {
    let id = client.comments().reply(post_id, parent_id, content).await?;
    Ok(CommentCreatedInfo {
        post_id: post_id.get(),
        comment_id: id.get(),
        parent_id: Some(parent_id.get()),
    })
}

/// Replace a comment's text.
pub async fn edit_comment(
    client: &BoardClient,
    comment_id: CommentId,
    content: &str,
) -> Result<CommentResultInfo> {
    client.comments().update(comment_id, content).await?;
    Ok(CommentResultInfo {
        comment_id: comment_id.get(),
        success: true,
    })
}

/// Delete a comment.
pub async fn delete_comment(client: &BoardClient, comment_id: CommentId) -> Result<CommentResultInfo> {
    client.comments().delete(comment_id).await?;
    Ok(CommentResultInfo {
        comment_id: comment_id.get(),
        success: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn comment(id: i64, parent: i64, replies: Vec<Comment>) -> Comment {
        Comment {
            id: CommentId(id),
            parent_id: CommentId(parent),
            content: format!("c{}", id),
            replies,
            ..Default::default()
        }
    }

    #[test]
    fn test_from_tree_window() {
        let tree = CommentTree::new(
            (1..=7)
                .map(|i| {
                    let replies = if i == 1 { vec![comment(10, 1, vec![])] } else { vec![] };
                    comment(i, 0, replies)
                })
                .collect(),
        );

        let info = CommentsInfo::from_tree(&tree, CommentWindow::default());
        assert_eq!(info.total, 7);
        assert_eq!(info.shown, 5);
        assert_eq!(info.more.as_deref(), Some("5/7"));

        let ids: Vec<(i64, usize)> = info.comments.iter().map(|c| (c.id, c.depth)).collect();
        assert_eq!(ids, vec![(1, 0), (10, 1), (2, 0), (3, 0), (4, 0), (5, 0)]);

        let all = CommentsInfo::from_tree(&tree, CommentWindow::new(10));
        assert_eq!(all.shown, 7);
        assert_eq!(all.more, None);
    }

    #[test]
    fn test_deleted_comment_hides_text() {
        let mut c = comment(3, 0, vec![]);
        c.is_deleted = true;
        let info = CommentInfo::new(0, &c);
        assert!(info.deleted);
        assert!(!info.edited);
        assert_ne!(info.content, "c3");
    }
}
