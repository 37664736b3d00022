//! Comment models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{time, Author, CommentId, UserId};

/// Maximum comment length, in characters.
pub const COMMENT_MAX_LEN: usize = 200;

/// Number of top-level comments shown at first and added per "load more".
pub const COMMENT_PAGE_STEP: usize = 5;

/// A comment or a reply to a comment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Comment {
    /// Comment ID.
    pub id: CommentId,
    /// Text content.
    #[serde(default)]
    pub content: String,
    /// Author.
    pub author: Author,
    /// Creation time.
    #[serde(rename = "createdAt", default, deserialize_with = "time::deserialize_opt")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    #[serde(rename = "updatedAt", default, deserialize_with = "time::deserialize_opt")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Soft-deleted comments keep their place in the tree.
    #[serde(rename = "isDeleted", default)]
    pub is_deleted: bool,
    /// Parent comment, `0` for top level.
    #[serde(default)]
    pub parent_id: CommentId,
    /// Replies.
    #[serde(default)]
    pub replies: Vec<Comment>,
}

impl Comment {
    /// Check if this is a reply to another comment.
    pub fn is_reply(&self) -> bool {
        !self.parent_id.is_empty()
    }

    /// Replies nest one level only.
    pub fn can_reply(&self) -> bool {
        !self.is_reply() && !self.is_deleted
    }

    /// Only the author may edit or delete a live comment.
    pub fn can_modify(&self, user: &UserId) -> bool {
        !self.is_deleted && !user.is_empty() && self.author.id == *user
    }
}

/// Top-level comments of a post, each carrying its replies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentTree(pub Vec<Comment>);

impl CommentTree {
    /// Build a tree from top-level comments.
    pub fn new(comments: Vec<Comment>) -> Self {
        Self(comments)
    }

    /// Number of top-level comments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of comments including replies.
    pub fn total(&self) -> usize {
        self.walk().count()
    }

    /// Top-level comments.
    pub fn comments(&self) -> &[Comment] {
        &self.0
    }

    /// Sort for display: newest top-level comments first, replies oldest first.
    pub fn sort_for_display(&mut self) {
        self.0.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        for comment in &mut self.0 {
            comment.replies.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        }
    }

    /// First `n` top-level comments.
    pub fn visible(&self, n: usize) -> &[Comment] {
        &self.0[..n.min(self.0.len())]
    }

    /// Find a comment or reply by ID.
    pub fn find(&self, id: CommentId) -> Option<&Comment> {
        self.walk().map(|(_, c)| c).find(|c| c.id == id)
    }

    /// Depth-first iteration yielding `(depth, comment)`.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: self.0.iter().rev().map(|c| (0, c)).collect(),
        }
    }
}

impl From<Vec<Comment>> for CommentTree {
    fn from(comments: Vec<Comment>) -> Self {
        Self(comments)
    }
}

/// Depth-first iterator over a [`CommentTree`].
pub struct Walk<'a> {
    stack: Vec<(usize, &'a Comment)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a Comment);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, comment) = self.stack.pop()?;
        self.stack
            .extend(comment.replies.iter().rev().map(|r| (depth + 1, r)));
        Some((depth, comment))
    }
}

/// How many top-level comments are currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentWindow {
    pub visible: usize,
    pub step: usize,
}

impl Default for CommentWindow {
    fn default() -> Self {
        Self {
            visible: COMMENT_PAGE_STEP,
            step: COMMENT_PAGE_STEP,
        }
    }
}

impl CommentWindow {
    /// Start with `visible` comments shown.
    pub fn new(visible: usize) -> Self {
        Self {
            visible,
            ..Default::default()
        }
    }

    /// Show another step of comments.
    pub fn load_more(&mut self) {
        self.visible += self.step;
    }

    /// Whether comments remain hidden.
    pub fn has_more(&self, total: usize) -> bool {
        total > self.visible
    }

    /// Progress label such as `5/12`.
    pub fn label(&self, total: usize) -> String {
        format!("{}/{}", self.visible, total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_timestamp;
    use pretty_assertions::assert_eq;

    fn comment(id: i64, parent: i64, at: &str, replies: Vec<Comment>) -> Comment {
        Comment {
            id: CommentId(id),
            content: format!("c{}", id),
            author: Author::new("u", "User"),
            created_at: parse_timestamp(at),
            parent_id: CommentId(parent),
            replies,
            ..Default::default()
        }
    }

    fn sample() -> CommentTree {
        CommentTree::new(vec![
            comment(
                1,
                0,
                "2024-01-01T10:00:00",
                vec![
                    comment(4, 1, "2024-01-01T12:00:00", vec![]),
                    comment(3, 1, "2024-01-01T11:00:00", vec![]),
                ],
            ),
            comment(2, 0, "2024-01-02T10:00:00", vec![]),
        ])
    }

    #[test]
    fn test_tree_counts_and_find() {
        let tree = sample();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.total(), 4);
        assert_eq!(tree.find(CommentId(3)).map(|c| c.parent_id), Some(CommentId(1)));
        assert!(tree.find(CommentId(99)).is_none());
    }

    #[test]
    fn test_display_order_and_walk() {
        let mut tree = sample();
        tree.sort_for_display();
        let order: Vec<(usize, i64)> = tree.walk().map(|(d, c)| (d, c.id.get())).collect();
        assert_eq!(order, vec![(0, 2), (0, 1), (1, 3), (1, 4)]);
        assert_eq!(tree.visible(1).len(), 1);
        assert_eq!(tree.visible(10).len(), 2);
    }

    #[test]
    fn test_permissions() {
        let tree = sample();
        let top = tree.find(CommentId(1)).unwrap();
        let reply = tree.find(CommentId(3)).unwrap();
        assert!(top.can_reply());
        assert!(!reply.can_reply());
        assert!(top.can_modify(&UserId::new("u")));
        assert!(!top.can_modify(&UserId::new("other")));

        let deleted = Comment {
            is_deleted: true,
            ..top.clone()
        };
        assert!(!deleted.can_reply());
        assert!(!deleted.can_modify(&UserId::new("u")));
    }

    #[test]
    fn test_window() {
        let mut window = CommentWindow::default();
        assert!(window.has_more(7));
        assert_eq!(window.label(7), "5/7");
        window.load_more();
        assert!(!window.has_more(7));
        assert_eq!(window.visible, 10);
    }

    #[test]
    fn test_deserialize() {
        let json = r#"[{"id": 1, "content": "hi", "author": {"id": "a", "name": "A"},
            "createdAt": "2024-01-01T00:00:00", "updatedAt": "2024-01-01T00:00:00",
            "isDeleted": false, "parent_id": 0,
            "replies": [{"id": 2, "content": "re", "author": {"id": "b", "name": "B"},
                "createdAt": "2024-01-01T01:00:00", "updatedAt": "2024-01-01T01:00:00",
                "isDeleted": true, "parent_id": 1, "replies": []}]}]"#;
        let tree: CommentTree = serde_json::from_str(json).unwrap();
        assert_eq!(tree.total(), 2);
        let reply = tree.find(CommentId(2)).unwrap();
        assert!(reply.is_reply());
        assert!(reply.is_deleted);
    }
}
