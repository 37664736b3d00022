//! MCP Server implementation for rBoard.

use rmcp::{
    ServerHandler, tool, tool_handler, tool_router,
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::*,
    ErrorData as McpError,
};
use rboard::models::{CommentId, CommentWindow, PostId, SearchType, Sort, COMMENT_PAGE_STEP};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config;
use crate::handlers::{comment, post};

/// MCP Server for board operations.
#[derive(Clone)]
pub struct BoardMCPServer {
    tool_router: ToolRouter<Self>,
}

impl BoardMCPServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }

    fn build_client() -> Result<rboard::BoardClient, McpError> {
        config::build_client()
            .map_err(|e| McpError::internal_error(e.to_string(), None))
    }

    fn build_authed_client() -> Result<rboard::BoardClient, McpError> {
        config::build_authed_client()
            .map_err(|e| McpError::internal_error(e.to_string(), None))
    }

    fn to_json<T: Serialize>(value: &T) -> Result<String, McpError> {
        serde_json::to_string_pretty(value)
            .map_err(|e| McpError::internal_error(e.to_string(), None))
    }

    fn ok(text: String) -> Result<CallToolResult, McpError> {
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    fn internal(e: impl std::fmt::Display) -> McpError {
        McpError::internal_error(e.to_string(), None)
    }
}

// Parameter structs
#[derive(Debug, Deserialize, JsonSchema)]
pub struct PostListParams {
    /// Page number (default: 1)
    #[serde(default = "default_page")]
    pub page: u32,
    /// Search term
    pub search: Option<String>,
    /// Search field: all, title, content or author (default: all)
    pub search_type: Option<String>,
    /// Sort order such as createdAt-desc or view_cnt-asc (default: createdAt-desc)
    pub sort: Option<String>,
    /// Only posts by this user ID
    pub author: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct PostReadParams {
    /// Post ID
    pub post_id: i64,
    /// Number of top-level comments to include (default: 5)
    #[serde(default = "default_comments")]
    pub comments: usize,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CommentAddParams {
    /// Post ID to comment on
    pub post_id: i64,
    /// Comment text (up to 200 characters)
    pub content: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CommentReplyParams {
    /// Post ID
    pub post_id: i64,
    /// Top-level comment being replied to
    pub parent_id: i64,
    /// Reply text (up to 200 characters)
    pub content: String,
}

fn default_page() -> u32 { 1 }

fn default_comments() -> usize { COMMENT_PAGE_STEP }

impl PostListParams {
    fn options(&self) -> Result<post::ListPostsOptions, McpError> {
        let search_type = match &self.search_type {
            Some(s) => s.parse::<SearchType>().map_err(|e| McpError::invalid_params(e, None))?,
            None => SearchType::default(),
        };
        let sort = match &self.sort {
            Some(s) => s.parse::<Sort>().map_err(|e| McpError::invalid_params(e, None))?,
            None => Sort::default(),
        };
        Ok(post::ListPostsOptions {
            page: self.page,
            search: self.search.clone(),
            search_type,
            sort,
            author: self.author.clone(),
        })
    }
}

#[tool_router]
impl BoardMCPServer {
    #[tool(description = "List board posts, optionally searching and sorting")]
    async fn post_list(&self, params: Parameters<PostListParams>) -> Result<CallToolResult, McpError> {
        let options = params.0.options()?;
        let client = Self::build_client()?;
        let result = post::list_posts(&client, &options).await.map_err(Self::internal)?;
        Self::ok(Self::to_json(&result)?)
    }

    #[tool(description = "Read a post with its attachments and comments")]
    async fn post_read(&self, params: Parameters<PostReadParams>) -> Result<CallToolResult, McpError> {
        let client = Self::build_client()?;
        let result = post::read_post(
            &client,
            PostId(params.0.post_id),
            CommentWindow::new(params.0.comments),
        )
        .await
        .map_err(Self::internal)?;
        Self::ok(Self::to_json(&result)?)
    }

    #[tool(description = "Comment on a post (requires authentication via CLI: rboard auth login)")]
    async fn comment_add(&self, params: Parameters<CommentAddParams>) -> Result<CallToolResult, McpError> {
        let client = Self::build_authed_client()?;
        let result = comment::add_comment(&client, PostId(params.0.post_id), &params.0.content)
            .await
            .map_err(Self::internal)?;
        Self::ok(format!("Comment posted (comment ID: {})", result.comment_id))
    }

    #[tool(description = "Reply to a top-level comment (requires authentication via CLI: rboard auth login)")]
    async fn comment_reply(&self, params: Parameters<CommentReplyParams>) -> Result<CallToolResult, McpError> {
        let client = Self::build_authed_client()?;
        let result = comment::reply_comment(
            &client,
            PostId(params.0.post_id),
            CommentId(params.0.parent_id),
            &params.0.content,
        )
        .await
        .map_err(Self::internal)?;
        Self::ok(format!("Reply posted (comment ID: {})", result.comment_id))
    }
}

#[tool_handler]
impl ServerHandler for BoardMCPServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability { list_changed: None }),
                ..Default::default()
            },
            server_info: Implementation {
                name: "rboard-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: None,
                icons: None,
                website_url: None,
            },
            ..Default::default()
        }
    }
}

/// Run the MCP Server.
pub async fn run_server() -> anyhow::Result<()> {
    use rmcp::transport::io::stdio;

    tracing::info!("Starting rBoard MCP server");

    let server = BoardMCPServer::new();
    let service = rmcp::serve_server(server, stdio()).await?;

    tracing::info!("rBoard MCP server ready");
    service.waiting().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_list_params_defaults() {
        let params: PostListParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.page, 1);
        let options = params.options().unwrap();
        assert_eq!(options.search_type, SearchType::All);
        assert_eq!(options.sort, Sort::default());
    }

    #[test]
    fn test_list_params_parse() {
        let params: PostListParams = serde_json::from_str(
            r#"{"page": 2, "search": "rust", "search_type": "title", "sort": "view_cnt-asc"}"#,
        )
        .unwrap();
        let options = params.options().unwrap();
        assert_eq!(options.search_type, SearchType::Title);
        assert_eq!(options.sort.to_string(), "view_cnt-asc");

        let params: PostListParams =
            serde_json::from_str(r#"{"search_type": "nope"}"#).unwrap();
        assert!(params.options().is_err());
    }

    #[test]
    fn test_read_params_default_window() {
        let params: PostReadParams = serde_json::from_str(r#"{"post_id": 3}"#).unwrap();
        assert_eq!(params.comments, COMMENT_PAGE_STEP);
    }
}
