//! Shared handlers for CLI and MCP.

pub mod comment;
pub mod post;
