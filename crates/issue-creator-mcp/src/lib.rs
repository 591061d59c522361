//! MCP (Model Context Protocol) server for gitlab-issue-creator.
//!
//! This crate implements the MCP server that exposes the
//! `create_gitlab_issue` tool to AI assistants over stdio.

pub mod handlers;
pub mod server;
pub mod tools;

pub use handlers::{ConfigSource, ToolHandler};
pub use server::McpServer;
