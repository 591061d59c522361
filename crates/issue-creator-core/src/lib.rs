//! Core types, configuration, and error handling for gitlab-issue-creator.
//!
//! This crate provides the pieces shared by the GitLab client and the MCP
//! server: the error type, environment configuration, and the validated
//! issue request and result types.

pub mod config;
pub mod error;
pub mod types;

pub use config::{normalize_base_url, EnvConfig, DEFAULT_GITLAB_URL};
pub use error::{Error, Result};
pub use types::{CreateIssueArgs, CreatedIssue, NewIssue};
