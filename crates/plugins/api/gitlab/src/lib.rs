//! GitLab provider implementation for gitlab-issue-creator.
//!
//! This crate talks to the GitLab REST API v4 issue endpoint and maps the
//! response into the normalized [`issue_creator_core::CreatedIssue`].

mod client;
mod types;

pub use client::GitLabClient;
