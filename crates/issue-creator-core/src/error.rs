//! Error types for gitlab-issue-creator.

use thiserror::Error;

/// Main error type for issue creation.
#[derive(Error, Debug)]
pub enum Error {
    /// A required argument is missing or blank
    #[error("{field} must be a non-empty string")]
    Validation { field: &'static str },

    /// A required environment variable is missing or blank
    #[error("Missing required environment variable: {0}")]
    MissingEnv(&'static str),

    /// Neither the environment nor the caller named a project
    #[error("No project configured: set GITLAB_PROJECT_ID or pass projectId")]
    MissingProject,

    /// Caller asked for a project other than the pinned one
    #[error(
        "projectId \"{requested}\" conflicts with GITLAB_PROJECT_ID \"{pinned}\"; \
         this server is pinned to a single project"
    )]
    ProjectConflict { pinned: String, requested: String },

    /// GitLab answered with a non-success status
    #[error("GitLab API error ({status} {status_text}) while creating issue: {body}")]
    Api {
        status: u16,
        status_text: String,
        body: String,
    },

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(String),

    /// GitLab answered with a success status but an unreadable body
    #[error("Malformed GitLab response: {0}")]
    InvalidResponse(String),

    /// Tool name is not registered
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for issue creation.
pub type Result<T> = std::result::Result<T, Error>;
