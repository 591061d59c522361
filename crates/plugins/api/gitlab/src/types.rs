//! GitLab API response types.
//!
//! These types represent the raw JSON responses from GitLab REST API v4.
//! They are deserialized and then mapped to unified types.

use serde::Deserialize;

// =============================================================================
// Issue
// =============================================================================

/// GitLab issue representation, reduced to the fields we report back.
#[derive(Debug, Clone, Deserialize)]
pub struct GitLabIssue {
    pub id: u64,
    pub iid: u64,
    pub project_id: u64,
    pub title: String,
    pub state: String,
    pub web_url: String,
}
