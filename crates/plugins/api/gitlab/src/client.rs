//! GitLab API client implementation.

use issue_creator_core::{normalize_base_url, CreatedIssue, Error, NewIssue, Result};
use tracing::{debug, info, warn};

use crate::types::GitLabIssue;

/// GitLab API client.
pub struct GitLabClient {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

impl GitLabClient {
    /// Create a new GitLab client for the given instance.
    pub fn with_base_url(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_http_client(reqwest::Client::new(), base_url, token)
    }

    /// Create a new GitLab client that shares an existing HTTP client.
    pub fn with_http_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: normalize_base_url(&base_url).to_string(),
            token: token.into(),
            client,
        }
    }

    /// Build request with common headers.
    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header("PRIVATE-TOKEN", &self.token)
    }

    /// Get the project API URL for a given endpoint.
    fn project_url(&self, project_id: &str, endpoint: &str) -> String {
        format!(
            "{}/api/v4/projects/{}{}",
            self.base_url,
            urlencoding::encode(project_id),
            endpoint
        )
    }

    /// Create an issue in the given project.
    pub async fn create_issue(&self, project_id: &str, input: &NewIssue) -> Result<CreatedIssue> {
        let url = self.project_url(project_id, "/issues");
        debug!(url = url, "GitLab POST request");

        let response = self
            .request(reqwest::Method::POST, &url)
            .form(&issue_form(input))
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let gl_issue: GitLabIssue = self.handle_response(response).await?;
        info!(
            project_id = gl_issue.project_id,
            iid = gl_issue.iid,
            "GitLab issue created"
        );

        Ok(map_issue(gl_issue))
    }

    /// Handle response and map errors.
    ///
    /// The body is read in full before the status is inspected so that error
    /// responses can be reported verbatim.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        if !status.is_success() {
            let status_code = status.as_u16();
            warn!(status = status_code, body = body, "GitLab API error response");
            return Err(Error::Api {
                status: status_code,
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                body,
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| Error::InvalidResponse(format!("Failed to parse response: {}", e)))
    }
}

// =============================================================================
// Mapping functions
// =============================================================================

/// Form fields for the issue creation endpoint.
fn issue_form(input: &NewIssue) -> Vec<(&'static str, String)> {
    let mut form = vec![("title", input.title.clone())];

    if let Some(description) = &input.description {
        form.push(("description", description.clone()));
    }

    if !input.labels.is_empty() {
        form.push(("labels", input.labels.join(",")));
    }

    for id in &input.assignee_ids {
        form.push(("assignee_ids[]", id.to_string()));
    }

    if let Some(milestone_id) = input.milestone_id {
        form.push(("milestone_id", milestone_id.to_string()));
    }

    if let Some(due_date) = &input.due_date {
        form.push(("due_date", due_date.clone()));
    }

    if let Some(confidential) = input.confidential {
        form.push(("confidential", confidential.to_string()));
    }

    form
}

fn map_issue(gl_issue: GitLabIssue) -> CreatedIssue {
    CreatedIssue {
        id: gl_issue.id,
        iid: gl_issue.iid,
        project_id: gl_issue.project_id,
        title: gl_issue.title,
        state: gl_issue.state,
        web_url: gl_issue.web_url,
    }
}
