//! Tool handlers for MCP server.
//!
//! This module routes tool calls by name and implements the
//! `create_gitlab_issue` tool: validate arguments, resolve configuration,
//! call GitLab, and render the normalized result.

use issue_creator_core::{CreateIssueArgs, CreatedIssue, EnvConfig, Error, Result};
use issue_creator_gitlab::GitLabClient;
use rmcp::model::{Annotated, CallToolResult, JsonObject, RawContent, RawTextContent, Tool};
use serde_json::Value;

use crate::tools::{create_issue_tool, CREATE_ISSUE_TOOL};

/// Where the handler gets its configuration from.
#[derive(Debug, Clone, Default)]
pub enum ConfigSource {
    /// Re-read the process environment on every call
    #[default]
    Environment,
    /// Use a fixed configuration
    Fixed(EnvConfig),
}

impl ConfigSource {
    /// Resolve the configuration for one invocation.
    pub fn load(&self) -> EnvConfig {
        match self {
            Self::Environment => EnvConfig::from_env(),
            Self::Fixed(config) => config.clone(),
        }
    }
}

/// Tool handler that executes tools against GitLab.
pub struct ToolHandler {
    config: ConfigSource,
    http: reqwest::Client,
}

impl ToolHandler {
    /// Create a handler that reads the process environment.
    pub fn new() -> Self {
        Self::with_config_source(ConfigSource::Environment)
    }

    /// Create a handler with a fixed configuration.
    pub fn with_config(config: EnvConfig) -> Self {
        Self::with_config_source(ConfigSource::Fixed(config))
    }

    /// Create a handler around an explicit configuration source.
    ///
    /// Each `available_tools` and `execute` call loads the source afresh, so
    /// [`ConfigSource::Environment`] picks up variables changed at runtime.
    pub fn with_config_source(config: ConfigSource) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Get available tool definitions.
    pub fn available_tools(&self) -> Vec<Tool> {
        let config = self.config.load();
        vec![create_issue_tool(config.pinned_project())]
    }

    /// Execute a tool by name with arguments.
    ///
    /// Failures inside a known tool become an error result for the agent;
    /// only an unknown tool name is returned as `Err`.
    pub async fn execute(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult> {
        match name {
            CREATE_ISSUE_TOOL => {
                let arguments = Value::Object(arguments.unwrap_or_default());
                let result = self
                    .handle_create_issue(&arguments)
                    .await
                    .and_then(|issue| Ok(serde_json::to_string_pretty(&issue)?));

                Ok(match result {
                    Ok(text) => text_result(text, false),
                    Err(e) => {
                        tracing::warn!("{} failed: {}", CREATE_ISSUE_TOOL, e);
                        text_result(e.to_string(), true)
                    }
                })
            }
            _ => Err(Error::UnknownTool(name.to_string())),
        }
    }

    /// Handle create_gitlab_issue tool call.
    async fn handle_create_issue(&self, arguments: &Value) -> Result<CreatedIssue> {
        let config = self.config.load();
        let args = CreateIssueArgs::parse(arguments, config.pinned_project().is_some())?;

        let base_url = config.base_url(args.gitlab_url.as_deref());
        let token = config.token()?;
        let project_id = config.resolve_project(args.project_id.as_deref())?;

        tracing::debug!(
            base_url = base_url,
            project_id = project_id,
            "Creating GitLab issue"
        );

        let client = GitLabClient::with_http_client(self.http.clone(), base_url, token);
        client.create_issue(&project_id, &args.issue).await
    }
}

fn text_result(text: String, is_error: bool) -> CallToolResult {
    CallToolResult {
        content: vec![Annotated::new(
            RawContent::Text(RawTextContent { text }),
            None,
        )],
        is_error: Some(is_error),
    }
}

impl Default for ToolHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn config(token: Option<&str>, pinned: Option<&str>) -> EnvConfig {
        EnvConfig {
            token: token.map(str::to_string),
            url: None,
            project_id: pinned.map(str::to_string),
        }
    }

    fn args(value: Value) -> Option<JsonObject> {
        match value {
            Value::Object(map) => Some(map),
            other => panic!("Expected object arguments, got {}", other),
        }
    }

    fn issue_json() -> Value {
        json!({
            "id": 501,
            "iid": 12,
            "project_id": 123,
            "title": "Broken build",
            "description": "CI fails",
            "state": "opened",
            "labels": ["bug"],
            "author": {"id": 1, "username": "bot"},
            "web_url": "https://git.example.com/group/project/-/issues/12"
        })
    }

    fn first_text(result: &CallToolResult) -> &str {
        match &result.content[0].raw {
            RawContent::Text(text) => &text.text,
            other => panic!("Expected text content, got {:?}", other),
        }
    }

    fn error_text(result: &CallToolResult) -> &str {
        assert_eq!(result.is_error, Some(true));
        first_text(result)
    }

    fn required(tool: &Tool) -> Vec<Value> {
        tool.input_schema
            .get("required")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default()
    }

    #[test]
    fn test_available_tools_unpinned() {
        let handler = ToolHandler::with_config(config(Some("t"), None));
        let tools = handler.available_tools();

        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "create_gitlab_issue");
        assert!(required(&tools[0]).contains(&json!("projectId")));
    }

    #[test]
    fn test_available_tools_pinned() {
        let handler = ToolHandler::with_config(config(Some("t"), Some("123")));
        let tools = handler.available_tools();

        assert_eq!(tools.len(), 1);
        assert!(!required(&tools[0]).contains(&json!("projectId")));
    }

    #[test]
    #[serial_test::serial]
    fn test_environment_source_tracks_project_variable() {
        let saved = std::env::var("GITLAB_PROJECT_ID").ok();
        let handler = ToolHandler::new();

        std::env::remove_var("GITLAB_PROJECT_ID");
        let unpinned = required(&handler.available_tools()[0]);

        std::env::set_var("GITLAB_PROJECT_ID", "123");
        let tools = handler.available_tools();
        let pinned = required(&tools[0]);

        match saved {
            Some(value) => std::env::set_var("GITLAB_PROJECT_ID", value),
            None => std::env::remove_var("GITLAB_PROJECT_ID"),
        }

        assert_eq!(unpinned, vec![json!("title"), json!("projectId")]);
        assert_eq!(pinned, vec![json!("title")]);
        assert!(tools[0].description.as_deref().unwrap().contains("123"));
    }

    #[test]
    fn test_fixed_source_is_returned_as_is() {
        let fixed = config(Some("t"), Some("9"));
        assert_eq!(ConfigSource::Fixed(fixed.clone()).load(), fixed);
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let handler = ToolHandler::with_config(config(Some("t"), None));
        let err = handler.execute("delete_project", None).await.unwrap_err();

        assert!(matches!(&err, Error::UnknownTool(name) if name == "delete_project"));
        assert_eq!(err.to_string(), "Unknown tool: delete_project");
    }

    #[tokio::test]
    async fn test_missing_arguments_fail_on_title() {
        let handler = ToolHandler::with_config(config(Some("t"), None));
        let result = handler.execute(CREATE_ISSUE_TOOL, None).await.unwrap();

        assert_eq!(error_text(&result), "title must be a non-empty string");
    }

    #[tokio::test]
    async fn test_blank_title() {
        let handler = ToolHandler::with_config(config(Some("t"), Some("123")));
        let result = handler
            .execute(CREATE_ISSUE_TOOL, args(json!({"title": "  \t"})))
            .await
            .unwrap();

        assert!(error_text(&result).contains("title"));
    }

    #[tokio::test]
    async fn test_missing_project_when_unpinned() {
        let handler = ToolHandler::with_config(config(Some("t"), None));
        let result = handler
            .execute(CREATE_ISSUE_TOOL, args(json!({"title": "T"})))
            .await
            .unwrap();

        assert_eq!(error_text(&result), "projectId must be a non-empty string");
    }

    #[tokio::test]
    async fn test_missing_token() {
        let server = MockServer::start();
        let handler = ToolHandler::with_config(config(None, None));
        let result = handler
            .execute(
                CREATE_ISSUE_TOOL,
                args(json!({"title": "T", "projectId": "123", "gitlabUrl": server.base_url()})),
            )
            .await
            .unwrap();

        // Nothing is mocked: a request would surface as a 404 API error instead.
        assert_eq!(
            error_text(&result),
            "Missing required environment variable: GITLAB_TOKEN"
        );
    }

    #[tokio::test]
    async fn test_project_conflict() {
        let server = MockServer::start();
        let handler = ToolHandler::with_config(config(Some("t"), Some("123")));
        let result = handler
            .execute(
                CREATE_ISSUE_TOOL,
                args(json!({"title": "T", "projectId": "456", "gitlabUrl": server.base_url()})),
            )
            .await
            .unwrap();

        let text = error_text(&result);
        assert!(text.contains("123"));
        assert!(text.contains("456"));
        assert!(!text.contains("GitLab API error"));
    }

    #[tokio::test]
    async fn test_numeric_project_conflicts_with_pin() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/v4/projects/123/issues");
            then.status(201).json_body(issue_json());
        });

        let handler = ToolHandler::with_config(config(Some("t"), Some("123")));
        let result = handler
            .execute(
                CREATE_ISSUE_TOOL,
                args(json!({"title": "T", "projectId": 456, "gitlabUrl": server.base_url()})),
            )
            .await
            .unwrap();

        let text = error_text(&result);
        assert!(text.contains("123"));
        assert!(text.contains("456"));
        mock.assert_calls(0);
    }

    #[tokio::test]
    async fn test_wrong_typed_project_is_rejected_when_pinned() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/v4/projects/123/issues");
            then.status(201).json_body(issue_json());
        });

        let handler = ToolHandler::with_config(config(Some("t"), Some("123")));
        let result = handler
            .execute(
                CREATE_ISSUE_TOOL,
                args(json!({"title": "T", "projectId": true, "gitlabUrl": server.base_url()})),
            )
            .await
            .unwrap();

        assert_eq!(error_text(&result), "projectId must be a non-empty string");
        mock.assert_calls(0);
    }

    #[tokio::test]
    async fn test_pinned_project_used_in_path() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/v4/projects/123/issues")
                .header("PRIVATE-TOKEN", "secret");
            then.status(201).json_body(issue_json());
        });

        let handler = ToolHandler::with_config(config(Some("secret"), Some("123")));
        let result = handler
            .execute(
                CREATE_ISSUE_TOOL,
                args(json!({"title": "Broken build", "gitlabUrl": server.base_url()})),
            )
            .await
            .unwrap();

        mock.assert();
        assert_eq!(result.is_error, Some(false));
    }

    #[tokio::test]
    async fn test_trailing_slash_override() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/v4/projects/123/issues");
            then.status(201).json_body(issue_json());
        });

        let handler = ToolHandler::with_config(config(Some("secret"), None));
        let result = handler
            .execute(
                CREATE_ISSUE_TOOL,
                args(json!({
                    "title": "Broken build",
                    "projectId": "123",
                    "gitlabUrl": format!("{}/", server.base_url())
                })),
            )
            .await
            .unwrap();

        mock.assert();
        assert_eq!(result.is_error, Some(false));
    }

    #[tokio::test]
    async fn test_create_issue_success_payload() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/v4/projects/123/issues")
                .body_includes("title=Broken+build")
                .body_includes("description=CI+fails")
                .body_includes("labels=bug%2Curgent")
                .body_includes("assignee_ids%5B%5D=1")
                .body_includes("assignee_ids%5B%5D=2")
                .body_includes("milestone_id=4")
                .body_includes("due_date=2024-12-31")
                .body_includes("confidential=false");
            then.status(201).json_body(issue_json());
        });

        let handler = ToolHandler::with_config(config(Some("secret"), None));
        let result = handler
            .execute(
                CREATE_ISSUE_TOOL,
                args(json!({
                    "title": "Broken build",
                    "projectId": "123",
                    "description": "CI fails",
                    "labels": ["bug", "urgent"],
                    "assigneeIds": [1, 2],
                    "milestoneId": 4,
                    "dueDate": "2024-12-31",
                    "confidential": false,
                    "gitlabUrl": server.base_url()
                })),
            )
            .await
            .unwrap();

        mock.assert();
        assert_eq!(result.is_error, Some(false));
        assert_eq!(result.content.len(), 1);

        let text = first_text(&result);
        assert!(text.contains("\n  \"id\": 501"));

        let payload: Value = serde_json::from_str(text).unwrap();
        assert_eq!(
            payload,
            json!({
                "id": 501,
                "iid": 12,
                "projectId": 123,
                "title": "Broken build",
                "state": "opened",
                "webUrl": "https://git.example.com/group/project/-/issues/12"
            })
        );
    }

    #[tokio::test]
    async fn test_upstream_error_is_reported() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/v4/projects/123/issues");
            then.status(422)
                .body("{\"message\":\"Title has already been taken\"}");
        });

        let handler = ToolHandler::with_config(config(Some("secret"), None));
        let result = handler
            .execute(
                CREATE_ISSUE_TOOL,
                args(json!({"title": "T", "projectId": "123", "gitlabUrl": server.base_url()})),
            )
            .await
            .unwrap();

        let text = error_text(&result);
        assert!(text.contains("422"));
        assert!(text.contains("{\"message\":\"Title has already been taken\"}"));
    }
}
