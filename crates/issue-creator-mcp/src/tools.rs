//! MCP tool definitions.

use std::sync::Arc;

use rmcp::model::{JsonObject, Tool};
use serde_json::Value;

/// Name of the issue creation tool.
pub const CREATE_ISSUE_TOOL: &str = "create_gitlab_issue";

/// Definition of `create_gitlab_issue`.
///
/// When the environment pins a project, `projectId` is no longer required
/// and both descriptions name the pinned project.
pub fn create_issue_tool(pinned_project: Option<&str>) -> Tool {
    let (description, project_description, required) = match pinned_project {
        Some(project) => (
            format!(
                "Create a GitLab issue in project {} on a self-hosted (or gitlab.com) instance. \
                 The target project is fixed by the server configuration.",
                project
            ),
            format!(
                "Optional. This server is pinned to project {}; any other value is rejected.",
                project
            ),
            serde_json::json!(["title"]),
        ),
        None => (
            "Create a GitLab issue in a project on a self-hosted (or gitlab.com) instance."
                .to_string(),
            "GitLab project numeric ID or project path (e.g. group/project)".to_string(),
            serde_json::json!(["title", "projectId"]),
        ),
    };

    let schema = serde_json::json!({
        "type": "object",
        "additionalProperties": false,
        "required": required,
        "properties": {
            "title": {
                "type": "string",
                "description": "Issue title"
            },
            "projectId": {
                "type": "string",
                "description": project_description
            },
            "description": {
                "type": "string",
                "description": "Issue description/body"
            },
            "labels": {
                "type": "array",
                "items": { "type": "string" },
                "description": "List of labels to apply"
            },
            "assigneeIds": {
                "type": "array",
                "items": { "type": "number" },
                "description": "Assignee user IDs"
            },
            "milestoneId": {
                "type": "number",
                "description": "Milestone ID"
            },
            "dueDate": {
                "type": "string",
                "description": "Due date in YYYY-MM-DD format"
            },
            "confidential": {
                "type": "boolean",
                "description": "Create as confidential"
            },
            "gitlabUrl": {
                "type": "string",
                "description": "Optional override for GitLab base URL. Otherwise uses GITLAB_URL env var (defaults to https://gitlab.com)."
            }
        }
    });

    Tool {
        name: CREATE_ISSUE_TOOL.into(),
        description: Some(description.into()),
        input_schema: Arc::new(schema_object(schema)),
        annotations: None,
    }
}

fn schema_object(schema: Value) -> JsonObject {
    match schema {
        Value::Object(map) => map,
        _ => JsonObject::new(),
    }
}
