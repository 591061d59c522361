//! Issue request and result types.
//!
//! Tool arguments arrive as an untyped JSON object. [`CreateIssueArgs::parse`]
//! turns that object into a validated request or a [`Error::Validation`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::{Error, Result};

// =============================================================================
// Request
// =============================================================================

/// Fields sent to GitLab when creating an issue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewIssue {
    pub title: String,
    pub description: Option<String>,
    pub labels: Vec<String>,
    pub assignee_ids: Vec<i64>,
    pub milestone_id: Option<i64>,
    /// Expected as `YYYY-MM-DD`, passed through unchecked
    pub due_date: Option<String>,
    pub confidential: Option<bool>,
}

/// Validated arguments of the `create_gitlab_issue` tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateIssueArgs {
    pub issue: NewIssue,
    /// Caller-supplied project, checked against the pinned one later
    pub project_id: Option<String>,
    /// Per-call instance URL override
    pub gitlab_url: Option<String>,
}

impl CreateIssueArgs {
    /// Parse raw tool arguments.
    ///
    /// `title` is checked first, then `projectId` unless the environment pins
    /// a project. A numeric `projectId` is taken as its decimal string and
    /// any other non-string `projectId` is rejected, pinned or not. Other
    /// optional fields with the wrong JSON type are dropped.
    pub fn parse(arguments: &Value, project_pinned: bool) -> Result<Self> {
        let empty = Map::new();
        let args = arguments.as_object().unwrap_or(&empty);

        let title = required_string(args, "title")?;
        let project_id = match project_identifier(args)? {
            Some(project_id) => Some(project_id),
            None if project_pinned => None,
            None => return Err(Error::Validation { field: "projectId" }),
        };

        let issue = NewIssue {
            title,
            description: optional_string(args, "description"),
            labels: string_list(args, "labels"),
            assignee_ids: integer_list(args, "assigneeIds"),
            milestone_id: integer(args, "milestoneId"),
            due_date: optional_string(args, "dueDate"),
            confidential: boolean(args, "confidential"),
        };

        Ok(Self {
            issue,
            project_id,
            gitlab_url: optional_string(args, "gitlabUrl"),
        })
    }
}

fn required_string(args: &Map<String, Value>, field: &'static str) -> Result<String> {
    match args.get(field) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
        _ => Err(Error::Validation { field }),
    }
}

/// `projectId` as a string: absent, null and blank mean "not given".
fn project_identifier(args: &Map<String, Value>) -> Result<Option<String>> {
    match args.get("projectId") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) if n.is_u64() => Ok(Some(n.to_string())),
        Some(_) => Err(Error::Validation { field: "projectId" }),
    }
}

fn optional_string(args: &Map<String, Value>, field: &str) -> Option<String> {
    match args.get(field)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::String(_) | Value::Null => None,
        other => {
            debug!(field, value = %other, "Ignoring non-string argument");
            None
        }
    }
}

fn string_list(args: &Map<String, Value>, field: &str) -> Vec<String> {
    match args.get(field) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(other) => {
            debug!(field, value = %other, "Ignoring non-array argument");
            Vec::new()
        }
    }
}

fn integer_list(args: &Map<String, Value>, field: &str) -> Vec<i64> {
    match args.get(field) {
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_i64).collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(other) => {
            debug!(field, value = %other, "Ignoring non-array argument");
            Vec::new()
        }
    }
}

fn integer(args: &Map<String, Value>, field: &str) -> Option<i64> {
    args.get(field).and_then(Value::as_i64)
}

fn boolean(args: &Map<String, Value>, field: &str) -> Option<bool> {
    args.get(field).and_then(Value::as_bool)
}

// =============================================================================
// Result
// =============================================================================

/// Normalized view of a created GitLab issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedIssue {
    pub id: u64,
    pub iid: u64,
    pub project_id: u64,
    pub title: String,
    pub state: String,
    pub web_url: String,
}
