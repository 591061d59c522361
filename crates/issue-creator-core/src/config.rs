//! Configuration management for gitlab-issue-creator.
//!
//! All settings come from the process environment and are re-read on every
//! tool invocation, so a changed variable takes effect without a restart:
//!
//! - `GITLAB_TOKEN` (required) - personal/project access token
//! - `GITLAB_URL` (optional) - instance URL, defaults to `https://gitlab.com`
//! - `GITLAB_PROJECT_ID` (optional) - pins every call to one project
//!
//! # Example
//!
//! ```ignore
//! use issue_creator_core::EnvConfig;
//!
//! let config = EnvConfig::from_env();
//! let base_url = config.base_url(None);
//! let project = config.resolve_project(Some("group/project"))?;
//! let token = config.token()?;
//! ```

use crate::{Error, Result};
use tracing::debug;

/// Default GitLab instance URL.
pub const DEFAULT_GITLAB_URL: &str = "https://gitlab.com";

/// Token variable name.
pub const TOKEN_VAR: &str = "GITLAB_TOKEN";

/// Base URL variable name.
pub const URL_VAR: &str = "GITLAB_URL";

/// Pinned project variable name.
pub const PROJECT_VAR: &str = "GITLAB_PROJECT_ID";

// =============================================================================
// Configuration structures
// =============================================================================

/// Snapshot of the GitLab environment variables.
///
/// Blank values are stored as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvConfig {
    /// Access token sent as `PRIVATE-TOKEN`
    pub token: Option<String>,
    /// GitLab instance URL
    pub url: Option<String>,
    /// Project every call is pinned to
    pub project_id: Option<String>,
}

// =============================================================================
// EnvConfig implementation
// =============================================================================

impl EnvConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through an arbitrary lookup function.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            token: non_blank(lookup(TOKEN_VAR)),
            url: non_blank(lookup(URL_VAR)),
            project_id: non_blank(lookup(PROJECT_VAR)),
        };

        debug!(
            has_token = config.token.is_some(),
            url = ?config.url,
            pinned_project = ?config.project_id,
            "Resolved environment configuration"
        );

        config
    }

    /// Project pinned by the environment, if any.
    pub fn pinned_project(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    /// Access token, failing if it is not configured.
    pub fn token(&self) -> Result<&str> {
        self.token.as_deref().ok_or(Error::MissingEnv(TOKEN_VAR))
    }

    /// Effective base URL without a trailing slash.
    ///
    /// Priority: per-call override, then `GITLAB_URL`, then gitlab.com.
    pub fn base_url(&self, override_url: Option<&str>) -> String {
        let url = override_url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .or(self.url.as_deref())
            .unwrap_or(DEFAULT_GITLAB_URL);

        normalize_base_url(url).to_string()
    }

    /// Effective project identifier.
    ///
    /// A pinned project always wins; a caller asking for a different one is
    /// rejected instead of silently redirected.
    pub fn resolve_project(&self, requested: Option<&str>) -> Result<String> {
        let requested = requested.filter(|p| !p.trim().is_empty());

        match (self.pinned_project(), requested) {
            (Some(pinned), Some(requested)) if pinned != requested.trim() => {
                Err(Error::ProjectConflict {
                    pinned: pinned.to_string(),
                    requested: requested.to_string(),
                })
            }
            (Some(pinned), _) => Ok(pinned.to_string()),
            (None, Some(requested)) => Ok(requested.to_string()),
            (None, None) => Err(Error::MissingProject),
        }
    }
}

/// Strip one trailing slash from an instance URL.
pub fn normalize_base_url(url: &str) -> &str {
    url.strip_suffix('/').unwrap_or(url)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
