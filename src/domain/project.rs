use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{PublishError, Result};

/// Kind of workspace project; decides where the version manifest lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Library,
    Application,
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectType::Library => f.write_str("library"),
            ProjectType::Application => f.write_str("application"),
        }
    }
}

/// One publishable unit of the workspace.
///
/// Built once per run by workspace discovery. A version bump derives a new
/// value through [`ProjectInfo::with_version`] rather than mutating in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectInfo {
    pub project_name: String,
    pub project_type: ProjectType,
    /// Source root, relative to the workspace root
    pub root: PathBuf,
    /// Build output directory, relative to the workspace root
    pub dest: PathBuf,
    pub version: String,
    /// Remote receiving the published artifact
    pub repository_url: Option<String>,
    pub publish: bool,
    /// Already resolved prefix for generated commit messages (may be empty)
    pub commit_prefix: String,
    /// Shell command run before the build output is packaged
    pub pre_publish: Option<String>,
}

impl ProjectInfo {
    /// Copy of this project carrying a new version
    pub fn with_version(&self, version: impl Into<String>) -> Self {
        ProjectInfo {
            version: version.into(),
            ..self.clone()
        }
    }

    /// Directory holding the package manifest whose version is bumped
    pub fn manifest_dir(&self) -> &Path {
        match self.project_type {
            ProjectType::Library => &self.root,
            ProjectType::Application => Path::new("."),
        }
    }

    /// Repository URL, or an error when none is configured
    pub fn repository_url(&self) -> Result<&str> {
        match self.repository_url.as_deref() {
            Some(url) if !url.trim().is_empty() => Ok(url),
            _ => Err(PublishError::invalid_project(format!(
                "{}: no repository_url configured",
                self.project_name
            ))),
        }
    }

    /// Reject project values that cannot be acted upon
    pub fn validate(&self) -> Result<()> {
        if self.project_name.trim().is_empty() {
            return Err(PublishError::invalid_project("project name is empty"));
        }

        if self.publish {
            self.repository_url()?;
        }

        Ok(())
    }

    /// Apply the commit prefix rule to a generated message
    pub fn prefixed_message(&self, message: &str) -> String {
        if self.commit_prefix.is_empty() {
            message.to_string()
        } else {
            format!("{} {}", self.commit_prefix, message)
        }
    }
}
