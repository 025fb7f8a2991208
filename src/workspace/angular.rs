//! Angular CLI workspace layout
//!
//! `angular.json` names every project with its type and source root. The
//! build output directory comes from `outputPath` for applications and from
//! the ng-packagr file (`architect.build.options.project`) for libraries.

use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::domain::ProjectType;
use crate::error::{PublishError, Result};

pub const ANGULAR_WORKSPACE_FILE: &str = "angular.json";

/// Type, root and build output of one project, as `angular.json` declares them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NgProjectLayout {
    pub name: String,
    pub project_type: ProjectType,
    /// Relative to the workspace root
    pub root: PathBuf,
    /// Relative to the workspace root
    pub dest: PathBuf,
}

#[derive(Debug, Deserialize)]
struct NgWorkspace {
    #[serde(default)]
    projects: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct NgProject {
    #[serde(rename = "projectType")]
    project_type: Option<String>,
    root: Option<String>,
    architect: Option<NgArchitect>,
}

#[derive(Debug, Deserialize)]
struct NgArchitect {
    build: Option<NgBuild>,
}

#[derive(Debug, Deserialize)]
struct NgBuild {
    options: Option<NgBuildOptions>,
}

#[derive(Debug, Deserialize)]
struct NgBuildOptions {
    /// ng-packagr configuration file of a library
    project: Option<String>,
    #[serde(rename = "outputPath")]
    output_path: Option<OutputPath>,
}

/// `outputPath` is a plain path, or `{ "base": ... }` with the application builder
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OutputPath {
    Plain(String),
    Detailed { base: String },
}

impl OutputPath {
    fn base(&self) -> &str {
        match self {
            OutputPath::Plain(path) => path,
            OutputPath::Detailed { base } => base,
        }
    }
}

#[derive(Debug, Deserialize)]
struct NgPackage {
    dest: Option<String>,
}

/// Read the project layouts from `<workspace_root>/angular.json`.
///
/// Returns `Ok(None)` when the workspace has no `angular.json`. Projects keep
/// their order of appearance in the file; projects of other types are skipped.
pub fn read_angular_workspace(workspace_root: &Path) -> Result<Option<Vec<NgProjectLayout>>> {
    let path = workspace_root.join(ANGULAR_WORKSPACE_FILE);
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path)?;
    let workspace: NgWorkspace = serde_json::from_str(&content).map_err(|e| {
        PublishError::workspace(format!("error reading {}: {}", path.display(), e))
    })?;

    let mut layouts = Vec::new();
    for (name, value) in workspace.projects {
        if let Some(layout) = project_layout(workspace_root, &name, value)? {
            layouts.push(layout);
        }
    }

    Ok(Some(layouts))
}

fn project_layout(
    workspace_root: &Path,
    name: &str,
    value: Value,
) -> Result<Option<NgProjectLayout>> {
    let invalid = || {
        PublishError::workspace(format!(
            "{}: Invalid library or application project structure",
            name
        ))
    };

    let project: NgProject = serde_json::from_value(value).map_err(|_| invalid())?;
    let project_type = project.project_type.ok_or_else(invalid)?;
    let root = project.root.ok_or_else(invalid)?;
    let options = project
        .architect
        .and_then(|a| a.build)
        .and_then(|b| b.options)
        .ok_or_else(invalid)?;

    let root = if root.is_empty() {
        PathBuf::from(".")
    } else {
        PathBuf::from(root)
    };

    let (project_type, dest) = match project_type.as_str() {
        "library" => {
            let ng_package = options.project.ok_or_else(|| {
                PublishError::workspace(format!("{}: Invalid library project structure", name))
            })?;
            (
                ProjectType::Library,
                library_dest(workspace_root, name, Path::new(&ng_package))?,
            )
        }
        "application" => {
            let output_path = options.output_path.ok_or_else(|| {
                PublishError::workspace(format!(
                    "{}: Invalid application project structure",
                    name
                ))
            })?;
            (
                ProjectType::Application,
                normalize(Path::new(output_path.base())),
            )
        }
        other => {
            warn!(project = name, "skipping project of type {}", other);
            return Ok(None);
        }
    };

    Ok(Some(NgProjectLayout {
        name: name.to_string(),
        project_type,
        root,
        dest,
    }))
}

/// `dest` of the ng-packagr file, resolved against that file's directory
fn library_dest(workspace_root: &Path, name: &str, ng_package: &Path) -> Result<PathBuf> {
    let path = workspace_root.join(ng_package);
    let content = fs::read_to_string(&path).map_err(|e| {
        PublishError::workspace(format!("{}: error reading {}: {}", name, path.display(), e))
    })?;

    let dest = serde_json::from_str::<NgPackage>(&content)
        .ok()
        .and_then(|p| p.dest)
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| {
            PublishError::workspace(format!("{}: Could not determine destination directory", name))
        })?;

    let package_dir = ng_package.parent().unwrap_or(Path::new(""));
    Ok(normalize(&package_dir.join(dest)))
}

/// Lexically resolve `.` and `..` components
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}
